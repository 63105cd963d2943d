pub mod ai_assist;
pub mod auth_service;
pub mod contact_service;
pub mod import;
pub mod import_schema;
pub mod listing_service;
pub mod messaging_service;
pub mod offer_service;
pub mod task_service;

pub(crate) mod llm_output;

use crate::domain::crm::{Activity, ActivityKind};
use uuid::Uuid;

/// Shared constructor for activity-feed entries; every service logs the
/// same "<user> <action> <target>" shape the UI renders.
pub(crate) fn activity_entry(
    agency_id: &str,
    user_id: &str,
    action: String,
    target: String,
    kind: ActivityKind,
) -> Activity {
    Activity {
        id: Uuid::new_v4().to_string(),
        agency_id: agency_id.to_string(),
        user_id: user_id.to_string(),
        action,
        target,
        kind,
        timestamp: chrono::Utc::now(),
    }
}
