use crate::application::use_cases::activity_entry;
use crate::application::use_cases::contact_service::visibility_filter;
use crate::domain::crm::{
    ActivityKind, Listing, ListingStatus, Metadata, Notification, User,
};
use crate::domain::error::Result;
use crate::infrastructure::db::repository::CrmRepository;
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ListingInput {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[serde(default)]
    pub seller_name: String,
    #[validate(range(min = 0.0, message = "price must be non-negative"))]
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub status: ListingStatus,
    pub assigned_agent: Option<String>,
    pub notes: Option<String>,
}

pub struct ListingService {
    repository: Arc<CrmRepository>,
}

impl ListingService {
    pub fn new(repository: Arc<CrmRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, actor: &User) -> Result<Vec<Listing>> {
        let assignee = visibility_filter(actor);
        self.repository
            .list_listings(&actor.agency_id, assignee)
            .await
    }

    pub async fn save(&self, actor: &User, input: ListingInput) -> Result<Listing> {
        let listing = Listing {
            id: input.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            agency_id: actor.agency_id.clone(),
            address: input.address,
            seller_name: input.seller_name,
            price: input.price,
            assigned_agent: input.assigned_agent.unwrap_or_else(|| actor.id.clone()),
            status: input.status,
            created_at: chrono::Utc::now(),
            notes: input.notes,
            ai_score: None,
            metadata: Metadata::new(),
        };

        self.repository.save_listing(&listing).await?;
        Ok(listing)
    }

    /// Pipeline stage move. Logs the transition and notifies the
    /// assigned agent.
    pub async fn update_status(
        &self,
        actor: &User,
        id: &str,
        status: ListingStatus,
    ) -> Result<Listing> {
        let listing = self.repository.get_listing(&actor.agency_id, id).await?;
        let old_status = listing.status;

        self.repository
            .set_listing_status(&actor.agency_id, id, status)
            .await?;

        let entry = activity_entry(
            &actor.agency_id,
            &actor.id,
            format!(
                "changed listing status from {} to {}",
                status_label(old_status),
                status_label(status)
            ),
            listing.address.clone(),
            ActivityKind::Event,
        );
        if let Err(err) = self.repository.log_activity(&entry).await {
            error!(error = %err, "Failed to log listing status change");
        }

        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            agency_id: actor.agency_id.clone(),
            user_id: listing.assigned_agent.clone(),
            title: "Listing Update".to_string(),
            message: format!(
                "The status for {} is now {}",
                listing.address,
                status_label(status)
            ),
            read: false,
            timestamp: chrono::Utc::now(),
        };
        if let Err(err) = self.repository.push_notification(&notification).await {
            error!(error = %err, "Failed to push listing status notification");
        }

        self.repository.get_listing(&actor.agency_id, id).await
    }
}

pub(crate) fn status_label(status: ListingStatus) -> &'static str {
    match status {
        ListingStatus::New => "New",
        ListingStatus::Active => "Active",
        ListingStatus::UnderContract => "Under Contract",
        ListingStatus::Sold => "Sold",
    }
}
