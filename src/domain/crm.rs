//! Core CRM entities. Everything here is agency-scoped; row-level
//! visibility (admin sees all, agents see their own) is enforced by the
//! application services, not by these types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Original spreadsheet columns kept verbatim on imported records for
/// audit/traceability. Keyed by the resolved (lower-cased, de-duplicated)
/// header name.
pub type Metadata = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Agent,
    TeamMember,
}

impl UserRole {
    /// Admins see every record in the agency; everyone else only their own.
    pub fn sees_all_records(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgencyPlan {
    Basic,
    Pro,
    Enterprise,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agency {
    pub id: String,
    pub name: String,
    pub plan: AgencyPlan,
    pub logo: Option<String>,
    pub ai_credits: i64,
    pub ai_limits: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub agency_id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub status: UserStatus,
    pub ai_usage: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub agency_id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub tags: Vec<String>,
    pub notes: String,
    pub assigned_to: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    New,
    Active,
    #[serde(rename = "Under Contract")]
    UnderContract,
    Sold,
}

impl Default for ListingStatus {
    fn default() -> Self {
        ListingStatus::New
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Result of the AI deal-scoring assist, stored on the listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiScore {
    pub score: f64,
    pub explanation: String,
    pub risks: Vec<String>,
    pub urgency: Urgency,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub agency_id: String,
    pub address: String,
    pub seller_name: String,
    pub price: f64,
    pub assigned_agent: String,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub ai_score: Option<AiScore>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Five-stage negotiation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferStatus {
    Draft,
    #[serde(rename = "Offer Sent")]
    OfferSent,
    #[serde(rename = "In Talks")]
    InTalks,
    #[serde(rename = "Offer Accepted")]
    OfferAccepted,
    #[serde(rename = "Offer Declined")]
    OfferDeclined,
}

impl Default for OfferStatus {
    fn default() -> Self {
        OfferStatus::Draft
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Financing {
    #[serde(rename = "Cash")]
    Cash,
    #[serde(rename = "Conventional")]
    Conventional,
    Fha,
    Va,
}

impl Default for Financing {
    fn default() -> Self {
        Financing::Conventional
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub id: String,
    pub agency_id: String,
    /// May point at a synthesized shell listing when the offer targets a
    /// property the agency does not track.
    pub listing_id: String,
    pub buyer_name: String,
    pub price: f64,
    pub down_payment: f64,
    pub earnest_money: f64,
    pub financing: Financing,
    /// Days.
    pub inspection_period: u32,
    pub contingencies: Vec<String>,
    pub closing_date: String,
    pub status: OfferStatus,
    pub assigned_to: String,
    pub created_at: DateTime<Utc>,
    pub ai_summary: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedKind {
    Contact,
    Listing,
    Offer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedRef {
    #[serde(rename = "type")]
    pub kind: RelatedKind,
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub agency_id: String,
    pub title: String,
    pub assigned_to: String,
    pub due_date: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub related_to: Option<RelatedRef>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadKind {
    General,
    Listing,
    Offer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub agency_id: String,
    pub title: String,
    pub kind: ThreadKind,
    pub related_id: Option<String>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Event,
    Audit,
    Ai,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub agency_id: String,
    pub user_id: String,
    pub action: String,
    pub target: String,
    pub kind: ActivityKind,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub agency_id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_status_serializes_with_spaces() {
        let s = serde_json::to_string(&ListingStatus::UnderContract).unwrap();
        assert_eq!(s, "\"Under Contract\"");
    }

    #[test]
    fn offer_status_round_trips() {
        let s: OfferStatus = serde_json::from_str("\"Offer Sent\"").unwrap();
        assert_eq!(s, OfferStatus::OfferSent);
    }

    #[test]
    fn only_admins_see_all_records() {
        assert!(UserRole::Admin.sees_all_records());
        assert!(!UserRole::Agent.sees_all_records());
        assert!(!UserRole::TeamMember.sees_all_records());
    }
}
