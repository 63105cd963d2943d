use crate::domain::crm::{
    Activity, ActivityKind, Agency, AgencyPlan, AiScore, Contact, Financing, Listing,
    ListingStatus, Message, Metadata, Notification, Offer, OfferStatus, Task, TaskPriority,
    TaskStatus, ThreadKind, User, UserRole, UserStatus,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

// Enum columns are stored as their serde string form so the database and
// the API speak the same vocabulary ("Under Contract", "Offer Sent", ...).

pub(super) fn to_db_enum<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

pub(super) fn from_db_enum<T: DeserializeOwned>(raw: &str, fallback: T) -> T {
    serde_json::from_value(serde_json::Value::String(raw.to_string())).unwrap_or(fallback)
}

pub(super) fn to_json_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

pub(super) fn from_json_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

pub(super) fn to_json_map(map: &Metadata) -> String {
    serde_json::to_string(map).unwrap_or_else(|_| "{}".to_string())
}

pub(super) fn from_json_map(raw: &str) -> Metadata {
    serde_json::from_str(raw).unwrap_or_default()
}

pub(super) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[derive(sqlx::FromRow)]
pub(super) struct AgencyEntity {
    id: String,
    name: String,
    plan: String,
    logo: Option<String>,
    ai_credits: i64,
    ai_limits: i64,
}

impl From<AgencyEntity> for Agency {
    fn from(entity: AgencyEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            plan: from_db_enum(&entity.plan, AgencyPlan::Basic),
            logo: entity.logo,
            ai_credits: entity.ai_credits,
            ai_limits: entity.ai_limits,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct UserEntity {
    id: String,
    agency_id: String,
    name: String,
    email: String,
    role: String,
    avatar: Option<String>,
    status: String,
    ai_usage: i64,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            agency_id: entity.agency_id,
            name: entity.name,
            email: entity.email,
            role: from_db_enum(&entity.role, UserRole::Agent),
            avatar: entity.avatar,
            status: from_db_enum(&entity.status, UserStatus::Active),
            ai_usage: entity.ai_usage,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct ContactEntity {
    id: String,
    agency_id: String,
    name: String,
    phone: String,
    email: String,
    tags_json: String,
    notes: String,
    assigned_to: String,
    created_at: String,
    metadata_json: String,
}

impl From<ContactEntity> for Contact {
    fn from(entity: ContactEntity) -> Self {
        Self {
            id: entity.id,
            agency_id: entity.agency_id,
            name: entity.name,
            phone: entity.phone,
            email: entity.email,
            tags: from_json_list(&entity.tags_json),
            notes: entity.notes,
            assigned_to: entity.assigned_to,
            created_at: parse_timestamp(&entity.created_at),
            metadata: from_json_map(&entity.metadata_json),
        }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct ListingEntity {
    id: String,
    agency_id: String,
    address: String,
    seller_name: String,
    price: f64,
    assigned_agent: String,
    status: String,
    created_at: String,
    notes: Option<String>,
    ai_score_json: Option<String>,
    metadata_json: String,
}

impl From<ListingEntity> for Listing {
    fn from(entity: ListingEntity) -> Self {
        Self {
            id: entity.id,
            agency_id: entity.agency_id,
            address: entity.address,
            seller_name: entity.seller_name,
            price: entity.price,
            assigned_agent: entity.assigned_agent,
            status: from_db_enum(&entity.status, ListingStatus::New),
            created_at: parse_timestamp(&entity.created_at),
            notes: entity.notes,
            ai_score: entity
                .ai_score_json
                .as_deref()
                .and_then(|raw| serde_json::from_str::<AiScore>(raw).ok()),
            metadata: from_json_map(&entity.metadata_json),
        }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct OfferEntity {
    id: String,
    agency_id: String,
    listing_id: String,
    buyer_name: String,
    price: f64,
    down_payment: f64,
    earnest_money: f64,
    financing: String,
    inspection_period: i64,
    contingencies_json: String,
    closing_date: String,
    status: String,
    assigned_to: String,
    created_at: String,
    ai_summary: Option<String>,
}

impl From<OfferEntity> for Offer {
    fn from(entity: OfferEntity) -> Self {
        Self {
            id: entity.id,
            agency_id: entity.agency_id,
            listing_id: entity.listing_id,
            buyer_name: entity.buyer_name,
            price: entity.price,
            down_payment: entity.down_payment,
            earnest_money: entity.earnest_money,
            financing: from_db_enum(&entity.financing, Financing::Conventional),
            inspection_period: entity.inspection_period.max(0) as u32,
            contingencies: from_json_list(&entity.contingencies_json),
            closing_date: entity.closing_date,
            status: from_db_enum(&entity.status, OfferStatus::Draft),
            assigned_to: entity.assigned_to,
            created_at: parse_timestamp(&entity.created_at),
            ai_summary: entity.ai_summary,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct TaskEntity {
    id: String,
    agency_id: String,
    title: String,
    assigned_to: String,
    due_date: String,
    status: String,
    priority: String,
    related_json: Option<String>,
    created_at: String,
}

impl From<TaskEntity> for Task {
    fn from(entity: TaskEntity) -> Self {
        Self {
            id: entity.id,
            agency_id: entity.agency_id,
            title: entity.title,
            assigned_to: entity.assigned_to,
            due_date: entity.due_date,
            status: from_db_enum(&entity.status, TaskStatus::Pending),
            priority: from_db_enum(&entity.priority, TaskPriority::Medium),
            related_to: entity
                .related_json
                .as_deref()
                .and_then(|raw| serde_json::from_str(raw).ok()),
            created_at: parse_timestamp(&entity.created_at),
        }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct ThreadEntity {
    pub(super) id: String,
    pub(super) agency_id: String,
    pub(super) title: String,
    pub(super) kind: String,
    pub(super) related_id: Option<String>,
}

impl ThreadEntity {
    pub(super) fn kind(&self) -> ThreadKind {
        from_db_enum(&self.kind, ThreadKind::General)
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct MessageEntity {
    id: String,
    sender_id: String,
    text: String,
    timestamp: String,
}

impl From<MessageEntity> for Message {
    fn from(entity: MessageEntity) -> Self {
        Self {
            id: entity.id,
            sender_id: entity.sender_id,
            text: entity.text,
            timestamp: parse_timestamp(&entity.timestamp),
        }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct ActivityEntity {
    id: String,
    agency_id: String,
    user_id: String,
    action: String,
    target: String,
    kind: String,
    timestamp: String,
}

impl From<ActivityEntity> for Activity {
    fn from(entity: ActivityEntity) -> Self {
        Self {
            id: entity.id,
            agency_id: entity.agency_id,
            user_id: entity.user_id,
            action: entity.action,
            target: entity.target,
            kind: from_db_enum(&entity.kind, ActivityKind::Event),
            timestamp: parse_timestamp(&entity.timestamp),
        }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct NotificationEntity {
    id: String,
    agency_id: String,
    user_id: String,
    title: String,
    message: String,
    read: i64,
    timestamp: String,
}

impl From<NotificationEntity> for Notification {
    fn from(entity: NotificationEntity) -> Self {
        Self {
            id: entity.id,
            agency_id: entity.agency_id,
            user_id: entity.user_id,
            title: entity.title,
            message: entity.message,
            read: entity.read != 0,
            timestamp: parse_timestamp(&entity.timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_columns_round_trip_through_serde_strings() {
        assert_eq!(to_db_enum(&ListingStatus::UnderContract), "Under Contract");
        assert_eq!(
            from_db_enum::<ListingStatus>("Under Contract", ListingStatus::New),
            ListingStatus::UnderContract
        );
        assert_eq!(
            from_db_enum::<ListingStatus>("garbage", ListingStatus::New),
            ListingStatus::New
        );
    }

    #[test]
    fn json_helpers_tolerate_bad_payloads() {
        assert!(from_json_list("not json").is_empty());
        assert!(from_json_map("not json").is_empty());
    }
}
