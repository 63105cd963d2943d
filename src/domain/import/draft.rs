use crate::domain::crm::{
    Financing, ListingStatus, Metadata, OfferStatus, TaskPriority, TaskStatus,
};
use crate::domain::import::FieldCoverage;
use serde::{Deserialize, Serialize};

/// Normalized record drafts. A draft is what the operator reviews in the
/// preview step; ids, timestamps and ownership are stamped at commit time
/// from the explicit import context.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub tags: Vec<String>,
    pub notes: String,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingDraft {
    pub address: String,
    pub seller_name: String,
    pub price: f64,
    pub status: ListingStatus,
    pub notes: Option<String>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferDraft {
    pub buyer_name: String,
    /// Address of the target property; resolved against tracked listings
    /// at commit time, synthesizing a shell listing when unknown.
    pub property_address: String,
    pub price: f64,
    pub down_payment: f64,
    pub earnest_money: f64,
    pub financing: Financing,
    pub inspection_period: u32,
    pub contingencies: Vec<String>,
    pub closing_date: String,
    pub status: OfferStatus,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub due_date: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub metadata: Metadata,
}

/// What the operator sees between upload and commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPreview<D> {
    pub drafts: Vec<D>,
    pub coverage: Vec<FieldCoverage>,
    /// Data rows in the file, before blank-row filtering.
    pub total_rows: usize,
    pub skipped_rows: usize,
}

/// Post-commit report: best-effort batch semantics, one upsert per record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub imported: usize,
    pub failed: usize,
}
