use serde::{Deserialize, Serialize};

/// Per-field classification across an imported batch, shown to the
/// operator before commit. Informational only; never blocks the import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageStatus {
    /// A column resolved and at least one row carries a non-empty value.
    Found,
    /// A column resolved but every row's value is blank.
    Empty,
    /// No column resolved for this field at all.
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldCoverage {
    pub field: String,
    pub status: CoverageStatus,
}
