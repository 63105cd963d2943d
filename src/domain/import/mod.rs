// ============================================================
// IMPORT DOMAIN LAYER
// ============================================================
// Ephemeral types flowing through the CSV ingestion pipeline.
// No I/O, no async, no external dependencies.

mod coverage;
mod draft;
mod import_spec;
mod parsed_row;

pub use coverage::{CoverageStatus, FieldCoverage};
pub use draft::{
    ContactDraft, ImportOutcome, ImportPreview, ListingDraft, OfferDraft, TaskDraft,
};
pub use import_spec::{EntityKind, FieldSpec, ImportSpec};
pub use parsed_row::{ParsedRow, RowCell};
