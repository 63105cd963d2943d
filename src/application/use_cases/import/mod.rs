// ============================================================
// CSV IMPORT PIPELINE
// ============================================================
// raw text -> CsvParser -> header resolution -> (optional AI remap)
// -> field normalization -> coverage report -> operator confirmation
// -> best-effort per-record commit.

pub(crate) mod ai_remap;
pub mod header_resolver;
pub mod normalizer;
pub mod reporter;

use crate::application::use_cases::import_schema;
use crate::domain::crm::{Contact, Listing, ListingStatus, Metadata, Offer, Task};
use crate::domain::error::Result;
use crate::domain::import::{
    ContactDraft, EntityKind, ImportOutcome, ImportPreview, ImportSpec, ListingDraft, OfferDraft,
    ParsedRow, RowCell, TaskDraft,
};
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::config::ImportConfig;
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::db::repository::CrmRepository;
use crate::infrastructure::llm_clients::LLMClient;
use ai_remap::AiRemapper;
use chrono::{DateTime, Utc};
use header_resolver::HeaderResolution;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Explicit pipeline context: who is importing, into which agency, and
/// what "now" means. Nothing here is read from ambient state.
#[derive(Debug, Clone)]
pub struct ImportContext {
    pub agency_id: String,
    pub actor_user_id: String,
    pub now: DateTime<Utc>,
}

pub struct ImportUseCase {
    repository: Arc<CrmRepository>,
    llm: Arc<dyn LLMClient + Send + Sync>,
    llm_config: LLMConfig,
    config: ImportConfig,
}

struct PreparedBatch {
    /// Rows the normalizer consumes (canonical-first when remapped).
    rows: Vec<ParsedRow>,
    /// Pristine rows, kept aligned with `rows`, for metadata traceability.
    originals: Vec<ParsedRow>,
    resolution: HeaderResolution,
    total_rows: usize,
    skipped_rows: usize,
}

impl ImportUseCase {
    pub fn new(
        repository: Arc<CrmRepository>,
        llm: Arc<dyn LLMClient + Send + Sync>,
        llm_config: LLMConfig,
        config: ImportConfig,
    ) -> Self {
        Self {
            repository,
            llm,
            llm_config,
            config,
        }
    }

    async fn prepare(&self, content: &str, spec: &ImportSpec, remap: bool) -> Result<PreparedBatch> {
        let raw = CsvParser::new().parse_content(content)?;

        // Data rows may be wider than the header row (unlabeled trailing
        // columns); pad everything to one width so column indices hold
        // across the batch.
        let width = raw.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut headers = header_resolver::resolve_headers(&raw[0]);
        for index in headers.len()..width {
            headers.push(format!("column_{}", index));
        }

        let total_rows = raw.len() - 1;
        let mut originals: Vec<ParsedRow> = Vec::with_capacity(total_rows);
        for (index, row) in raw[1..].iter().enumerate() {
            let cells = (0..width)
                .map(|c| RowCell::new(headers[c].clone(), row.get(c).cloned().unwrap_or_default()))
                .collect();
            originals.push(ParsedRow::new(index, cells));
        }

        originals.retain(|row| !row.is_blank());
        let skipped_rows = total_rows - originals.len();

        // Structural gate runs against the file's own headers even when
        // the AI pre-pass is enabled.
        let base_resolution = header_resolver::resolve_fields(&headers, spec)?;

        let (rows, resolution) = if remap {
            let remapper = AiRemapper::new(
                self.llm.as_ref(),
                &self.llm_config,
                self.config.remap_batch_size,
            );
            let mapped = remapper.remap(spec, &originals).await;
            let shape: Vec<String> = match mapped.first() {
                Some(row) => row.cells.iter().map(|c| c.header.clone()).collect(),
                None => headers.clone(),
            };
            let resolution = header_resolver::resolve_fields(&shape, spec)?;
            (mapped, resolution)
        } else {
            (originals.clone(), base_resolution)
        };

        Ok(PreparedBatch {
            rows,
            originals,
            resolution,
            total_rows,
            skipped_rows,
        })
    }

    // ---- previews --------------------------------------------------

    pub async fn preview_contacts(
        &self,
        content: &str,
        remap: bool,
    ) -> Result<ImportPreview<ContactDraft>> {
        let spec = import_schema::contact_spec();
        let batch = self.prepare(content, &spec, remap).await?;

        let drafts = batch
            .rows
            .iter()
            .zip(&batch.originals)
            .map(|(row, original)| {
                let mut draft = normalizer::normalize_contact(row, &batch.resolution);
                draft.metadata = original.metadata();
                draft
            })
            .collect();

        Ok(ImportPreview {
            drafts,
            coverage: reporter::field_coverage(&spec, &batch.resolution, &batch.rows),
            total_rows: batch.total_rows,
            skipped_rows: batch.skipped_rows,
        })
    }

    pub async fn preview_listings(
        &self,
        content: &str,
        remap: bool,
    ) -> Result<ImportPreview<ListingDraft>> {
        let spec = import_schema::listing_spec();
        let batch = self.prepare(content, &spec, remap).await?;

        let drafts = batch
            .rows
            .iter()
            .zip(&batch.originals)
            .map(|(row, original)| {
                let mut draft = normalizer::normalize_listing(row, &batch.resolution, &self.config);
                draft.metadata = original.metadata();
                draft
            })
            .collect();

        Ok(ImportPreview {
            drafts,
            coverage: reporter::field_coverage(&spec, &batch.resolution, &batch.rows),
            total_rows: batch.total_rows,
            skipped_rows: batch.skipped_rows,
        })
    }

    pub async fn preview_offers(
        &self,
        content: &str,
        remap: bool,
    ) -> Result<ImportPreview<OfferDraft>> {
        let spec = import_schema::offer_spec();
        let batch = self.prepare(content, &spec, remap).await?;

        let drafts = batch
            .rows
            .iter()
            .zip(&batch.originals)
            .map(|(row, original)| {
                let mut draft = normalizer::normalize_offer(row, &batch.resolution, &self.config);
                draft.metadata = original.metadata();
                draft
            })
            .collect();

        Ok(ImportPreview {
            drafts,
            coverage: reporter::field_coverage(&spec, &batch.resolution, &batch.rows),
            total_rows: batch.total_rows,
            skipped_rows: batch.skipped_rows,
        })
    }

    pub async fn preview_tasks(
        &self,
        content: &str,
        remap: bool,
    ) -> Result<ImportPreview<TaskDraft>> {
        let spec = import_schema::task_spec();
        let batch = self.prepare(content, &spec, remap).await?;

        let drafts = batch
            .rows
            .iter()
            .zip(&batch.originals)
            .map(|(row, original)| {
                let mut draft = normalizer::normalize_task(row, &batch.resolution);
                draft.metadata = original.metadata();
                draft
            })
            .collect();

        Ok(ImportPreview {
            drafts,
            coverage: reporter::field_coverage(&spec, &batch.resolution, &batch.rows),
            total_rows: batch.total_rows,
            skipped_rows: batch.skipped_rows,
        })
    }

    // ---- commits -----------------------------------------------------
    //
    // Each record is upserted independently: one bad row must not roll
    // back the rest. Failures are logged and counted for the operator.

    pub async fn commit_contacts(
        &self,
        drafts: Vec<ContactDraft>,
        ctx: &ImportContext,
    ) -> Result<ImportOutcome> {
        let mut outcome = ImportOutcome {
            imported: 0,
            failed: 0,
        };

        for draft in drafts {
            let contact = Contact {
                id: Uuid::new_v4().to_string(),
                agency_id: ctx.agency_id.clone(),
                name: draft.name,
                phone: draft.phone,
                email: draft.email,
                tags: draft.tags,
                notes: draft.notes,
                assigned_to: ctx.actor_user_id.clone(),
                created_at: ctx.now,
                metadata: draft.metadata,
            };

            match self.repository.save_contact(&contact).await {
                Ok(()) => outcome.imported += 1,
                Err(err) => {
                    error!(error = %err, name = %contact.name, "Failed to persist imported contact");
                    outcome.failed += 1;
                }
            }
        }

        self.log_import(ctx, EntityKind::Contacts, outcome).await;
        Ok(outcome)
    }

    pub async fn commit_listings(
        &self,
        drafts: Vec<ListingDraft>,
        ctx: &ImportContext,
    ) -> Result<ImportOutcome> {
        let mut outcome = ImportOutcome {
            imported: 0,
            failed: 0,
        };

        for draft in drafts {
            let listing = Listing {
                id: Uuid::new_v4().to_string(),
                agency_id: ctx.agency_id.clone(),
                address: draft.address,
                seller_name: draft.seller_name,
                price: draft.price,
                assigned_agent: ctx.actor_user_id.clone(),
                status: draft.status,
                created_at: ctx.now,
                notes: draft.notes,
                ai_score: None,
                metadata: draft.metadata,
            };

            match self.repository.save_listing(&listing).await {
                Ok(()) => outcome.imported += 1,
                Err(err) => {
                    error!(error = %err, address = %listing.address, "Failed to persist imported listing");
                    outcome.failed += 1;
                }
            }
        }

        self.log_import(ctx, EntityKind::Listings, outcome).await;
        Ok(outcome)
    }

    pub async fn commit_offers(
        &self,
        drafts: Vec<OfferDraft>,
        ctx: &ImportContext,
    ) -> Result<ImportOutcome> {
        let mut outcome = ImportOutcome {
            imported: 0,
            failed: 0,
        };

        for draft in drafts {
            let listing_id = match self.anchor_listing(&draft, ctx).await {
                Ok(id) => id,
                Err(err) => {
                    error!(error = %err, address = %draft.property_address, "Failed to anchor imported offer");
                    outcome.failed += 1;
                    continue;
                }
            };

            let offer = Offer {
                id: Uuid::new_v4().to_string(),
                agency_id: ctx.agency_id.clone(),
                listing_id,
                buyer_name: draft.buyer_name,
                price: draft.price,
                down_payment: draft.down_payment,
                earnest_money: draft.earnest_money,
                financing: draft.financing,
                inspection_period: draft.inspection_period,
                contingencies: draft.contingencies,
                closing_date: draft.closing_date,
                status: draft.status,
                assigned_to: ctx.actor_user_id.clone(),
                created_at: ctx.now,
                ai_summary: None,
            };

            match self.repository.save_offer(&offer).await {
                Ok(()) => outcome.imported += 1,
                Err(err) => {
                    error!(error = %err, buyer = %offer.buyer_name, "Failed to persist imported offer");
                    outcome.failed += 1;
                }
            }
        }

        self.log_import(ctx, EntityKind::Offers, outcome).await;
        Ok(outcome)
    }

    pub async fn commit_tasks(
        &self,
        drafts: Vec<TaskDraft>,
        ctx: &ImportContext,
    ) -> Result<ImportOutcome> {
        let mut outcome = ImportOutcome {
            imported: 0,
            failed: 0,
        };

        for draft in drafts {
            let task = Task {
                id: Uuid::new_v4().to_string(),
                agency_id: ctx.agency_id.clone(),
                title: draft.title,
                assigned_to: ctx.actor_user_id.clone(),
                due_date: draft.due_date,
                status: draft.status,
                priority: draft.priority,
                related_to: None,
                created_at: ctx.now,
            };

            match self.repository.save_task(&task).await {
                Ok(()) => outcome.imported += 1,
                Err(err) => {
                    error!(error = %err, title = %task.title, "Failed to persist imported task");
                    outcome.failed += 1;
                }
            }
        }

        self.log_import(ctx, EntityKind::Tasks, outcome).await;
        Ok(outcome)
    }

    /// Offers reference listings by id; when the source row describes a
    /// property the agency does not track, synthesize a shell listing to
    /// anchor the offer against.
    async fn anchor_listing(&self, draft: &OfferDraft, ctx: &ImportContext) -> Result<String> {
        if let Some(listing) = self
            .repository
            .find_listing_by_address(&ctx.agency_id, &draft.property_address)
            .await?
        {
            return Ok(listing.id);
        }

        let shell = Listing {
            id: Uuid::new_v4().to_string(),
            agency_id: ctx.agency_id.clone(),
            address: draft.property_address.clone(),
            seller_name: "Unknown Seller".to_string(),
            price: 0.0,
            assigned_agent: ctx.actor_user_id.clone(),
            status: ListingStatus::New,
            created_at: ctx.now,
            notes: None,
            ai_score: None,
            metadata: Metadata::new(),
        };
        self.repository.save_listing(&shell).await?;

        info!(address = %shell.address, "Synthesized shell listing for external property");
        Ok(shell.id)
    }

    async fn log_import(&self, ctx: &ImportContext, entity: EntityKind, outcome: ImportOutcome) {
        let activity = crate::domain::crm::Activity {
            id: Uuid::new_v4().to_string(),
            agency_id: ctx.agency_id.clone(),
            user_id: ctx.actor_user_id.clone(),
            action: format!(
                "imported {} {} ({} failed) from",
                outcome.imported, entity, outcome.failed
            ),
            target: "CSV upload".to_string(),
            kind: crate::domain::crm::ActivityKind::Audit,
            timestamp: ctx.now,
        };

        if let Err(err) = self.repository.log_activity(&activity).await {
            error!(error = %err, "Failed to record import activity");
        }
    }
}
