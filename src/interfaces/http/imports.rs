use super::{add_log, require_actor, AppState};
use crate::application::ImportContext;
use crate::domain::error::AppError;
use crate::domain::import::{ContactDraft, ListingDraft, OfferDraft, TaskDraft};
use crate::infrastructure::csv::decode_text;
use actix_web::{post, web, HttpRequest, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PreviewOptions {
    /// Run the optional AI remap pre-pass before the heuristic
    /// normalizer. Safe to leave off; the heuristics are the fallback
    /// either way.
    #[serde(default)]
    pub remap: bool,
}

/// Upload step: the raw file body goes in, the draft records plus the
/// per-field coverage report come back. Nothing is persisted yet; the
/// operator can abort by simply discarding the preview.
#[post("/import/{entity}/preview")]
pub(super) async fn preview_import(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    options: web::Query<PreviewOptions>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let content = decode_text(&body);

    add_log(
        &data.logs,
        "INFO",
        "Import",
        &format!(
            "{} uploaded a {} file ({} bytes, remap={})",
            actor.email,
            path.as_str(),
            body.len(),
            options.remap
        ),
    );

    let response = match path.as_str() {
        "contacts" => {
            let preview = data
                .import_use_case
                .preview_contacts(&content, options.remap)
                .await?;
            HttpResponse::Ok().json(preview)
        }
        "listings" => {
            let preview = data
                .import_use_case
                .preview_listings(&content, options.remap)
                .await?;
            HttpResponse::Ok().json(preview)
        }
        "offers" => {
            let preview = data
                .import_use_case
                .preview_offers(&content, options.remap)
                .await?;
            HttpResponse::Ok().json(preview)
        }
        "tasks" => {
            let preview = data
                .import_use_case
                .preview_tasks(&content, options.remap)
                .await?;
            HttpResponse::Ok().json(preview)
        }
        other => {
            return Err(AppError::ValidationError(format!(
                "Unknown import entity: {}",
                other
            )))
        }
    };

    Ok(response)
}

#[derive(Debug, Deserialize)]
pub struct CommitRequest<D> {
    pub drafts: Vec<D>,
}

fn import_context(actor: &crate::domain::crm::User) -> ImportContext {
    ImportContext {
        agency_id: actor.agency_id.clone(),
        actor_user_id: actor.id.clone(),
        now: chrono::Utc::now(),
    }
}

#[post("/import/contacts/commit")]
pub(super) async fn commit_contacts(
    data: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<CommitRequest<ContactDraft>>,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let ctx = import_context(&actor);
    let outcome = data
        .import_use_case
        .commit_contacts(payload.into_inner().drafts, &ctx)
        .await?;

    add_log(
        &data.logs,
        "INFO",
        "Import",
        &format!(
            "Committed contacts import: {} ok, {} failed",
            outcome.imported, outcome.failed
        ),
    );
    Ok(HttpResponse::Ok().json(outcome))
}

#[post("/import/listings/commit")]
pub(super) async fn commit_listings(
    data: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<CommitRequest<ListingDraft>>,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let ctx = import_context(&actor);
    let outcome = data
        .import_use_case
        .commit_listings(payload.into_inner().drafts, &ctx)
        .await?;

    add_log(
        &data.logs,
        "INFO",
        "Import",
        &format!(
            "Committed listings import: {} ok, {} failed",
            outcome.imported, outcome.failed
        ),
    );
    Ok(HttpResponse::Ok().json(outcome))
}

#[post("/import/offers/commit")]
pub(super) async fn commit_offers(
    data: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<CommitRequest<OfferDraft>>,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let ctx = import_context(&actor);
    let outcome = data
        .import_use_case
        .commit_offers(payload.into_inner().drafts, &ctx)
        .await?;

    add_log(
        &data.logs,
        "INFO",
        "Import",
        &format!(
            "Committed offers import: {} ok, {} failed",
            outcome.imported, outcome.failed
        ),
    );
    Ok(HttpResponse::Ok().json(outcome))
}

#[post("/import/tasks/commit")]
pub(super) async fn commit_tasks(
    data: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<CommitRequest<TaskDraft>>,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let ctx = import_context(&actor);
    let outcome = data
        .import_use_case
        .commit_tasks(payload.into_inner().drafts, &ctx)
        .await?;

    add_log(
        &data.logs,
        "INFO",
        "Import",
        &format!(
            "Committed tasks import: {} ok, {} failed",
            outcome.imported, outcome.failed
        ),
    );
    Ok(HttpResponse::Ok().json(outcome))
}
