use super::{check_valid, require_actor, AppState};
use crate::application::use_cases::contact_service::ContactInput;
use crate::domain::error::AppError;
use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;

#[get("/contacts")]
pub(super) async fn list_contacts(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let contacts = data.contact_service.list(&actor).await?;
    Ok(HttpResponse::Ok().json(contacts))
}

#[post("/contacts")]
pub(super) async fn save_contact(
    data: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<ContactInput>,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    check_valid(&*payload)?;

    let contact = data
        .contact_service
        .save(&actor, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(contact))
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub ids: Vec<String>,
}

#[delete("/contacts")]
pub(super) async fn delete_contacts(
    data: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<DeleteRequest>,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let deleted = data.contact_service.delete(&actor, &payload.ids).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted })))
}

#[get("/contacts/export")]
pub(super) async fn export_contacts(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let csv = data.contact_service.export_csv(&actor).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .body(csv))
}
