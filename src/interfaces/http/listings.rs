use super::{check_valid, require_actor, AppState};
use crate::application::use_cases::listing_service::ListingInput;
use crate::domain::crm::ListingStatus;
use crate::domain::error::AppError;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;

#[get("/listings")]
pub(super) async fn list_listings(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let listings = data.listing_service.list(&actor).await?;
    Ok(HttpResponse::Ok().json(listings))
}

#[post("/listings")]
pub(super) async fn save_listing(
    data: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<ListingInput>,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    check_valid(&*payload)?;

    let listing = data
        .listing_service
        .save(&actor, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(listing))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: ListingStatus,
}

#[post("/listings/{id}/status")]
pub(super) async fn update_listing_status(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let listing = data
        .listing_service
        .update_status(&actor, &path, payload.status)
        .await?;
    Ok(HttpResponse::Ok().json(listing))
}
