use super::{check_valid, require_actor, AppState};
use crate::application::use_cases::offer_service::OfferInput;
use crate::domain::crm::OfferStatus;
use crate::domain::error::AppError;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;

#[get("/offers")]
pub(super) async fn list_offers(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let offers = data.offer_service.list(&actor).await?;
    Ok(HttpResponse::Ok().json(offers))
}

#[post("/offers")]
pub(super) async fn save_offer(
    data: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<OfferInput>,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    check_valid(&*payload)?;

    let offer = data.offer_service.save(&actor, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(offer))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OfferStatus,
}

#[post("/offers/{id}/status")]
pub(super) async fn update_offer_status(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let offer = data
        .offer_service
        .update_status(&actor, &path, payload.status)
        .await?;
    Ok(HttpResponse::Ok().json(offer))
}
