use super::{require_actor, AppState};
use crate::domain::error::AppError;
use actix_web::{get, post, web, HttpRequest, HttpResponse};

/// Team roster; admin-only, mirroring the "Team Control" view.
#[get("/admin/team")]
pub(super) async fn list_team(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    if !actor.role.sees_all_records() {
        return Err(AppError::Forbidden(
            "Only admins can view the team roster".to_string(),
        ));
    }

    let users = data.repository.list_users(&actor.agency_id).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Agency activity feed (events, audit entries, AI usage).
#[get("/activity")]
pub(super) async fn list_activity(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let feed = data.repository.list_activity(&actor.agency_id).await?;
    Ok(HttpResponse::Ok().json(feed))
}

#[get("/notifications")]
pub(super) async fn list_notifications(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let alerts = data
        .repository
        .list_notifications(&actor.agency_id, &actor.id)
        .await?;
    Ok(HttpResponse::Ok().json(alerts))
}

#[post("/notifications/clear")]
pub(super) async fn clear_notifications(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let cleared = data
        .repository
        .clear_notifications(&actor.agency_id, &actor.id)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "cleared": cleared })))
}
