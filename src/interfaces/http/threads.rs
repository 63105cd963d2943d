use super::{check_valid, require_actor, AppState};
use crate::application::use_cases::messaging_service::{MessageInput, ThreadInput};
use crate::domain::error::AppError;
use actix_web::{get, post, web, HttpRequest, HttpResponse};

#[get("/threads")]
pub(super) async fn list_threads(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let threads = data.messaging_service.list(&actor).await?;
    Ok(HttpResponse::Ok().json(threads))
}

#[post("/threads")]
pub(super) async fn create_thread(
    data: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<ThreadInput>,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    check_valid(&*payload)?;

    let thread = data
        .messaging_service
        .create_thread(&actor, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(thread))
}

#[post("/threads/{id}/messages")]
pub(super) async fn post_message(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<MessageInput>,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    check_valid(&*payload)?;

    let message = data
        .messaging_service
        .post_message(&actor, &path, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(message))
}
