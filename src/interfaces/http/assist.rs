use super::{add_log, require_actor, AppState};
use crate::domain::error::AppError;
use actix_web::{post, web, HttpRequest, HttpResponse};

#[post("/assist/listings/{id}/score")]
pub(super) async fn score_listing(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;

    match data.ai_assist.score_deal(&actor, &path).await {
        Ok(score) => Ok(HttpResponse::Ok().json(score)),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Assist",
                &format!("Deal scoring failed: {}", e),
            );
            Err(e)
        }
    }
}

#[post("/assist/offers/{id}/summary")]
pub(super) async fn summarize_offer(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;

    match data.ai_assist.summarize_offer(&actor, &path).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(serde_json::json!({ "summary": summary }))),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Assist",
                &format!("Offer summary failed: {}", e),
            );
            Err(e)
        }
    }
}

#[post("/assist/threads/{id}/draft")]
pub(super) async fn draft_thread_reply(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;

    match data.ai_assist.draft_reply(&actor, &path).await {
        Ok(draft) => Ok(HttpResponse::Ok().json(serde_json::json!({ "draft": draft }))),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Assist",
                &format!("Reply drafting failed: {}", e),
            );
            Err(e)
        }
    }
}
