use super::{check_valid, require_actor, AppState};
use crate::application::use_cases::task_service::TaskInput;
use crate::domain::error::AppError;
use actix_web::{get, post, web, HttpRequest, HttpResponse};

#[get("/tasks")]
pub(super) async fn list_tasks(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let tasks = data.task_service.list(&actor).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

#[post("/tasks")]
pub(super) async fn save_task(
    data: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<TaskInput>,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    check_valid(&*payload)?;

    let task = data.task_service.save(&actor, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

#[post("/tasks/{id}/toggle")]
pub(super) async fn toggle_task(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let actor = require_actor(&data, &req).await?;
    let task = data.task_service.toggle(&actor, &path).await?;
    Ok(HttpResponse::Ok().json(task))
}
