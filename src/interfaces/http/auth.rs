use super::{add_log, check_valid, AppState};
use crate::domain::error::AppError;
use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub agency_id: String,
    pub name: Option<String>,
}

#[post("/auth/login")]
pub(super) async fn login(
    data: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    check_valid(&*req)?;

    let user = data
        .auth_service
        .login_or_provision(&req.agency_id, &req.email, req.name.clone())
        .await?;

    add_log(
        &data.logs,
        "INFO",
        "Auth",
        &format!("{} signed in to agency {}", user.email, user.agency_id),
    );

    Ok(HttpResponse::Ok().json(user))
}

#[get("/agencies")]
pub(super) async fn list_agencies(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let agencies = data.repository.list_agencies().await?;
    Ok(HttpResponse::Ok().json(agencies))
}

#[get("/agencies/{id}/users")]
pub(super) async fn list_agency_users(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let users = data.repository.list_users(&path).await?;
    Ok(HttpResponse::Ok().json(users))
}
