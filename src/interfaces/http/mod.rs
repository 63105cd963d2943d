use crate::application::{
    AiAssistUseCase, AuthService, ContactService, ImportUseCase, ListingService,
    MessagingService, OfferService, TaskService,
};
use crate::domain::crm::User;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::db::repository::CrmRepository;
use actix_cors::Cors;
use actix_web::{dev::Server, get, web, App, HttpRequest, HttpResponse, HttpServer};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

mod admin;
mod assist;
mod auth;
mod contacts;
mod imports;
mod listings;
mod offers;
mod tasks;
mod threads;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct AppState {
    pub auth_service: AuthService,
    pub contact_service: ContactService,
    pub listing_service: ListingService,
    pub offer_service: OfferService,
    pub task_service: TaskService,
    pub messaging_service: MessagingService,
    pub import_use_case: ImportUseCase,
    pub ai_assist: AiAssistUseCase,
    pub repository: Arc<CrmRepository>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

/// Requests identify their acting user through the `x-user-id` header;
/// the login endpoint hands that id out. Role-based visibility hangs off
/// the resolved user.
pub(crate) async fn require_actor(data: &AppState, req: &HttpRequest) -> Result<User> {
    let user_id = req
        .headers()
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Forbidden("Missing x-user-id header".to_string()))?;

    data.auth_service.require_actor(user_id).await
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap();
    logs.push(entry.clone());
    if logs.len() > 100 {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

#[get("/logs")]
async fn get_logs(data: web::Data<AppState>) -> HttpResponse {
    let logs = data.logs.lock().unwrap();
    HttpResponse::Ok().json(&*logs)
}

pub fn start_server(state: Arc<AppState>, host: &str, port: u16) -> std::io::Result<Server> {
    let state = web::Data::from(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Frontend origin varies per deployment

        App::new().wrap(cors).app_data(state.clone()).service(
            web::scope("/api")
                .service(auth::login)
                .service(auth::list_agencies)
                .service(auth::list_agency_users)
                .service(contacts::list_contacts)
                .service(contacts::save_contact)
                .service(contacts::delete_contacts)
                .service(contacts::export_contacts)
                .service(listings::list_listings)
                .service(listings::save_listing)
                .service(listings::update_listing_status)
                .service(offers::list_offers)
                .service(offers::save_offer)
                .service(offers::update_offer_status)
                .service(tasks::list_tasks)
                .service(tasks::save_task)
                .service(tasks::toggle_task)
                .service(threads::list_threads)
                .service(threads::create_thread)
                .service(threads::post_message)
                .service(admin::list_team)
                .service(admin::list_activity)
                .service(admin::list_notifications)
                .service(admin::clear_notifications)
                .service(imports::preview_import)
                .service(imports::commit_contacts)
                .service(imports::commit_listings)
                .service(imports::commit_offers)
                .service(imports::commit_tasks)
                .service(assist::score_listing)
                .service(assist::summarize_offer)
                .service(assist::draft_thread_reply)
                .service(get_logs),
        )
    })
    .bind((host, port))?
    .run();

    Ok(server)
}

/// Maps `validator` failures onto the domain error so handlers can `?`
/// straight through.
pub(crate) fn check_valid<T: validator::Validate>(payload: &T) -> Result<()> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))
}
