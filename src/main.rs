use estatepulse::application::{
    AiAssistUseCase, AuthService, ContactService, ImportUseCase, ListingService,
    MessagingService, OfferService, TaskService,
};
use estatepulse::domain::crm::{Agency, AgencyPlan};
use estatepulse::infrastructure::config::AppConfig;
use estatepulse::infrastructure::db::connection::init_crm_db;
use estatepulse::infrastructure::db::repository::CrmRepository;
use estatepulse::infrastructure::llm_clients::{LLMClient, RouterClient};
use estatepulse::interfaces::http::{add_log, start_server, AppState, LogEntry};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();

    let config = AppConfig::load().expect("Failed to load configuration");

    let db_path = PathBuf::from(&config.database.path);
    init_crm_db(&db_path)
        .await
        .expect("Failed to initialize CRM database");
    info!(path = %db_path.display(), "CRM database ready");

    let repository = Arc::new(
        CrmRepository::connect(&db_path)
            .await
            .expect("Failed to connect CRM database"),
    );

    seed_demo_agencies(&repository).await;

    let llm_client: Arc<dyn LLMClient + Send + Sync> = Arc::new(RouterClient::new());
    let logs: Arc<Mutex<Vec<LogEntry>>> = Arc::new(Mutex::new(Vec::new()));

    let state = Arc::new(AppState {
        auth_service: AuthService::new(repository.clone()),
        contact_service: ContactService::new(repository.clone()),
        listing_service: ListingService::new(repository.clone()),
        offer_service: OfferService::new(repository.clone()),
        task_service: TaskService::new(repository.clone()),
        messaging_service: MessagingService::new(repository.clone()),
        import_use_case: ImportUseCase::new(
            repository.clone(),
            llm_client.clone(),
            config.llm.clone(),
            config.import.clone(),
        ),
        ai_assist: AiAssistUseCase::new(repository.clone(), llm_client.clone(), config.llm.clone()),
        repository: repository.clone(),
        logs: logs.clone(),
    });

    add_log(
        &logs,
        "INFO",
        "System",
        &format!(
            "Backend initialized, HTTP server listening on {}:{}",
            config.server.host, config.server.port
        ),
    );
    info!(host = %config.server.host, port = config.server.port, "Starting EstatePulse server");

    start_server(state, &config.server.host, config.server.port)?.await
}

/// First-run convenience: without at least one agency the login endpoint
/// has nothing to provision into.
async fn seed_demo_agencies(repository: &CrmRepository) {
    let agencies = match repository.list_agencies().await {
        Ok(agencies) => agencies,
        Err(err) => {
            error!(error = %err, "Failed to check for seed agencies");
            return;
        }
    };
    if !agencies.is_empty() {
        return;
    }

    let demo = [
        Agency {
            id: "a1".to_string(),
            name: "Elite Realty Group".to_string(),
            plan: AgencyPlan::Enterprise,
            logo: None,
            ai_credits: 1000,
            ai_limits: 5000,
        },
        Agency {
            id: "a2".to_string(),
            name: "Summit Properties".to_string(),
            plan: AgencyPlan::Pro,
            logo: None,
            ai_credits: 500,
            ai_limits: 2000,
        },
    ];

    for agency in &demo {
        if let Err(err) = repository.upsert_agency(agency).await {
            error!(error = %err, agency = %agency.name, "Failed to seed agency");
        } else {
            info!(agency = %agency.name, "Seeded demo agency");
        }
    }
}
