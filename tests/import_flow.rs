//! End-to-end import pipeline tests: CSV text in, persisted CRM records
//! out, against a throwaway SQLite database. The LLM collaborator is a
//! client that always fails, which doubles as a check that the remap
//! pre-pass degrades silently to the heuristic path.

use async_trait::async_trait;
use estatepulse::application::{ImportContext, ImportUseCase};
use estatepulse::domain::crm::ListingStatus;
use estatepulse::domain::error::{AppError, Result};
use estatepulse::domain::import::CoverageStatus;
use estatepulse::domain::llm_config::LLMConfig;
use estatepulse::infrastructure::config::ImportConfig;
use estatepulse::infrastructure::db::connection::init_crm_db;
use estatepulse::infrastructure::db::repository::CrmRepository;
use estatepulse::infrastructure::llm_clients::LLMClient;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

struct OfflineClient;

#[async_trait]
impl LLMClient for OfflineClient {
    async fn generate(&self, _: &LLMConfig, _: &str, _: &str) -> Result<String> {
        Err(AppError::LLMError("offline".to_string()))
    }
}

async fn setup() -> (ImportUseCase, Arc<CrmRepository>, PathBuf) {
    let db_path = std::env::temp_dir().join(format!("estatepulse-test-{}.db", Uuid::new_v4()));
    init_crm_db(&db_path).await.unwrap();

    let repository = Arc::new(CrmRepository::connect(&db_path).await.unwrap());
    let import = ImportUseCase::new(
        repository.clone(),
        Arc::new(OfflineClient),
        LLMConfig::default(),
        ImportConfig::default(),
    );

    (import, repository, db_path)
}

fn ctx() -> ImportContext {
    ImportContext {
        agency_id: "a1".to_string(),
        actor_user_id: "u1".to_string(),
        now: chrono::Utc::now(),
    }
}

#[tokio::test]
async fn listing_import_quoted_fields_and_status_bucketing() {
    let (import, repository, _db) = setup().await;

    let csv = "Address,Seller,Price,Status\n\
               \"123 Main St, Apt 2\",\"J. Smith\",\"$450,000\",\"Pending\"\n";

    let preview = import.preview_listings(csv, false).await.unwrap();
    assert_eq!(preview.drafts.len(), 1);

    let draft = &preview.drafts[0];
    assert_eq!(draft.address, "123 Main St, Apt 2");
    assert_eq!(draft.seller_name, "J. Smith");
    assert_eq!(draft.price, 450_000.0);
    assert_eq!(draft.status, ListingStatus::UnderContract);

    let context = ctx();
    let outcome = import
        .commit_listings(preview.drafts, &context)
        .await
        .unwrap();
    assert_eq!(outcome.imported, 1);
    assert_eq!(outcome.failed, 0);

    let listings = repository.list_listings("a1", None).await.unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].address, "123 Main St, Apt 2");
    assert_eq!(listings[0].status, ListingStatus::UnderContract);
    assert_eq!(listings[0].assigned_agent, "u1");
}

#[tokio::test]
async fn settlement_date_forces_sold_status() {
    let (import, _repository, _db) = setup().await;

    let csv = "Address,OwnerLastName,SaleAmt,SettleDate\n\
               \"5 Oak Ln\",\"Doe\",\"310000\",\"2023-01-15\"\n";

    let preview = import.preview_listings(csv, false).await.unwrap();
    let draft = &preview.drafts[0];

    assert_eq!(draft.address, "5 Oak Ln");
    assert_eq!(draft.seller_name, "Doe");
    assert_eq!(draft.price, 310_000.0);
    assert_eq!(draft.status, ListingStatus::Sold);
}

#[tokio::test]
async fn contact_phone_recovered_from_unlabeled_column() {
    let (import, _repository, _db) = setup().await;

    let csv = "Name,Email\n\
               \"Alice Johnson\",\"alice@x.com\",\"555-0199 mobile\"\n";

    let preview = import.preview_contacts(csv, false).await.unwrap();
    let draft = &preview.drafts[0];

    assert_eq!(draft.name, "Alice Johnson");
    assert_eq!(draft.email, "alice@x.com");
    assert_eq!(draft.phone, "555-0199");
}

#[tokio::test]
async fn fully_empty_rows_are_discarded() {
    let (import, _repository, _db) = setup().await;

    let csv = "Name,Email\nAlice,a@x.com\n,\n";

    let preview = import.preview_contacts(csv, false).await.unwrap();
    assert_eq!(preview.drafts.len(), 1);
    assert_eq!(preview.total_rows, 2);
    assert_eq!(preview.skipped_rows, 1);
}

#[tokio::test]
async fn coverage_distinguishes_empty_from_missing() {
    let (import, _repository, _db) = setup().await;

    let csv = "Name,Email,Phone\nAlice,a@x.com,\nBob,b@x.com,\n";

    let preview = import.preview_contacts(csv, false).await.unwrap();
    let status = |field: &str| {
        preview
            .coverage
            .iter()
            .find(|c| c.field == field)
            .unwrap()
            .status
    };

    assert_eq!(status("name"), CoverageStatus::Found);
    assert_eq!(status("phone"), CoverageStatus::Empty);
    assert_eq!(status("tags"), CoverageStatus::Missing);
}

#[tokio::test]
async fn metadata_round_trips_every_source_column() {
    let (import, repository, _db) = setup().await;

    let csv = "Name,Email,Quirk\nAlice,a@x.com,keeps bees\n";
    let preview = import.preview_contacts(csv, false).await.unwrap();

    let context = ctx();
    import
        .commit_contacts(preview.drafts, &context)
        .await
        .unwrap();

    let contacts = repository.list_contacts("a1", None).await.unwrap();
    let metadata = &contacts[0].metadata;
    for key in ["name", "email", "quirk"] {
        assert!(metadata.contains_key(key), "metadata missing {}", key);
    }
    assert_eq!(metadata.get("quirk").map(String::as_str), Some("keeps bees"));
}

#[tokio::test]
async fn offer_import_synthesizes_a_shell_listing_once() {
    let (import, repository, _db) = setup().await;

    let csv = "Buyer,Property,Amount\n\
               \"B. Wayne\",\"99 External Rd\",\"250000\"\n\
               \"S. Kyle\",\"99 External Rd\",\"260000\"\n";

    let preview = import.preview_offers(csv, false).await.unwrap();
    assert_eq!(preview.drafts.len(), 2);

    let context = ctx();
    let outcome = import.commit_offers(preview.drafts, &context).await.unwrap();
    assert_eq!(outcome.imported, 2);

    let listings = repository.list_listings("a1", None).await.unwrap();
    assert_eq!(listings.len(), 1, "both offers should share one shell listing");
    assert_eq!(listings[0].address, "99 External Rd");
    assert_eq!(listings[0].status, ListingStatus::New);
    assert_eq!(listings[0].price, 0.0);

    let offers = repository.list_offers("a1", None).await.unwrap();
    assert_eq!(offers.len(), 2);
    assert!(offers.iter().all(|o| o.listing_id == listings[0].id));
}

#[tokio::test]
async fn ai_remap_failure_falls_back_to_heuristics() {
    let (import, _repository, _db) = setup().await;

    let csv = "Name,Email\nAlice,a@x.com\n";

    let plain = import.preview_contacts(csv, false).await.unwrap();
    let remapped = import.preview_contacts(csv, true).await.unwrap();

    assert_eq!(plain.drafts.len(), remapped.drafts.len());
    assert_eq!(plain.drafts[0].name, remapped.drafts[0].name);
    assert_eq!(plain.drafts[0].email, remapped.drafts[0].email);
}

#[tokio::test]
async fn header_only_file_is_a_structural_failure() {
    let (import, _repository, _db) = setup().await;

    let err = import.preview_contacts("Name,Email\n", false).await;
    assert!(err.is_err());
}

#[tokio::test]
async fn unrecognizable_headers_are_a_structural_failure() {
    let (import, _repository, _db) = setup().await;

    let err = import
        .preview_listings("alpha,beta\n1,2\n", false)
        .await;
    assert!(err.is_err());
}
