use crate::application::use_cases::activity_entry;
use crate::application::use_cases::contact_service::visibility_filter;
use crate::domain::crm::{ActivityKind, Financing, Offer, OfferStatus, User};
use crate::domain::error::Result;
use crate::infrastructure::db::repository::CrmRepository;
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct OfferInput {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "listing_id is required"))]
    pub listing_id: String,
    #[validate(length(min = 1, message = "buyer_name is required"))]
    pub buyer_name: String,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub price: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub down_payment: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub earnest_money: f64,
    #[serde(default)]
    pub financing: Financing,
    #[serde(default)]
    pub inspection_period: u32,
    #[serde(default)]
    pub contingencies: Vec<String>,
    #[serde(default)]
    pub closing_date: String,
    #[serde(default)]
    pub status: OfferStatus,
    pub assigned_to: Option<String>,
}

pub struct OfferService {
    repository: Arc<CrmRepository>,
}

impl OfferService {
    pub fn new(repository: Arc<CrmRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, actor: &User) -> Result<Vec<Offer>> {
        let assignee = visibility_filter(actor);
        self.repository.list_offers(&actor.agency_id, assignee).await
    }

    pub async fn save(&self, actor: &User, input: OfferInput) -> Result<Offer> {
        let id = input.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let is_new = !self.repository.offer_exists(&actor.agency_id, &id).await?;

        // Offers must anchor to a listing the agency tracks.
        self.repository
            .get_listing(&actor.agency_id, &input.listing_id)
            .await?;

        let offer = Offer {
            id,
            agency_id: actor.agency_id.clone(),
            listing_id: input.listing_id,
            buyer_name: input.buyer_name,
            price: input.price,
            down_payment: input.down_payment,
            earnest_money: input.earnest_money,
            financing: input.financing,
            inspection_period: input.inspection_period,
            contingencies: input.contingencies,
            closing_date: input.closing_date,
            status: input.status,
            assigned_to: input.assigned_to.unwrap_or_else(|| actor.id.clone()),
            created_at: chrono::Utc::now(),
            ai_summary: None,
        };
        self.repository.save_offer(&offer).await?;

        if is_new {
            let entry = activity_entry(
                &actor.agency_id,
                &actor.id,
                "received new offer for".to_string(),
                offer.buyer_name.clone(),
                ActivityKind::Event,
            );
            if let Err(err) = self.repository.log_activity(&entry).await {
                error!(error = %err, "Failed to log new offer");
            }
        }

        Ok(offer)
    }

    /// Negotiation-pipeline stage move.
    pub async fn update_status(
        &self,
        actor: &User,
        id: &str,
        status: OfferStatus,
    ) -> Result<Offer> {
        let offer = self.repository.get_offer(&actor.agency_id, id).await?;

        self.repository
            .set_offer_status(&actor.agency_id, id, status)
            .await?;

        let entry = activity_entry(
            &actor.agency_id,
            &actor.id,
            format!("updated offer for {} to", offer.buyer_name),
            status_label(status).to_string(),
            ActivityKind::Event,
        );
        if let Err(err) = self.repository.log_activity(&entry).await {
            error!(error = %err, "Failed to log offer status change");
        }

        self.repository.get_offer(&actor.agency_id, id).await
    }
}

fn status_label(status: OfferStatus) -> &'static str {
    match status {
        OfferStatus::Draft => "Draft",
        OfferStatus::OfferSent => "Offer Sent",
        OfferStatus::InTalks => "In Talks",
        OfferStatus::OfferAccepted => "Offer Accepted",
        OfferStatus::OfferDeclined => "Offer Declined",
    }
}
