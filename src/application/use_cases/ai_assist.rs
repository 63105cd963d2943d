//! AI assists: deal scoring, offer summaries, reply drafting. Each call
//! goes through the shared LLM client and persists its result on the
//! record it scored/summarized.

use crate::application::use_cases::activity_entry;
use crate::application::use_cases::listing_service::status_label;
use crate::application::use_cases::llm_output::extract_json_payload;
use crate::domain::crm::{ActivityKind, Agency, AiScore, Urgency, User};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::db::repository::CrmRepository;
use crate::infrastructure::llm_clients::LLMClient;
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

const SYSTEM_PROMPT: &str =
    "You are an analyst assistant for a real-estate agency CRM. Be concise and factual.";

#[derive(Deserialize)]
struct ScorePayload {
    score: f64,
    explanation: String,
    #[serde(default)]
    risks: Vec<String>,
    #[serde(default)]
    urgency: String,
}

pub struct AiAssistUseCase {
    repository: Arc<CrmRepository>,
    llm: Arc<dyn LLMClient + Send + Sync>,
    llm_config: LLMConfig,
}

impl AiAssistUseCase {
    pub fn new(
        repository: Arc<CrmRepository>,
        llm: Arc<dyn LLMClient + Send + Sync>,
        llm_config: LLMConfig,
    ) -> Self {
        Self {
            repository,
            llm,
            llm_config,
        }
    }

    // Plan-credit enforcement is intentionally a stub; the counters are
    // carried on the agency record but never gate anything yet.
    fn can_consume_ai_credit(_agency: &Agency) -> bool {
        true
    }

    pub async fn score_deal(&self, actor: &User, listing_id: &str) -> Result<AiScore> {
        let agency = self.repository.get_agency(&actor.agency_id).await?;
        if !Self::can_consume_ai_credit(&agency) {
            return Err(AppError::Forbidden("AI credit limit reached".to_string()));
        }

        let listing = self
            .repository
            .get_listing(&actor.agency_id, listing_id)
            .await?;

        let user_prompt = format!(
            "Evaluate this real estate deal:\n\
             Address: {address}\n\
             Price: {price}\n\
             Status: {status}\n\
             Notes: {notes}\n\n\
             Return a single JSON object: {{\"score\": <0-100>, \"explanation\": <string>, \
             \"risks\": [<string>], \"urgency\": \"Low\"|\"Medium\"|\"High\"}}",
            address = listing.address,
            price = listing.price,
            status = status_label(listing.status),
            notes = listing.notes.as_deref().unwrap_or(""),
        );

        let response = self
            .llm
            .generate(&self.llm_config, SYSTEM_PROMPT, &user_prompt)
            .await?;
        let payload: ScorePayload = serde_json::from_str(&extract_json_payload(&response))
            .map_err(|e| AppError::LLMError(format!("Unparseable score response: {}", e)))?;

        let score = AiScore {
            score: payload.score.clamp(0.0, 100.0),
            explanation: payload.explanation,
            risks: payload.risks,
            urgency: bucket_urgency(&payload.urgency),
            last_updated: chrono::Utc::now(),
        };

        self.repository
            .set_listing_ai_score(&actor.agency_id, listing_id, &score)
            .await?;
        self.record_usage(actor, "generated deal score for", &listing.address)
            .await;

        Ok(score)
    }

    pub async fn summarize_offer(&self, actor: &User, offer_id: &str) -> Result<String> {
        let offer = self.repository.get_offer(&actor.agency_id, offer_id).await?;
        let listing = self
            .repository
            .get_listing(&actor.agency_id, &offer.listing_id)
            .await?;

        let user_prompt = format!(
            "Summarize this offer:\n\
             Buyer: {buyer}\n\
             Amount: {amount}\n\
             Listing Price: {listing_price}\n\
             Financing: {financing:?}\n\n\
             Provide a 2-sentence summary of deal quality and risks.",
            buyer = offer.buyer_name,
            amount = offer.price,
            listing_price = listing.price,
            financing = offer.financing,
        );

        let summary = self
            .llm
            .generate(&self.llm_config, SYSTEM_PROMPT, &user_prompt)
            .await?;
        let summary = summary.trim().to_string();

        self.repository
            .set_offer_summary(&actor.agency_id, offer_id, &summary)
            .await?;
        self.record_usage(actor, "summarized offer from", &offer.buyer_name)
            .await;

        Ok(summary)
    }

    pub async fn draft_reply(&self, actor: &User, thread_id: &str) -> Result<String> {
        let thread = self
            .repository
            .get_thread(&actor.agency_id, thread_id)
            .await?;

        let context = thread
            .messages
            .iter()
            .rev()
            .take(5)
            .rev()
            .map(|m| format!("{}: {}", m.sender_id, m.text))
            .collect::<Vec<_>>()
            .join("\n");

        let user_prompt = format!(
            "Thread context:\n{context}\n\n\
             You are agent {name}. Draft a professional, friendly, and brief follow-up \
             message to suggest the next steps.",
            context = context,
            name = actor.name,
        );

        let draft = self
            .llm
            .generate(&self.llm_config, SYSTEM_PROMPT, &user_prompt)
            .await?;

        self.record_usage(actor, "drafted a reply in", &thread.title).await;
        Ok(draft.trim().to_string())
    }

    async fn record_usage(&self, actor: &User, action: &str, target: &str) {
        if let Err(err) = self.repository.bump_ai_usage(&actor.id).await {
            error!(error = %err, "Failed to bump AI usage counter");
        }

        let entry = activity_entry(
            &actor.agency_id,
            &actor.id,
            action.to_string(),
            target.to_string(),
            ActivityKind::Ai,
        );
        if let Err(err) = self.repository.log_activity(&entry).await {
            error!(error = %err, "Failed to log AI activity");
        }
    }
}

fn bucket_urgency(raw: &str) -> Urgency {
    let lower = raw.to_lowercase();
    if lower.contains("high") {
        Urgency::High
    } else if lower.contains("low") {
        Urgency::Low
    } else {
        Urgency::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgency_bucketing_defaults_to_medium() {
        assert_eq!(bucket_urgency("HIGH"), Urgency::High);
        assert_eq!(bucket_urgency("low priority"), Urgency::Low);
        assert_eq!(bucket_urgency("whenever"), Urgency::Medium);
    }
}
