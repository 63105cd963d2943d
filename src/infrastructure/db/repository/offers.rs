use super::entities::{to_db_enum, to_json_list, OfferEntity};
use super::CrmRepository;
use crate::domain::crm::{Offer, OfferStatus};
use crate::domain::error::{AppError, Result};

impl CrmRepository {
    pub async fn list_offers(
        &self,
        agency_id: &str,
        assigned_to: Option<&str>,
    ) -> Result<Vec<Offer>> {
        let offers = match assigned_to {
            Some(user_id) => sqlx::query_as::<_, OfferEntity>(
                "SELECT * FROM offers WHERE agency_id = ? AND assigned_to = ?
                 ORDER BY created_at DESC",
            )
            .bind(agency_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await,
            None => sqlx::query_as::<_, OfferEntity>(
                "SELECT * FROM offers WHERE agency_id = ? ORDER BY created_at DESC",
            )
            .bind(agency_id)
            .fetch_all(&self.pool)
            .await,
        }
        .map_err(|e| AppError::DatabaseError(format!("Failed to list offers: {}", e)))?;

        Ok(offers.into_iter().map(Into::into).collect())
    }

    pub async fn get_offer(&self, agency_id: &str, id: &str) -> Result<Offer> {
        let offer =
            sqlx::query_as::<_, OfferEntity>("SELECT * FROM offers WHERE agency_id = ? AND id = ?")
                .bind(agency_id)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Failed to fetch offer: {}", e)))?;

        match offer {
            Some(offer) => Ok(offer.into()),
            None => Err(AppError::NotFound(format!("Offer not found: {}", id))),
        }
    }

    pub async fn offer_exists(&self, agency_id: &str, id: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM offers WHERE agency_id = ? AND id = ?")
                .bind(agency_id)
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Failed to check offer: {}", e)))?;

        Ok(count > 0)
    }

    pub async fn save_offer(&self, offer: &Offer) -> Result<()> {
        sqlx::query(
            "INSERT INTO offers
               (id, agency_id, listing_id, buyer_name, price, down_payment, earnest_money,
                financing, inspection_period, contingencies_json, closing_date, status,
                assigned_to, created_at, ai_summary)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
               listing_id = excluded.listing_id,
               buyer_name = excluded.buyer_name,
               price = excluded.price,
               down_payment = excluded.down_payment,
               earnest_money = excluded.earnest_money,
               financing = excluded.financing,
               inspection_period = excluded.inspection_period,
               contingencies_json = excluded.contingencies_json,
               closing_date = excluded.closing_date,
               status = excluded.status,
               assigned_to = excluded.assigned_to,
               ai_summary = excluded.ai_summary",
        )
        .bind(&offer.id)
        .bind(&offer.agency_id)
        .bind(&offer.listing_id)
        .bind(&offer.buyer_name)
        .bind(offer.price)
        .bind(offer.down_payment)
        .bind(offer.earnest_money)
        .bind(to_db_enum(&offer.financing))
        .bind(offer.inspection_period as i64)
        .bind(to_json_list(&offer.contingencies))
        .bind(&offer.closing_date)
        .bind(to_db_enum(&offer.status))
        .bind(&offer.assigned_to)
        .bind(offer.created_at.to_rfc3339())
        .bind(&offer.ai_summary)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save offer: {}", e)))?;

        Ok(())
    }

    pub async fn set_offer_status(
        &self,
        agency_id: &str,
        id: &str,
        status: OfferStatus,
    ) -> Result<()> {
        let result = sqlx::query("UPDATE offers SET status = ? WHERE agency_id = ? AND id = ?")
            .bind(to_db_enum(&status))
            .bind(agency_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to update offer status: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Offer not found: {}", id)));
        }
        Ok(())
    }

    pub async fn set_offer_summary(&self, agency_id: &str, id: &str, summary: &str) -> Result<()> {
        let result = sqlx::query("UPDATE offers SET ai_summary = ? WHERE agency_id = ? AND id = ?")
            .bind(summary)
            .bind(agency_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to store offer summary: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Offer not found: {}", id)));
        }
        Ok(())
    }
}
