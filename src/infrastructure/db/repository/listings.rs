use super::entities::{to_db_enum, to_json_map, ListingEntity};
use super::CrmRepository;
use crate::domain::crm::{AiScore, Listing, ListingStatus};
use crate::domain::error::{AppError, Result};

impl CrmRepository {
    pub async fn list_listings(
        &self,
        agency_id: &str,
        assigned_agent: Option<&str>,
    ) -> Result<Vec<Listing>> {
        let listings = match assigned_agent {
            Some(user_id) => sqlx::query_as::<_, ListingEntity>(
                "SELECT * FROM listings WHERE agency_id = ? AND assigned_agent = ?
                 ORDER BY created_at DESC",
            )
            .bind(agency_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await,
            None => sqlx::query_as::<_, ListingEntity>(
                "SELECT * FROM listings WHERE agency_id = ? ORDER BY created_at DESC",
            )
            .bind(agency_id)
            .fetch_all(&self.pool)
            .await,
        }
        .map_err(|e| AppError::DatabaseError(format!("Failed to list listings: {}", e)))?;

        Ok(listings.into_iter().map(Into::into).collect())
    }

    pub async fn get_listing(&self, agency_id: &str, id: &str) -> Result<Listing> {
        let listing = sqlx::query_as::<_, ListingEntity>(
            "SELECT * FROM listings WHERE agency_id = ? AND id = ?",
        )
        .bind(agency_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch listing: {}", e)))?;

        match listing {
            Some(listing) => Ok(listing.into()),
            None => Err(AppError::NotFound(format!("Listing not found: {}", id))),
        }
    }

    /// Address lookup used by the offer import to anchor offers against
    /// already-tracked properties.
    pub async fn find_listing_by_address(
        &self,
        agency_id: &str,
        address: &str,
    ) -> Result<Option<Listing>> {
        let listing = sqlx::query_as::<_, ListingEntity>(
            "SELECT * FROM listings WHERE agency_id = ? AND LOWER(address) = LOWER(?)",
        )
        .bind(agency_id)
        .bind(address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(format!("Failed to look up listing by address: {}", e))
        })?;

        Ok(listing.map(Into::into))
    }

    pub async fn save_listing(&self, listing: &Listing) -> Result<()> {
        sqlx::query(
            "INSERT INTO listings
               (id, agency_id, address, seller_name, price, assigned_agent, status,
                created_at, notes, ai_score_json, metadata_json)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
               address = excluded.address,
               seller_name = excluded.seller_name,
               price = excluded.price,
               assigned_agent = excluded.assigned_agent,
               status = excluded.status,
               notes = excluded.notes,
               ai_score_json = excluded.ai_score_json,
               metadata_json = excluded.metadata_json",
        )
        .bind(&listing.id)
        .bind(&listing.agency_id)
        .bind(&listing.address)
        .bind(&listing.seller_name)
        .bind(listing.price)
        .bind(&listing.assigned_agent)
        .bind(to_db_enum(&listing.status))
        .bind(listing.created_at.to_rfc3339())
        .bind(&listing.notes)
        .bind(
            listing
                .ai_score
                .as_ref()
                .and_then(|s| serde_json::to_string(s).ok()),
        )
        .bind(to_json_map(&listing.metadata))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save listing: {}", e)))?;

        Ok(())
    }

    pub async fn set_listing_status(
        &self,
        agency_id: &str,
        id: &str,
        status: ListingStatus,
    ) -> Result<()> {
        let result = sqlx::query("UPDATE listings SET status = ? WHERE agency_id = ? AND id = ?")
            .bind(to_db_enum(&status))
            .bind(agency_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to update listing status: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Listing not found: {}", id)));
        }
        Ok(())
    }

    pub async fn set_listing_ai_score(
        &self,
        agency_id: &str,
        id: &str,
        score: &AiScore,
    ) -> Result<()> {
        let payload = serde_json::to_string(score)
            .map_err(|e| AppError::Internal(format!("Failed to serialize AI score: {}", e)))?;

        let result =
            sqlx::query("UPDATE listings SET ai_score_json = ? WHERE agency_id = ? AND id = ?")
                .bind(payload)
                .bind(agency_id)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(format!("Failed to store AI score: {}", e))
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Listing not found: {}", id)));
        }
        Ok(())
    }
}
