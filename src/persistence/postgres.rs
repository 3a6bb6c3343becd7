//! PostgreSQL-backed store.
//!
//! All methods translate driver failures into [`ApiError::Persistence`];
//! row-not-found surfaces as `Ok(None)` / `Ok(false)` so callers decide what
//! a miss means.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::Store;
use super::models::{DealRecord, SearchRow, UserRow};
use crate::domain::{NewSearch, SavedSearch, SearchPatch, UserProfile};
use crate::error::ApiError;

const USER_COLUMNS: &str = "id, name, email, plan";

const SEARCH_COLUMNS: &str = "id, user_id, name, keywords, category, price_min, price_max, \
     condition, marketplaces, active, results_count, created_at, updated_at";

const DEAL_COLUMNS: &str = "id, search_id, user_id, external_id, marketplace, title, description, \
     price, currency, original_price, image_url, listing_url, location, condition, shipping_cost, \
     free_shipping, seller_name, seller_rating, seller_reviews, category, score, score_breakdown, \
     listed_at, metadata, created_at";

/// Store backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wraps an already-connected pool. Migrations are the caller's job.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn get_user(&self, id: Uuid) -> Result<Option<UserProfile>, ApiError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Ok(row.map(UserRow::into_profile))
    }

    async fn insert_user(&self, profile: &UserProfile) -> Result<UserProfile, ApiError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (id, name, email, plan) VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(profile.id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(profile.plan.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Ok(row.into_profile())
    }

    async fn update_user(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserProfile>, ApiError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET name = COALESCE($2, name), email = COALESCE($3, email) \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Ok(row.map(UserRow::into_profile))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn email_in_use(&self, email: &str, exclude: Uuid) -> Result<bool, ApiError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id <> $2)",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))
    }

    async fn list_searches(&self, user_id: Uuid) -> Result<Vec<SavedSearch>, ApiError> {
        let rows = sqlx::query_as::<_, SearchRow>(&format!(
            "SELECT {SEARCH_COLUMNS} FROM searches WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Ok(rows.into_iter().map(SavedSearch::from).collect())
    }

    async fn count_searches(&self, user_id: Uuid) -> Result<i64, ApiError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM searches WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))
    }

    async fn insert_search(
        &self,
        user_id: Uuid,
        new_search: &NewSearch,
    ) -> Result<SavedSearch, ApiError> {
        // active, results_count and both timestamps come from column defaults.
        let row = sqlx::query_as::<_, SearchRow>(&format!(
            "INSERT INTO searches \
             (id, user_id, name, keywords, category, price_min, price_max, condition, marketplaces) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {SEARCH_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&new_search.name)
        .bind(&new_search.keywords)
        .bind(&new_search.category)
        .bind(new_search.price_min)
        .bind(new_search.price_max)
        .bind(&new_search.condition)
        .bind(&new_search.marketplaces)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Ok(SavedSearch::from(row))
    }

    async fn get_search(&self, id: Uuid) -> Result<Option<SavedSearch>, ApiError> {
        let row = sqlx::query_as::<_, SearchRow>(&format!(
            "SELECT {SEARCH_COLUMNS} FROM searches WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Ok(row.map(SavedSearch::from))
    }

    async fn update_search(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &SearchPatch,
    ) -> Result<Option<SavedSearch>, ApiError> {
        // Read, patch in memory, write the whole row back. Dynamic SQL for a
        // patch with nine optional fields buys nothing here.
        let row = sqlx::query_as::<_, SearchRow>(&format!(
            "SELECT {SEARCH_COLUMNS} FROM searches WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut search = SavedSearch::from(row);
        patch.apply(&mut search);

        let row = sqlx::query_as::<_, SearchRow>(&format!(
            "UPDATE searches SET name = $3, keywords = $4, category = $5, price_min = $6, \
             price_max = $7, condition = $8, marketplaces = $9, active = $10, updated_at = now() \
             WHERE id = $1 AND user_id = $2 RETURNING {SEARCH_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(&search.name)
        .bind(&search.keywords)
        .bind(&search.category)
        .bind(search.price_min)
        .bind(search.price_max)
        .bind(&search.condition)
        .bind(&search.marketplaces)
        .bind(search.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Ok(row.map(SavedSearch::from))
    }

    async fn delete_search(&self, user_id: Uuid, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM searches WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_search_results(&self, id: Uuid, results_count: i32) -> Result<(), ApiError> {
        sqlx::query("UPDATE searches SET results_count = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(results_count)
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Ok(())
    }

    async fn insert_deals(&self, records: Vec<DealRecord>) -> Result<Vec<DealRecord>, ApiError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        let sql = format!(
            "INSERT INTO deals ({DEAL_COLUMNS}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, \
             $19, $20, $21, $22, $23, $24, $25) \
             RETURNING {DEAL_COLUMNS}"
        );
        let mut stored = Vec::with_capacity(records.len());
        for record in records {
            let row = sqlx::query_as::<_, DealRecord>(&sql)
                .bind(record.id)
                .bind(record.search_id)
                .bind(record.user_id)
                .bind(&record.external_id)
                .bind(&record.marketplace)
                .bind(&record.title)
                .bind(&record.description)
                .bind(record.price)
                .bind(&record.currency)
                .bind(record.original_price)
                .bind(&record.image_url)
                .bind(&record.listing_url)
                .bind(&record.location)
                .bind(&record.condition)
                .bind(record.shipping_cost)
                .bind(record.free_shipping)
                .bind(&record.seller_name)
                .bind(record.seller_rating)
                .bind(record.seller_reviews)
                .bind(&record.category)
                .bind(record.score)
                .bind(&record.score_breakdown)
                .bind(record.listed_at)
                .bind(&record.metadata)
                .bind(record.created_at)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| ApiError::Persistence(e.to_string()))?;
            stored.push(row);
        }
        tx.commit()
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Ok(stored)
    }

    async fn list_user_deals(
        &self,
        user_id: Uuid,
        min_score: f64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DealRecord>, ApiError> {
        // `score >= $2` is NULL for unscored rows, which drops them.
        sqlx::query_as::<_, DealRecord>(&format!(
            "SELECT {DEAL_COLUMNS} FROM deals WHERE user_id = $1 AND score >= $2 \
             ORDER BY score DESC, created_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(user_id)
        .bind(min_score)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))
    }
}
