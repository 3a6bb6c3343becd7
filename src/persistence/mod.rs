//! Persistence layer: user profiles, saved searches and deal snapshots.
//!
//! [`Store`] is the storage seam. [`postgres::PostgresStore`] is the
//! production implementation over `sqlx::PgPool`; [`memory::MemoryStore`]
//! backs development and tests with the same observable semantics,
//! including ordering and score filtering.

pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemoryStore;
pub use models::DealRecord;
pub use postgres::PostgresStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewSearch, SavedSearch, SearchPatch, UserProfile};
use crate::error::ApiError;

/// Storage operations for users, saved searches and persisted deals.
///
/// Ownership checks are expressed as predicates: mutations take `user_id`
/// together with the row id, so a non-owner sees "no such row" rather than
/// "not yours".
#[async_trait]
pub trait Store: Send + Sync + std::fmt::Debug {
    /// Fetches one user profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn get_user(&self, id: Uuid) -> Result<Option<UserProfile>, ApiError>;

    /// Inserts a profile row and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure, including a
    /// duplicate id or email.
    async fn insert_user(&self, profile: &UserProfile) -> Result<UserProfile, ApiError>;

    /// Applies a partial profile update; `None` fields are left unchanged.
    /// Returns `None` when no such user exists.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn update_user(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserProfile>, ApiError>;

    /// Deletes a profile row, cascading to its searches and deals. Returns
    /// `false` when no such user exists.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn delete_user(&self, id: Uuid) -> Result<bool, ApiError>;

    /// `true` when another user already claims `email`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn email_in_use(&self, email: &str, exclude: Uuid) -> Result<bool, ApiError>;

    /// Lists a user's saved searches, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn list_searches(&self, user_id: Uuid) -> Result<Vec<SavedSearch>, ApiError>;

    /// Counts every search the user owns, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn count_searches(&self, user_id: Uuid) -> Result<i64, ApiError>;

    /// Inserts a search row for `user_id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn insert_search(
        &self,
        user_id: Uuid,
        new_search: &NewSearch,
    ) -> Result<SavedSearch, ApiError>;

    /// Fetches one search by id with no ownership predicate; used to
    /// resolve the owner during save-deals.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn get_search(&self, id: Uuid) -> Result<Option<SavedSearch>, ApiError>;

    /// Merges a patch into the user's search and returns the updated row,
    /// or `None` when the search does not exist or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn update_search(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &SearchPatch,
    ) -> Result<Option<SavedSearch>, ApiError>;

    /// Deletes the user's search. Returns `false` when the search does not
    /// exist or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn delete_search(&self, user_id: Uuid, id: Uuid) -> Result<bool, ApiError>;

    /// Records how many deal rows the latest save produced and bumps the
    /// search's update timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn set_search_results(&self, id: Uuid, results_count: i32) -> Result<(), ApiError>;

    /// Inserts deal rows and returns them as stored.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure; no rows are
    /// kept when any insert fails.
    async fn insert_deals(&self, records: Vec<DealRecord>) -> Result<Vec<DealRecord>, ApiError>;

    /// Lists a user's persisted deals with `score >= min_score`, ordered by
    /// score descending then creation time descending. Rows with no score
    /// are excluded by the comparison.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn list_user_deals(
        &self,
        user_id: Uuid,
        min_score: f64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DealRecord>, ApiError>;
}
