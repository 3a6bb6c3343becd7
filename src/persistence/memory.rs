//! In-memory store for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{NewSearch, SavedSearch, SearchPatch, UserProfile};
use crate::error::ApiError;
use crate::persistence::Store;
use crate::persistence::models::DealRecord;

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<Uuid, UserProfile>,
    searches: HashMap<Uuid, SavedSearch>,
    deals: Vec<DealRecord>,
}

/// Hash-map store behind a single `tokio::sync::RwLock`.
///
/// Mirrors the observable semantics of [`super::PostgresStore`]: listing
/// order, ownership-as-predicate mutations, deletion cascades and the score
/// comparison that excludes unscored rows.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, id: Uuid) -> Result<Option<UserProfile>, ApiError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn insert_user(&self, profile: &UserProfile) -> Result<UserProfile, ApiError> {
        let mut inner = self.inner.write().await;
        if inner.users.contains_key(&profile.id) {
            return Err(ApiError::Persistence("duplicate user id".to_string()));
        }
        if inner.users.values().any(|u| u.email == profile.email) {
            return Err(ApiError::Persistence("duplicate email".to_string()));
        }
        inner.users.insert(profile.id, profile.clone());
        Ok(profile.clone())
    }

    async fn update_user(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserProfile>, ApiError> {
        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = name {
            user.name = name.to_string();
        }
        if let Some(email) = email {
            user.email = email.to_string();
        }
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut inner = self.inner.write().await;
        if inner.users.remove(&id).is_none() {
            return Ok(false);
        }
        inner.searches.retain(|_, search| search.user_id != id);
        inner.deals.retain(|deal| deal.user_id != id);
        Ok(true)
    }

    async fn email_in_use(&self, email: &str, exclude: Uuid) -> Result<bool, ApiError> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .any(|u| u.email == email && u.id != exclude))
    }

    async fn list_searches(&self, user_id: Uuid) -> Result<Vec<SavedSearch>, ApiError> {
        let inner = self.inner.read().await;
        let mut searches: Vec<SavedSearch> = inner
            .searches
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        searches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(searches)
    }

    async fn count_searches(&self, user_id: Uuid) -> Result<i64, ApiError> {
        let count = self
            .inner
            .read()
            .await
            .searches
            .values()
            .filter(|s| s.user_id == user_id)
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn insert_search(
        &self,
        user_id: Uuid,
        new_search: &NewSearch,
    ) -> Result<SavedSearch, ApiError> {
        let now = Utc::now();
        let search = SavedSearch {
            id: Uuid::new_v4(),
            user_id,
            name: new_search.name.clone(),
            keywords: new_search.keywords.clone(),
            category: new_search.category.clone(),
            price_min: new_search.price_min,
            price_max: new_search.price_max,
            condition: new_search.condition.clone(),
            marketplaces: new_search.marketplaces.clone(),
            active: true,
            results_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.inner
            .write()
            .await
            .searches
            .insert(search.id, search.clone());
        Ok(search)
    }

    async fn get_search(&self, id: Uuid) -> Result<Option<SavedSearch>, ApiError> {
        Ok(self.inner.read().await.searches.get(&id).cloned())
    }

    async fn update_search(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &SearchPatch,
    ) -> Result<Option<SavedSearch>, ApiError> {
        let mut inner = self.inner.write().await;
        let Some(search) = inner.searches.get_mut(&id) else {
            return Ok(None);
        };
        if search.user_id != user_id {
            return Ok(None);
        }
        patch.apply(search);
        search.updated_at = Utc::now();
        Ok(Some(search.clone()))
    }

    async fn delete_search(&self, user_id: Uuid, id: Uuid) -> Result<bool, ApiError> {
        let mut inner = self.inner.write().await;
        let owned = inner
            .searches
            .get(&id)
            .is_some_and(|s| s.user_id == user_id);
        if !owned {
            return Ok(false);
        }
        inner.searches.remove(&id);
        inner.deals.retain(|deal| deal.search_id != id);
        Ok(true)
    }

    async fn set_search_results(&self, id: Uuid, results_count: i32) -> Result<(), ApiError> {
        let mut inner = self.inner.write().await;
        if let Some(search) = inner.searches.get_mut(&id) {
            search.results_count = results_count;
            search.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn insert_deals(&self, records: Vec<DealRecord>) -> Result<Vec<DealRecord>, ApiError> {
        let mut inner = self.inner.write().await;
        inner.deals.extend(records.iter().cloned());
        Ok(records)
    }

    async fn list_user_deals(
        &self,
        user_id: Uuid,
        min_score: f64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DealRecord>, ApiError> {
        let inner = self.inner.read().await;
        let mut deals: Vec<DealRecord> = inner
            .deals
            .iter()
            .filter(|d| d.user_id == user_id && d.score.is_some_and(|s| s >= min_score))
            .cloned()
            .collect();
        deals.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(deals
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::domain::{Deal, Marketplace, Plan};

    fn profile() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            name: "Dana".to_string(),
            email: format!("{}@example.com", Uuid::new_v4()),
            plan: Plan::Free,
        }
    }

    fn named_search(name: &str) -> NewSearch {
        NewSearch {
            name: name.to_string(),
            keywords: vec!["ps5".to_string()],
            marketplaces: vec!["ebay".to_string()],
            ..NewSearch::default()
        }
    }

    fn scored_record(search_id: Uuid, user_id: Uuid, score: Option<f64>) -> DealRecord {
        let mut deal = Deal::new(Marketplace::Ebay, "e1", "PS5 console", 389.5);
        deal.score = score;
        DealRecord::from_deal(search_id, user_id, deal)
    }

    #[tokio::test]
    async fn user_rows_round_trip() {
        let store = MemoryStore::new();
        let user = profile();

        let Ok(inserted) = store.insert_user(&user).await else {
            panic!("insert should succeed");
        };
        assert_eq!(inserted, user);

        let Ok(Some(fetched)) = store.get_user(user.id).await else {
            panic!("user should exist");
        };
        assert_eq!(fetched.email, user.email);

        let Ok(Some(updated)) = store.update_user(user.id, Some("Dee"), None).await else {
            panic!("update should hit");
        };
        assert_eq!(updated.name, "Dee");
        assert_eq!(updated.email, user.email);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        let user = profile();
        let Ok(_) = store.insert_user(&user).await else {
            panic!("insert should succeed");
        };

        let twin = UserProfile {
            id: Uuid::new_v4(),
            ..user.clone()
        };
        assert!(store.insert_user(&twin).await.is_err());

        let Ok(in_use) = store.email_in_use(&user.email, Uuid::new_v4()).await else {
            panic!("check should succeed");
        };
        assert!(in_use);
        let Ok(own) = store.email_in_use(&user.email, user.id).await else {
            panic!("check should succeed");
        };
        assert!(!own, "a user's own email does not conflict");
    }

    #[tokio::test]
    async fn searches_list_newest_first() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        let Ok(_) = store.insert_search(user_id, &named_search("older")).await else {
            panic!("insert should succeed");
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        let Ok(_) = store.insert_search(user_id, &named_search("newer")).await else {
            panic!("insert should succeed");
        };

        let Ok(searches) = store.list_searches(user_id).await else {
            panic!("list should succeed");
        };
        let names: Vec<&str> = searches.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["newer", "older"]);

        let Ok(count) = store.count_searches(user_id).await else {
            panic!("count should succeed");
        };
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn non_owner_mutations_miss() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let Ok(search) = store.insert_search(owner, &named_search("mine")).await else {
            panic!("insert should succeed");
        };

        let patch = SearchPatch {
            name: Some("hijacked".to_string()),
            ..SearchPatch::default()
        };
        let Ok(update) = store.update_search(stranger, search.id, &patch).await else {
            panic!("update call should not error");
        };
        assert!(update.is_none());

        let Ok(deleted) = store.delete_search(stranger, search.id).await else {
            panic!("delete call should not error");
        };
        assert!(!deleted);

        let Ok(Some(unchanged)) = store.get_search(search.id).await else {
            panic!("search should survive");
        };
        assert_eq!(unchanged.name, "mine");
    }

    #[tokio::test]
    async fn deleting_a_search_drops_its_deals() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let Ok(search) = store.insert_search(user_id, &named_search("ps5")).await else {
            panic!("insert should succeed");
        };
        let Ok(_) = store
            .insert_deals(vec![scored_record(search.id, user_id, Some(80.0))])
            .await
        else {
            panic!("insert deals should succeed");
        };

        let Ok(deleted) = store.delete_search(user_id, search.id).await else {
            panic!("delete should succeed");
        };
        assert!(deleted);

        let Ok(deals) = store.list_user_deals(user_id, 0.0, 100, 0).await else {
            panic!("list should succeed");
        };
        assert!(deals.is_empty());
    }

    #[tokio::test]
    async fn set_search_results_updates_count_and_timestamp() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let Ok(search) = store.insert_search(user_id, &named_search("ps5")).await else {
            panic!("insert should succeed");
        };
        tokio::time::sleep(Duration::from_millis(5)).await;

        let Ok(()) = store.set_search_results(search.id, 12).await else {
            panic!("update should succeed");
        };
        let Ok(Some(updated)) = store.get_search(search.id).await else {
            panic!("search should exist");
        };
        assert_eq!(updated.results_count, 12);
        assert!(updated.updated_at > search.updated_at);
    }

    #[tokio::test]
    async fn unscored_deals_are_excluded_even_at_zero_threshold() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let search_id = Uuid::new_v4();
        let Ok(_) = store
            .insert_deals(vec![
                scored_record(search_id, user_id, Some(55.0)),
                scored_record(search_id, user_id, None),
            ])
            .await
        else {
            panic!("insert should succeed");
        };

        let Ok(deals) = store.list_user_deals(user_id, 0.0, 100, 0).await else {
            panic!("list should succeed");
        };
        assert_eq!(deals.len(), 1);
        assert_eq!(deals.first().and_then(|d| d.score), Some(55.0));
    }

    #[tokio::test]
    async fn deals_order_by_score_then_recency_with_pagination() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let search_id = Uuid::new_v4();
        let Ok(_) = store
            .insert_deals(vec![
                scored_record(search_id, user_id, Some(40.0)),
                scored_record(search_id, user_id, Some(90.0)),
                scored_record(search_id, user_id, Some(70.0)),
            ])
            .await
        else {
            panic!("insert should succeed");
        };

        let Ok(all) = store.list_user_deals(user_id, 50.0, 100, 0).await else {
            panic!("list should succeed");
        };
        let scores: Vec<Option<f64>> = all.iter().map(|d| d.score).collect();
        assert_eq!(scores, vec![Some(90.0), Some(70.0)]);

        let Ok(page) = store.list_user_deals(user_id, 0.0, 1, 1).await else {
            panic!("list should succeed");
        };
        assert_eq!(page.first().and_then(|d| d.score), Some(70.0));
    }

    #[tokio::test]
    async fn deleting_a_user_cascades() {
        let store = MemoryStore::new();
        let user = profile();
        let Ok(_) = store.insert_user(&user).await else {
            panic!("insert should succeed");
        };
        let Ok(search) = store.insert_search(user.id, &named_search("ps5")).await else {
            panic!("insert should succeed");
        };
        let Ok(_) = store
            .insert_deals(vec![scored_record(search.id, user.id, Some(10.0))])
            .await
        else {
            panic!("insert should succeed");
        };

        let Ok(deleted) = store.delete_user(user.id).await else {
            panic!("delete should succeed");
        };
        assert!(deleted);

        let Ok(searches) = store.list_searches(user.id).await else {
            panic!("list should succeed");
        };
        assert!(searches.is_empty());
        let Ok(deals) = store.list_user_deals(user.id, 0.0, 100, 0).await else {
            panic!("list should succeed");
        };
        assert!(deals.is_empty());
    }
}
