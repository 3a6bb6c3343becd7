//! Saved-search lifecycle and deal persistence.
//!
//! Wraps the [`Store`] with the rules the HTTP layer relies on: the free-plan
//! quota, ownership checks expressed as not-found, and the rule that saved
//! deals always belong to the owner of their parent search.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::user::FREE_PLAN_SEARCH_LIMIT;
use crate::domain::{Deal, NewSearch, SavedSearch, SearchPatch};
use crate::error::ApiError;
use crate::persistence::{DealRecord, Store};

/// Service for saved searches and the deals captured under them.
#[derive(Debug, Clone)]
pub struct SavedSearchService {
    store: Arc<dyn Store>,
}

impl SavedSearchService {
    /// Creates a new service on top of the given store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Lists the user's saved searches, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    pub async fn list_searches(&self, user_id: Uuid) -> Result<Vec<SavedSearch>, ApiError> {
        self.store.list_searches(user_id).await
    }

    /// Creates a saved search, enforcing the free-plan quota.
    ///
    /// Users without a profile row are not quota-limited; the quota only
    /// binds when the stored plan is known to be free.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] when the name is empty,
    /// [`ApiError::QuotaExceeded`] when a free-plan user already owns
    /// [`FREE_PLAN_SEARCH_LIMIT`] searches and [`ApiError::Persistence`] on
    /// storage failure.
    pub async fn create_search(
        &self,
        user_id: Uuid,
        new_search: &NewSearch,
    ) -> Result<SavedSearch, ApiError> {
        if new_search.name.is_empty() {
            return Err(ApiError::InvalidArgument(
                "Search name is required".to_string(),
            ));
        }

        let plan = self.store.get_user(user_id).await?.map(|p| p.plan);
        if plan.is_some_and(|plan| plan.is_free()) {
            let count = self.store.count_searches(user_id).await?;
            if count >= FREE_PLAN_SEARCH_LIMIT {
                return Err(ApiError::QuotaExceeded(
                    "Free plan limited to 2 saved searches".to_string(),
                ));
            }
        }

        // The count check and the insert are separate statements; two
        // concurrent creates can both pass the check.
        let search = self.store.insert_search(user_id, new_search).await?;
        tracing::info!(search_id = %search.id, %user_id, "saved search created");
        Ok(search)
    }

    /// Applies a partial update to a search the user owns.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the search does not exist or
    /// belongs to someone else, and [`ApiError::Persistence`] on storage
    /// failure.
    pub async fn update_search(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &SearchPatch,
    ) -> Result<SavedSearch, ApiError> {
        self.store
            .update_search(user_id, id, patch)
            .await?
            .ok_or_else(|| ApiError::NotFound("Search not found".to_string()))
    }

    /// Deletes a search the user owns, along with its captured deals.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the search does not exist or
    /// belongs to someone else, and [`ApiError::Persistence`] on storage
    /// failure.
    pub async fn delete_search(&self, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        if self.store.delete_search(user_id, id).await? {
            tracing::info!(search_id = %id, %user_id, "saved search deleted");
            Ok(())
        } else {
            Err(ApiError::NotFound("Search not found".to_string()))
        }
    }

    /// Captures a batch of deals under a saved search.
    ///
    /// Every record is stamped with the search owner's id, whatever the
    /// caller put in the payload, and the search's result counter is set to
    /// the batch size. The batch is stored whole or not at all.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the search does not exist and
    /// [`ApiError::Persistence`] on storage failure.
    pub async fn save_deals(
        &self,
        search_id: Uuid,
        deals: Vec<Deal>,
    ) -> Result<Vec<DealRecord>, ApiError> {
        let Some(search) = self.store.get_search(search_id).await? else {
            return Err(ApiError::NotFound("Search not found".to_string()));
        };

        let records: Vec<DealRecord> = deals
            .into_iter()
            .map(|deal| DealRecord::from_deal(search_id, search.user_id, deal))
            .collect();
        let stored = self.store.insert_deals(records).await?;

        let results_count = i32::try_from(stored.len()).unwrap_or(i32::MAX);
        self.store
            .set_search_results(search_id, results_count)
            .await?;
        tracing::info!(%search_id, count = stored.len(), "deals saved");
        Ok(stored)
    }

    /// Lists the user's scored deals, best score first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    pub async fn list_user_deals(
        &self,
        user_id: Uuid,
        min_score: f64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DealRecord>, ApiError> {
        self.store
            .list_user_deals(user_id, min_score, limit, offset)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use tokio::sync::Barrier;

    use crate::domain::{Marketplace, Plan, UserProfile};
    use crate::persistence::MemoryStore;

    fn named(name: &str) -> NewSearch {
        NewSearch {
            name: name.to_string(),
            keywords: vec!["ps5".to_string(), "console".to_string()],
            marketplaces: vec!["ebay".to_string()],
            ..NewSearch::default()
        }
    }

    fn user_on(plan: Plan) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            name: "Dana".to_string(),
            email: format!("{}@example.com", Uuid::new_v4()),
            plan,
        }
    }

    async fn service_with_user(plan: Plan) -> (SavedSearchService, UserProfile) {
        let store = Arc::new(MemoryStore::new());
        let user = user_on(plan);
        let Ok(_) = store.insert_user(&user).await else {
            panic!("seeding the user should succeed");
        };
        (SavedSearchService::new(store), user)
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (service, user) = service_with_user(Plan::Free).await;
        let Err(err) = service.create_search(user.id, &named("")).await else {
            panic!("blank name should be rejected");
        };
        assert!(matches!(err, ApiError::InvalidArgument(_)));
        assert_eq!(err.to_string(), "Search name is required");
    }

    #[tokio::test]
    async fn third_create_on_free_plan_is_rejected() {
        let (service, user) = service_with_user(Plan::Free).await;
        for name in ["first", "second"] {
            let Ok(_) = service.create_search(user.id, &named(name)).await else {
                panic!("creates under the quota should succeed");
            };
        }

        let Err(err) = service.create_search(user.id, &named("third")).await else {
            panic!("the third create should hit the quota");
        };
        assert!(matches!(err, ApiError::QuotaExceeded(_)));
        assert_eq!(err.to_string(), "Free plan limited to 2 saved searches");
    }

    #[tokio::test]
    async fn pro_plan_is_never_limited() {
        let (service, user) = service_with_user(Plan::Pro).await;
        for name in ["first", "second", "third", "fourth"] {
            let Ok(_) = service.create_search(user.id, &named(name)).await else {
                panic!("pro users have no quota");
            };
        }
    }

    #[tokio::test]
    async fn users_without_a_profile_row_are_not_quota_limited() {
        let service = SavedSearchService::new(Arc::new(MemoryStore::new()));
        let user_id = Uuid::new_v4();
        for name in ["first", "second", "third"] {
            let Ok(_) = service.create_search(user_id, &named(name)).await else {
                panic!("unknown plans should not be limited");
            };
        }
    }

    #[tokio::test]
    async fn inactive_searches_still_count_against_the_quota() {
        let (service, user) = service_with_user(Plan::Free).await;
        let Ok(first) = service.create_search(user.id, &named("first")).await else {
            panic!("create should succeed");
        };
        let Ok(_) = service.create_search(user.id, &named("second")).await else {
            panic!("create should succeed");
        };

        let pause = SearchPatch {
            active: Some(false),
            ..SearchPatch::default()
        };
        let Ok(_) = service.update_search(user.id, first.id, &pause).await else {
            panic!("update should succeed");
        };

        let Err(err) = service.create_search(user.id, &named("third")).await else {
            panic!("pausing a search should not free quota");
        };
        assert!(matches!(err, ApiError::QuotaExceeded(_)));
    }

    #[tokio::test]
    async fn non_owner_update_and_delete_report_not_found() {
        let (service, owner) = service_with_user(Plan::Pro).await;
        let Ok(search) = service.create_search(owner.id, &named("mine")).await else {
            panic!("create should succeed");
        };
        let stranger = Uuid::new_v4();

        let patch = SearchPatch {
            name: Some("hijacked".to_string()),
            ..SearchPatch::default()
        };
        let Err(err) = service.update_search(stranger, search.id, &patch).await else {
            panic!("non-owner update should miss");
        };
        assert_eq!(err.to_string(), "Search not found");

        let Err(err) = service.delete_search(stranger, search.id).await else {
            panic!("non-owner delete should miss");
        };
        assert_eq!(err.to_string(), "Search not found");
    }

    #[tokio::test]
    async fn saved_deals_carry_the_search_owner() {
        let (service, owner) = service_with_user(Plan::Pro).await;
        let Ok(search) = service.create_search(owner.id, &named("ps5")).await else {
            panic!("create should succeed");
        };

        let mut deal = Deal::new(Marketplace::Ebay, "e77", "PS5 disc edition", 401.0);
        deal.score = Some(82.0);
        let Ok(stored) = service.save_deals(search.id, vec![deal]).await else {
            panic!("save should succeed");
        };
        assert!(stored.iter().all(|r| r.user_id == owner.id));
        assert!(stored.iter().all(|r| r.search_id == search.id));

        let Ok(listed) = service.list_searches(owner.id).await else {
            panic!("list should succeed");
        };
        assert_eq!(listed.first().map(|s| s.results_count), Some(1));
    }

    #[tokio::test]
    async fn saving_under_a_missing_search_is_not_found() {
        let (service, _) = service_with_user(Plan::Pro).await;
        let deal = Deal::new(Marketplace::Ebay, "e1", "PS5", 400.0);
        let Err(err) = service.save_deals(Uuid::new_v4(), vec![deal]).await else {
            panic!("missing search should be reported");
        };
        assert_eq!(err.to_string(), "Search not found");
    }

    #[tokio::test]
    async fn saved_deals_round_trip_through_listing() {
        let (service, owner) = service_with_user(Plan::Pro).await;
        let Ok(search) = service.create_search(owner.id, &named("ps5")).await else {
            panic!("create should succeed");
        };

        let mut deal = Deal::new(Marketplace::Ebay, "e42", "PS5 slim bundle", 389.5);
        deal.score = Some(91.0);
        let Ok(_) = service.save_deals(search.id, vec![deal]).await else {
            panic!("save should succeed");
        };

        let Ok(deals) = service.list_user_deals(owner.id, 0.0, 100, 0).await else {
            panic!("list should succeed");
        };
        let Some(record) = deals.first() else {
            panic!("the saved deal should be listed");
        };
        assert_eq!(record.external_id, "e42");
        assert_eq!(record.title, "PS5 slim bundle");
        assert!((record.price - 389.5).abs() < f64::EPSILON);
        assert_eq!(record.score, Some(91.0));
    }

    /// Store wrapper that parks `insert_search` on a barrier so two creates
    /// can be held between the quota check and the insert.
    #[derive(Debug)]
    struct GatedStore {
        inner: MemoryStore,
        gate: Arc<Barrier>,
    }

    #[async_trait]
    impl Store for GatedStore {
        async fn get_user(&self, id: Uuid) -> Result<Option<UserProfile>, ApiError> {
            self.inner.get_user(id).await
        }

        async fn insert_user(&self, profile: &UserProfile) -> Result<UserProfile, ApiError> {
            self.inner.insert_user(profile).await
        }

        async fn update_user(
            &self,
            id: Uuid,
            name: Option<&str>,
            email: Option<&str>,
        ) -> Result<Option<UserProfile>, ApiError> {
            self.inner.update_user(id, name, email).await
        }

        async fn delete_user(&self, id: Uuid) -> Result<bool, ApiError> {
            self.inner.delete_user(id).await
        }

        async fn email_in_use(&self, email: &str, exclude: Uuid) -> Result<bool, ApiError> {
            self.inner.email_in_use(email, exclude).await
        }

        async fn list_searches(&self, user_id: Uuid) -> Result<Vec<SavedSearch>, ApiError> {
            self.inner.list_searches(user_id).await
        }

        async fn count_searches(&self, user_id: Uuid) -> Result<i64, ApiError> {
            self.inner.count_searches(user_id).await
        }

        async fn insert_search(
            &self,
            user_id: Uuid,
            new_search: &NewSearch,
        ) -> Result<SavedSearch, ApiError> {
            self.gate.wait().await;
            self.inner.insert_search(user_id, new_search).await
        }

        async fn get_search(&self, id: Uuid) -> Result<Option<SavedSearch>, ApiError> {
            self.inner.get_search(id).await
        }

        async fn update_search(
            &self,
            user_id: Uuid,
            id: Uuid,
            patch: &SearchPatch,
        ) -> Result<Option<SavedSearch>, ApiError> {
            self.inner.update_search(user_id, id, patch).await
        }

        async fn delete_search(&self, user_id: Uuid, id: Uuid) -> Result<bool, ApiError> {
            self.inner.delete_search(user_id, id).await
        }

        async fn set_search_results(&self, id: Uuid, results_count: i32) -> Result<(), ApiError> {
            self.inner.set_search_results(id, results_count).await
        }

        async fn insert_deals(
            &self,
            records: Vec<DealRecord>,
        ) -> Result<Vec<DealRecord>, ApiError> {
            self.inner.insert_deals(records).await
        }

        async fn list_user_deals(
            &self,
            user_id: Uuid,
            min_score: f64,
            limit: i64,
            offset: i64,
        ) -> Result<Vec<DealRecord>, ApiError> {
            self.inner.list_user_deals(user_id, min_score, limit, offset).await
        }
    }

    #[tokio::test]
    async fn concurrent_creates_can_exceed_the_free_quota() {
        let inner = MemoryStore::new();
        let user = user_on(Plan::Free);
        let Ok(_) = inner.insert_user(&user).await else {
            panic!("seeding the user should succeed");
        };
        let Ok(_) = inner.insert_search(user.id, &named("seed")).await else {
            panic!("seeding the search should succeed");
        };

        let store = Arc::new(GatedStore {
            inner,
            gate: Arc::new(Barrier::new(2)),
        });
        let service = SavedSearchService::new(Arc::clone(&store) as Arc<dyn Store>);

        // Both creates read count = 1, park on the gate, then both insert.
        let racer_a = named("racer-a");
        let racer_b = named("racer-b");
        let (a, b) = tokio::join!(
            service.create_search(user.id, &racer_a),
            service.create_search(user.id, &racer_b),
        );
        assert!(a.is_ok());
        assert!(b.is_ok());

        let Ok(count) = store.count_searches(user.id).await else {
            panic!("count should succeed");
        };
        assert_eq!(count, 3, "the check-then-insert window admits a third search");
    }
}
