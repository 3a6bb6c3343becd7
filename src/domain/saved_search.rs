//! Saved searches: a user's persistent search criteria plus the partial-update
//! merge applied by the PUT endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A user's persisted search criteria.
///
/// `results_count` is derived: it tracks how many deal rows the last
/// save-deals call inserted under this search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SavedSearch {
    /// Row id.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Display name, required at creation.
    pub name: String,
    /// Ordered search terms.
    pub keywords: Vec<String>,
    /// Optional category restriction.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub price_min: Option<f64>,
    /// Inclusive upper price bound.
    pub price_max: Option<f64>,
    /// Optional condition restriction.
    pub condition: Option<String>,
    /// Provider identifiers this search targets.
    pub marketplaces: Vec<String>,
    /// Inactive searches are kept but not executed by background tooling.
    pub active: bool,
    /// Rows inserted by the most recent save-deals call.
    pub results_count: i32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a search. The store fills `id`, timestamps,
/// `active = true` and `results_count = 0`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewSearch {
    /// Display name, must be non-empty.
    pub name: String,
    /// Search terms; an empty list is allowed.
    pub keywords: Vec<String>,
    /// Optional category restriction.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub price_min: Option<f64>,
    /// Inclusive upper price bound.
    pub price_max: Option<f64>,
    /// Optional condition restriction.
    pub condition: Option<String>,
    /// Provider identifiers, empty when the client sent none.
    pub marketplaces: Vec<String>,
}

/// Partial update for a saved search.
///
/// `None` means "leave unchanged". The price bounds are doubly optional so a
/// request can distinguish omitting the field from explicitly clearing it to
/// null.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchPatch {
    /// New display name.
    pub name: Option<String>,
    /// Replacement keyword list.
    pub keywords: Option<Vec<String>>,
    /// Replacement category.
    pub category: Option<String>,
    /// `Some(None)` clears the bound, `Some(Some(x))` sets it.
    pub price_min: Option<Option<f64>>,
    /// `Some(None)` clears the bound, `Some(Some(x))` sets it.
    pub price_max: Option<Option<f64>>,
    /// Replacement condition.
    pub condition: Option<String>,
    /// Replacement marketplace list.
    pub marketplaces: Option<Vec<String>>,
    /// Toggle the active flag.
    pub active: Option<bool>,
}

impl SearchPatch {
    /// Merges the present fields into `search`, leaving the rest untouched.
    /// Timestamps are the store's responsibility, not the patch's.
    pub fn apply(&self, search: &mut SavedSearch) {
        if let Some(name) = &self.name {
            search.name.clone_from(name);
        }
        if let Some(keywords) = &self.keywords {
            search.keywords.clone_from(keywords);
        }
        if let Some(category) = &self.category {
            search.category = Some(category.clone());
        }
        if let Some(price_min) = self.price_min {
            search.price_min = price_min;
        }
        if let Some(price_max) = self.price_max {
            search.price_max = price_max;
        }
        if let Some(condition) = &self.condition {
            search.condition = Some(condition.clone());
        }
        if let Some(marketplaces) = &self.marketplaces {
            search.marketplaces.clone_from(marketplaces);
        }
        if let Some(active) = self.active {
            search.active = active;
        }
    }

    /// `true` when no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
