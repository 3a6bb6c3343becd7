//! Saved-search endpoint DTOs.

use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

use crate::domain::{NewSearch, SearchPatch};

/// Distinguishes an absent field from an explicit `null`: absent stays
/// `None`, `null` becomes `Some(None)` and clears the stored value.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Request body for `POST /api/searches`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSearchRequest {
    /// Display name; required, the only mandatory field.
    #[serde(default)]
    pub name: Option<String>,
    /// Search terms.
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    /// Provider category id.
    #[serde(default)]
    pub category: Option<String>,
    /// Inclusive lower price bound.
    #[serde(default)]
    pub price_min: Option<f64>,
    /// Inclusive upper price bound.
    #[serde(default)]
    pub price_max: Option<f64>,
    /// Condition label filter.
    #[serde(default)]
    pub condition: Option<String>,
    /// Marketplaces the search runs against.
    #[serde(default)]
    pub marketplaces: Option<Vec<String>>,
}

impl CreateSearchRequest {
    /// Collapses missing lists to empty ones; a missing name becomes the
    /// empty string and fails the required-name check downstream.
    #[must_use]
    pub fn into_new_search(self) -> NewSearch {
        NewSearch {
            name: self.name.unwrap_or_default(),
            keywords: self.keywords.unwrap_or_default(),
            category: self.category,
            price_min: self.price_min,
            price_max: self.price_max,
            condition: self.condition,
            marketplaces: self.marketplaces.unwrap_or_default(),
        }
    }
}

/// Request body for `PUT /api/searches/{id}`. Every field is optional;
/// only the ones present in the payload are written.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSearchRequest {
    /// New display name; empty strings are ignored.
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement keyword list; an empty list clears the keywords.
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    /// New category; empty strings are ignored.
    #[serde(default)]
    pub category: Option<String>,
    /// New lower bound; an explicit `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub price_min: Option<Option<f64>>,
    /// New upper bound; an explicit `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub price_max: Option<Option<f64>>,
    /// New condition label; empty strings are ignored.
    #[serde(default)]
    pub condition: Option<String>,
    /// Replacement marketplace list.
    #[serde(default)]
    pub marketplaces: Option<Vec<String>>,
    /// Pause or resume the search.
    #[serde(default)]
    pub active: Option<bool>,
}

impl UpdateSearchRequest {
    /// Maps the payload onto a patch. String fields drop empty values,
    /// list fields apply as-is, and the price bounds keep their
    /// null-versus-absent distinction.
    #[must_use]
    pub fn into_patch(self) -> SearchPatch {
        SearchPatch {
            name: self.name.filter(|s| !s.is_empty()),
            keywords: self.keywords,
            category: self.category.filter(|s| !s.is_empty()),
            price_min: self.price_min,
            price_max: self.price_max,
            condition: self.condition.filter(|s| !s.is_empty()),
            marketplaces: self.marketplaces,
            active: self.active,
        }
    }
}
