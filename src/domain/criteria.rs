//! User-supplied search constraints, normalized from query parameters before
//! any provider client sees them.

/// Default result ordering forwarded to providers that support it.
pub const DEFAULT_SORT_ORDER: &str = "BestMatch";

/// Default page size when the request does not name one.
pub const DEFAULT_MAX_RESULTS: u32 = 50;

/// Normalized search constraints.
///
/// Keywords arrive as a comma-separated query parameter and are split, trimmed
/// and de-blanked by [`SearchCriteria::from_raw_keywords`] so downstream code
/// can assume every entry is a non-empty term.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    /// Non-empty search terms.
    pub keywords: Vec<String>,
    /// Inclusive lower price bound, if any.
    pub price_min: Option<f64>,
    /// Inclusive upper price bound, if any.
    pub price_max: Option<f64>,
    /// Provider-specific condition label (for eBay: `new`, `used`, ...).
    pub condition: Option<String>,
    /// Provider sort order keyword.
    pub sort_order: String,
    /// Maximum number of results to request per provider.
    pub max_results: u32,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            price_min: None,
            price_max: None,
            condition: None,
            sort_order: DEFAULT_SORT_ORDER.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl SearchCriteria {
    /// Builds criteria from a raw comma-separated keyword string.
    ///
    /// Splits on commas, trims whitespace and drops empty segments, so
    /// `" ps5 , , controller "` yields `["ps5", "controller"]`. The result may
    /// hold no keywords at all; callers validate that before going upstream.
    #[must_use]
    pub fn from_raw_keywords(raw: &str) -> Self {
        Self {
            keywords: split_keywords(raw),
            ..Self::default()
        }
    }

    /// Joins the keywords back into the single-string form provider APIs
    /// expect.
    #[must_use]
    pub fn joined_keywords(&self) -> String {
        self.keywords.join(" ")
    }

    /// `true` when no usable keyword survived normalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// Splits a comma-separated keyword list, trimming and dropping blanks.
#[must_use]
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn splits_trims_and_drops_blanks() {
        let criteria = SearchCriteria::from_raw_keywords(" ps5 , , controller ");
        assert_eq!(criteria.keywords, vec!["ps5", "controller"]);
        assert_eq!(criteria.joined_keywords(), "ps5 controller");
    }

    #[test]
    fn all_blank_input_yields_empty_criteria() {
        let criteria = SearchCriteria::from_raw_keywords(" , ,, ");
        assert!(criteria.is_empty());
    }

    #[test]
    fn defaults_match_provider_expectations() {
        let criteria = SearchCriteria::default();
        assert_eq!(criteria.sort_order, DEFAULT_SORT_ORDER);
        assert_eq!(criteria.max_results, DEFAULT_MAX_RESULTS);
        assert!(criteria.price_min.is_none());
        assert!(criteria.condition.is_none());
    }
}
