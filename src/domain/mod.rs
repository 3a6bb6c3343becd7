//! Domain layer: normalized deals, search criteria, saved searches and user
//! profiles.
//!
//! This module contains the types shared by the marketplace adapters, the
//! services and the persistence layer, independent of any wire format or
//! storage backend.

pub mod criteria;
pub mod deal;
pub mod marketplace;
pub mod saved_search;
pub mod user;

pub use criteria::SearchCriteria;
pub use deal::{Deal, SoldListing};
pub use marketplace::{Marketplace, MarketplaceSelector};
pub use saved_search::{NewSearch, SavedSearch, SearchPatch};
pub use user::{Plan, UserProfile};
