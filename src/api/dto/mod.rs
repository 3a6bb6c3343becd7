//! Data Transfer Objects for REST request/response serialization.
//!
//! Request bodies keep every field optional: handlers reproduce the API's
//! required-field error messages instead of letting deserialization reject
//! the call with a generic body.

pub mod auth_dto;
pub mod common_dto;
pub mod deal_dto;
pub mod search_dto;
pub mod user_dto;

pub use auth_dto::*;
pub use common_dto::*;
pub use deal_dto::*;
pub use search_dto::*;
pub use user_dto::*;
