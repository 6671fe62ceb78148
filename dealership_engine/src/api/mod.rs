//! The engine public API.
//!
//! Thin, typed facades over a storage backend. The server holds one of each, parameterised over
//! the backend type so that endpoint tests can substitute mocks.

pub mod catalog_api;
pub mod errors;
pub mod order_objects;
pub mod orders_api;
pub mod users_api;

pub use catalog_api::{fallback_vehicles, CatalogApi};
pub use orders_api::OrderApi;
pub use users_api::UserApi;
