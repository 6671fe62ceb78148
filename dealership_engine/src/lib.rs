//! Dealership Engine
//!
//! The dealership engine contains the core logic for the dealership portal: role resolution, the
//! order book, the vehicle catalogue and the user registry. It is HTTP-framework agnostic.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`]). Currently, Sqlite is the only supported
//!    backend. You should never need to access the database directly. Instead, use the public API
//!    provided by the engine. The exception is the data types used in the database. These are
//!    defined in the `db_types` module and are public.
//! 2. The engine public API ([`mod@api`]). This provides the public-facing functionality of the
//!    engine: submitting and listing orders, driving the order-status state machine, reading the
//!    vehicle catalogue and maintaining user records. Specific backends need to implement the
//!    traits in the [`mod@traits`] module in order to act as a backend for the dealership server.
//!
//! Role resolution (mapping the set of provider-side group memberships to a single application
//! role) lives in [`mod@roles`] and is pure; it never touches the database.
mod api;

pub mod db_types;
pub mod roles;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use api::{
    catalog_api::fallback_vehicles,
    errors::{CatalogApiError, OrderApiError, UserApiError},
    order_objects::OrderQueryFilter,
    CatalogApi,
    OrderApi,
    UserApi,
};
