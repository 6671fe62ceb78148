use crate::{
    api::{errors::OrderApiError, order_objects::OrderQueryFilter},
    db_types::{NewOrder, Order, OrderStatusType, OrderWithOwner},
};

/// Access to the order book.
///
/// Implementations are role-agnostic: callers gate admin-only operations before reaching this
/// trait. Every write is a single-row, single-statement operation and relies on the datastore's
/// own atomicity.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Insert a brand-new order. The stored order always starts out `Pending`.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderApiError>;

    /// Fetch a single order by its row id.
    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, OrderApiError>;

    /// Fetch orders matching the filter, newest first.
    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderApiError>;

    /// Fetch orders matching the filter, newest first, each joined with the summary of the user
    /// that placed it.
    async fn search_orders_with_owners(&self, query: OrderQueryFilter) -> Result<Vec<OrderWithOwner>, OrderApiError>;

    /// Set the status of the order with the given id, recording `approved_by` as the reviewing
    /// admin. Returns `None` if no such order exists. The legality of the status *transition* is
    /// the caller's concern; this method only stores a member of the status enumeration.
    async fn update_order_status(
        &self,
        id: i64,
        status: OrderStatusType,
        approved_by: &str,
    ) -> Result<Option<Order>, OrderApiError>;
}
