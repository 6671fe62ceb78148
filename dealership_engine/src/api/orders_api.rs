use std::fmt::Debug;

use log::*;

use crate::{
    api::{errors::OrderApiError, order_objects::OrderQueryFilter},
    db_types::{NewOrder, Order, OrderStatusType, OrderWithOwner},
    traits::OrderManagement,
};

/// `OrderApi` is the primary API for submitting orders and driving the order-status state
/// machine.
pub struct OrderApi<B> {
    db: B,
}

impl<B> Debug for OrderApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderApi")
    }
}

impl<B> OrderApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderApi<B>
where B: OrderManagement
{
    /// Submit a brand-new order to the book. The stored order always starts out `Pending`.
    pub async fn submit_order(&self, order: NewOrder) -> Result<Order, OrderApiError> {
        let order = self.db.insert_order(order).await?;
        debug!("🔄️📦️ Order #{} for '{}' has been placed by {}", order.id, order.vehicle_name, order.discord_id);
        Ok(order)
    }

    /// All orders placed by the given customer, newest first.
    pub async fn orders_for_customer(&self, discord_id: &str) -> Result<Vec<Order>, OrderApiError> {
        let query = OrderQueryFilter::default().with_customer_id(discord_id.to_string());
        self.db.search_orders(query).await
    }

    /// The full order book joined with user summaries, newest first. For the admin board.
    pub async fn all_orders_with_owners(&self) -> Result<Vec<OrderWithOwner>, OrderApiError> {
        self.db.search_orders_with_owners(OrderQueryFilter::default()).await
    }

    /// Move the order onto `new_status`, recording `approved_by` as the reviewing admin.
    ///
    /// The transition is validated against the status state machine before anything is written:
    /// illegal moves (for example `delivered` back to `pending`) are rejected with
    /// [`OrderApiError::InvalidStatusTransition`].
    pub async fn update_status(
        &self,
        order_id: i64,
        new_status: OrderStatusType,
        approved_by: &str,
    ) -> Result<Order, OrderApiError> {
        let current =
            self.db.fetch_order_by_id(order_id).await?.ok_or(OrderApiError::OrderNotFound(order_id))?;
        if !current.status.is_valid_transition(new_status) {
            debug!("🔄️📦️ Rejecting illegal status move for order #{order_id}: {} -> {new_status}", current.status);
            return Err(OrderApiError::InvalidStatusTransition { from: current.status, to: new_status });
        }
        let updated = self
            .db
            .update_order_status(order_id, new_status, approved_by)
            .await?
            .ok_or(OrderApiError::OrderNotFound(order_id))?;
        info!("🔄️📦️ Order #{order_id} moved to '{new_status}' by {approved_by}");
        Ok(updated)
    }
}
