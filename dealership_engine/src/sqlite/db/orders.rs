use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    api::{errors::OrderApiError, order_objects::OrderQueryFilter},
    db_types::{NewOrder, Order, OrderStatusType, OrderWithOwner},
};

/// Inserts a new order into the database using the given connection. The status column takes its
/// schema default of `pending`.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, OrderApiError> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                discord_id,
                customer_name,
                vehicle_id,
                vehicle_name,
                price,
                primary_color,
                secondary_color,
                pearl_color,
                special_requests,
                payment_method
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *;
        "#,
    )
    .bind(order.discord_id)
    .bind(order.customer_name)
    .bind(order.vehicle_id)
    .bind(order.vehicle_name)
    .bind(order.price)
    .bind(order.primary_color)
    .bind(order.secondary_color)
    .bind(order.pearl_color)
    .bind(order.special_requests)
    .bind(order.payment_method)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Order inserted with id {}", order.id);
    Ok(order)
}

pub async fn fetch_order_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

fn push_filters(builder: &mut QueryBuilder<'_, sqlx::Sqlite>, query: &OrderQueryFilter) {
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(cid) = &query.customer_id {
        where_clause.push("discord_id = ");
        where_clause.push_bind_unseparated(cid.clone());
    }
    if query.status.as_ref().map(|s| !s.is_empty()).unwrap_or(false) {
        let statuses =
            query.status.as_ref().unwrap().iter().map(|s| format!("'{s}'")).collect::<Vec<_>>().join(",");
        where_clause.push(format!("status IN ({statuses})"));
    }
    if let Some(since) = query.since {
        where_clause.push("created_at >= ");
        where_clause.push_bind_unseparated(since);
    }
    if let Some(until) = query.until {
        where_clause.push("created_at <= ");
        where_clause.push_bind_unseparated(until);
    }
}

/// Fetches orders according to criteria specified in the `OrderQueryFilter`.
///
/// Resulting orders are ordered newest-first.
pub async fn search_orders(query: OrderQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM orders ");
    push_filters(&mut builder, &query);
    builder.push(" ORDER BY created_at DESC, id DESC");
    trace!("📝️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<Order>().fetch_all(conn).await?;
    trace!("📝️ Result of search_orders: {:?}", orders.len());
    Ok(orders)
}

/// As [`search_orders`], but each order is joined with the profile summary of the user that
/// placed it. Orders from identities that never completed a login still appear, with the summary
/// columns null.
pub async fn search_orders_with_owners(
    query: OrderQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderWithOwner>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        "SELECT orders.*, users.username AS username, users.avatar AS avatar \
         FROM orders LEFT JOIN users ON orders.discord_id = users.discord_id ",
    );
    push_filters(&mut builder, &query);
    builder.push(" ORDER BY orders.created_at DESC, orders.id DESC");
    trace!("📝️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<OrderWithOwner>().fetch_all(conn).await?;
    Ok(orders)
}

/// Stores the new status against the order. Transition legality is checked by the caller; this
/// function only writes a member of the status enumeration.
pub async fn update_order_status(
    id: i64,
    status: OrderStatusType,
    approved_by: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let result: Option<Order> = sqlx::query_as(
        "UPDATE orders SET status = $1, approved_by = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $3 RETURNING *",
    )
    .bind(status)
    .bind(approved_by)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(result)
}
