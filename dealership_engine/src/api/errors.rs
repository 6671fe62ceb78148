use thiserror::Error;

use crate::db_types::OrderStatusType;

#[derive(Debug, Error)]
pub enum OrderApiError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Order {0} not found")]
    OrderNotFound(i64),
    #[error("Cannot move an order from '{from}' to '{to}'")]
    InvalidStatusTransition { from: OrderStatusType, to: OrderStatusType },
    #[error("Invalid order query: {0}")]
    QueryError(String),
}

#[derive(Debug, Error)]
pub enum UserApiError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("User {0} not found")]
    UserNotFound(String),
}

#[derive(Debug, Error)]
pub enum CatalogApiError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}
