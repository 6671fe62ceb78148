//! `SqliteDatabase` is a concrete implementation of a dealership engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the
//! [`crate::traits`] module.
use std::fmt::Debug;

use sqlx::SqlitePool;

use super::db::{create_schema, new_pool, orders, users, vehicles};
use crate::{
    api::{errors::CatalogApiError, order_objects::OrderQueryFilter},
    db_types::{NewOrder, NewUserRecord, Order, OrderStatusType, OrderWithOwner, UserRecord, Vehicle},
    traits::{DealershipDatabase, OrderApiError, OrderManagement, UserApiError, UserManagement, VehicleCatalog},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connect to the database at `url`, creating the file and any missing tables as needed.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        create_schema(&pool).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order(order, &mut conn).await
    }

    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_id(id, &mut conn).await?;
        Ok(order)
    }

    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::search_orders(query, &mut conn).await?;
        Ok(orders)
    }

    async fn search_orders_with_owners(
        &self,
        query: OrderQueryFilter,
    ) -> Result<Vec<OrderWithOwner>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::search_orders_with_owners(query, &mut conn).await?;
        Ok(orders)
    }

    async fn update_order_status(
        &self,
        id: i64,
        status: OrderStatusType,
        approved_by: &str,
    ) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::update_order_status(id, status, approved_by, &mut conn).await?;
        Ok(order)
    }
}

impl UserManagement for SqliteDatabase {
    async fn upsert_user(&self, user: NewUserRecord) -> Result<UserRecord, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        let record = users::upsert_user(user, &mut conn).await?;
        Ok(record)
    }

    async fn fetch_user(&self, discord_id: &str) -> Result<Option<UserRecord>, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::fetch_user(discord_id, &mut conn).await?;
        Ok(user)
    }
}

impl VehicleCatalog for SqliteDatabase {
    async fn fetch_active_vehicles(&self) -> Result<Vec<Vehicle>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let vehicles = vehicles::fetch_active_vehicles(&mut conn).await?;
        Ok(vehicles)
    }
}

impl DealershipDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }
}
