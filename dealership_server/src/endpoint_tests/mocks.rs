use dealership_engine::{
    db_types::{NewOrder, NewUserRecord, Order, OrderStatusType, OrderWithOwner, UserRecord, Vehicle},
    traits::{CatalogApiError, OrderApiError, OrderManagement, UserApiError, UserManagement, VehicleCatalog},
    OrderQueryFilter,
};
use mockall::mock;

mock! {
    pub OrderStore {}
    impl OrderManagement for OrderStore {
        async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderApiError>;
        async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, OrderApiError>;
        async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderApiError>;
        async fn search_orders_with_owners(&self, query: OrderQueryFilter) -> Result<Vec<OrderWithOwner>, OrderApiError>;
        async fn update_order_status(&self, id: i64, status: OrderStatusType, approved_by: &str) -> Result<Option<Order>, OrderApiError>;
    }
}

mock! {
    pub UserStore {}
    impl UserManagement for UserStore {
        async fn upsert_user(&self, user: NewUserRecord) -> Result<UserRecord, UserApiError>;
        async fn fetch_user(&self, discord_id: &str) -> Result<Option<UserRecord>, UserApiError>;
    }
}

mock! {
    pub Catalog {}
    impl VehicleCatalog for Catalog {
        async fn fetch_active_vehicles(&self) -> Result<Vec<Vehicle>, CatalogApiError>;
    }
}
