//! Integration tests for the order book and user registry against an in-memory SQLite store.
use dealership_engine::{
    db_types::{NewOrder, NewUserRecord, OrderStatusType},
    OrderApi,
    OrderApiError,
    SqliteDatabase,
    UserApi,
};
use dps_common::Dollars;

// A single connection keeps every query on the same in-memory database.
async fn new_db() -> SqliteDatabase {
    SqliteDatabase::new_with_url("sqlite::memory:", 1).await.expect("Could not create in-memory database")
}

fn new_order(discord_id: &str) -> NewOrder {
    NewOrder {
        discord_id: discord_id.to_string(),
        customer_name: "lester".to_string(),
        vehicle_id: 3,
        vehicle_name: "Pfister Comet".to_string(),
        price: Dollars::from(450_000),
        primary_color: "Midnight Blue".to_string(),
        secondary_color: "Black".to_string(),
        pearl_color: "None".to_string(),
        special_requests: Some("Tinted windows".to_string()),
        payment_method: "cash".to_string(),
    }
}

#[tokio::test]
async fn submitted_orders_start_pending() {
    let db = new_db().await;
    let api = OrderApi::new(db);
    let order = api.submit_order(new_order("10001")).await.unwrap();
    assert_eq!(order.status, OrderStatusType::Pending);
    assert_eq!(order.vehicle_id, 3);
    assert_eq!(order.price, Dollars::from(450_000));
    assert!(order.approved_by.is_none());
}

#[tokio::test]
async fn customer_history_is_scoped_and_newest_first() {
    let db = new_db().await;
    let api = OrderApi::new(db);
    let first = api.submit_order(new_order("10001")).await.unwrap();
    let second = api.submit_order(new_order("10001")).await.unwrap();
    api.submit_order(new_order("20002")).await.unwrap();

    let history = api.orders_for_customer("10001").await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|o| o.discord_id == "10001"));
    // Same created_at timestamp is possible within a test; the id tie-break keeps newest first.
    assert_eq!(history[0].id, second.id);
    assert_eq!(history[1].id, first.id);
}

#[tokio::test]
async fn approve_then_deliver() {
    let db = new_db().await;
    let api = OrderApi::new(db);
    let order = api.submit_order(new_order("10001")).await.unwrap();

    let approved = api.update_status(order.id, OrderStatusType::Approved, "90009").await.unwrap();
    assert_eq!(approved.status, OrderStatusType::Approved);
    assert_eq!(approved.approved_by.as_deref(), Some("90009"));

    let delivered = api.update_status(order.id, OrderStatusType::Delivered, "90009").await.unwrap();
    assert_eq!(delivered.status, OrderStatusType::Delivered);
}

#[tokio::test]
async fn illegal_transition_is_rejected_without_a_write() {
    let db = new_db().await;
    let api = OrderApi::new(db);
    let order = api.submit_order(new_order("10001")).await.unwrap();

    let err = api.update_status(order.id, OrderStatusType::Delivered, "90009").await.unwrap_err();
    assert!(matches!(err, OrderApiError::InvalidStatusTransition { .. }));

    let unchanged = api.orders_for_customer("10001").await.unwrap();
    assert_eq!(unchanged[0].status, OrderStatusType::Pending);
    assert!(unchanged[0].approved_by.is_none());
}

#[tokio::test]
async fn updating_a_missing_order_is_not_found() {
    let db = new_db().await;
    let api = OrderApi::new(db);
    let err = api.update_status(999, OrderStatusType::Approved, "90009").await.unwrap_err();
    assert!(matches!(err, OrderApiError::OrderNotFound(999)));
}

#[tokio::test]
async fn admin_board_joins_user_summaries() {
    let db = new_db().await;
    let users = UserApi::new(db.clone());
    let api = OrderApi::new(db);
    users
        .upsert_user(NewUserRecord {
            discord_id: "10001".to_string(),
            username: "lester".to_string(),
            avatar: Some("a1b2c3".to_string()),
            global_name: Some("Lester C".to_string()),
            discriminator: Some("0".to_string()),
        })
        .await
        .unwrap();
    api.submit_order(new_order("10001")).await.unwrap();
    api.submit_order(new_order("77777")).await.unwrap();

    let board = api.all_orders_with_owners().await.unwrap();
    assert_eq!(board.len(), 2);
    // Newest first: the order from the unknown identity has no joined summary.
    assert!(board[0].username.is_none());
    assert_eq!(board[1].username.as_deref(), Some("lester"));
    assert_eq!(board[1].avatar.as_deref(), Some("a1b2c3"));
}

#[tokio::test]
async fn user_upsert_refreshes_profile_fields() {
    let db = new_db().await;
    let users = UserApi::new(db);
    let record = NewUserRecord {
        discord_id: "10001".to_string(),
        username: "lester".to_string(),
        avatar: None,
        global_name: None,
        discriminator: Some("0".to_string()),
    };
    users.upsert_user(record.clone()).await.unwrap();
    let refreshed = users
        .upsert_user(NewUserRecord {
            username: "lester_c".to_string(),
            avatar: Some("ffff".to_string()),
            ..record
        })
        .await
        .unwrap();
    assert_eq!(refreshed.username, "lester_c");
    assert_eq!(refreshed.avatar.as_deref(), Some("ffff"));

    let fetched = users.fetch_user("10001").await.unwrap().unwrap();
    assert_eq!(fetched.username, "lester_c");
}
