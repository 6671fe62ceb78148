use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use dealership_engine::{
    db_types::{OrderStatusType, OrderWithOwner, Role},
    OrderApi,
};
use serde_json::{json, Value};

use super::{
    helpers::{call_capture, issuer, sample_order, token_for, TEST_IDENTITY},
    mocks::MockOrderStore,
};
use crate::{
    routes::{AdminOrdersRoute, PurchaseHistoryRoute, SubmitOrderRoute, UpdateOrderStatusRoute},
    server::json_config,
};

async fn call(
    store: MockOrderStore,
    req: TestRequest,
) -> (StatusCode, String) {
    let app = App::new()
        .app_data(json_config())
        .app_data(web::Data::new(OrderApi::new(store)))
        .app_data(web::Data::new(issuer()))
        .service(SubmitOrderRoute::<MockOrderStore>::new())
        .service(PurchaseHistoryRoute::<MockOrderStore>::new())
        .service(AdminOrdersRoute::<MockOrderStore>::new())
        .service(UpdateOrderStatusRoute::<MockOrderStore>::new());
    let app = test::init_service(app).await;
    call_capture(&app, req.to_request()).await
}

fn order_body() -> Value {
    json!({
        "vehicleId": 3,
        "vehicleName": "Pfister Comet",
        "price": 450_000,
        "primaryColor": "Midnight Blue",
        "secondaryColor": "Black",
        "pearlColor": "None",
        "specialRequests": "Tinted windows",
        "paymentMethod": "cash"
    })
}

//----------------------------------------------   Submit  ----------------------------------------------------

#[actix_web::test]
async fn submit_order_answers_with_a_countdown() {
    let mut store = MockOrderStore::new();
    store.expect_insert_order().withf(|order| {
        order.discord_id == TEST_IDENTITY && order.vehicle_id == 3 && order.price.value() == 450_000
    }).returning(|_| Ok(sample_order(7, TEST_IDENTITY, OrderStatusType::Pending)));

    let req = TestRequest::post()
        .uri("/submit-order")
        .insert_header(("Authorization", format!("Bearer {}", token_for(Role::Customer))))
        .set_json(order_body());
    let (status, body) = call(store, req).await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["orderId"], 7);
    assert_eq!(response["countdown"], 600);
}

#[actix_web::test]
async fn submit_order_without_a_token_is_unauthorized() {
    let req = TestRequest::post().uri("/submit-order").set_json(order_body());
    let (status, body) = call(MockOrderStore::new(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("No token provided"), "was: {body}");
}

//----------------------------------------------   History  ----------------------------------------------------

#[actix_web::test]
async fn purchase_history_is_scoped_to_the_caller() {
    let mut store = MockOrderStore::new();
    store
        .expect_search_orders()
        .withf(|query| query.customer_id.as_deref() == Some(TEST_IDENTITY))
        .returning(|_| {
            Ok(vec![
                sample_order(9, TEST_IDENTITY, OrderStatusType::Approved),
                sample_order(4, TEST_IDENTITY, OrderStatusType::Pending),
            ])
        });

    let req = TestRequest::get()
        .uri("/purchase-history")
        .insert_header(("Authorization", format!("Bearer {}", token_for(Role::Customer))));
    let (status, body) = call(store, req).await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response.as_array().unwrap().len(), 2);
    assert_eq!(response[0]["id"], 9);
}

//----------------------------------------------   Admin board  ----------------------------------------------------

#[actix_web::test]
async fn admin_board_requires_an_admin_role() {
    // No expectations on the mock: a store call would panic the test.
    let req = TestRequest::get()
        .uri("/admin-orders")
        .insert_header(("Authorization", format!("Bearer {}", token_for(Role::Customer))));
    let (status, body) = call(MockOrderStore::new(), req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("Insufficient permissions"), "was: {body}");
}

#[actix_web::test]
async fn admin_board_joins_user_summaries() {
    let mut store = MockOrderStore::new();
    store.expect_search_orders_with_owners().returning(|_| {
        Ok(vec![OrderWithOwner {
            order: sample_order(7, TEST_IDENTITY, OrderStatusType::Pending),
            username: Some("lester".to_string()),
            avatar: Some("a1b2c3".to_string()),
        }])
    });

    let req = TestRequest::get()
        .uri("/admin-orders")
        .insert_header(("Authorization", format!("Bearer {}", token_for(Role::Manager))));
    let (status, body) = call(store, req).await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response[0]["id"], 7);
    assert_eq!(response[0]["username"], "lester");
}

//----------------------------------------------   Status updates  ----------------------------------------------------

#[actix_web::test]
async fn status_update_requires_an_admin_role() {
    let req = TestRequest::post()
        .uri("/update-order-status")
        .insert_header(("Authorization", format!("Bearer {}", token_for(Role::Customer))))
        .set_json(json!({"orderId": 7, "status": "approved"}));
    let (status, body) = call(MockOrderStore::new(), req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("Insufficient permissions"), "was: {body}");
}

#[actix_web::test]
async fn unknown_status_values_are_rejected_before_any_write() {
    let req = TestRequest::post()
        .uri("/update-order-status")
        .insert_header(("Authorization", format!("Bearer {}", token_for(Role::Owner))))
        .set_json(json!({"orderId": 7, "status": "shipped"}));
    let (status, body) = call(MockOrderStore::new(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid status"), "was: {body}");
}

#[actix_web::test]
async fn approving_a_pending_order_records_the_reviewer() {
    let mut store = MockOrderStore::new();
    store.expect_fetch_order_by_id().returning(|id| Ok(Some(sample_order(id, "20002", OrderStatusType::Pending))));
    store
        .expect_update_order_status()
        .withf(|id, status, approved_by| {
            *id == 7 && *status == OrderStatusType::Approved && approved_by == TEST_IDENTITY
        })
        .returning(|id, status, approved_by| {
            let mut order = sample_order(id, "20002", status);
            order.approved_by = Some(approved_by.to_string());
            Ok(Some(order))
        });

    let req = TestRequest::post()
        .uri("/update-order-status")
        .insert_header(("Authorization", format!("Bearer {}", token_for(Role::Owner))))
        .set_json(json!({"orderId": 7, "status": "approved"}));
    let (status, body) = call(store, req).await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["order"]["status"], "approved");
    assert_eq!(response["order"]["approved_by"], TEST_IDENTITY);
}

#[actix_web::test]
async fn illegal_transitions_are_rejected() {
    let mut store = MockOrderStore::new();
    // The order is already delivered; no update expectation is set, so a write would panic.
    store
        .expect_fetch_order_by_id()
        .returning(|id| Ok(Some(sample_order(id, "20002", OrderStatusType::Delivered))));

    let req = TestRequest::post()
        .uri("/update-order-status")
        .insert_header(("Authorization", format!("Bearer {}", token_for(Role::Owner))))
        .set_json(json!({"orderId": 7, "status": "pending"}));
    let (status, body) = call(store, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Illegal status change"), "was: {body}");
}

#[actix_web::test]
async fn updating_an_unknown_order_is_not_found() {
    let mut store = MockOrderStore::new();
    store.expect_fetch_order_by_id().returning(|_| Ok(None));

    let req = TestRequest::post()
        .uri("/update-order-status")
        .insert_header(("Authorization", format!("Bearer {}", token_for(Role::Manager))))
        .set_json(json!({"orderId": 999, "status": "approved"}));
    let (status, body) = call(store, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("not found"), "was: {body}");
}
