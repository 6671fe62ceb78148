use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use dealership_engine::{fallback_vehicles, traits::CatalogApiError, CatalogApi};
use serde_json::Value;

use super::{helpers::into_status_and_body, mocks::MockCatalog};
use crate::routes::VehiclesRoute;

async fn get_vehicles(catalog: MockCatalog) -> (StatusCode, String) {
    let app = App::new()
        .app_data(web::Data::new(CatalogApi::new(catalog)))
        .service(VehiclesRoute::<MockCatalog>::new());
    let app = test::init_service(app).await;
    let res = test::call_service(&app, TestRequest::get().uri("/vehicles").to_request()).await;
    into_status_and_body(res)
}

#[actix_web::test]
async fn showroom_lists_the_catalogue() {
    let mut catalog = MockCatalog::new();
    catalog.expect_fetch_active_vehicles().returning(|| {
        let mut vehicles = fallback_vehicles();
        vehicles.truncate(1);
        Ok(vehicles)
    });
    let (status, body) = get_vehicles(catalog).await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response.as_array().unwrap().len(), 1);
    assert_eq!(response[0]["name"], "Karin Sultan");
}

#[actix_web::test]
async fn datastore_failure_serves_the_fallback_list_instead_of_an_error() {
    let mut catalog = MockCatalog::new();
    catalog
        .expect_fetch_active_vehicles()
        .returning(|| Err(CatalogApiError::DatabaseError(sqlx::Error::PoolClosed)));
    let (status, body) = get_vehicles(catalog).await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response.as_array().unwrap().len(), 3);
    assert_eq!(response[0]["name"], "Karin Sultan");
    assert_eq!(response[2]["name"], "Pfister Comet");
}
