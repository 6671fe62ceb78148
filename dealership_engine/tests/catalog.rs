//! Integration tests for the vehicle catalogue against an in-memory SQLite store.
use dealership_engine::{CatalogApi, SqliteDatabase};

async fn new_db() -> SqliteDatabase {
    SqliteDatabase::new_with_url("sqlite::memory:", 1).await.expect("Could not create in-memory database")
}

async fn seed_vehicle(db: &SqliteDatabase, name: &str, price: i64, active: bool) {
    sqlx::query(
        "INSERT INTO vehicles (name, price, class, category, seats, top_speed, acceleration, description, stock, \
         is_active) VALUES ($1, $2, 'Sports', 'sports', 2, '240 km/h', '4.2s', '', 1, $3)",
    )
    .bind(name)
    .bind(price)
    .bind(active)
    .execute(db.pool())
    .await
    .unwrap();
}

#[tokio::test]
async fn empty_catalogue_is_an_empty_list() {
    let db = new_db().await;
    let api = CatalogApi::new(db);
    assert!(api.active_vehicles().await.unwrap().is_empty());
}

#[tokio::test]
async fn only_active_vehicles_cheapest_first() {
    let db = new_db().await;
    seed_vehicle(&db, "Pfister Comet", 450_000, true).await;
    seed_vehicle(&db, "Karin Sultan", 250_000, true).await;
    seed_vehicle(&db, "Retired Special", 100_000, false).await;

    let api = CatalogApi::new(db);
    let vehicles = api.active_vehicles().await.unwrap();
    assert_eq!(vehicles.len(), 2);
    assert_eq!(vehicles[0].name, "Karin Sultan");
    assert_eq!(vehicles[1].name, "Pfister Comet");
}
