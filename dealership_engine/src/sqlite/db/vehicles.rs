use sqlx::SqliteConnection;

use crate::db_types::Vehicle;

/// All active vehicles, cheapest first.
pub async fn fetch_active_vehicles(conn: &mut SqliteConnection) -> Result<Vec<Vehicle>, sqlx::Error> {
    let vehicles = sqlx::query_as("SELECT * FROM vehicles WHERE is_active = 1 ORDER BY price ASC")
        .fetch_all(conn)
        .await?;
    Ok(vehicles)
}
