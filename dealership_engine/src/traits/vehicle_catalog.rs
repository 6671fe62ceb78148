use crate::{api::errors::CatalogApiError, db_types::Vehicle};

/// Read access to the vehicle catalogue.
#[allow(async_fn_in_trait)]
pub trait VehicleCatalog {
    /// All active vehicles, cheapest first.
    async fn fetch_active_vehicles(&self) -> Result<Vec<Vehicle>, CatalogApiError>;
}
