use std::fmt::Debug;

use dps_common::Dollars;
use log::*;

use crate::{api::errors::CatalogApiError, db_types::Vehicle, traits::VehicleCatalog};

/// Read-only access to the vehicle catalogue.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: VehicleCatalog
{
    /// All active vehicles, cheapest first.
    pub async fn active_vehicles(&self) -> Result<Vec<Vehicle>, CatalogApiError> {
        let vehicles = self.db.fetch_active_vehicles().await?;
        trace!("🚙️ Fetched {} active vehicles from the catalogue", vehicles.len());
        Ok(vehicles)
    }
}

/// The static showroom list served when the catalogue datastore is unreachable.
///
/// The vehicles endpoint must never answer 5xx; callers that fail to reach the datastore fall
/// back to this list instead.
pub fn fallback_vehicles() -> Vec<Vehicle> {
    vec![
        Vehicle {
            id: 1,
            name: "Karin Sultan".to_string(),
            price: Dollars::from(250_000),
            class: "Sports".to_string(),
            category: "sedan".to_string(),
            seats: 4,
            top_speed: "210 km/h".to_string(),
            acceleration: "5.2s".to_string(),
            description: "Classic Japanese sports sedan".to_string(),
            stock: 5,
            is_active: true,
        },
        Vehicle {
            id: 2,
            name: "Bravado Buffalo".to_string(),
            price: Dollars::from(350_000),
            class: "Muscle".to_string(),
            category: "muscle".to_string(),
            seats: 4,
            top_speed: "230 km/h".to_string(),
            acceleration: "4.8s".to_string(),
            description: "Modern American muscle car".to_string(),
            stock: 3,
            is_active: true,
        },
        Vehicle {
            id: 3,
            name: "Pfister Comet".to_string(),
            price: Dollars::from(450_000),
            class: "Sports".to_string(),
            category: "sports".to_string(),
            seats: 2,
            top_speed: "240 km/h".to_string(),
            acceleration: "4.2s".to_string(),
            description: "German sports car".to_string(),
            stock: 2,
            is_active: true,
        },
    ]
}

#[cfg(test)]
mod test {
    use super::fallback_vehicles;

    #[test]
    fn fallback_list_is_active_and_sorted_by_price() {
        let vehicles = fallback_vehicles();
        assert_eq!(vehicles.len(), 3);
        assert!(vehicles.iter().all(|v| v.is_active));
        assert!(vehicles.windows(2).all(|w| w[0].price <= w[1].price));
    }
}
