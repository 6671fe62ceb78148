use actix_web::{body::MessageBody, dev::Service, dev::ServiceResponse, http::StatusCode, test, Error};
use chrono::{Duration, Utc};
use dealership_engine::db_types::{Order, OrderStatusType, Role};
use dps_common::{Dollars, Secret};

use crate::{auth::TokenIssuer, config::AuthConfig};

pub const TEST_IDENTITY: &str = "10001";
pub const TEST_USERNAME: &str = "lester";

pub fn test_auth_config() -> AuthConfig {
    AuthConfig { jwt_secret: Secret::new("endpoint-test-secret".to_string()), token_lifetime: Duration::hours(24) }
}

pub fn issuer() -> TokenIssuer {
    TokenIssuer::new(&test_auth_config())
}

pub fn token_for(role: Role) -> String {
    issuer().issue(TEST_IDENTITY, TEST_USERNAME, role).unwrap()
}

pub fn sample_order(id: i64, discord_id: &str, status: OrderStatusType) -> Order {
    let now = Utc::now();
    Order {
        id,
        discord_id: discord_id.to_string(),
        customer_name: TEST_USERNAME.to_string(),
        vehicle_id: 3,
        vehicle_name: "Pfister Comet".to_string(),
        price: Dollars::from(450_000),
        primary_color: "Midnight Blue".to_string(),
        secondary_color: "Black".to_string(),
        pearl_color: "None".to_string(),
        special_requests: None,
        payment_method: "cash".to_string(),
        status,
        created_at: now,
        updated_at: now,
        approved_by: None,
    }
}

pub fn into_status_and_body<B: MessageBody>(res: ServiceResponse<B>) -> (StatusCode, String) {
    let (_req, res) = res.into_parts();
    let status = res.status();
    let bytes = res.into_body().try_into_bytes().map_err(|_| ()).expect("Could not read response body");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

/// Drives a request through the app and captures the status and body. Unlike [`test::call_service`],
/// which panics when the service resolves to an `Err`, this renders that error into its HTTP
/// response exactly as the production `HttpServer` dispatcher does (via the `ResponseError` impl),
/// so middleware-rejected requests (401/403) are observable in tests.
pub async fn call_capture<S, R, B>(app: &S, req: R) -> (StatusCode, String)
where
    S: Service<R, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(res) => into_status_and_body(res),
        Err(err) => {
            let res = err.error_response();
            let status = res.status();
            let bytes = res.into_body().try_into_bytes().map_err(|_| ()).expect("Could not read error body");
            (status, String::from_utf8_lossy(&bytes).into_owned())
        },
    }
}
