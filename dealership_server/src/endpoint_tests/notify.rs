use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use discord_tools::{DiscordApi, DiscordConfig};
use serde_json::json;

use super::helpers::into_status_and_body;
use crate::{routes::DiscordNotifyRoute, server::json_config};

async fn post_notify(body: serde_json::Value) -> (StatusCode, String) {
    // No webhook URL configured: delivery is skipped and nothing leaves the process.
    let discord = DiscordApi::new(DiscordConfig::default()).unwrap();
    let app = App::new()
        .app_data(json_config())
        .app_data(web::Data::new(discord))
        .service(DiscordNotifyRoute::new());
    let app = test::init_service(app).await;
    let res =
        test::call_service(&app, TestRequest::post().uri("/discord-notify").set_json(body).to_request()).await;
    into_status_and_body(res)
}

#[actix_web::test]
async fn unconfigured_webhook_is_still_a_success() {
    let body = json!({
        "type": "new_order",
        "user": "lester",
        "vehicle": "Pfister Comet",
        "price": 450_000,
        "colors": {"primary": "Midnight Blue", "secondary": "Black"}
    });
    let (status, response) = post_notify(body).await;
    assert_eq!(status, StatusCode::OK);
    assert!(response.contains("Webhook not configured"), "was: {response}");
}

#[actix_web::test]
async fn order_update_notifications_are_accepted() {
    let body = json!({"type": "order_update", "orderId": "42", "status": "approved"});
    let (status, _) = post_notify(body).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn unknown_notification_types_are_a_bad_request() {
    let body = json!({"type": "price_drop", "vehicle": "Karin Sultan"});
    let (status, response) = post_notify(body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("error"), "was: {response}");
}
