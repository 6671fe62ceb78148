use std::fmt::Display;

use dealership_engine::db_types::{Order, Role};
use discord_tools::DiscordIdentity;
use serde::{Deserialize, Serialize};

/// Seconds the storefront counts down before a submitted order is picked up for review.
pub const ORDER_COUNTDOWN_SECS: u32 = 600;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

//----------------------------------------------   Login   -----------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub code: String,
}

/// The public summary of the logged-in user, echoed back to the storefront.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
    pub discriminator: Option<String>,
    pub global_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<&DiscordIdentity> for UserSummary {
    fn from(identity: &DiscordIdentity) -> Self {
        Self {
            id: identity.id.clone(),
            username: identity.username.clone(),
            avatar: identity.avatar.clone(),
            discriminator: identity.discriminator.clone(),
            global_name: identity.global_name.clone(),
            avatar_url: identity.avatar_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
    pub role: Role,
    /// The name of the required guild, for the storefront header.
    pub guild: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub user_id: String,
    pub username: String,
    pub role: Role,
    pub valid: bool,
}

//----------------------------------------------   Orders   ----------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderRequest {
    pub vehicle_id: i64,
    pub vehicle_name: String,
    pub price: i64,
    #[serde(default)]
    pub primary_color: String,
    #[serde(default)]
    pub secondary_color: String,
    #[serde(default)]
    pub pearl_color: String,
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub payment_method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderResponse {
    pub message: String,
    pub order_id: i64,
    pub countdown: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub order_id: i64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatusResponse {
    pub message: String,
    pub order: Order,
}

//----------------------------------------------   Notify   ----------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorPair {
    pub primary: String,
    pub secondary: String,
}

/// A notification request from the storefront. Unknown `type` values fail deserialization and
/// surface as a 400.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationRequest {
    #[serde(rename_all = "camelCase")]
    NewOrder { user: String, vehicle: String, price: i64, colors: ColorPair },
    #[serde(rename_all = "camelCase")]
    OrderUpdate { order_id: String, status: String },
}

#[cfg(test)]
mod test {
    use super::{NewOrderRequest, NotificationRequest};

    #[test]
    fn order_request_uses_camel_case_keys() {
        let json = r#"{
            "vehicleId": 3,
            "vehicleName": "Pfister Comet",
            "price": 450000,
            "primaryColor": "Midnight Blue",
            "secondaryColor": "Black",
            "pearlColor": "None",
            "specialRequests": "Tinted windows",
            "paymentMethod": "cash"
        }"#;
        let request: NewOrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.vehicle_id, 3);
        assert_eq!(request.price, 450_000);
        assert_eq!(request.payment_method, "cash");
    }

    #[test]
    fn notification_type_tag_selects_the_variant() {
        let json = r#"{"type": "order_update", "orderId": "42", "status": "approved"}"#;
        let request: NotificationRequest = serde_json::from_str(json).unwrap();
        assert!(matches!(request, NotificationRequest::OrderUpdate { .. }));

        let json = r#"{"type": "price_drop", "vehicle": "Karin Sultan"}"#;
        assert!(serde_json::from_str::<NotificationRequest>(json).is_err());
    }
}
