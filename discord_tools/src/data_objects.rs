use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::helpers::avatar_url;

/// The interesting subset of Discord's token-endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// A user as reported by `/users/@me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordIdentity {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub discriminator: Option<String>,
}

impl DiscordIdentity {
    /// The CDN URL for the user's avatar, if they have one.
    pub fn avatar_url(&self) -> Option<String> {
        self.avatar.as_deref().map(|hash| avatar_url(&self.id, hash))
    }
}

/// One entry of `/users/@me/guilds`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildSummary {
    pub id: String,
    pub name: String,
}

/// The subset of the guild-member object the role lookup needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMember {
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub nick: Option<String>,
}

//--------------------------------------   Webhook payloads   --------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEmbedField {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEmbedFooter {
    pub text: String,
}

/// A Discord rich embed, the unit of a webhook notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEmbed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<WebhookEmbedField>,
    pub timestamp: String,
    pub footer: WebhookEmbedFooter,
}

const EMBED_FOOTER: &str = "GTA V Dealership";
const NEW_ORDER_COLOR: u32 = 0xFF4400;
const APPROVED_COLOR: u32 = 0x00FF88;
const REJECTED_COLOR: u32 = 0xFF4757;
const NEUTRAL_COLOR: u32 = 0xFFB142;

impl WebhookEmbed {
    /// The embed announcing a freshly submitted order.
    pub fn new_order(customer: &str, vehicle: &str, price: &str, primary: &str, secondary: &str) -> Self {
        Self {
            title: "🚗 New Vehicle Order".to_string(),
            color: NEW_ORDER_COLOR,
            fields: vec![
                WebhookEmbedField { name: "Customer".to_string(), value: customer.to_string(), inline: Some(true) },
                WebhookEmbedField { name: "Vehicle".to_string(), value: vehicle.to_string(), inline: Some(true) },
                WebhookEmbedField { name: "Price".to_string(), value: price.to_string(), inline: Some(true) },
                WebhookEmbedField {
                    name: "Colors".to_string(),
                    value: format!("Primary: {primary}\nSecondary: {secondary}"),
                    inline: None,
                },
            ],
            timestamp: Utc::now().to_rfc3339(),
            footer: WebhookEmbedFooter { text: EMBED_FOOTER.to_string() },
        }
    }

    /// The embed announcing an order-status change. Only the first 8 characters of the order id
    /// are shown.
    pub fn order_update(order_id: &str, status: &str) -> Self {
        let color = match status {
            "approved" => APPROVED_COLOR,
            "rejected" => REJECTED_COLOR,
            _ => NEUTRAL_COLOR,
        };
        let short_id = order_id.chars().take(8).collect::<String>();
        Self {
            title: "📋 Order Status Updated".to_string(),
            color,
            fields: vec![
                WebhookEmbedField { name: "Order ID".to_string(), value: short_id, inline: Some(true) },
                WebhookEmbedField {
                    name: "New Status".to_string(),
                    value: status.to_uppercase(),
                    inline: Some(true),
                },
            ],
            timestamp: Utc::now().to_rfc3339(),
            footer: WebhookEmbedFooter { text: EMBED_FOOTER.to_string() },
        }
    }
}

#[cfg(test)]
mod test {
    use super::{AccessTokenResponse, DiscordIdentity, GuildMember};

    #[test]
    fn token_response_with_error_only() {
        let json = r#"{"error": "invalid_grant", "error_description": "Invalid \"code\" in request."}"#;
        let response: AccessTokenResponse = serde_json::from_str(json).unwrap();
        assert!(response.access_token.is_none());
        assert_eq!(response.error_description.as_deref(), Some("Invalid \"code\" in request."));
    }

    #[test]
    fn identity_tolerates_missing_optional_fields() {
        let json = r#"{"id": "10001", "username": "lester"}"#;
        let identity: DiscordIdentity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.id, "10001");
        assert!(identity.avatar.is_none());
        assert!(identity.avatar_url().is_none());
    }

    #[test]
    fn identity_builds_cdn_avatar_url() {
        let json = r#"{"id": "10001", "username": "lester", "avatar": "a1b2c3"}"#;
        let identity: DiscordIdentity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.avatar_url().as_deref(), Some("https://cdn.discordapp.com/avatars/10001/a1b2c3.png"));
    }

    #[test]
    fn member_defaults_to_no_roles() {
        let member: GuildMember = serde_json::from_str("{}").unwrap();
        assert!(member.roles.is_empty());
    }

    #[test]
    fn order_update_embed_truncates_the_id_and_colors_by_status() {
        let embed = super::WebhookEmbed::order_update("1234567890", "approved");
        assert_eq!(embed.fields[0].value, "12345678");
        assert_eq!(embed.fields[1].value, "APPROVED");
        assert_eq!(embed.color, 0x00FF88);
        let embed = super::WebhookEmbed::order_update("42", "rejected");
        assert_eq!(embed.fields[0].value, "42");
        assert_eq!(embed.color, 0xFF4757);
    }
}
