use std::env;

use dps_common::Secret;
use log::*;

pub const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api";

/// Everything the Discord client needs, sourced from the environment once at startup.
#[derive(Clone, Debug, Default)]
pub struct DiscordConfig {
    /// Base URL for the Discord REST API. Overridable for tests; defaults to the real API.
    pub api_base: String,
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub redirect_uri: String,
    /// The guild a user must belong to before login may proceed.
    pub guild_id: String,
    /// The bot token used for the privileged guild-member lookup.
    pub bot_token: Secret<String>,
    /// Shown to users who are not yet in the required guild.
    pub invite_link: String,
    /// Outbound webhook for order notifications. Optional; notifications are skipped when unset.
    pub webhook_url: Option<Secret<String>>,
}

impl DiscordConfig {
    pub fn from_env_or_default() -> Self {
        let api_base =
            env::var("DISCORD_API_BASE").ok().unwrap_or_else(|| DEFAULT_DISCORD_API_BASE.to_string());
        let client_id = env::var("DISCORD_CLIENT_ID").ok().unwrap_or_else(|| {
            error!("🪛️ DISCORD_CLIENT_ID is not set. Please set it to your Discord application's client id.");
            String::default()
        });
        let client_secret = env::var("DISCORD_CLIENT_SECRET").ok().unwrap_or_else(|| {
            error!("🪛️ DISCORD_CLIENT_SECRET is not set. Please set it to your Discord application's client secret.");
            String::default()
        });
        let redirect_uri = env::var("DISCORD_REDIRECT_URI").ok().unwrap_or_else(|| {
            error!("🪛️ DISCORD_REDIRECT_URI is not set. It must match the redirect URI of your Discord application.");
            String::default()
        });
        let guild_id = env::var("DISCORD_GUILD_ID").ok().unwrap_or_else(|| {
            error!("🪛️ DISCORD_GUILD_ID is not set. Logins cannot check guild membership without it.");
            String::default()
        });
        let bot_token = env::var("DISCORD_BOT_TOKEN").ok().unwrap_or_else(|| {
            warn!(
                "🪛️ DISCORD_BOT_TOKEN is not set. The privileged role lookup will fail and every login will fall \
                 back to the default role."
            );
            String::default()
        });
        let invite_link =
            env::var("DISCORD_INVITE_LINK").ok().unwrap_or_else(|| "https://discord.gg/your-server".to_string());
        let webhook_url = match env::var("DISCORD_WEBHOOK_URL") {
            Ok(url) if !url.is_empty() => Some(Secret::new(url)),
            _ => {
                info!("🪛️ DISCORD_WEBHOOK_URL is not set. Order notifications will be skipped.");
                None
            },
        };
        Self {
            api_base,
            client_id,
            client_secret: Secret::new(client_secret),
            redirect_uri,
            guild_id,
            bot_token: Secret::new(bot_token),
            invite_link,
            webhook_url,
        }
    }
}
