//! # Discord tools
//!
//! A small client for the handful of Discord endpoints the dealership portal needs:
//! * the OAuth2 code-for-token exchange,
//! * the `/users/@me` identity and `/users/@me/guilds` guild-list calls made with the user's own
//!   access token,
//! * the privileged guild-member lookup made with the bot (service) credential, and
//! * best-effort webhook notifications.
//!
//! Configuration comes from `DISCORD_*` environment variables, read once via
//! [`DiscordConfig::from_env_or_default`].
mod api;
mod config;
mod data_objects;
mod error;
mod helpers;

pub use api::DiscordApi;
pub use config::DiscordConfig;
pub use data_objects::{
    AccessTokenResponse,
    DiscordIdentity,
    GuildMember,
    GuildSummary,
    WebhookEmbed,
    WebhookEmbedField,
    WebhookEmbedFooter,
};
pub use error::DiscordApiError;
pub use helpers::avatar_url;
