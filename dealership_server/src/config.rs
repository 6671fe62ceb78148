use std::{env, io::Write};

use chrono::Duration;
use dealership_engine::roles::RolePriorityTable;
use discord_tools::DiscordConfig;
use dps_common::Secret;
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use serde_json::json;
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_DPS_HOST: &str = "127.0.0.1";
const DEFAULT_DPS_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/dealership.db";
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::hours(24);
/// Credential lifetimes outside this window are clamped at startup.
const MIN_TOKEN_LIFETIME_HOURS: i64 = 24;
const MAX_TOKEN_LIFETIME_HOURS: i64 = 168;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// Discord OAuth2 and webhook settings, shared with the `discord_tools` client.
    pub discord: DiscordConfig,
    /// The ordered role mapping used to resolve guild-role memberships to an application role.
    pub roles: RolePriorityTable,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DPS_HOST.to_string(),
            port: DEFAULT_DPS_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            discord: DiscordConfig::default(),
            roles: RolePriorityTable::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("DPS_HOST").ok().unwrap_or_else(|| DEFAULT_DPS_HOST.into());
        let port = env::var("DPS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for DPS_PORT. {e} Using the default, {DEFAULT_DPS_PORT}, instead."
                    );
                    DEFAULT_DPS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_DPS_PORT);
        let database_url = env::var("DPS_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ DPS_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to \
                 the default configuration."
            );
            AuthConfig::default()
        });
        let discord = DiscordConfig::from_env_or_default();
        let roles = role_table_from_env();
        Self { host, port, database_url, auth, discord, roles }
    }
}

fn role_table_from_env() -> RolePriorityTable {
    let owner = env::var("ROLE_OWNER_ID").ok().unwrap_or_default();
    let manager = env::var("ROLE_MANAGER_ID").ok().unwrap_or_default();
    let customer = env::var("ROLE_CUSTOMER_ID").ok().unwrap_or_default();
    RolePriorityTable::new(&owner, &manager, &customer)
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The secret used to sign and verify bearer credentials (HMAC-SHA256).
    pub jwt_secret: Secret<String>,
    /// How long issued credentials stay valid. Clamped to [24 h, 7 d].
    pub token_lifetime: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The credential signing secret has not been set. I'm using a random value for this session. DO \
             NOT operate on production like this since every issued login will be invalidated on restart. 🚨️🚨️🚨️"
        );
        let secret: String = thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect();
        match &mut tmpfile {
            Some((f, p)) => {
                let key_data = json!({ "jwt_secret": secret }).to_string();
                match writeln!(f, "{key_data}") {
                    Ok(()) => warn!(
                        "🚨️🚨️🚨️ The credential signing secret for this session was written to {}. If this is a \
                         production instance, you are doing it wrong! Set the DPS_JWT_SECRET environment variable \
                         instead. 🚨️🚨️🚨️",
                        p.to_str().unwrap_or("???")
                    ),
                    Err(e) => warn!("🪛️ Could not write the signing secret to the temporary file. {e}"),
                }
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the signing secret.");
            },
        }
        Self { jwt_secret: Secret::new(secret), token_lifetime: DEFAULT_TOKEN_LIFETIME }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("DPS_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [DPS_JWT_SECRET]")))?;
        if secret.is_empty() {
            return Err(ServerError::ConfigurationError("DPS_JWT_SECRET is empty".to_string()));
        }
        let token_lifetime = configure_token_lifetime();
        Ok(Self { jwt_secret: Secret::new(secret), token_lifetime })
    }
}

fn configure_token_lifetime() -> Duration {
    let hours = env::var("DPS_TOKEN_EXPIRY_HOURS")
        .map_err(|_| {
            info!(
                "🪛️ DPS_TOKEN_EXPIRY_HOURS is not set. Using the default value of {} hrs.",
                DEFAULT_TOKEN_LIFETIME.num_hours()
            )
        })
        .and_then(|s| {
            s.parse::<i64>().map_err(|e| warn!("🪛️ Invalid configuration value for DPS_TOKEN_EXPIRY_HOURS. {e}"))
        })
        .ok()
        .unwrap_or_else(|| DEFAULT_TOKEN_LIFETIME.num_hours());
    if !(MIN_TOKEN_LIFETIME_HOURS..=MAX_TOKEN_LIFETIME_HOURS).contains(&hours) {
        let clamped = hours.clamp(MIN_TOKEN_LIFETIME_HOURS, MAX_TOKEN_LIFETIME_HOURS);
        warn!("🪛️ DPS_TOKEN_EXPIRY_HOURS must be between {MIN_TOKEN_LIFETIME_HOURS} and {MAX_TOKEN_LIFETIME_HOURS}. Using {clamped} hrs.");
        return Duration::hours(clamped);
    }
    Duration::hours(hours)
}
