use std::{collections::HashSet, sync::Arc, time::Duration};

use log::*;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    config::DiscordConfig,
    data_objects::{AccessTokenResponse, DiscordIdentity, GuildMember, GuildSummary, WebhookEmbed},
    DiscordApiError,
};

/// Every outbound call is bounded by the client-wide timeout; there is no retry policy.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct DiscordApi {
    config: DiscordConfig,
    client: Arc<Client>,
}

impl DiscordApi {
    pub fn new(config: DiscordConfig) -> Result<Self, DiscordApiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DiscordApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &DiscordConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base)
    }

    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, DiscordApiError> {
        let response = req.send().await.map_err(|e| DiscordApiError::TransportError(e.to_string()))?;
        if response.status().is_success() {
            trace!("🚗️ Discord query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| DiscordApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| DiscordApiError::TransportError(e.to_string()))?;
            Err(DiscordApiError::QueryError { status, message })
        }
    }

    /// Exchange the OAuth2 authorization code for a user access token.
    ///
    /// Discord answers 200 with an `error` body for some rejected codes, so a missing
    /// `access_token` is treated as a failed exchange either way.
    pub async fn exchange_code(&self, code: &str) -> Result<String, DiscordApiError> {
        debug!("🚗️ Exchanging authorization code for an access token");
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.reveal().as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("scope", "identify guilds"),
        ];
        let req = self.client.request(Method::POST, self.url("/oauth2/token")).form(&form);
        let response: AccessTokenResponse = self.execute(req).await?;
        match response.access_token {
            Some(token) => {
                debug!("🚗️ Authorization code accepted");
                Ok(token)
            },
            None => {
                let reason = response
                    .error_description
                    .or(response.error)
                    .unwrap_or_else(|| "Check Discord app settings".to_string());
                Err(DiscordApiError::CodeExchangeFailed(reason))
            },
        }
    }

    /// Fetch the identity of the user that owns `access_token`.
    pub async fn fetch_identity(&self, access_token: &str) -> Result<DiscordIdentity, DiscordApiError> {
        debug!("🚗️ Fetching user identity");
        let req = self.client.request(Method::GET, self.url("/users/@me")).bearer_auth(access_token);
        let identity: DiscordIdentity = self.execute(req).await?;
        debug!("🚗️ Fetched identity for {}", identity.username);
        Ok(identity)
    }

    /// The guilds the user belongs to, as seen by their own access token.
    pub async fn fetch_guilds(&self, access_token: &str) -> Result<Vec<GuildSummary>, DiscordApiError> {
        debug!("🚗️ Fetching user guild list");
        let req = self.client.request(Method::GET, self.url("/users/@me/guilds")).bearer_auth(access_token);
        self.execute(req).await
    }

    /// The privileged guild-member lookup, made with the bot credential rather than the user's
    /// token. Returns the set of guild-role ids the user holds.
    pub async fn fetch_member_roles(
        &self,
        guild_id: &str,
        user_id: &str,
    ) -> Result<HashSet<String>, DiscordApiError> {
        debug!("🚗️ Fetching member roles for user {user_id}");
        let path = format!("/guilds/{guild_id}/members/{user_id}");
        let req = self
            .client
            .request(Method::GET, self.url(&path))
            .header("Authorization", format!("Bot {}", self.config.bot_token.reveal()));
        let member: GuildMember = self.execute(req).await?;
        Ok(member.roles.into_iter().collect())
    }

    /// Post an embed to the configured webhook. Callers treat failures as best-effort; this
    /// method only reports them.
    pub async fn send_webhook(&self, embed: WebhookEmbed) -> Result<(), DiscordApiError> {
        let url = match &self.config.webhook_url {
            Some(url) => url.reveal().clone(),
            None => return Err(DiscordApiError::WebhookNotConfigured),
        };
        let body = json!({ "embeds": [embed] });
        let response = self
            .client
            .request(Method::POST, url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DiscordApiError::TransportError(e.to_string()))?;
        if response.status().is_success() {
            debug!("🚗️ Webhook notification delivered");
            Ok(())
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(DiscordApiError::QueryError { status, message })
        }
    }
}
