use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscordApiError {
    #[error("Could not initialize the Discord client. {0}")]
    Initialization(String),
    #[error("Discord request failed: {0}")]
    TransportError(String),
    #[error("Discord returned an unexpected response body: {0}")]
    JsonError(String),
    #[error("Discord query failed with status {status}: {message}")]
    QueryError { status: u16, message: String },
    #[error("Discord rejected the authorization code: {0}")]
    CodeExchangeFailed(String),
    #[error("No webhook URL is configured")]
    WebhookNotConfigured,
}
