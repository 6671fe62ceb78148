use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use dealership_engine::{CatalogApiError, OrderApiError, UserApiError};
use discord_tools::DiscordApiError;
use log::error;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server")]
    BackendError(String),
    #[error("Payload deserialization error")]
    CouldNotDeserializePayload,
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Discord auth failed")]
    CodeExchangeFailed(String),
    #[error("Could not fetch the user profile from Discord")]
    IdentityFetchFailed(String),
    #[error("Join our Discord server first")]
    NotGuildMember { invite_link: String },
    #[error("Invalid status")]
    InvalidStatus(String),
    #[error("Illegal status change. {0}")]
    InvalidTransition(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Insufficient permissions")]
    InsufficientPermissions,
    #[error("An upstream service failed")]
    UpstreamFailure(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CouldNotDeserializePayload => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            Self::InvalidTransition(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::Malformed(_) => StatusCode::UNAUTHORIZED,
                AuthError::InvalidSignature => StatusCode::UNAUTHORIZED,
                AuthError::Expired => StatusCode::UNAUTHORIZED,
                AuthError::InsufficientRole => StatusCode::FORBIDDEN,
            },
            Self::CodeExchangeFailed(_) => StatusCode::UNAUTHORIZED,
            Self::IdentityFetchFailed(_) => StatusCode::UNAUTHORIZED,
            Self::NotGuildMember { .. } => StatusCode::FORBIDDEN,
            Self::InsufficientPermissions => StatusCode::FORBIDDEN,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Callers get the generic Display message only; the detail stays in the operator logs.
        if self.status_code().is_server_error() {
            error!("💻️ Request failed: {self:?}");
        }
        let mut body = json!({ "error": self.to_string() });
        if let Self::NotGuildMember { invite_link } = self {
            body["invite_link"] = json!(invite_link);
        }
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}

/// Everything that can go wrong with a bearer credential.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No token provided")]
    MissingToken,
    #[error("Invalid token")]
    Malformed(String),
    #[error("Invalid token signature")]
    InvalidSignature,
    #[error("Token has expired")]
    Expired,
    #[error("Insufficient permissions")]
    InsufficientRole,
}

impl From<OrderApiError> for ServerError {
    fn from(e: OrderApiError) -> Self {
        match e {
            OrderApiError::OrderNotFound(id) => Self::NoRecordFound(format!("Order {id}")),
            OrderApiError::InvalidStatusTransition { .. } => Self::InvalidTransition(e.to_string()),
            OrderApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            OrderApiError::QueryError(e) => Self::InvalidRequestBody(e),
        }
    }
}

impl From<UserApiError> for ServerError {
    fn from(e: UserApiError) -> Self {
        match e {
            UserApiError::UserNotFound(id) => Self::NoRecordFound(format!("User {id}")),
            UserApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<DiscordApiError> for ServerError {
    fn from(e: DiscordApiError) -> Self {
        Self::UpstreamFailure(e.to_string())
    }
}
