//! The credential codec.
//!
//! Credentials are signed JWTs (HMAC-SHA256) carrying the identity id, username and resolved
//! role. The signed form is the only one supported: admin gating depends on the role claim being
//! unforgeable, so nothing here ever emits or accepts an unsigned encoding.
//!
//! Verification is strict: an expired credential is rejected the moment `now >= exp`, with no
//! grace window.

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use dealership_engine::db_types::Role;
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

/// The claims carried by every issued credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The provider-side identity id.
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies bearer credentials with the server-held secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.reveal().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime: config.token_lifetime,
        }
    }

    /// Issue a new credential for the given identity and role.
    ///
    /// This method DOES NOT verify that the identity or role are legitimate. That is the login
    /// flow's job, prior to calling `issue`.
    pub fn issue(&self, identity_id: &str, username: &str, role: Role) -> Result<String, ServerError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: identity_id.to_string(),
            username: username.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServerError::Unspecified(format!("Could not serialize access token. {e}")))?;
        Ok(token)
    }

    /// Verify a credential's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<JwtClaims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::Malformed(e.to_string()),
        })?;
        Ok(data.claims)
    }
}

/// Handlers take `JwtClaims` as an extractor argument. The ACL middleware validates the bearer
/// token and stores the claims in the request extensions; reaching a handler without them means
/// the route was registered without the middleware.
impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<JwtClaims>().cloned().ok_or_else(|| {
            debug!("💻️ No claims in request extensions. Is the route missing its ACL middleware?");
            ServerError::AuthenticationError(AuthError::MissingToken)
        });
        ready(claims)
    }
}

#[cfg(test)]
mod test {
    use chrono::Duration;
    use dealership_engine::db_types::Role;
    use dps_common::Secret;

    use super::TokenIssuer;
    use crate::{config::AuthConfig, errors::AuthError};

    fn issuer_with_lifetime(lifetime: Duration) -> TokenIssuer {
        let config = AuthConfig { jwt_secret: Secret::new("test-secret".to_string()), token_lifetime: lifetime };
        TokenIssuer::new(&config)
    }

    #[test]
    fn round_trip_preserves_identity_and_role() {
        let issuer = issuer_with_lifetime(Duration::hours(24));
        for role in [Role::Guest, Role::Member, Role::Customer, Role::Manager, Role::Owner] {
            let token = issuer.issue("10001", "lester", role).unwrap();
            let claims = issuer.verify(&token).unwrap();
            assert_eq!(claims.sub, "10001");
            assert_eq!(claims.username, "lester");
            assert_eq!(claims.role, role);
            assert_eq!(claims.exp - claims.iat, 24 * 3600);
        }
    }

    #[test]
    fn expired_credential_fails_with_expired() {
        let issuer = issuer_with_lifetime(Duration::hours(-2));
        let token = issuer.issue("10001", "lester", Role::Customer).unwrap();
        let err = issuer.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::Expired), "was: {err:?}");
    }

    #[test]
    fn tampered_credential_fails_with_invalid_signature() {
        let issuer = issuer_with_lifetime(Duration::hours(24));
        let token = issuer.issue("10001", "lester", Role::Customer).unwrap();
        // Keep the header and payload, garble the signature.
        let mut parts = token.rsplitn(2, '.').collect::<Vec<_>>();
        parts.reverse();
        let tampered = format!("{}.AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", parts[0]);
        let err = issuer.verify(&tampered).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature), "was: {err:?}");
    }

    #[test]
    fn foreign_secret_fails_verification() {
        let issuer = issuer_with_lifetime(Duration::hours(24));
        let other = TokenIssuer::new(&AuthConfig {
            jwt_secret: Secret::new("a-different-secret".to_string()),
            token_lifetime: Duration::hours(24),
        });
        let token = other.issue("10001", "lester", Role::Owner).unwrap();
        let err = issuer.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature), "was: {err:?}");
    }

    #[test]
    fn garbage_fails_with_malformed() {
        let issuer = issuer_with_lifetime(Duration::hours(24));
        let err = issuer.verify("made up nonsense").unwrap_err();
        assert!(matches!(err, AuthError::Malformed(_)), "was: {err:?}");
    }
}
