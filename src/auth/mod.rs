use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

/// Claims carried by a bearer token. `id` names the authenticated subject
/// and `role` its role string; both must be present and non-empty. Absent
/// claims deserialize to empty strings so that missing and empty are
/// rejected the same way.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(id: String, role: String) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            id,
            role,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid authentication credentials")]
    MissingClaims,
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
    #[error("JWT secret not configured")]
    SecretNotConfigured,
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
}

/// Sign a token with the configured secret. The service itself never issues
/// tokens to clients; this exists for tooling and test fixtures.
pub fn generate_token(claims: &Claims) -> Result<String, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthError::SecretNotConfigured);
    }

    sign_with(claims, secret)
}

/// Validate a bearer token against the configured secret and return its
/// claims.
pub fn validate_token(token: &str) -> Result<Claims, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthError::SecretNotConfigured);
    }

    decode_with(token, secret)
}

pub fn sign_with(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

pub fn decode_with(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::Invalid,
        })?;

    let claims = token_data.claims;
    if claims.id.is_empty() || claims.role.is_empty() {
        return Err(AuthError::MissingClaims);
    }

    Ok(claims)
}
