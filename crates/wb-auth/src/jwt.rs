//! JWT bearer tokens
//!
//! Tokens are HS256-signed. Besides the registered claims they carry the
//! user's role, which the rest of the system trusts as given.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wb_core::config::AuthConfig;
use wb_models::Role;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// JWT ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// JWT errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token is expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Missing token")]
    Missing,
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),
}

/// JWT service for creating and validating tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: Option<String>,
    expires_in_seconds: u64,
}

impl JwtService {
    /// Create a new JWT service with the given secret
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: None,
            expires_in_seconds: 86_400,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        let service = Self::new(config.jwt_secret.as_bytes());
        let service = Self {
            expires_in_seconds: config.token_expiration_seconds,
            ..service
        };
        if config.issuer.is_empty() {
            service
        } else {
            service.with_issuer(config.issuer.clone())
        }
    }

    /// Set the issuer claim, stamped on new tokens and required on incoming ones
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Create a token with the configured lifetime
    pub fn create_token(
        &self,
        user_id: &str,
        role: Role,
        email: Option<String>,
        name: Option<String>,
    ) -> Result<String, JwtError> {
        self.create_token_expiring(user_id, role, email, name, self.expires_in_seconds as i64)
    }

    /// Create a token expiring `expires_in_seconds` from now; negative values
    /// produce an already-expired token
    pub fn create_token_expiring(
        &self,
        user_id: &str,
        role: Role,
        email: Option<String>,
        name: Option<String>,
        expires_in_seconds: i64,
    ) -> Result<String, JwtError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: (now + expires_in_seconds).max(0) as usize,
            iat: now.max(0) as usize,
            jti: Some(uuid::Uuid::new_v4().to_string()),
            iss: self.issuer.clone(),
            email,
            name,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        if let Some(ref issuer) = self.issuer {
            // `iss` is only compared when present unless it is also required
            validation.set_required_spec_claims(&["exp", "sub", "iss"]);
            validation.set_issuer(&[issuer.clone()]);
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })?;

        if token_data.claims.sub.trim().is_empty() {
            return Err(JwtError::Invalid("Token has no subject".to_string()));
        }
        Ok(token_data.claims)
    }
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(authorization: &str) -> Option<&str> {
    let (scheme, token) = authorization.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        let token = token.trim();
        (!token.is_empty()).then_some(token)
    } else {
        None
    }
}
