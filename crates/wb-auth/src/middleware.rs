//! Request authentication
//!
//! Turns the `Authorization` header of a request into a [`CurrentUser`].

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use thiserror::Error;
use wb_core::error::WbError;

use crate::jwt::{extract_bearer_token, JwtError, JwtService};
use crate::permissions::CurrentUser;

/// Authentication errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required")]
    Required,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Token expired")]
    TokenExpired,
}

impl From<AuthError> for WbError {
    fn from(err: AuthError) -> Self {
        WbError::unauthorized(err.to_string())
    }
}

/// Request headers relevant for authentication
#[derive(Debug, Default)]
pub struct RequestHeaders {
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestHeaders {
    /// Create from a list of header key-value pairs
    pub fn from_pairs(pairs: &[(impl AsRef<str>, impl AsRef<str>)]) -> Self {
        let mut headers = Self::default();

        for (name, value) in pairs {
            let value = value.as_ref().to_string();
            match name.as_ref().to_ascii_lowercase().as_str() {
                "authorization" => headers.authorization = Some(value),
                "user-agent" => headers.user_agent = Some(value),
                _ => {}
            }
        }

        headers
    }

    pub fn from_header_map(map: &HeaderMap) -> Self {
        let text = |name: header::HeaderName| {
            map.get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        Self {
            authorization: text(header::AUTHORIZATION),
            user_agent: text(header::USER_AGENT),
        }
    }
}

/// Authenticator for validating requests
#[derive(Clone)]
pub struct Authenticator {
    jwt: Arc<JwtService>,
}

impl Authenticator {
    pub fn new(jwt: Arc<JwtService>) -> Self {
        Self { jwt }
    }

    pub fn authenticate(&self, headers: &RequestHeaders) -> Result<CurrentUser, AuthError> {
        let authorization = headers.authorization.as_deref().ok_or(AuthError::Required)?;
        let token = extract_bearer_token(authorization).ok_or(AuthError::InvalidCredentials)?;

        match self.jwt.validate_token(token) {
            Ok(claims) => Ok(CurrentUser::from(claims)),
            Err(JwtError::Expired) => Err(AuthError::TokenExpired),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected bearer token");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
