//! API error handling
//!
//! Every failure leaves the API as a JSON error body with a stable
//! `errorIdentifier`; validation failures carry their field messages keyed by
//! the camelCase attribute name.

use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use wb_core::error::{ValidationErrors, WbError};
use wb_services::ServiceResult;

const URN_PREFIX: &str = "urn:workboard:api:errors:";

/// API error types
#[derive(Debug)]
pub enum ApiError {
    NotFound { resource: &'static str, id: String },
    Validation(ValidationErrors),
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    Conflict(String),
    Unavailable(String),
    Internal(String),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ApiError::Forbidden(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ApiError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "NotFound",
            ApiError::Validation(_) => "PropertyConstraintViolation",
            ApiError::Unauthorized(_) => "Unauthenticated",
            ApiError::Forbidden(_) => "MissingPermission",
            ApiError::BadRequest(_) => "InvalidRequestBody",
            ApiError::Conflict(_) => "UpdateConflict",
            ApiError::Unavailable(_) => "ServiceUnavailable",
            ApiError::Internal(_) => "InternalError",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::NotFound { resource, id } => format!("{} with id {} not found", resource, id),
            ApiError::Validation(errors) => camel_case_messages(errors).join(", "),
            ApiError::Unavailable(_) => "The data store is currently unavailable".to_string(),
            ApiError::Internal(_) => "An internal error occurred".to_string(),
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg) => msg.clone(),
        }
    }
}

impl From<WbError> for ApiError {
    fn from(err: WbError) -> Self {
        match err {
            WbError::NotFound { entity, value, .. } => ApiError::NotFound {
                resource: entity,
                id: value,
            },
            WbError::Unauthorized { message } => ApiError::Unauthorized(message),
            WbError::Forbidden { message } => ApiError::Forbidden(message),
            WbError::Validation(errors) => ApiError::Validation(errors),
            WbError::Contract(err) => ApiError::Validation(err.into()),
            WbError::Conflict { message } => ApiError::Conflict(message),
            WbError::DataAccess(message) => ApiError::Unavailable(message),
            WbError::Internal(message) | WbError::Config(message) => ApiError::Internal(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Unwrap a service result, turning its failure into the matching API error
pub fn from_service<T>(result: ServiceResult<T>) -> ApiResult<T> {
    result.into_result().map_err(ApiError::from)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(rename = "_type")]
    type_name: &'static str,
    error_identifier: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    base_errors: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::Internal(detail) | ApiError::Unavailable(detail) => {
                tracing::error!(status = status.as_u16(), error = %detail, "Request failed");
            }
            _ => tracing::debug!(status = status.as_u16(), error = ?self, "Request rejected"),
        }

        let (errors, base_errors) = match &self {
            ApiError::Validation(errors) => (
                Some(
                    errors
                        .errors
                        .iter()
                        .map(|(field, messages)| (camel_case(field), messages.clone()))
                        .collect(),
                ),
                errors.base_errors.clone(),
            ),
            _ => (None, Vec::new()),
        };

        let body = ErrorBody {
            type_name: "Error",
            error_identifier: format!("{}{}", URN_PREFIX, self.identifier()),
            message: self.message(),
            errors,
            base_errors,
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// `assigned_to_id` -> `assignedToId`
pub(crate) fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn camel_case_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = errors.base_errors.clone();
    for (field, field_messages) in &errors.errors {
        let field = camel_case(field);
        messages.extend(field_messages.iter().map(|msg| format!("{} {}", field, msg)));
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("assigned_to_id"), "assignedToId");
        assert_eq!(camel_case("status"), "status");
        assert_eq!(camel_case("base"), "base");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (WbError::invalid("status", "is invalid"), 422),
            (WbError::forbidden("no"), 403),
            (WbError::unauthorized("who"), 401),
            (WbError::conflict("stale"), 409),
            (WbError::DataAccess("down".into()), 503),
            (WbError::not_found("WorkItem", "id", 7), 404),
            (WbError::Internal("boom".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code().as_u16(), status);
        }
    }

    #[tokio::test]
    async fn test_validation_body_uses_camel_case_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("assigned_to_id", "does not exist");
        errors.add_base("Project is closed");

        let (status, body) = body_json(ApiError::Validation(errors)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["_type"], "Error");
        assert_eq!(
            body["errorIdentifier"],
            "urn:workboard:api:errors:PropertyConstraintViolation"
        );
        assert_eq!(body["errors"]["assignedToId"][0], "does not exist");
        assert_eq!(body["baseErrors"][0], "Project is closed");
        assert_eq!(body["message"], "Project is closed, assignedToId does not exist");
    }

    #[tokio::test]
    async fn test_internal_details_are_not_leaked() {
        let (status, body) = body_json(ApiError::from(WbError::DataAccess(
            "connection refused to 10.0.0.3".into(),
        )))
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["message"], "The data store is currently unavailable");
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn test_from_service_failure() {
        let result: ServiceResult<i32> = ServiceResult::from_error(WbError::conflict("stale"));
        assert!(matches!(from_service(result), Err(ApiError::Conflict(_))));
        assert_eq!(from_service(ServiceResult::success(1)).unwrap(), 1);
    }
}
