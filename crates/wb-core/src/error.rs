//! Core error types for WorkBoard
//!
//! Every layer funnels into [`WbError`]; the HTTP layer maps each variant to a
//! status code through [`WbError::status_code`].

use std::collections::BTreeMap;
use thiserror::Error;

/// Core error type for all WorkBoard operations
#[derive(Error, Debug)]
pub enum WbError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The actor lacks the role or ownership the operation requires.
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Contract violation: {0}")]
    Contract(#[from] ContractError),

    /// Optimistic-concurrency check failed.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// The store is unreachable or a query failed. Transient, never retried here.
    #[error("Data access error: {0}")]
    DataAccess(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WbError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        WbError::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        WbError::Forbidden {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        WbError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        WbError::Conflict {
            message: message.into(),
        }
    }

    /// Single-field validation failure
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        WbError::Validation(errors)
    }
}

/// Validation errors collection, keyed by attribute name
///
/// Uses an ordered map so `full_messages` is deterministic.
#[derive(Error, Debug, Default, Clone, PartialEq)]
#[error("Validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: BTreeMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Get errors for a specific field
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }

    /// `Ok(())` when empty, otherwise the collected errors
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(source: validator::ValidationErrors) -> Self {
        let mut errors = ValidationErrors::new();
        for (field, field_errors) in source.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("is invalid ({})", error.code));
                errors.add(field.to_string(), message);
            }
        }
        errors
    }
}

/// Contract validation error
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("Attribute {attribute} is invalid: {message}")]
    AttributeInvalid { attribute: String, message: String },

    #[error("Attribute {attribute} is not writable")]
    AttributeNotWritable { attribute: String },

    #[error("Base contract error: {message}")]
    Base { message: String },
}

impl From<ContractError> for ValidationErrors {
    fn from(err: ContractError) -> Self {
        let mut errors = ValidationErrors::new();
        match err {
            ContractError::AttributeInvalid { attribute, message } => {
                errors.add(attribute, message);
            }
            ContractError::AttributeNotWritable { attribute } => {
                errors.add(attribute, "is not writable");
            }
            ContractError::Base { message } => {
                errors.add_base(message);
            }
        }
        errors
    }
}

/// HTTP status code mapping for errors
impl WbError {
    pub fn status_code(&self) -> u16 {
        match self {
            WbError::NotFound { .. } => 404,
            WbError::Unauthorized { .. } => 401,
            WbError::Forbidden { .. } => 403,
            WbError::Validation(_) | WbError::Contract(_) => 422,
            WbError::Conflict { .. } => 409,
            WbError::DataAccess(_) => 503,
            WbError::Internal(_) | WbError::Config(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            WbError::NotFound { .. } => "not_found",
            WbError::Unauthorized { .. } => "unauthorized",
            WbError::Forbidden { .. } => "forbidden",
            WbError::Validation(_) => "validation_failed",
            WbError::Contract(_) => "contract_violated",
            WbError::Conflict { .. } => "concurrency_conflict",
            WbError::DataAccess(_) => "data_access_error",
            WbError::Internal(_) => "internal_error",
            WbError::Config(_) => "configuration_error",
        }
    }

    /// Validation errors carried by this error, if any
    pub fn validation_errors(&self) -> Option<ValidationErrors> {
        match self {
            WbError::Validation(errors) => Some(errors.clone()),
            WbError::Contract(ContractError::AttributeInvalid { attribute, message }) => {
                let mut errors = ValidationErrors::new();
                errors.add(attribute.clone(), message.clone());
                Some(errors)
            }
            _ => None,
        }
    }
}
