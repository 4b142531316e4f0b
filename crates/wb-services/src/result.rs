//! Service Result type
//!
//! A failed call carries either accumulated validation errors or the typed
//! [`WbError`] that stopped it, so callers can tell a 422 from a 409.

use std::fmt;

use wb_core::error::{ValidationErrors, WbError};
use wb_core::result::WbResult;

/// Represents the result of a service call
#[derive(Debug)]
pub struct ServiceResult<T> {
    /// Whether the service call was successful
    success: bool,
    /// The result of the service call
    result: Option<T>,
    /// Field and base errors from the service call
    errors: ValidationErrors,
    /// Non-validation failure
    error: Option<WbError>,
    /// Message for display
    message: Option<String>,
}

impl<T> ServiceResult<T> {
    /// Create a successful service result
    pub fn success(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            errors: ValidationErrors::new(),
            error: None,
            message: None,
        }
    }

    /// Create a successful service result with a message
    pub fn success_with_message(result: T, message: impl Into<String>) -> Self {
        Self::success(result).with_message(message)
    }

    /// Create a failed service result
    pub fn failure(errors: ValidationErrors) -> Self {
        Self {
            success: false,
            result: None,
            errors,
            error: None,
            message: None,
        }
    }

    /// Create a failed service result with a single error
    pub fn failure_with_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::failure(errors)
    }

    /// Create a failed service result with a base error
    pub fn failure_with_base_error(message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add_base(message);
        Self::failure(errors)
    }

    /// Create a failed service result from any error
    pub fn from_error(err: WbError) -> Self {
        match err.validation_errors() {
            Some(errors) => Self::failure(errors),
            None => Self {
                success: false,
                result: None,
                errors: ValidationErrors::new(),
                message: Some(err.to_string()),
                error: Some(err),
            },
        }
    }

    /// Check if the service call was successful
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Check if the service call failed
    pub fn is_failure(&self) -> bool {
        !self.success
    }

    /// Get the result (if successful)
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Take the result (consuming it)
    pub fn take_result(&mut self) -> Option<T> {
        self.result.take()
    }

    /// Get the validation errors
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Get the non-validation failure, if that is what stopped the call
    pub fn error(&self) -> Option<&WbError> {
        self.error.as_ref()
    }

    /// HTTP status a failure maps to; `None` on success
    pub fn failure_status(&self) -> Option<u16> {
        if self.success {
            return None;
        }
        Some(self.error.as_ref().map_or(422, WbError::status_code))
    }

    /// Get the message
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Set the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Full error messages
    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.errors.full_messages();
        if let Some(ref err) = self.error {
            messages.push(err.to_string());
        }
        messages
    }

    /// Map the result if successful
    pub fn map<U, F>(self, f: F) -> ServiceResult<U>
    where
        F: FnOnce(T) -> U,
    {
        ServiceResult {
            success: self.success,
            result: self.result.map(f),
            errors: self.errors,
            error: self.error,
            message: self.message,
        }
    }

    /// Chain with another service call if successful
    pub fn and_then<U, F>(self, f: F) -> ServiceResult<U>
    where
        F: FnOnce(T) -> ServiceResult<U>,
    {
        match (self.success, self.result) {
            (true, Some(result)) => f(result),
            _ => ServiceResult {
                success: false,
                result: None,
                errors: self.errors,
                error: self.error,
                message: self.message,
            },
        }
    }

    /// Back into a plain result
    pub fn into_result(self) -> WbResult<T> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if !self.success {
            return Err(WbError::Validation(self.errors));
        }
        self.result
            .ok_or_else(|| WbError::Internal("Service succeeded but no result was returned".into()))
    }
}

impl<T> From<WbResult<T>> for ServiceResult<T> {
    fn from(result: WbResult<T>) -> Self {
        match result {
            Ok(value) => ServiceResult::success(value),
            Err(err) => ServiceResult::from_error(err),
        }
    }
}

impl<T> From<Result<T, ValidationErrors>> for ServiceResult<T> {
    fn from(result: Result<T, ValidationErrors>) -> Self {
        match result {
            Ok(value) => ServiceResult::success(value),
            Err(errors) => ServiceResult::failure(errors),
        }
    }
}

impl<T: fmt::Display> fmt::Display for ServiceResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            if let Some(ref result) = self.result {
                write!(f, "Success: {}", result)
            } else {
                write!(f, "Success")
            }
        } else {
            write!(f, "Failure: {}", self.full_messages().join(", "))
        }
    }
}
