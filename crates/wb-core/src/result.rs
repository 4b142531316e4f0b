//! Result type aliases

use crate::error::{ValidationErrors, WbError};

/// Standard Result type for WorkBoard operations
pub type WbResult<T> = Result<T, WbError>;

/// Result of running a contract
pub type ValidationResult = Result<(), ValidationErrors>;

/// Extension for lifting contract results into [`WbResult`]
pub trait IntoWbResult<T> {
    fn into_wb(self) -> WbResult<T>;
}

impl<T> IntoWbResult<T> for Result<T, ValidationErrors> {
    fn into_wb(self) -> WbResult<T> {
        self.map_err(WbError::Validation)
    }
}
