//! Parsing of the closed string enumerations used on the wire and in storage

use thiserror::Error;

/// A string that is not one of an enumeration's literals
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{value:?} is not a valid {kind} (expected one of: {})", expected.join(", "))]
pub struct ParseLiteralError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static [&'static str],
}

impl ParseLiteralError {
    pub fn new(kind: &'static str, value: impl Into<String>, expected: &'static [&'static str]) -> Self {
        Self {
            kind,
            value: value.into(),
            expected,
        }
    }

    /// Message suitable for a field-level validation error
    pub fn field_message(&self) -> String {
        format!("is not one of {}", self.expected.join(", "))
    }
}
