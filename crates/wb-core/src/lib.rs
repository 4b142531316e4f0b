//! # wb-core
//!
//! Core types, traits, and utilities for WorkBoard.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types
//! - Result type aliases
//! - Core traits (Entity, Identifiable, Timestamped)
//! - Clamped percentages and date ranges
//! - Pagination types
//! - Configuration types
//! - An injectable clock

pub mod clock;
pub mod config;
pub mod error;
pub mod pagination;
pub mod result;
pub mod traits;
pub mod types;

pub use clock::*;
pub use error::*;
pub use pagination::*;
pub use result::*;
pub use traits::*;
pub use types::*;
