//! Core values, facts, and error types for hydrolab.
//!
//! This crate provides:
//! - [`Value`] - The attribute value type (boolean, integer, float, string)
//! - [`Fact`] - Immutable, content-addressed fact records
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod fact;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind, SemanticLimit};
pub use fact::{Fact, FactBuilder};
pub use value::Value;

/// Result type alias using the hydrolab [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
