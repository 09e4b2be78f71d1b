//! Fact storage for hydrolab.
//!
//! This crate provides:
//! - [`FactStore`] - Set-semantics fact storage with kind indices
//! - [`FactId`] - Insertion-ordered fact identifiers
//! - [`AttributeFilter`] - Equality and predicate filters for queries

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod filter;
pub mod store;

pub use filter::{AttributeFilter, ValuePredicate};
pub use store::{FactId, FactStore};
