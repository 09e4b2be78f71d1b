//! Integration tests for Layer 1: Storage
//!
//! Tests for the fact store and attribute filters.

mod filters;
