//! Integration tests for Layer 2: Engine
//!
//! Tests for pattern matching, rule firing, the journal, and the
//! water-quality rule base.

mod journal;
mod patterns;
mod rules;
mod water;
