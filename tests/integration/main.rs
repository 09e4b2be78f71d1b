//! Integration tests across all layers
//!
//! Tests complete sample analyses: rules, oracles, risk and scheduling.

mod configuration;
mod end_to_end;
