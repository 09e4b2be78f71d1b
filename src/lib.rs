//! hydrolab - Water-quality diagnosis and lab scheduling
//!
//! This crate re-exports all layers of the hydrolab system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: hydrolab_runtime    - CLI, interactive intake, config, oracles
//! Layer 2: hydrolab_engine     - Patterns, rules, engine loop, water rules
//!          hydrolab_scheduler  - Constraint model and CSP solver
//! Layer 1: hydrolab_storage    - Fact store
//! Layer 0: hydrolab_foundation - Core types (Value, Fact, Error)
//! ```

pub use hydrolab_engine as engine;
pub use hydrolab_foundation as foundation;
pub use hydrolab_runtime as runtime;
pub use hydrolab_scheduler as scheduler;
pub use hydrolab_storage as storage;
