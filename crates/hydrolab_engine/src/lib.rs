//! Rule engine, pattern matching, and the water-quality rule base.
//!
//! This crate provides:
//! - [`PatternMatcher`] - Condition interpretation against a fact store
//! - [`RuleBase`] - Named, ordered condition-action rules
//! - [`RuleEngine`] - Activation finding, conflict resolution, run to fixpoint
//! - [`Session`] - One isolated analysis run
//! - [`water`] - Threshold, relational, and category rules for water samples

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod diagnosis;
pub mod engine;
pub mod journal;
pub mod notify;
pub mod oracle;
pub mod pattern;
pub mod rule;
pub mod session;
pub mod water;

pub use config::EngineConfig;
pub use diagnosis::{DiagnosisState, InterventionCategory};
pub use engine::{ActionContext, EngineState, RuleEngine, RunSummary};
pub use journal::{Explanation, Journal, TraceEvent, TraceRecord};
pub use notify::{Notification, NotificationSink, Severity};
pub use oracle::{
    Evidence, NoOntology, OracleError, RiskEstimator, SemanticCheck, ThresholdOracle,
};
pub use pattern::{Bindings, Condition, FactPattern, FieldTest, Match, PatternMatcher, Predicate};
pub use rule::{Activation, ActivationKey, Rule, RuleBase};
pub use session::Session;
