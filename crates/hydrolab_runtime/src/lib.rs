//! Runtime for hydrolab: configuration, oracles, sample analysis and the
//! interactive intake.
//!
//! This crate provides:
//! - [`RuntimeConfig`] - `hydrolab.toml` and `HYDROLAB_*` settings
//! - [`StaticOntology`] - Threshold and corrosion oracle backed by a table
//! - [`TabularRiskModel`] - Environmental risk network
//! - [`analyze`] - Rules, oracles and scheduling for one sample
//! - [`Intake`] - Line-edited questionnaire

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod analysis;
pub mod config;
pub mod editor;
pub mod interactive;
pub mod ontology;
pub mod report;
pub mod risk;

pub use analysis::{Oracles, Report, Sample, analyze};
pub use config::{EngineSettings, RuntimeConfig};
pub use editor::{Console, Prompter};
pub use interactive::{Intake, Outcome};
pub use ontology::StaticOntology;
pub use report::{format_parameters, format_schedule};
pub use risk::{FALLBACK_RISK, RiskAssessment, TabularRiskModel};
