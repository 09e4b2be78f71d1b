//! Interfaces to external reasoners.
//!
//! The ontology reasoner and the Bayesian risk network are collaborators
//! outside the engine. Rules only see them through these traits, and every
//! threshold lookup carries a default that is used whenever the oracle
//! fails.

use thiserror::Error;

/// Failure of an external oracle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OracleError {
    /// The oracle has no value for this class/property pair.
    #[error("no value for {class}.{property}")]
    NotFound {
        /// Ontology class name.
        class: String,
        /// Property name.
        property: String,
    },
    /// The oracle could not be consulted at all.
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
    /// The oracle answered with something unusable.
    #[error("invalid oracle answer: {0}")]
    Invalid(String),
}

/// Supplies numeric thresholds (e.g. from an ontology).
pub trait ThresholdOracle {
    /// Look up `class.property`.
    ///
    /// # Errors
    /// Returns an error if the value is unknown or the oracle is unavailable.
    fn lookup(&self, class: &str, property: &str) -> Result<f64, OracleError>;

    /// Look up `class.property`, falling back to `default` on any failure.
    ///
    /// Non-finite answers are treated as failures.
    fn threshold(&self, class: &str, property: &str, default: f64) -> f64 {
        match self.lookup(class, property) {
            Ok(value) if value.is_finite() => value,
            Ok(value) => {
                tracing::debug!(
                    class,
                    property,
                    value,
                    default,
                    "non-finite threshold, using default"
                );
                default
            }
            Err(error) => {
                tracing::debug!(
                    class, property, default, %error,
                    "threshold lookup failed, using default"
                );
                default
            }
        }
    }
}

/// Oracle used when no ontology is loaded: every lookup fails, so rules use
/// their built-in defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOntology;

impl ThresholdOracle for NoOntology {
    fn lookup(&self, _class: &str, _property: &str) -> Result<f64, OracleError> {
        Err(OracleError::Unavailable("no ontology loaded".to_string()))
    }
}

/// Semantic classification of a sample (the ontology's corrosive-water
/// class).
pub trait SemanticCheck {
    /// Returns true if the sample is classified as corrosive.
    ///
    /// # Errors
    /// Returns an error if the reasoner is unavailable.
    fn is_corrosive(&self, ph: f64, sulfate: f64) -> Result<bool, OracleError>;
}

/// Boolean environmental evidence for the risk estimator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Evidence {
    /// Industrial sites near the source.
    pub industry_nearby: bool,
    /// Recent heavy rain.
    pub heavy_rain: bool,
}

/// Estimates the probability that a source is at risk.
pub trait RiskEstimator {
    /// Returns P(risk | evidence) in `[0, 1]`.
    ///
    /// # Errors
    /// Returns an error if the model cannot be evaluated.
    fn risk_probability(&self, evidence: &Evidence) -> Result<f64, OracleError>;
}
