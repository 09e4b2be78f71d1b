//! Table-backed ontology oracle.
//!
//! Holds `class.property -> value` pairs and answers both threshold lookups
//! and the corrosive-water classification. Class and property names are
//! matched case-insensitively.

use std::collections::HashMap;

use hydrolab_engine::water::{CORROSION_PH, CORROSION_SULFATE, Parameter, SOLIDS_DATASET_MEAN};
use hydrolab_engine::{OracleError, SemanticCheck, ThresholdOracle};

use crate::config::RuntimeConfig;

/// Class holding the corrosive-water definition.
pub const CORROSIVE_WATER: &str = "CorrosiveWater";

/// Property: pH strictly below this is corrosive (with high sulfate).
pub const MAX_PH: &str = "max_ph";

/// Property: sulfate strictly above this is corrosive (with low pH).
pub const MIN_SULFATE: &str = "min_sulfate";

/// In-memory ontology.
#[derive(Clone, Debug, Default)]
pub struct StaticOntology {
    values: HashMap<(String, String), f64>,
}

fn key(class: &str, property: &str) -> (String, String) {
    (class.to_ascii_lowercase(), property.to_ascii_lowercase())
}

impl StaticOntology {
    /// Creates an ontology with no values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an ontology holding the built-in limits of every parameter,
    /// the dissolved-solids dataset mean and the corrosion definition.
    #[must_use]
    pub fn standard() -> Self {
        let mut ontology = Self::new();
        for param in Parameter::ALL {
            let limits = param.default_limits();
            let class = param.ontology_class();
            if let Some(min) = limits.min {
                ontology.set(class, "min", min);
            }
            if let Some(max) = limits.max {
                ontology.set(class, "max", max);
            }
        }
        ontology.set(
            Parameter::Solids.ontology_class(),
            "dataset_mean",
            SOLIDS_DATASET_MEAN,
        );
        ontology.set(CORROSIVE_WATER, MAX_PH, CORROSION_PH);
        ontology.set(CORROSIVE_WATER, MIN_SULFATE, CORROSION_SULFATE);
        ontology
    }

    /// The standard ontology with the configured overrides applied.
    #[must_use]
    pub fn from_config(config: &RuntimeConfig) -> Self {
        let mut ontology = Self::standard();
        for (class, property, value) in config.threshold_entries() {
            ontology.set(class, property, value);
        }
        ontology
    }

    /// Builder method to set one value.
    #[must_use]
    pub fn with_value(mut self, class: &str, property: &str, value: f64) -> Self {
        self.set(class, property, value);
        self
    }

    /// Sets one value, replacing any previous one.
    pub fn set(&mut self, class: &str, property: &str, value: f64) {
        self.values.insert(key(class, property), value);
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no values are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ThresholdOracle for StaticOntology {
    fn lookup(&self, class: &str, property: &str) -> Result<f64, OracleError> {
        self.values
            .get(&key(class, property))
            .copied()
            .ok_or_else(|| OracleError::NotFound {
                class: class.to_string(),
                property: property.to_string(),
            })
    }
}

impl SemanticCheck for StaticOntology {
    fn is_corrosive(&self, ph: f64, sulfate: f64) -> Result<bool, OracleError> {
        if !ph.is_finite() || !sulfate.is_finite() {
            let message = format!("non-finite sample: ph={ph}, sulfate={sulfate}");
            return Err(OracleError::Invalid(message));
        }
        let max_ph = self.threshold(CORROSIVE_WATER, MAX_PH, CORROSION_PH);
        let min_sulfate = self.threshold(CORROSIVE_WATER, MIN_SULFATE, CORROSION_SULFATE);
        Ok(ph < max_ph && sulfate > min_sulfate)
    }
}
