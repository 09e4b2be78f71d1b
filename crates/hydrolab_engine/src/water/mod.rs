//! Water-quality domain: parameters, observations, fact shapes and rules.
//!
//! Input facts are built with [`reading`] and [`observation`]; the
//! [`rule_base`] turns them into `problem` facts, notifications and an
//! intervention category.

mod rules;

pub use rules::rule_base;

use std::fmt;

use hydrolab_foundation::{Fact, Value};

use crate::diagnosis::InterventionCategory;
use crate::notify::Severity;
use crate::oracle::ThresholdOracle;

/// Fact kinds used by the water rules.
pub mod kinds {
    /// Marker seeded at the start of a run.
    pub const START: &str = "start";
    /// A measured parameter: `param`, `value`.
    pub const READING: &str = "reading";
    /// A visual or sensory observation: `name`.
    pub const OBSERVATION: &str = "observation";
    /// An out-of-range parameter: `param`, `label`.
    pub const PROBLEM: &str = "problem";
    /// An in-range parameter: `param`.
    pub const WITHIN_RANGE: &str = "within_range";
    /// A combined hazard: `level`.
    pub const PROBLEM_TYPE: &str = "problem_type";
}

/// Attribute names used by the water rules.
pub mod attrs {
    /// Parameter name.
    pub const PARAM: &str = "param";
    /// Measured value.
    pub const VALUE: &str = "value";
    /// Problem label (e.g. `acidic`).
    pub const LABEL: &str = "label";
    /// Observation name.
    pub const NAME: &str = "name";
    /// Hazard level.
    pub const LEVEL: &str = "level";
}

/// pH below which water is corrosive when sulfate is also high.
pub const CORROSION_PH: f64 = 6.0;

/// Sulfate (mg/L) above which acidic water is corrosive.
pub const CORROSION_SULFATE: f64 = 200.0;

/// Fallback dissolved-solids mean of the reference dataset (ppm).
pub const SOLIDS_DATASET_MEAN: f64 = 22_000.0;

// =============================================================================
// Parameters
// =============================================================================

/// A monitored water parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Parameter {
    /// Acidity.
    Ph,
    /// Sulfate concentration.
    Sulfate,
    /// Cloudiness.
    Turbidity,
    /// Total dissolved solids.
    Solids,
    /// Calcium and magnesium salts.
    Hardness,
    /// Disinfectant residue.
    Chloramines,
    /// Electrical conductivity.
    Conductivity,
    /// Total organic carbon.
    OrganicCarbon,
    /// Chlorination by-products.
    Trihalomethanes,
}

/// Resolved bounds for one parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Limits {
    /// Values strictly below are a problem.
    pub min: Option<f64>,
    /// Values strictly above are a problem.
    pub max: Option<f64>,
}

/// Outcome of comparing a value against [`Limits`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// Below the minimum.
    Low(&'static str),
    /// Above the maximum.
    High(&'static str),
    /// Within both bounds (inclusive).
    InRange,
}

impl Parameter {
    /// All parameters, in rule registration order.
    pub const ALL: [Self; 9] = [
        Self::Ph,
        Self::Sulfate,
        Self::Turbidity,
        Self::Solids,
        Self::Hardness,
        Self::Chloramines,
        Self::Conductivity,
        Self::OrganicCarbon,
        Self::Trihalomethanes,
    ];

    /// The `param` attribute value.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ph => "ph",
            Self::Sulfate => "sulfate",
            Self::Turbidity => "turbidity",
            Self::Solids => "solids",
            Self::Hardness => "hardness",
            Self::Chloramines => "chloramines",
            Self::Conductivity => "conductivity",
            Self::OrganicCarbon => "organic_carbon",
            Self::Trihalomethanes => "trihalomethanes",
        }
    }

    /// Parses a `param` name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// The ontology class holding this parameter's thresholds.
    #[must_use]
    pub const fn ontology_class(self) -> &'static str {
        match self {
            Self::Ph => "ph",
            Self::Sulfate => "Sulfate",
            Self::Turbidity => "Turbidity",
            Self::Solids => "Solids",
            Self::Hardness => "Hardness",
            Self::Chloramines => "Chloramines",
            Self::Conductivity => "Conductivity",
            Self::OrganicCarbon => "Organic_carbon",
            Self::Trihalomethanes => "Trihalomethanes",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Ph => "pH",
            Self::Sulfate => "Sulfate",
            Self::Turbidity => "Turbidity",
            Self::Solids => "Dissolved solids",
            Self::Hardness => "Hardness",
            Self::Chloramines => "Chloramines",
            Self::Conductivity => "Conductivity",
            Self::OrganicCarbon => "Organic carbon",
            Self::Trihalomethanes => "Trihalomethanes",
        }
    }

    /// Measurement unit.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Ph => "",
            Self::Sulfate | Self::Hardness => "mg/L",
            Self::Turbidity => "NTU",
            Self::Solids | Self::Chloramines | Self::OrganicCarbon => "ppm",
            Self::Conductivity => "uS/cm",
            Self::Trihalomethanes => "ug/L",
        }
    }

    /// Short description for the parameter listing.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ph => "How acidic or basic the water is. WHO safe range: 6.5 - 8.5.",
            Self::Sulfate => {
                "Naturally occurring in minerals. High concentrations can alter the taste."
            }
            Self::Turbidity => {
                "Cloudiness caused by suspended particles. WHO recommends less than 5 NTU."
            }
            Self::Solids => {
                "Total dissolved solids (minerals, salts, metals). Desirable limit: 500 mg/L."
            }
            Self::Hardness => {
                "Caused by calcium and magnesium salts. Affects how well soap dissolves."
            }
            Self::Chloramines => "Disinfectants used in public water systems. Safe up to 4 mg/L.",
            Self::Conductivity => {
                "Ability to conduct electric current, tied to dissolved minerals."
            }
            Self::OrganicCarbon => "Total amount of carbon in organic compounds.",
            Self::Trihalomethanes => "Chemical by-products of chlorination. Safe up to 80 ppm.",
        }
    }

    /// Which kind of intervention a problem with this parameter calls for.
    #[must_use]
    pub const fn category(self) -> InterventionCategory {
        match self {
            Self::Ph
            | Self::Sulfate
            | Self::Hardness
            | Self::Chloramines
            | Self::Trihalomethanes => InterventionCategory::Chemical,
            Self::Turbidity | Self::Solids | Self::Conductivity | Self::OrganicCarbon => {
                InterventionCategory::Physical
            }
        }
    }

    /// Notification severity for an out-of-range value.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::Ph | Self::Turbidity | Self::Solids => Severity::Error,
            Self::Hardness => Severity::Info,
            Self::Sulfate
            | Self::Chloramines
            | Self::Conductivity
            | Self::OrganicCarbon
            | Self::Trihalomethanes => Severity::Warning,
        }
    }

    /// Built-in bounds used when the oracle has none.
    #[must_use]
    pub const fn default_limits(self) -> Limits {
        let (min, max) = match self {
            Self::Ph => (Some(6.5), Some(8.5)),
            Self::Sulfate => (None, Some(250.0)),
            Self::Turbidity => (None, Some(5.0)),
            Self::Solids => (None, Some(1000.0)),
            Self::Hardness => (None, Some(300.0)),
            Self::Chloramines => (None, Some(4.0)),
            Self::Conductivity => (None, Some(400.0)),
            Self::OrganicCarbon => (None, Some(2.0)),
            Self::Trihalomethanes => (None, Some(80.0)),
        };
        Limits { min, max }
    }

    /// Resolves bounds through the oracle, property names `min` and `max`.
    #[must_use]
    pub fn limits(self, oracle: &dyn ThresholdOracle) -> Limits {
        let defaults = self.default_limits();
        let class = self.ontology_class();
        Limits {
            min: defaults.min.map(|d| oracle.threshold(class, "min", d)),
            max: defaults.max.map(|d| oracle.threshold(class, "max", d)),
        }
    }

    /// Problem label for values below the minimum.
    #[must_use]
    pub const fn low_label(self) -> &'static str {
        match self {
            Self::Ph => "acidic",
            _ => "low",
        }
    }

    /// Problem label for values above the maximum.
    #[must_use]
    pub const fn high_label(self) -> &'static str {
        match self {
            Self::Ph => "basic",
            Self::Hardness => "hard",
            _ => "high",
        }
    }

    /// Classifies `value` against `limits`. Bounds are inclusive.
    #[must_use]
    pub fn classify(self, value: f64, limits: Limits) -> Classification {
        if limits.min.is_some_and(|min| value < min) {
            Classification::Low(self.low_label())
        } else if limits.max.is_some_and(|max| value > max) {
            Classification::High(self.high_label())
        } else {
            Classification::InRange
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Observations
// =============================================================================

/// A yes/no observation about a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Observation {
    /// Cloudy appearance.
    Turbid,
    /// Bad smell.
    Odor,
    /// Metallic or bitter taste.
    Taste,
    /// Residue at the bottom.
    Sediment,
}

impl Observation {
    /// All observations, in questionnaire order.
    pub const ALL: [Self; 4] = [Self::Turbid, Self::Odor, Self::Taste, Self::Sediment];

    /// The `name` attribute value.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Turbid => "turbid",
            Self::Odor => "odor",
            Self::Taste => "taste",
            Self::Sediment => "sediment",
        }
    }

    /// Parses an observation name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.name() == name)
    }

    /// Questionnaire prompt.
    #[must_use]
    pub const fn question(self) -> &'static str {
        match self {
            Self::Turbid => "Does the water look turbid or cloudy?",
            Self::Odor => "Does the water smell bad (e.g. rotten eggs, chlorine)?",
            Self::Taste => "Does the water taste metallic or bitter?",
            Self::Sediment => "Did you notice residue or sediment at the bottom?",
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Fact Constructors
// =============================================================================

/// The start marker.
#[must_use]
pub fn start() -> Fact {
    Fact::marker(kinds::START)
}

/// A numeric reading.
#[must_use]
pub fn reading(param: Parameter, value: f64) -> Fact {
    reading_value(param.name(), value)
}

/// A reading with an arbitrary parameter name and value.
///
/// Unknown names and non-numeric values are accepted and simply never
/// match any rule.
#[must_use]
pub fn reading_value(param: &str, value: impl Into<Value>) -> Fact {
    Fact::build(kinds::READING)
        .with(attrs::PARAM, param)
        .with(attrs::VALUE, value)
        .finish()
}

/// An observation.
#[must_use]
pub fn observation(observation: Observation) -> Fact {
    Fact::build(kinds::OBSERVATION)
        .with(attrs::NAME, observation.name())
        .finish()
}

/// An out-of-range parameter.
#[must_use]
pub fn problem(param: Parameter, label: &str) -> Fact {
    Fact::build(kinds::PROBLEM)
        .with(attrs::PARAM, param.name())
        .with(attrs::LABEL, label)
        .finish()
}

/// An in-range parameter.
#[must_use]
pub fn within_range(param: Parameter) -> Fact {
    Fact::build(kinds::WITHIN_RANGE)
        .with(attrs::PARAM, param.name())
        .finish()
}

/// The combined critical hazard.
#[must_use]
pub fn critical_problem() -> Fact {
    Fact::build(kinds::PROBLEM_TYPE)
        .with(attrs::LEVEL, InterventionCategory::Critical.as_str())
        .finish()
}
