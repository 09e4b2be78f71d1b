//! One end-to-end sample analysis.
//!
//! Seeds the rule engine with the sample, runs it to quiescence, consults
//! the semantic and risk oracles, and schedules the resulting intervention.

use hydrolab_engine::water::{self, Observation, Parameter, kinds};
use hydrolab_engine::{
    DiagnosisState, Evidence, Explanation, InterventionCategory, Notification, RiskEstimator,
    RuleBase, SemanticCheck, Session, ThresholdOracle,
};
use hydrolab_foundation::{Fact, Result};
use hydrolab_scheduler::{Assignment, schedule};

use crate::config::RuntimeConfig;
use crate::risk::RiskAssessment;

/// Everything known about one water sample.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sample {
    /// Measured parameters, in entry order.
    pub readings: Vec<(Parameter, f64)>,
    /// Yes-answers to the observation questions.
    pub observations: Vec<Observation>,
    /// Environmental evidence for the risk estimate.
    pub evidence: Evidence,
}

impl Sample {
    /// Creates an empty sample.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a reading.
    #[must_use]
    pub fn with_reading(mut self, param: Parameter, value: f64) -> Self {
        self.readings.push((param, value));
        self
    }

    /// Builder method to add an observation.
    #[must_use]
    pub fn with_observation(mut self, observation: Observation) -> Self {
        self.observations.push(observation);
        self
    }

    /// Builder method to set the environmental evidence.
    #[must_use]
    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence = evidence;
        self
    }

    /// Returns the reading for `param`, if measured.
    #[must_use]
    pub fn reading(&self, param: Parameter) -> Option<f64> {
        self.readings
            .iter()
            .find(|(p, _)| *p == param)
            .map(|(_, value)| *value)
    }

    /// Input facts: the start marker, then observations, then readings.
    #[must_use]
    pub fn facts(&self) -> Vec<Fact> {
        std::iter::once(water::start())
            .chain(self.observations.iter().map(|o| water::observation(*o)))
            .chain(self.readings.iter().map(|(p, v)| water::reading(*p, *v)))
            .collect()
    }
}

/// The oracles consulted by an analysis.
pub struct Oracles<'a> {
    /// Threshold source for the rules.
    pub thresholds: &'a dyn ThresholdOracle,
    /// Corrosive-water classifier.
    pub semantics: &'a dyn SemanticCheck,
    /// Environmental risk model.
    pub risk: &'a dyn RiskEstimator,
}

/// Outcome of [`analyze`].
#[derive(Clone, Debug)]
pub struct Report {
    /// Rule notifications, in firing order.
    pub notifications: Vec<Notification>,
    /// Final diagnosis.
    pub diagnosis: DiagnosisState,
    /// Environmental risk.
    pub risk: RiskAssessment,
    /// Semantic corrosion verdict; `None` without both pH and sulfate, or
    /// when the classifier failed.
    pub corrosive: Option<bool>,
    /// Available slots for the intervention; empty when potable.
    pub schedule: Vec<Assignment>,
    /// Derivation trees of the problem facts; empty unless traced.
    pub explanations: Vec<Explanation>,
}

impl Report {
    /// The intervention category, if any.
    #[must_use]
    pub fn intervention(&self) -> Option<InterventionCategory> {
        self.diagnosis.intervention()
    }
}

/// Analyzes one sample.
///
/// # Errors
/// Returns an error only if the rule base runs away (activation limit).
pub fn analyze(
    rules: &RuleBase,
    sample: &Sample,
    oracles: &Oracles<'_>,
    config: &RuntimeConfig,
    trace: bool,
) -> Result<Report> {
    let mut session = Session::new(rules, config.engine_config(trace));
    session.assert_all(sample.facts());

    let mut notifications = Vec::new();
    let summary = session.run(oracles.thresholds, &mut notifications)?;
    tracing::info!(
        fired = summary.fired,
        asserted = summary.asserted,
        problems = session.diagnosis().problem_count(),
        "diagnosis complete"
    );

    let ph = sample.reading(Parameter::Ph);
    let sulfate = sample.reading(Parameter::Sulfate);
    let corrosive = match (ph, sulfate) {
        (Some(ph), Some(sulfate)) => match oracles.semantics.is_corrosive(ph, sulfate) {
            Ok(verdict) => Some(verdict),
            Err(error) => {
                tracing::warn!(%error, "semantic check failed");
                None
            }
        },
        _ => None,
    };

    let risk = RiskAssessment::assess(oracles.risk, &sample.evidence, config.risk_warning);

    let diagnosis = session.diagnosis().clone();
    let schedule = diagnosis
        .intervention()
        .map(|category| schedule(category.as_str()))
        .unwrap_or_default();

    let explanations = if trace {
        let state = session.state();
        state
            .facts()
            .with_kind(kinds::PROBLEM)
            .chain(state.facts().with_kind(kinds::PROBLEM_TYPE))
            .filter_map(|(id, _)| state.explain(id))
            .collect()
    } else {
        Vec::new()
    };

    Ok(Report {
        notifications,
        diagnosis,
        risk,
        corrosive,
        schedule,
        explanations,
    })
}
