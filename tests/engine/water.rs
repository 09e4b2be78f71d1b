//! Integration tests for the water-quality rule base
//!
//! Tests threshold classification, the corrosion rule, idempotence and the
//! intervention category.

use hydrolab_engine::water::{self, Observation, Parameter};
use hydrolab_engine::{
    EngineConfig, InterventionCategory, NoOntology, Notification, OracleError, RuleBase, Session,
    Severity, ThresholdOracle,
};
use hydrolab_foundation::Fact;
use proptest::prelude::*;

fn rules() -> RuleBase {
    water::rule_base().unwrap()
}

fn diagnose_with(
    rules: &RuleBase,
    oracle: &dyn ThresholdOracle,
    facts: Vec<Fact>,
) -> (Option<InterventionCategory>, u32, Vec<Notification>) {
    let mut session = Session::new(rules, EngineConfig::default());
    session.assert(water::start());
    session.assert_all(facts);
    let mut sink = Vec::new();
    session.run(oracle, &mut sink).unwrap();
    let diagnosis = session.diagnosis();
    (diagnosis.intervention(), diagnosis.problem_count(), sink)
}

fn diagnose(facts: Vec<Fact>) -> (Option<InterventionCategory>, u32, Vec<Notification>) {
    diagnose_with(&rules(), &NoOntology, facts)
}

fn by_rule<'a>(sink: &'a [Notification], rule: &str) -> Vec<&'a Notification> {
    sink.iter().filter(|n| &*n.rule == rule).collect()
}

// =============================================================================
// Thresholds
// =============================================================================

#[test]
fn acidic_ph() {
    let (category, count, sink) = diagnose(vec![water::reading(Parameter::Ph, 5.0)]);
    assert_eq!(count, 1);
    assert_eq!(category, Some(InterventionCategory::Chemical));
    let notes = by_rule(&sink, "check-ph");
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Error);
}

#[test]
fn ph_bounds_are_inclusive() {
    for value in [6.5, 8.5] {
        let (category, count, sink) = diagnose(vec![water::reading(Parameter::Ph, value)]);
        assert_eq!(count, 0, "pH {value}");
        assert_eq!(category, None);
        assert_eq!(by_rule(&sink, "check-ph")[0].severity, Severity::Success);
    }
}

#[test]
fn turbidity_is_physical() {
    let (category, count, _) = diagnose(vec![water::reading(Parameter::Turbidity, 7.0)]);
    assert_eq!(count, 1);
    assert_eq!(category, Some(InterventionCategory::Physical));
}

#[test]
fn integer_readings_are_numbers() {
    let (_, count, _) = diagnose(vec![water::reading_value("sulfate", 300)]);
    assert_eq!(count, 1);
}

#[test]
fn unknown_parameters_are_ignored() {
    let (category, count, sink) = diagnose(vec![water::reading_value("radon", 99.0)]);
    assert_eq!(count, 0);
    assert_eq!(category, None);
    assert_eq!(sink.len(), 1);
}

#[test]
fn oracle_thresholds_override_defaults() {
    struct Strict;
    impl ThresholdOracle for Strict {
        fn lookup(&self, class: &str, property: &str) -> Result<f64, OracleError> {
            match (class, property) {
                ("Sulfate", "max") => Ok(200.0),
                _ => Err(OracleError::NotFound {
                    class: class.to_string(),
                    property: property.to_string(),
                }),
            }
        }
    }

    let facts = vec![water::reading(Parameter::Sulfate, 220.0)];
    let (_, lenient, _) = diagnose_with(&rules(), &NoOntology, facts.clone());
    let (_, strict, _) = diagnose_with(&rules(), &Strict, facts);
    assert_eq!(lenient, 0);
    assert_eq!(strict, 1);
}

proptest! {
    #[test]
    fn ph_classification(value in 0.0f64..14.0) {
        let (_, count, sink) = diagnose(vec![water::reading(Parameter::Ph, value)]);
        let notes = by_rule(&sink, "check-ph");
        prop_assert_eq!(notes.len(), 1);
        if value < 6.5 || value > 8.5 {
            prop_assert_eq!(count, 1);
            prop_assert_eq!(notes[0].severity, Severity::Error);
        } else {
            prop_assert_eq!(count, 0);
            prop_assert_eq!(notes[0].severity, Severity::Success);
        }
    }
}

// =============================================================================
// Corrosion and Categories
// =============================================================================

#[test]
fn corrosion_in_either_order() {
    let ph = water::reading(Parameter::Ph, 5.0);
    let sulfate = water::reading(Parameter::Sulfate, 250.0);

    let (forward, _, _) = diagnose(vec![ph.clone(), sulfate.clone()]);
    let (backward, _, _) = diagnose(vec![sulfate, ph]);
    assert_eq!(forward, Some(InterventionCategory::Critical));
    assert_eq!(backward, Some(InterventionCategory::Critical));
}

#[test]
fn corrosion_notifies_once() {
    let (_, _, sink) = diagnose(vec![
        water::reading(Parameter::Ph, 5.0),
        water::reading(Parameter::Sulfate, 300.0),
    ]);
    assert_eq!(by_rule(&sink, "detect-corrosion").len(), 1);
}

#[test]
fn critical_is_never_downgraded() {
    let rules = rules();
    let mut session = Session::new(&rules, EngineConfig::default());
    let mut sink = Vec::new();
    session.assert_all([
        water::reading(Parameter::Ph, 5.0),
        water::reading(Parameter::Sulfate, 300.0),
    ]);
    session.run(&NoOntology, &mut sink).unwrap();
    assert_eq!(
        session.diagnosis().intervention(),
        Some(InterventionCategory::Critical)
    );

    session.assert(water::reading(Parameter::Turbidity, 9.0));
    session.run(&NoOntology, &mut sink).unwrap();
    assert_eq!(
        session.diagnosis().intervention(),
        Some(InterventionCategory::Critical)
    );
    assert_eq!(session.diagnosis().problem_count(), 3);
}

#[test]
fn physical_wins_over_chemical() {
    let (category, count, _) = diagnose(vec![
        water::reading(Parameter::Ph, 9.0),
        water::reading(Parameter::Turbidity, 9.0),
    ]);
    assert_eq!(count, 2);
    assert_eq!(category, Some(InterventionCategory::Physical));
}

// =============================================================================
// Idempotence and Observations
// =============================================================================

#[test]
fn reasserting_does_not_double_count() {
    let rules = rules();
    let mut session = Session::new(&rules, EngineConfig::default());
    let mut sink = Vec::new();
    let reading = water::reading(Parameter::Turbidity, 9.0);

    session.assert(reading.clone());
    session.run(&NoOntology, &mut sink).unwrap();
    let notified = sink.len();

    let (_, is_new) = session.assert(reading);
    session.run(&NoOntology, &mut sink).unwrap();

    assert!(!is_new);
    assert_eq!(session.diagnosis().problem_count(), 1);
    assert_eq!(sink.len(), notified);
}

#[test]
fn every_reading_alarms_but_a_problem_counts_once() {
    let (category, count, sink) = diagnose(vec![
        water::reading(Parameter::Ph, 5.0),
        water::reading(Parameter::Ph, 4.0),
    ]);
    let alarms = by_rule(&sink, "check-ph");
    assert_eq!(alarms.len(), 2);
    assert!(alarms.iter().all(|n| n.severity == Severity::Error));
    assert_eq!(count, 1);
    assert_eq!(category, Some(InterventionCategory::Chemical));
}

#[test]
fn turbid_observation_is_cross_checked() {
    let (_, _, confirmed) = diagnose(vec![
        water::observation(Observation::Turbid),
        water::reading(Parameter::Turbidity, 9.0),
    ]);
    let (_, _, unconfirmed) = diagnose(vec![
        water::observation(Observation::Turbid),
        water::reading(Parameter::Turbidity, 1.0),
    ]);
    assert_eq!(by_rule(&confirmed, "turbid-confirmed").len(), 1);
    assert!(by_rule(&confirmed, "turbid-unconfirmed").is_empty());
    assert_eq!(
        by_rule(&unconfirmed, "turbid-unconfirmed")[0].severity,
        Severity::Warning
    );
}

#[test]
fn observations_alone_are_not_problems() {
    let (category, count, sink) = diagnose(vec![
        water::observation(Observation::Odor),
        water::observation(Observation::Sediment),
    ]);
    assert_eq!(count, 0);
    assert_eq!(category, None);
    assert_eq!(by_rule(&sink, "observe-odor").len(), 1);
    assert_eq!(by_rule(&sink, "observe-sediment").len(), 1);
}
