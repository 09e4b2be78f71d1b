//! End-to-end sample analyses

use hydrolab::engine::water::{Observation, Parameter};
use hydrolab::engine::{Evidence, InterventionCategory, NoOntology, Severity};
use hydrolab::runtime::{
    Oracles, Report, RuntimeConfig, Sample, StaticOntology, TabularRiskModel, analyze,
};
use hydrolab::scheduler::model::{EMERGENCY_TEAM, SAFETY_OFFICER};
use hydrolab::scheduler::schedule;

fn run(sample: &Sample) -> Report {
    run_traced(sample, false)
}

fn run_traced(sample: &Sample, trace: bool) -> Report {
    let rules = hydrolab::engine::water::rule_base().unwrap();
    let ontology = StaticOntology::standard();
    let model = TabularRiskModel::default();
    let oracles = Oracles {
        thresholds: &ontology,
        semantics: &ontology,
        risk: &model,
    };
    analyze(&rules, sample, &oracles, &RuntimeConfig::default(), trace).unwrap()
}

#[test]
fn corrosive_sample_needs_emergency_response() {
    let sample = Sample::new()
        .with_reading(Parameter::Ph, 5.0)
        .with_reading(Parameter::Sulfate, 300.0)
        .with_reading(Parameter::Turbidity, 2.0);
    let report = run(&sample);

    assert!(report.diagnosis.problem_count() >= 2);
    assert_eq!(report.intervention(), Some(InterventionCategory::Critical));
    assert_eq!(report.corrosive, Some(true));
    assert_eq!(report.schedule, schedule("critical"));
    for slot in &report.schedule {
        assert!(
            slot.staff == EMERGENCY_TEAM || slot.staff == SAFETY_OFFICER,
            "{slot}"
        );
    }

    let text = report.to_string();
    assert!(text.contains("CORROSIVE WATER"));
    assert!(text.contains("Intervention: critical (Emergency Response)"));
    assert!(text.contains("== Schedule =="));
}

#[test]
fn clean_sample_is_potable() {
    let sample = Sample::new()
        .with_reading(Parameter::Ph, 7.0)
        .with_reading(Parameter::Sulfate, 100.0)
        .with_reading(Parameter::Turbidity, 1.0);
    let report = run(&sample);

    assert!(report.diagnosis.is_potable());
    assert_eq!(report.intervention(), None);
    assert!(report.schedule.is_empty());
    for note in &report.notifications {
        let benign = matches!(note.severity, Severity::Info | Severity::Success);
        assert!(benign, "{note}");
    }

    let text = report.to_string();
    assert!(text.contains("Water is potable."));
    assert!(!text.contains("== Schedule =="));
}

#[test]
fn chemical_problem_books_the_chemistry_lab() {
    let report = run(&Sample::new().with_reading(Parameter::Chloramines, 6.0));
    assert_eq!(report.intervention(), Some(InterventionCategory::Chemical));
    assert_eq!(report.schedule.len(), 9);
    assert!(report.to_string().contains("Chemical Analysis Lab"));
}

#[test]
fn physical_problem_books_the_physical_lab() {
    let sample = Sample::new()
        .with_observation(Observation::Turbid)
        .with_reading(Parameter::Turbidity, 8.0)
        .with_reading(Parameter::Solids, 1500.0);
    let report = run(&sample);
    assert_eq!(report.intervention(), Some(InterventionCategory::Physical));
    assert_eq!(report.diagnosis.problem_count(), 2);
    assert_eq!(report.schedule.len(), 10);
    let rules: Vec<_> = report.notifications.iter().map(|n| &*n.rule).collect();
    assert!(rules.contains(&"turbid-confirmed"));
}

#[test]
fn order_of_readings_does_not_matter() {
    let forward = Sample::new()
        .with_reading(Parameter::Ph, 5.5)
        .with_reading(Parameter::Sulfate, 260.0);
    let backward = Sample::new()
        .with_reading(Parameter::Sulfate, 260.0)
        .with_reading(Parameter::Ph, 5.5);

    let (forward, backward) = (run(&forward), run(&backward));
    assert_eq!(forward.diagnosis, backward.diagnosis);
    assert_eq!(forward.intervention(), Some(InterventionCategory::Critical));
}

#[test]
fn environmental_risk_is_reported() {
    let risky = Sample::new().with_evidence(Evidence {
        industry_nearby: true,
        heavy_rain: true,
    });
    let report = run(&risky);
    assert!(report.risk.elevated);
    assert!(!report.risk.fallback);
    assert!((report.risk.probability - 0.6568).abs() < 1e-4);
    assert!(report.to_string().contains("HIGH RISK"));

    let quiet = run(&Sample::new());
    assert!(!quiet.risk.elevated);
    assert!((quiet.risk.probability - 0.0783).abs() < 1e-4);
}

#[test]
fn trace_explains_the_critical_problem() {
    let sample = Sample::new()
        .with_reading(Parameter::Ph, 5.0)
        .with_reading(Parameter::Sulfate, 300.0);
    let report = run_traced(&sample, true);

    let corrosion = report
        .explanations
        .iter()
        .find(|e| e.rule.as_deref() == Some("detect-corrosion"))
        .unwrap();
    assert_eq!(corrosion.premises.len(), 2);
    assert!(report.to_string().contains("== Trace =="));
}

#[test]
fn engine_works_without_an_ontology() {
    let rules = hydrolab::engine::water::rule_base().unwrap();
    let ontology = StaticOntology::new();
    let model = TabularRiskModel::default();
    let oracles = Oracles {
        thresholds: &NoOntology,
        semantics: &ontology,
        risk: &model,
    };
    let sample = Sample::new()
        .with_reading(Parameter::Ph, 5.0)
        .with_reading(Parameter::Sulfate, 300.0);
    let report = analyze(&rules, &sample, &oracles, &RuntimeConfig::default(), false).unwrap();

    assert_eq!(report.intervention(), Some(InterventionCategory::Critical));
    assert_eq!(report.corrosive, Some(true));
}

#[test]
fn semantic_check_needs_both_readings() {
    let report = run(&Sample::new().with_reading(Parameter::Ph, 5.0));
    assert_eq!(report.corrosive, None);
    assert_eq!(report.intervention(), Some(InterventionCategory::Chemical));
    let text = report.to_string();
    assert!(text.contains("Not available (needs pH and sulfate)"));
}
