//! Integration tests for the firing journal and explanations

use hydrolab_engine::water::{self, Parameter};
use hydrolab_engine::{EngineConfig, EngineState, NoOntology, Session, TraceEvent};

fn traced(config: EngineConfig) -> EngineState {
    let rules = water::rule_base().unwrap();
    let mut session = Session::new(&rules, config);
    session.assert(water::start());
    session.assert(water::reading(Parameter::Ph, 5.0));
    session.assert(water::reading(Parameter::Sulfate, 300.0));
    let mut sink = Vec::new();
    session.run(&NoOntology, &mut sink).unwrap();
    session.into_state()
}

#[test]
fn journal_records_firings_and_assertions() {
    let state = traced(EngineConfig::debug());
    let journal = state.journal();

    assert!(!journal.by_event_type("fired").is_empty());
    assert!(!journal.by_event_type("asserted").is_empty());
    let changes = journal.by_event_type("intervention");
    assert!(matches!(
        changes.last().map(|r| &r.event),
        Some(TraceEvent::InterventionChanged { to, .. }) if to.as_str() == "critical"
    ));
}

#[test]
fn explain_critical_fact() {
    let state = traced(EngineConfig::debug());
    let explanation = state.explain_fact(&water::critical_problem()).unwrap();

    assert_eq!(explanation.rule.as_deref(), Some("detect-corrosion"));
    assert_eq!(explanation.premises.len(), 2);
    assert!(explanation.premises.iter().all(|p| p.rule.is_none()));

    let text = explanation.to_string();
    assert!(text.contains("<- detect-corrosion"));
    assert!(text.contains("  "));
    assert!(text.contains("<- asserted"));
}

#[test]
fn explain_without_journal_has_no_rule() {
    let state = traced(EngineConfig::default());
    assert!(state.journal().is_empty());
    let explanation = state
        .explain_fact(&water::problem(Parameter::Ph, "acidic"))
        .unwrap();
    assert!(explanation.rule.is_none());
    assert!(explanation.premises.is_empty());
}

#[test]
fn small_journal_keeps_recent_records() {
    let state = traced(EngineConfig::debug().with_journal_size(4));
    let journal = state.journal();
    assert_eq!(journal.len(), 4);
    assert_eq!(journal.recent(2).len(), 2);
}

#[test]
fn unknown_fact_has_no_explanation() {
    let state = traced(EngineConfig::debug());
    let turbid = water::problem(Parameter::Turbidity, "high");
    assert!(state.explain_fact(&turbid).is_none());
}
