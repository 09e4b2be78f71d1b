//! Integration tests for the rule engine
//!
//! Tests activation finding, conflict resolution, chaining, refraction and
//! the activation limit.

use std::sync::Arc;

use hydrolab_engine::{
    EngineConfig, FactPattern, NoOntology, Notification, Rule, RuleBase, RuleEngine, Session,
    Severity,
};
use hydrolab_foundation::{ErrorKind, Fact, SemanticLimit, Value};

fn say(name: &str) -> Rule {
    let text = name.to_string();
    Rule::new(name, FactPattern::new("start"), move |_, ctx| {
        ctx.notify(Severity::Info, text.clone());
    })
}

fn messages(sink: &[Notification]) -> Vec<&str> {
    sink.iter().map(|n| n.message.as_str()).collect()
}

fn run(rules: &RuleBase, facts: Vec<Fact>) -> Vec<Notification> {
    let mut session = Session::new(rules, EngineConfig::default());
    session.assert_all(facts);
    let mut sink = Vec::new();
    session.run(&NoOntology, &mut sink).unwrap();
    sink
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn duplicate_names_are_rejected() {
    let err = RuleBase::new()
        .with(say("a"))
        .and_then(|rules| rules.with(say("a")))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateRule(ref name) if name == "a"));
}

#[test]
fn rules_are_kept_in_declaration_order() {
    let rules = RuleBase::new()
        .with(say("first"))
        .and_then(|r| r.with(say("second")))
        .unwrap();
    let names: Vec<_> = rules.iter().map(|r| &*r.name).collect();
    assert_eq!(names, ["first", "second"]);
    assert_eq!(rules.get("second").map(Rule::order), Some(1));
}

// =============================================================================
// Conflict Resolution
// =============================================================================

#[test]
fn declaration_order_breaks_ties() {
    let rules = RuleBase::new()
        .with(say("b"))
        .and_then(|r| r.with(say("a")))
        .and_then(|r| r.with(say("c")))
        .unwrap();
    let sink = run(&rules, vec![Fact::marker("start")]);
    assert_eq!(messages(&sink), ["b", "a", "c"]);
}

#[test]
fn salience_orders_firing() {
    let rules = RuleBase::new()
        .with(say("late").with_salience(-5))
        .and_then(|r| r.with(say("normal")))
        .and_then(|r| r.with(say("early").with_salience(5)))
        .unwrap();
    let sink = run(&rules, vec![Fact::marker("start")]);
    assert_eq!(messages(&sink), ["early", "normal", "late"]);
}

// =============================================================================
// Chaining and Refraction
// =============================================================================

#[test]
fn derived_facts_trigger_later_rules() {
    let rules = RuleBase::new()
        .with(Rule::new("derive", FactPattern::new("start"), |_, ctx| {
            ctx.assert(Fact::marker("derived"));
        }))
        .and_then(|r| {
            r.with(Rule::new("react", FactPattern::new("derived"), |_, ctx| {
                ctx.notify(Severity::Success, "reacted");
            }))
        })
        .unwrap();

    let mut session = Session::new(&rules, EngineConfig::default());
    session.assert(Fact::marker("start"));
    let mut sink = Vec::new();
    let summary = session.run(&NoOntology, &mut sink).unwrap();

    assert_eq!(summary.fired, 2);
    assert_eq!(summary.asserted, 1);
    assert_eq!(messages(&sink), ["reacted"]);
}

#[test]
fn each_fact_fires_a_rule_once() {
    let rules = RuleBase::new()
        .with(Rule::new(
            "per-reading",
            FactPattern::new("reading").bind("param", "p"),
            |bindings, ctx| {
                let param = bindings.text("p").unwrap_or("?").to_string();
                ctx.notify(Severity::Info, param);
            },
        ))
        .unwrap();

    let reading = |p: &str| Fact::build("reading").with("param", p).finish();
    let readings = vec![reading("ph"), reading("sulfate"), reading("ph")];
    let sink = run(&rules, readings);
    assert_eq!(messages(&sink), ["ph", "sulfate"]);
}

#[test]
fn engine_reports_activation_count() {
    let rules = RuleBase::new().with(say("once")).unwrap();
    let engine = RuleEngine::new(EngineConfig::default());
    let mut state = engine.new_state();
    state.assert(Fact::marker("start"));

    let mut sink = Vec::new();
    engine
        .run_to_quiescence(&rules, &mut state, &NoOntology, &mut sink)
        .unwrap();
    assert_eq!(state.activation_count(), 1);
    assert!(engine.find_activations(&rules, &state).is_empty());
}

// =============================================================================
// Kill Switch
// =============================================================================

fn runaway() -> RuleBase {
    RuleBase::new()
        .with(Rule::new(
            "count-up",
            FactPattern::new("counter").bind("n", "n"),
            |bindings, ctx| {
                let n = bindings.get("n").and_then(Value::as_int).unwrap_or(0);
                ctx.assert(Fact::build("counter").with("n", n + 1).finish());
            },
        ))
        .unwrap()
}

#[test]
fn runaway_rules_hit_the_limit() {
    let rules = runaway();
    let mut session = Session::new(&rules, EngineConfig::default().with_max_activations(25));
    session.assert(Fact::build("counter").with("n", 0).finish());

    let mut sink = Vec::new();
    let err = session.run(&NoOntology, &mut sink).unwrap_err();

    match err.kind {
        ErrorKind::LimitExceeded(SemanticLimit::MaxActivations { limit, rule }) => {
            assert_eq!(limit, 25);
            assert_eq!(rule.as_deref(), Some("count-up"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(session.state().activation_count(), 25);
}

#[test]
fn rule_bases_are_shareable() {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}
    let rules = Arc::new(runaway());
    assert_send_sync(&rules);
}
