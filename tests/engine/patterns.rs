//! Integration tests for pattern matching
//!
//! Tests conditions against a fact store without firing rules.

use hydrolab_engine::{Condition, FactPattern, PatternMatcher, Predicate};
use hydrolab_foundation::Fact;
use hydrolab_storage::FactStore;

fn reading(param: &str, value: f64) -> Fact {
    Fact::build("reading")
        .with("param", param)
        .with("value", value)
        .finish()
}

fn param_is(param: &str) -> Condition {
    FactPattern::new("reading").equals("param", param).into()
}

fn store(readings: &[(&str, f64)]) -> FactStore {
    let mut store = FactStore::new();
    for (param, value) in readings {
        store.assert(reading(param, *value));
    }
    store
}

// =============================================================================
// Single Patterns
// =============================================================================

#[test]
fn pattern_matches_each_fact_in_order() {
    let store = store(&[("ph", 5.0), ("sulfate", 300.0), ("ph", 7.0)]);
    let pattern = FactPattern::new("reading")
        .equals("param", "ph")
        .bind_number("value", "v");

    let matches = PatternMatcher::match_condition(&pattern.into(), &store);
    let values: Vec<_> = matches
        .iter()
        .filter_map(|m| m.bindings.number("v"))
        .collect();
    assert_eq!(values, [5.0, 7.0]);
}

#[test]
fn predicates_are_strict() {
    let store = store(&[("ph", 6.0), ("ph", 5.9)]);
    let pattern = FactPattern::new("reading").test("value", Predicate::below(6.0));
    assert_eq!(
        PatternMatcher::match_condition(&pattern.into(), &store).len(),
        1
    );
}

#[test]
fn custom_predicate() {
    let store = store(&[("ph", 6.0), ("ph", 7.0)]);
    let even = Predicate::new("even", |v| v.as_number().is_some_and(|n| n % 2.0 == 0.0));
    assert_eq!(even.name(), "even");
    let pattern = FactPattern::new("reading").test("value", even);
    assert_eq!(
        PatternMatcher::match_condition(&pattern.into(), &store).len(),
        1
    );
}

#[test]
fn pattern_reports_its_variables() {
    let pattern = FactPattern::new("reading")
        .bind("param", "p")
        .bind_number("value", "v");
    let vars: Vec<_> = pattern.variables().collect();
    assert_eq!(vars, ["p", "v"]);
    assert_eq!(pattern.kind(), "reading");
}

// =============================================================================
// Combinations
// =============================================================================

#[test]
fn and_requires_every_branch() {
    let condition = Condition::all([
        FactPattern::new("reading")
            .equals("param", "ph")
            .test("value", Predicate::below(6.0))
            .into(),
        FactPattern::new("reading")
            .equals("param", "sulfate")
            .test("value", Predicate::above(200.0))
            .into(),
    ]);

    let both = store(&[("ph", 5.0), ("sulfate", 300.0)]);
    let one = store(&[("ph", 5.0), ("sulfate", 100.0)]);
    assert_eq!(PatternMatcher::match_condition(&condition, &both).len(), 1);
    assert!(PatternMatcher::match_condition(&condition, &one).is_empty());
}

#[test]
fn and_is_order_independent_in_the_store() {
    let condition = Condition::all([param_is("ph"), param_is("sulfate")]);
    let forward = store(&[("ph", 5.0), ("sulfate", 300.0)]);
    let backward = store(&[("sulfate", 300.0), ("ph", 5.0)]);
    assert_eq!(
        PatternMatcher::match_condition(&condition, &forward).len(),
        1
    );
    assert_eq!(
        PatternMatcher::match_condition(&condition, &backward).len(),
        1
    );
}

#[test]
fn empty_and_or() {
    let store = store(&[]);
    assert_eq!(
        PatternMatcher::match_condition(&Condition::all([]), &store).len(),
        1
    );
    assert!(PatternMatcher::match_condition(&Condition::any([]), &store).is_empty());
}

#[test]
fn nested_conditions_count_patterns() {
    let condition = Condition::all([
        FactPattern::new("a").into(),
        Condition::any([FactPattern::new("b").into(), FactPattern::new("c").into()]),
    ]);
    assert_eq!(condition.pattern_count(), 3);
}
