//! Integration tests for AttributeFilter and store queries

use hydrolab_foundation::{Fact, Value};
use hydrolab_storage::{AttributeFilter, FactStore};

fn store() -> FactStore {
    let mut store = FactStore::new();
    for (param, value) in [("ph", 5.0), ("sulfate", 300.0), ("ph", 7.0)] {
        store.assert(
            Fact::build("reading")
                .with("param", param)
                .with("value", value)
                .finish(),
        );
    }
    store.assert(Fact::build("reading").with("param", "ph").finish());
    store
}

#[test]
fn equals_filter() {
    let store = store();
    let filters = [AttributeFilter::equals("param", "ph")];
    assert_eq!(store.query("reading", &filters).count(), 3);
}

#[test]
fn satisfies_filter() {
    let store = store();
    let filters = [
        AttributeFilter::equals("param", "ph"),
        AttributeFilter::satisfies("value", "acidic", |v: &Value| {
            v.as_number().is_some_and(|n| n < 6.5)
        }),
    ];
    let hits: Vec<_> = store.query("reading", &filters).collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].1.get("value"), Some(&Value::Float(5.0)));
}

#[test]
fn predicate_filter_skips_incomplete_facts() {
    let store = store();
    let filters = [AttributeFilter::satisfies("value", "any", |_| true)];
    assert_eq!(store.query("reading", &filters).count(), 3);
}

#[test]
fn filters_report_their_attribute() {
    assert_eq!(AttributeFilter::equals("param", "ph").attribute(), "param");
    let filter = AttributeFilter::satisfies("value", "number", Value::is_number);
    assert_eq!(filter.attribute(), "value");
}

#[test]
fn missing_attribute_never_equals() {
    let fact = Fact::marker("reading");
    assert!(!AttributeFilter::equals("param", "ph").accepts(&fact));
}
