//! Condition patterns and matching for the rule engine.
//!
//! A rule's left-hand side is a [`Condition`]: fact patterns combined with
//! AND/OR. The [`PatternMatcher`] interprets a condition against a
//! [`FactStore`] and returns every consistent binding set together with the
//! ids of the facts that produced it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use hydrolab_foundation::{Fact, Value};
use hydrolab_storage::{AttributeFilter, FactId, FactStore, ValuePredicate};

// =============================================================================
// Predicates
// =============================================================================

/// A named unary predicate over an attribute value.
#[derive(Clone)]
pub struct Predicate {
    name: Arc<str>,
    test: ValuePredicate,
}

impl Predicate {
    /// Creates a predicate from a closure.
    #[must_use]
    pub fn new<F>(name: impl Into<Arc<str>>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            test: Arc::new(test),
        }
    }

    /// Accepts any numeric value.
    #[must_use]
    pub fn is_number() -> Self {
        Self::new("number?", Value::is_number)
    }

    /// Accepts numbers strictly below `limit`.
    #[must_use]
    pub fn below(limit: f64) -> Self {
        Self::new(format!("< {limit}"), move |v| {
            v.as_number().is_some_and(|n| n < limit)
        })
    }

    /// Accepts numbers strictly above `limit`.
    #[must_use]
    pub fn above(limit: f64) -> Self {
        Self::new(format!("> {limit}"), move |v| {
            v.as_number().is_some_and(|n| n > limit)
        })
    }

    /// Returns the predicate's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluates the predicate.
    #[must_use]
    pub fn eval(&self, value: &Value) -> bool {
        (self.test)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self.name)
    }
}

// =============================================================================
// Fact Patterns
// =============================================================================

/// A constraint on one attribute of a fact.
#[derive(Clone, Debug)]
pub enum FieldTest {
    /// The attribute must equal this value.
    Equals(Value),
    /// Bind the attribute to a variable, or check it against the existing
    /// binding if the variable is already bound.
    Bind(String),
    /// The attribute must satisfy the predicate.
    Predicate(Predicate),
}

/// A pattern over facts of one kind.
///
/// Equality and predicate tests are pushed down to the store as
/// [`AttributeFilter`]s; variable tests are resolved by the matcher because
/// they depend on bindings from earlier conditions.
#[derive(Clone, Debug)]
pub struct FactPattern {
    kind: Arc<str>,
    filters: Vec<AttributeFilter>,
    binds: Vec<(Arc<str>, String)>,
}

impl FactPattern {
    /// Creates a pattern matching every fact of `kind`.
    #[must_use]
    pub fn new(kind: impl Into<Arc<str>>) -> Self {
        Self {
            kind: kind.into(),
            filters: Vec::new(),
            binds: Vec::new(),
        }
    }

    /// Adds a test on an attribute. An attribute may carry several tests.
    #[must_use]
    pub fn with_test(mut self, attribute: impl Into<Arc<str>>, test: FieldTest) -> Self {
        let attribute = attribute.into();
        let filter = match test {
            FieldTest::Equals(value) => AttributeFilter::Equals { attribute, value },
            FieldTest::Predicate(predicate) => AttributeFilter::Satisfies {
                attribute,
                name: predicate.name,
                test: predicate.test,
            },
            FieldTest::Bind(var) => {
                self.binds.push((attribute, var));
                return self;
            }
        };
        self.filters.push(filter);
        self
    }

    /// Requires `attribute == value`.
    #[must_use]
    pub fn equals(self, attribute: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.with_test(attribute, FieldTest::Equals(value.into()))
    }

    /// Binds `attribute` to `var`.
    #[must_use]
    pub fn bind(self, attribute: impl Into<Arc<str>>, var: impl Into<String>) -> Self {
        self.with_test(attribute, FieldTest::Bind(var.into()))
    }

    /// Requires `attribute` to satisfy `predicate`.
    #[must_use]
    pub fn test(self, attribute: impl Into<Arc<str>>, predicate: Predicate) -> Self {
        self.with_test(attribute, FieldTest::Predicate(predicate))
    }

    /// Binds `attribute` to `var`, matching only numeric values.
    #[must_use]
    pub fn bind_number(self, attribute: impl Into<Arc<str>>, var: impl Into<String>) -> Self {
        let attribute = attribute.into();
        self.test(Arc::clone(&attribute), Predicate::is_number())
            .bind(attribute, var)
    }

    /// Returns the fact kind this pattern matches.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the store-side filters.
    #[must_use]
    pub fn filters(&self) -> &[AttributeFilter] {
        &self.filters
    }

    /// Returns the variables this pattern binds.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.binds.iter().map(|(_, var)| var.as_str())
    }

    /// Extends `bindings` with this pattern's variables for `fact`.
    ///
    /// Returns `None` when an attribute is missing or conflicts with an
    /// existing binding.
    fn bind_fact(&self, fact: &Fact, bindings: &Bindings) -> Option<Bindings> {
        let mut result = bindings.clone();
        for (attribute, var) in &self.binds {
            let value = fact.get(attribute)?;
            match result.get(var) {
                Some(existing) if existing != value => return None,
                Some(_) => {}
                None => result.set(var.clone(), value.clone()),
            }
        }
        Some(result)
    }
}

// =============================================================================
// Conditions
// =============================================================================

/// A rule condition: a fact pattern or an AND/OR combination.
#[derive(Clone, Debug)]
pub enum Condition {
    /// Match a single fact.
    Pattern(FactPattern),
    /// Every sub-condition must match, left to right. Empty is always true.
    And(Vec<Condition>),
    /// Any sub-condition may match. Empty is always false.
    Or(Vec<Condition>),
}

impl Condition {
    /// Combines conditions with AND.
    #[must_use]
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::And(conditions.into_iter().collect())
    }

    /// Combines conditions with OR.
    #[must_use]
    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::Or(conditions.into_iter().collect())
    }

    /// Number of fact patterns in this condition.
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        match self {
            Self::Pattern(_) => 1,
            Self::And(items) | Self::Or(items) => items.iter().map(Self::pattern_count).sum(),
        }
    }
}

impl From<FactPattern> for Condition {
    fn from(pattern: FactPattern) -> Self {
        Self::Pattern(pattern)
    }
}

// =============================================================================
// Bindings
// =============================================================================

/// Variable bindings produced by matching.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, Value>,
}

impl Bindings {
    /// Create empty bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a binding by variable name.
    #[must_use]
    pub fn get(&self, var: &str) -> Option<&Value> {
        self.values.get(var)
    }

    /// Get a binding as a number.
    #[must_use]
    pub fn number(&self, var: &str) -> Option<f64> {
        self.get(var).and_then(Value::as_number)
    }

    /// Get a binding as a string.
    #[must_use]
    pub fn text(&self, var: &str) -> Option<&str> {
        self.get(var).and_then(Value::as_str)
    }

    /// Set a binding.
    pub fn set(&mut self, var: String, value: Value) {
        self.values.insert(var, value);
    }

    /// Iterate all bindings in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// =============================================================================
// Pattern Matching
// =============================================================================

/// One way a condition is satisfied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Match {
    /// Variable bindings.
    pub bindings: Bindings,
    /// Facts that satisfied the condition's patterns, in condition order.
    pub facts: Vec<FactId>,
}

/// Interprets conditions against a fact store.
pub struct PatternMatcher;

impl PatternMatcher {
    /// Find every match of `condition` in `store`.
    ///
    /// Matches are produced in condition order, and within a pattern in fact
    /// insertion order, so the result is deterministic.
    #[must_use]
    pub fn match_condition(condition: &Condition, store: &FactStore) -> Vec<Match> {
        Self::extend(condition, store, Match::default())
    }

    fn extend(condition: &Condition, store: &FactStore, partial: Match) -> Vec<Match> {
        match condition {
            Condition::Pattern(pattern) => store
                .query(pattern.kind(), pattern.filters())
                .filter_map(|(id, fact)| {
                    let bindings = pattern.bind_fact(fact, &partial.bindings)?;
                    let mut facts = partial.facts.clone();
                    facts.push(id);
                    Some(Match { bindings, facts })
                })
                .collect(),
            Condition::And(items) => {
                let mut current = vec![partial];
                for item in items {
                    current = current
                        .into_iter()
                        .flat_map(|m| Self::extend(item, store, m))
                        .collect();
                    if current.is_empty() {
                        break;
                    }
                }
                current
            }
            Condition::Or(items) => items
                .iter()
                .flat_map(|item| Self::extend(item, store, partial.clone()))
                .collect(),
        }
    }
}
