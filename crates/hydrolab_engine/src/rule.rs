//! Rules, the rule base, and activations.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use hydrolab_foundation::{Error, Result};
use hydrolab_storage::FactId;

use crate::engine::ActionContext;
use crate::pattern::{Bindings, Condition};

/// A rule's right-hand side.
pub type Action = Arc<dyn Fn(&Bindings, &mut ActionContext<'_>) + Send + Sync>;

// =============================================================================
// Rule
// =============================================================================

/// A named condition-action rule.
#[derive(Clone)]
pub struct Rule {
    /// Unique rule name
    pub name: Arc<str>,
    /// Priority (higher fires first)
    pub salience: i32,
    /// Left-hand side
    pub condition: Condition,
    /// Right-hand side
    pub action: Action,
    order: usize,
}

impl Rule {
    /// Creates a rule with salience 0.
    #[must_use]
    pub fn new<F>(name: impl Into<Arc<str>>, condition: impl Into<Condition>, action: F) -> Self
    where
        F: Fn(&Bindings, &mut ActionContext<'_>) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            salience: 0,
            condition: condition.into(),
            action: Arc::new(action),
            order: 0,
        }
    }

    /// Sets the salience (priority).
    #[must_use]
    pub fn with_salience(mut self, salience: i32) -> Self {
        self.salience = salience;
        self
    }

    /// Position of the rule in its rule base (registration order).
    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Runs the action.
    pub fn fire(&self, bindings: &Bindings, ctx: &mut ActionContext<'_>) {
        (self.action)(bindings, ctx);
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("salience", &self.salience)
            .field("order", &self.order)
            .field("condition", &self.condition)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Rule Base
// =============================================================================

/// An ordered set of uniquely named rules.
///
/// Immutable once built and shareable across runs.
#[derive(Clone, Debug, Default)]
pub struct RuleBase {
    rules: Vec<Rule>,
    by_name: HashMap<Arc<str>, usize>,
}

impl RuleBase {
    /// Creates an empty rule base.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule, assigning its registration order.
    ///
    /// # Errors
    /// Returns [`hydrolab_foundation::ErrorKind::DuplicateRule`] if the name
    /// is taken.
    pub fn add(&mut self, mut rule: Rule) -> Result<()> {
        if self.by_name.contains_key(&rule.name) {
            return Err(Error::duplicate_rule(rule.name.as_ref()));
        }
        rule.order = self.rules.len();
        self.by_name.insert(Arc::clone(&rule.name), rule.order);
        self.rules.push(rule);
        Ok(())
    }

    /// Builder form of [`RuleBase::add`].
    ///
    /// # Errors
    /// Returns an error if the name is taken.
    pub fn with(mut self, rule: Rule) -> Result<Self> {
        self.add(rule)?;
        Ok(self)
    }

    /// Looks up a rule by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.by_name.get(name).map(|&i| &self.rules[i])
    }

    /// Iterates rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Returns the rules as a slice.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// =============================================================================
// Activation
// =============================================================================

/// Refraction key: a rule fires at most once per combination of facts.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActivationKey {
    /// Rule registration order
    pub rule: usize,
    /// Matched facts
    pub facts: Vec<FactId>,
}

/// A rule activation ready to fire.
#[derive(Clone, Debug)]
pub struct Activation {
    /// Rule registration order
    pub rule: usize,
    /// Rule name
    pub rule_name: Arc<str>,
    /// Rule salience
    pub salience: i32,
    /// Variable bindings from the match
    pub bindings: Bindings,
    /// Matched facts, in condition order
    pub facts: Vec<FactId>,
}

impl Activation {
    /// Computes the refraction key.
    #[must_use]
    pub fn key(&self) -> ActivationKey {
        ActivationKey {
            rule: self.rule,
            facts: self.facts.clone(),
        }
    }

    /// Conflict-resolution order: salience descending, then registration
    /// order, then matched fact ids.
    #[must_use]
    pub fn priority_cmp(&self, other: &Self) -> Ordering {
        other
            .salience
            .cmp(&self.salience)
            .then_with(|| self.rule.cmp(&other.rule))
            .then_with(|| self.facts.cmp(&other.facts))
    }
}
