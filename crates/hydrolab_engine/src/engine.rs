//! Forward-chaining inference engine.
//!
//! The engine repeatedly matches every rule against the fact store,
//! picks one activation by conflict resolution, and fires it, until no
//! unrefracted activation remains.

use std::collections::HashSet;
use std::sync::Arc;

use hydrolab_foundation::{Error, ErrorKind, Fact, Result, SemanticLimit};
use hydrolab_storage::{FactId, FactStore};

use crate::config::EngineConfig;
use crate::diagnosis::{DiagnosisState, InterventionCategory};
use crate::journal::{Explanation, Journal, TraceEvent};
use crate::notify::{Notification, NotificationSink, Severity};
use crate::oracle::ThresholdOracle;
use crate::pattern::PatternMatcher;
use crate::rule::{Activation, ActivationKey, RuleBase};

/// Depth limit for [`EngineState::explain`].
const EXPLAIN_DEPTH: usize = 8;

// =============================================================================
// Engine State
// =============================================================================

/// Everything one analysis run owns.
#[derive(Clone, Debug)]
pub struct EngineState {
    facts: FactStore,
    diagnosis: DiagnosisState,
    refracted: HashSet<ActivationKey>,
    journal: Journal,
    /// Number of firings so far (also the journal step).
    activation_count: usize,
}

impl EngineState {
    /// Creates an empty state.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        let journal = if config.journal_enabled {
            Journal::new(config.journal_size)
        } else {
            Journal::disabled()
        };
        Self {
            facts: FactStore::new(),
            diagnosis: DiagnosisState::new(),
            refracted: HashSet::new(),
            journal,
            activation_count: 0,
        }
    }

    /// Asserts a seed fact from the caller.
    ///
    /// Returns the fact's id and whether it was new.
    pub fn assert(&mut self, fact: Fact) -> (FactId, bool) {
        self.insert(fact, None)
    }

    fn insert(&mut self, fact: Fact, rule: Option<&Arc<str>>) -> (FactId, bool) {
        let (id, is_new) = self.facts.assert(fact);
        if is_new {
            tracing::trace!(fact = %id, rule = ?rule, "asserted");
            self.journal.push(
                self.step(),
                TraceEvent::Asserted {
                    fact: id,
                    rule: rule.cloned(),
                },
            );
        }
        (id, is_new)
    }

    const fn step(&self) -> u64 {
        self.activation_count as u64
    }

    /// Returns the fact store.
    #[must_use]
    pub fn facts(&self) -> &FactStore {
        &self.facts
    }

    /// Returns the diagnosis.
    #[must_use]
    pub fn diagnosis(&self) -> &DiagnosisState {
        &self.diagnosis
    }

    /// Returns the journal.
    #[must_use]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Returns the number of rules fired so far.
    #[must_use]
    pub const fn activation_count(&self) -> usize {
        self.activation_count
    }

    /// Explains how a fact was derived.
    ///
    /// Without a journal, the explanation has no rule and no premises.
    #[must_use]
    pub fn explain(&self, id: FactId) -> Option<Explanation> {
        self.journal.explain(&self.facts, id, EXPLAIN_DEPTH)
    }

    /// Explains how a fact equal to `fact` was derived.
    #[must_use]
    pub fn explain_fact(&self, fact: &Fact) -> Option<Explanation> {
        self.explain(self.facts.id_of(fact)?)
    }
}

// =============================================================================
// Action Context
// =============================================================================

/// The interface a rule action has to the run.
pub struct ActionContext<'a> {
    state: &'a mut EngineState,
    oracle: &'a dyn ThresholdOracle,
    sink: &'a mut dyn NotificationSink,
    rule: Arc<str>,
    asserted: usize,
}

impl ActionContext<'_> {
    /// Name of the firing rule.
    #[must_use]
    pub fn rule_name(&self) -> &str {
        &self.rule
    }

    /// Asserts a derived fact. Returns true if it was new.
    pub fn assert(&mut self, fact: Fact) -> bool {
        let (_, is_new) = self.state.insert(fact, Some(&self.rule));
        if is_new {
            self.asserted += 1;
        }
        is_new
    }

    /// Increments the problem counter.
    pub fn record_problem(&mut self) {
        self.state.diagnosis.record_problem();
    }

    /// Proposes an intervention category. Returns true if it changed.
    pub fn suggest_intervention(&mut self, category: InterventionCategory) -> bool {
        let from = self.state.diagnosis.intervention();
        let changed = self.state.diagnosis.suggest(category);
        if changed {
            tracing::info!(rule = %self.rule, ?from, to = %category, "intervention changed");
            let step = self.state.step();
            self.state.journal.push(
                step,
                TraceEvent::InterventionChanged {
                    rule: Arc::clone(&self.rule),
                    from,
                    to: category,
                },
            );
        }
        changed
    }

    /// Emits a notification.
    pub fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        let step = self.state.step();
        self.state.journal.push(
            step,
            TraceEvent::Notified {
                rule: Arc::clone(&self.rule),
                severity,
            },
        );
        self.sink.notify(Notification {
            message: message.into(),
            severity,
            rule: Arc::clone(&self.rule),
        });
    }

    /// Resolves a threshold through the oracle, with a default.
    #[must_use]
    pub fn threshold(&self, class: &str, property: &str, default: f64) -> f64 {
        self.oracle.threshold(class, property, default)
    }

    /// Returns the threshold oracle.
    #[must_use]
    pub fn oracle(&self) -> &dyn ThresholdOracle {
        self.oracle
    }

    /// Returns the current diagnosis.
    #[must_use]
    pub fn diagnosis(&self) -> &DiagnosisState {
        &self.state.diagnosis
    }

    /// Returns the fact store.
    #[must_use]
    pub fn facts(&self) -> &FactStore {
        &self.state.facts
    }
}

// =============================================================================
// Rule Engine
// =============================================================================

/// Outcome of [`RuleEngine::run_to_quiescence`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Rules fired during the run.
    pub fired: usize,
    /// New facts asserted by rule actions.
    pub asserted: usize,
}

/// Matches, selects and fires rules.
#[derive(Clone, Debug, Default)]
pub struct RuleEngine {
    config: EngineConfig,
}

impl RuleEngine {
    /// Creates an engine.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Creates a fresh state for a run with this engine's configuration.
    #[must_use]
    pub fn new_state(&self) -> EngineState {
        EngineState::new(&self.config)
    }

    /// Finds every unrefracted activation, in conflict-resolution order.
    #[must_use]
    pub fn find_activations(&self, rules: &RuleBase, state: &EngineState) -> Vec<Activation> {
        let mut activations = Vec::new();
        let mut seen = HashSet::new();

        for rule in rules.iter() {
            for m in PatternMatcher::match_condition(&rule.condition, &state.facts) {
                let activation = Activation {
                    rule: rule.order(),
                    rule_name: Arc::clone(&rule.name),
                    salience: rule.salience,
                    bindings: m.bindings,
                    facts: m.facts,
                };

                let key = activation.key();
                if state.refracted.contains(&key) || !seen.insert(key) {
                    continue;
                }

                activations.push(activation);
            }
        }

        activations.sort_by(Activation::priority_cmp);
        activations
    }

    /// Fires one activation.
    ///
    /// Returns the number of new facts the action asserted.
    ///
    /// # Errors
    /// Returns an error if max activations is exceeded.
    pub fn fire(
        &self,
        activation: &Activation,
        rules: &RuleBase,
        state: &mut EngineState,
        oracle: &dyn ThresholdOracle,
        sink: &mut dyn NotificationSink,
    ) -> Result<usize> {
        if state.activation_count >= self.config.max_activations {
            tracing::warn!(
                limit = self.config.max_activations,
                rule = %activation.rule_name,
                "activation limit exceeded"
            );
            return Err(Error::limit_exceeded(SemanticLimit::MaxActivations {
                limit: self.config.max_activations,
                rule: Some(activation.rule_name.to_string()),
            }));
        }

        let Some(rule) = rules.rules().get(activation.rule) else {
            let message = format!("activation for unknown rule {}", activation.rule_name);
            return Err(Error::new(ErrorKind::Internal(message)));
        };

        state.activation_count += 1;
        state.refracted.insert(activation.key());
        tracing::debug!(rule = %rule.name, facts = ?activation.facts, "fired");
        let step = state.step();
        state.journal.push(
            step,
            TraceEvent::Fired {
                rule: Arc::clone(&rule.name),
                facts: activation.facts.clone(),
            },
        );

        let mut ctx = ActionContext {
            state,
            oracle,
            sink,
            rule: Arc::clone(&rule.name),
            asserted: 0,
        };
        rule.fire(&activation.bindings, &mut ctx);
        Ok(ctx.asserted)
    }

    /// Runs rules to quiescence.
    ///
    /// Repeatedly fires the highest-priority activation until none remain.
    ///
    /// # Errors
    /// Returns an error if max activations is exceeded.
    pub fn run_to_quiescence(
        &self,
        rules: &RuleBase,
        state: &mut EngineState,
        oracle: &dyn ThresholdOracle,
        sink: &mut dyn NotificationSink,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        loop {
            let activations = self.find_activations(rules, state);
            let Some(activation) = activations.first() else {
                break;
            };

            summary.asserted += self.fire(activation, rules, state, oracle, sink)?;
            summary.fired += 1;
        }

        tracing::debug!(
            fired = summary.fired,
            asserted = summary.asserted,
            "quiescent"
        );
        Ok(summary)
    }
}

// =============================================================================
// Tests
// =============================================================================
