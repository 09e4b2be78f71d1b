//! One isolated analysis run.

use hydrolab_foundation::{Fact, Result};
use hydrolab_storage::FactId;

use crate::config::EngineConfig;
use crate::diagnosis::DiagnosisState;
use crate::engine::{EngineState, RuleEngine, RunSummary};
use crate::notify::NotificationSink;
use crate::oracle::ThresholdOracle;
use crate::rule::RuleBase;

/// A rule base paired with a fresh engine state.
///
/// Facts can be asserted between runs; each [`Session::run`] continues from
/// where the previous one stopped, so re-asserting an existing fact fires
/// nothing new.
pub struct Session<'r> {
    rules: &'r RuleBase,
    engine: RuleEngine,
    state: EngineState,
}

impl<'r> Session<'r> {
    /// Creates a session over `rules`.
    #[must_use]
    pub fn new(rules: &'r RuleBase, config: EngineConfig) -> Self {
        let engine = RuleEngine::new(config);
        let state = engine.new_state();
        Self {
            rules,
            engine,
            state,
        }
    }

    /// Asserts a seed fact. Returns its id and whether it was new.
    pub fn assert(&mut self, fact: Fact) -> (FactId, bool) {
        self.state.assert(fact)
    }

    /// Asserts several seed facts in order.
    pub fn assert_all(&mut self, facts: impl IntoIterator<Item = Fact>) {
        for fact in facts {
            self.state.assert(fact);
        }
    }

    /// Runs the rules to quiescence.
    ///
    /// # Errors
    /// Returns an error if the activation limit is exceeded.
    pub fn run(
        &mut self,
        oracle: &dyn ThresholdOracle,
        sink: &mut dyn NotificationSink,
    ) -> Result<RunSummary> {
        self.engine
            .run_to_quiescence(self.rules, &mut self.state, oracle, sink)
    }

    /// Returns the engine state.
    #[must_use]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Returns the diagnosis so far.
    #[must_use]
    pub fn diagnosis(&self) -> &DiagnosisState {
        self.state.diagnosis()
    }

    /// Consumes the session, returning its state.
    #[must_use]
    pub fn into_state(self) -> EngineState {
        self.state
    }
}
