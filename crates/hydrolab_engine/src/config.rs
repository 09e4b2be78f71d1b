//! Configuration for the rule engine.

/// Configuration for one analysis run.
///
/// Controls the activation kill switch and the firing journal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum rule firings per run before the kill switch trips.
    pub max_activations: usize,

    /// Whether the firing journal is recorded (false = zero overhead).
    pub journal_enabled: bool,

    /// Journal ring buffer size (number of records retained).
    pub journal_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_activations: 10_000,
            journal_enabled: false,
            journal_size: 1024,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration for debugging with the journal enabled.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            journal_enabled: true,
            journal_size: 10_000,
            ..Self::default()
        }
    }

    /// Builder method to set the kill switch threshold.
    #[must_use]
    pub fn with_max_activations(mut self, max: usize) -> Self {
        self.max_activations = max;
        self
    }

    /// Builder method to enable/disable the journal.
    #[must_use]
    pub fn with_journal(mut self, enabled: bool) -> Self {
        self.journal_enabled = enabled;
        self
    }

    /// Builder method to set the journal size.
    #[must_use]
    pub fn with_journal_size(mut self, size: usize) -> Self {
        self.journal_size = size;
        self
    }
}
