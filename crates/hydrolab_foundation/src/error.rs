//! Error types for hydrolab.
//!
//! Domain conditions (malformed readings, unavailable oracles, empty
//! schedules) are not errors. These types cover misconfiguration, terminal
//! failures and runaway rule bases.

use std::fmt;

use thiserror::Error;

/// The main error type for hydrolab operations.
#[derive(Debug, Error)]
#[error("{kind}{}", suffix(.context))]
pub struct Error {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Where it went wrong, when known.
    pub context: Option<ErrorContext>,
}

fn suffix(context: &Option<ErrorContext>) -> String {
    context
        .as_ref()
        .filter(|c| !c.is_empty())
        .map_or_else(String::new, |c| format!(" ({c})"))
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Records the file or input the error came from, keeping any key.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        let context = self.context.get_or_insert_with(ErrorContext::default);
        context.source = Some(source.into());
        self
    }

    /// Records the offending setting or rule, keeping any source.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        let context = self.context.get_or_insert_with(ErrorContext::default);
        context.key = Some(key.into());
        self
    }

    /// A rule name was registered twice.
    #[must_use]
    pub fn duplicate_rule(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateRule(name.into()))
    }

    /// A kill switch tripped.
    #[must_use]
    pub fn limit_exceeded(limit: SemanticLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }

    /// Configuration is malformed or out of range.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfig(message.into()))
    }

    /// Terminal or file I/O failed.
    #[must_use]
    pub fn io(error: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Io(error.to_string()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A rule with this name is already registered.
    #[error("duplicate rule: {0}")]
    DuplicateRule(String),

    /// Semantic limit exceeded (kill switch triggered).
    #[error("limit exceeded: {0}")]
    LimitExceeded(SemanticLimit),

    /// Configuration could not be loaded or is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Terminal or file I/O failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Kill switches that stop a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticLimit {
    /// Maximum rule firings per run exceeded.
    #[error("max activations ({limit}) exceeded{}", in_rule(.rule))]
    MaxActivations {
        /// The configured limit.
        limit: usize,
        /// The rule that was about to fire.
        rule: Option<String>,
    },
}

fn in_rule(rule: &Option<String>) -> String {
    match rule {
        Some(rule) => format!(" in rule {rule}"),
        None => String::new(),
    }
}

/// Where an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Config file path, `<inline>`, or similar.
    pub source: Option<String>,
    /// Dotted setting name (`thresholds.ph.min`) or rule name.
    pub key: Option<String>,
}

impl ErrorContext {
    /// Returns true if neither source nor key is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.source.is_none() && self.key.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.source, &self.key) {
            (Some(source), Some(key)) => write!(f, "at {source}, {key}"),
            (Some(source), None) => write!(f, "at {source}"),
            (None, Some(key)) => write!(f, "at {key}"),
            (None, None) => Ok(()),
        }
    }
}
