//! Firing journal for explaining derived facts.
//!
//! The journal is a ring buffer of [`TraceRecord`]s: which rule fired on
//! which facts, and which facts each firing asserted. It answers "why is
//! this fact here?" via [`Journal::explain`].

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use hydrolab_foundation::Fact;
use hydrolab_storage::{FactId, FactStore};

use crate::diagnosis::InterventionCategory;
use crate::notify::Severity;

// =============================================================================
// Trace Event
// =============================================================================

/// Events recorded during a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceEvent {
    /// A new fact entered the store.
    Asserted {
        /// The fact.
        fact: FactId,
        /// The rule that asserted it, or `None` for caller seeds.
        rule: Option<Arc<str>>,
    },
    /// A rule fired.
    Fired {
        /// The rule.
        rule: Arc<str>,
        /// The facts that satisfied its condition.
        facts: Vec<FactId>,
    },
    /// A rule emitted a notification.
    Notified {
        /// The rule.
        rule: Arc<str>,
        /// Its severity.
        severity: Severity,
    },
    /// The intervention category changed.
    InterventionChanged {
        /// The rule responsible.
        rule: Arc<str>,
        /// Previous category.
        from: Option<InterventionCategory>,
        /// New category.
        to: InterventionCategory,
    },
}

impl TraceEvent {
    /// Returns a short name for the event type.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Asserted { .. } => "asserted",
            Self::Fired { .. } => "fired",
            Self::Notified { .. } => "notified",
            Self::InterventionChanged { .. } => "intervention",
        }
    }
}

/// A journal entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Monotonic record id.
    pub id: u64,
    /// Firing number; 0 for caller assertions before the first firing.
    pub step: u64,
    /// What happened.
    pub event: TraceEvent,
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:<4} step {:<3} ", self.id, self.step)?;
        match &self.event {
            TraceEvent::Asserted { fact, rule } => match rule {
                Some(rule) => write!(f, "assert {fact} by {rule}"),
                None => write!(f, "assert {fact}"),
            },
            TraceEvent::Fired { rule, facts } => {
                write!(f, "fire {rule} on")?;
                for fact in facts {
                    write!(f, " {fact}")?;
                }
                Ok(())
            }
            TraceEvent::Notified { rule, severity } => write!(f, "notify {severity} from {rule}"),
            TraceEvent::InterventionChanged { rule, from, to } => match from {
                Some(from) => write!(f, "intervention {from} -> {to} by {rule}"),
                None => write!(f, "intervention {to} by {rule}"),
            },
        }
    }
}

// =============================================================================
// Journal
// =============================================================================

/// Ring buffer of trace records.
///
/// When disabled, pushes are ignored.
#[derive(Clone, Debug)]
pub struct Journal {
    records: VecDeque<TraceRecord>,
    max_size: usize,
    next_id: u64,
    enabled: bool,
}

impl Journal {
    /// Creates an enabled journal retaining at most `max_size` records.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(max_size.min(1024)),
            max_size,
            next_id: 0,
            enabled: true,
        }
    }

    /// Creates a journal that records nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            records: VecDeque::new(),
            max_size: 0,
            next_id: 0,
            enabled: false,
        }
    }

    /// Returns true if records are being kept.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Records an event, evicting the oldest record when full.
    pub fn push(&mut self, step: u64, event: TraceEvent) {
        if !self.enabled {
            return;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.records.push_back(TraceRecord { id, step, event });
        while self.records.len() > self.max_size {
            self.records.pop_front();
        }
    }

    /// Returns the number of retained records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates retained records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    /// Returns the most recent `count` records.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<&TraceRecord> {
        let start = self.records.len().saturating_sub(count);
        self.records.iter().skip(start).collect()
    }

    /// Returns records of one event type.
    #[must_use]
    pub fn by_event_type(&self, event_type: &str) -> Vec<&TraceRecord> {
        self.records
            .iter()
            .filter(|r| r.event.event_type() == event_type)
            .collect()
    }

    /// Explains how the fact with `id` came to be in `store`.
    ///
    /// Follows the asserting rule's premises up to `depth` levels. Returns
    /// `None` if the fact is not in the store. Facts whose assertion record
    /// was evicted (or never journaled) are reported without a rule.
    #[must_use]
    pub fn explain(&self, store: &FactStore, id: FactId, depth: usize) -> Option<Explanation> {
        let fact = store.get(id)?.clone();

        let asserted = self.records.iter().find_map(|r| match &r.event {
            TraceEvent::Asserted { fact, rule } if *fact == id => Some((r.step, rule.clone())),
            _ => None,
        });

        let Some((step, Some(rule))) = asserted else {
            return Some(Explanation {
                id,
                fact,
                rule: None,
                premises: Vec::new(),
            });
        };

        let premises = if depth == 0 {
            Vec::new()
        } else {
            self.premises_of(step, &rule)
                .iter()
                .filter_map(|premise| self.explain(store, *premise, depth - 1))
                .collect()
        };

        Some(Explanation {
            id,
            fact,
            rule: Some(rule),
            premises,
        })
    }

    /// The facts `rule` matched when it fired at `step`.
    fn premises_of(&self, step: u64, rule: &str) -> &[FactId] {
        self.records
            .iter()
            .filter(|record| record.step == step)
            .find_map(|record| match &record.event {
                TraceEvent::Fired { rule: fired, facts } if &**fired == rule => {
                    Some(facts.as_slice())
                }
                _ => None,
            })
            .unwrap_or_default()
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::disabled()
    }
}

// =============================================================================
// Explanation
// =============================================================================

/// Derivation tree of a fact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Explanation {
    /// The fact's id.
    pub id: FactId,
    /// The fact.
    pub fact: Fact,
    /// The rule that asserted it, `None` for seeds.
    pub rule: Option<Arc<str>>,
    /// Explanations of the facts the rule matched.
    pub premises: Vec<Explanation>,
}

impl Explanation {
    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{:indent$}{} {}", "", self.id, self.fact)?;
        match &self.rule {
            Some(rule) => writeln!(f, " <- {rule}")?,
            None => writeln!(f, " <- asserted")?,
        }
        for premise in &self.premises {
            premise.write_indented(f, indent + 2)?;
        }
        Ok(())
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
