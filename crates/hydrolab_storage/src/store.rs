//! Set-semantics fact storage.
//!
//! The store uses persistent data structures, so cloning a store is O(1)
//! and a clone is an independent snapshot.

use std::fmt;
use std::sync::Arc;

use hydrolab_foundation::Fact;
use im::{HashMap, OrdMap, OrdSet};

use crate::filter::AttributeFilter;

/// Identifier of a fact within one store.
///
/// Ids are assigned in insertion order and never reused, so comparing two
/// ids compares the age of the facts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FactId(u64);

impl FactId {
    /// Creates an id from a raw index.
    #[must_use]
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f-{}", self.0)
    }
}

/// A collection of facts with value-equality set semantics.
#[derive(Clone, Default)]
pub struct FactStore {
    /// Facts by id, in insertion order.
    facts: OrdMap<FactId, Fact>,
    /// Reverse index for set semantics.
    ids: HashMap<Fact, FactId>,
    /// Ids grouped by fact kind.
    by_kind: HashMap<Arc<str>, OrdSet<FactId>>,
    /// Next id to assign.
    next_id: u64,
}

impl FactStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Asserts a fact.
    ///
    /// Returns the fact's id and whether it was newly added. Asserting a fact
    /// equal to one already present returns the existing id and `false`.
    pub fn assert(&mut self, fact: Fact) -> (FactId, bool) {
        if let Some(id) = self.ids.get(&fact) {
            return (*id, false);
        }

        let id = FactId(self.next_id);
        self.next_id += 1;

        self.by_kind
            .entry(Arc::from(fact.kind()))
            .or_default()
            .insert(id);
        self.ids.insert(fact.clone(), id);
        self.facts.insert(id, fact);

        (id, true)
    }

    /// Removes a fact by id, returning it if it was present.
    pub fn retract(&mut self, id: FactId) -> Option<Fact> {
        let fact = self.facts.remove(&id)?;
        self.ids.remove(&fact);
        if let Some(ids) = self.by_kind.get_mut(fact.kind()) {
            ids.remove(&id);
        }
        Some(fact)
    }

    /// Returns true if an equal fact is present.
    #[must_use]
    pub fn contains(&self, fact: &Fact) -> bool {
        self.ids.contains_key(fact)
    }

    /// Returns the id of an equal fact, if present.
    #[must_use]
    pub fn id_of(&self, fact: &Fact) -> Option<FactId> {
        self.ids.get(fact).copied()
    }

    /// Returns the fact with the given id.
    #[must_use]
    pub fn get(&self, id: FactId) -> Option<&Fact> {
        self.facts.get(&id)
    }

    /// Iterates facts of one kind, oldest first.
    pub fn with_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = (FactId, &'a Fact)> + 'a {
        let ids = self.by_kind.get(kind).into_iter().flatten();
        ids.filter_map(move |id| self.facts.get(id).map(|fact| (*id, fact)))
    }

    /// Iterates facts of one kind that pass every filter, oldest first.
    ///
    /// The query is lazy and evaluated against the store as it is now; call
    /// again after asserting to see new facts.
    pub fn query<'a>(
        &'a self,
        kind: &'a str,
        filters: &'a [AttributeFilter],
    ) -> impl Iterator<Item = (FactId, &'a Fact)> + 'a {
        self.with_kind(kind)
            .filter(move |(_, fact)| filters.iter().all(|filter| filter.accepts(fact)))
    }

    /// Iterates all facts, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (FactId, &Fact)> {
        self.facts.iter().map(|(id, fact)| (*id, fact))
    }

    /// Returns the number of facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns true if the store holds no facts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl fmt::Debug for FactStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
