//! Immutable fact records.
//!
//! A fact is a kind plus an ordered attribute map. Two facts are the same
//! fact when both kind and attributes are equal; the fact store relies on
//! this for set semantics.

use std::fmt;
use std::sync::Arc;

use im::OrdMap;

use crate::value::Value;

/// An immutable `(kind, attributes)` record.
///
/// Attributes are kept in an ordered persistent map, so cloning is cheap and
/// hashing/display are deterministic.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Fact {
    kind: Arc<str>,
    attributes: OrdMap<Arc<str>, Value>,
}

impl Fact {
    /// Creates a fact with no attributes (a marker fact).
    #[must_use]
    pub fn marker(kind: impl Into<Arc<str>>) -> Self {
        Self {
            kind: kind.into(),
            attributes: OrdMap::new(),
        }
    }

    /// Starts building a fact of the given kind.
    #[must_use]
    pub fn build(kind: impl Into<Arc<str>>) -> FactBuilder {
        FactBuilder {
            fact: Self::marker(kind),
        }
    }

    /// Returns the fact kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the value of an attribute, if present.
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    /// Returns the attribute as a string, if present and a string.
    #[must_use]
    pub fn get_str(&self, attribute: &str) -> Option<&str> {
        self.get(attribute).and_then(Value::as_str)
    }

    /// Iterates attributes in name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (&**k, v))
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.attributes.len()
    }
}

impl fmt::Debug for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Renders as `(kind (attr value) ...)`.
impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.kind)?;
        for (name, value) in &self.attributes {
            write!(f, " ({name} {value:?})")?;
        }
        write!(f, ")")
    }
}

/// Builder for [`Fact`].
#[derive(Clone, Debug)]
pub struct FactBuilder {
    fact: Fact,
}

impl FactBuilder {
    /// Sets an attribute, replacing any previous value.
    #[must_use]
    pub fn with(mut self, attribute: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.fact.attributes.insert(attribute.into(), value.into());
        self
    }

    /// Finishes the fact.
    #[must_use]
    pub fn finish(self) -> Fact {
        self.fact
    }
}

impl From<FactBuilder> for Fact {
    fn from(builder: FactBuilder) -> Self {
        builder.finish()
    }
}
