//! Attribute filters used by fact queries.

use std::fmt;
use std::sync::Arc;

use hydrolab_foundation::{Fact, Value};

/// A shareable unary predicate over attribute values.
pub type ValuePredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A single attribute constraint applied by [`FactStore::query`].
///
/// A filter on an attribute the fact does not have never matches.
///
/// [`FactStore::query`]: crate::FactStore::query
#[derive(Clone)]
pub enum AttributeFilter {
    /// The attribute must equal this value exactly.
    Equals {
        /// Attribute name.
        attribute: Arc<str>,
        /// Required value.
        value: Value,
    },
    /// The attribute must satisfy a predicate.
    Satisfies {
        /// Attribute name.
        attribute: Arc<str>,
        /// Name shown in debug output.
        name: Arc<str>,
        /// The predicate.
        test: ValuePredicate,
    },
}

impl AttributeFilter {
    /// Creates an equality filter.
    #[must_use]
    pub fn equals(attribute: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        Self::Equals {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates a predicate filter.
    #[must_use]
    pub fn satisfies<F>(attribute: impl Into<Arc<str>>, name: impl Into<Arc<str>>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Satisfies {
            attribute: attribute.into(),
            name: name.into(),
            test: Arc::new(test),
        }
    }

    /// Returns the attribute this filter inspects.
    #[must_use]
    pub fn attribute(&self) -> &str {
        match self {
            Self::Equals { attribute, .. } | Self::Satisfies { attribute, .. } => attribute,
        }
    }

    /// Returns true if the fact passes this filter.
    #[must_use]
    pub fn accepts(&self, fact: &Fact) -> bool {
        let Some(actual) = fact.get(self.attribute()) else {
            return false;
        };
        match self {
            Self::Equals { value, .. } => actual == value,
            Self::Satisfies { test, .. } => test(actual),
        }
    }
}

impl fmt::Debug for AttributeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals { attribute, value } => write!(f, "{attribute} = {value:?}"),
            Self::Satisfies { attribute, name, .. } => write!(f, "{attribute} satisfies {name}"),
        }
    }
}
