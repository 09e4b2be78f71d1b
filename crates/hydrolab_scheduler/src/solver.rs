//! Backtracking constraint solver.
//!
//! Variables are assigned in the order they were added, each trying its
//! domain values in order. A constraint is checked as soon as the last of
//! its variables is bound, so the search prunes early but still enumerates
//! every solution.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Errors building a [`Problem`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// A variable with this name already exists.
    #[error("duplicate variable: {0}")]
    DuplicateVariable(String),
    /// A constraint refers to a variable that does not exist.
    #[error("constraint {constraint} refers to unknown variable {variable}")]
    UnknownVariable {
        /// Constraint name.
        constraint: String,
        /// Missing variable name.
        variable: String,
    },
}

/// Result type for problem construction.
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Predicate over the values of a constraint's variables, in declaration
/// order.
pub type ConstraintFn = Arc<dyn Fn(&[&str]) -> bool + Send + Sync>;

// =============================================================================
// Variables and Constraints
// =============================================================================

/// A named variable with an ordered domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    /// Variable name
    pub name: String,
    /// Candidate values, tried in order
    pub domain: Vec<String>,
}

/// A named predicate over a subset of variables.
#[derive(Clone)]
pub struct Constraint {
    name: String,
    variables: Vec<String>,
    test: ConstraintFn,
}

impl Constraint {
    /// Creates a constraint over `variables`.
    ///
    /// `test` receives the variables' values in the same order.
    #[must_use]
    pub fn new<F>(name: impl Into<String>, variables: &[&str], test: F) -> Self
    where
        F: Fn(&[&str]) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            variables: variables.iter().map(|v| (*v).to_string()).collect(),
            test: Arc::new(test),
        }
    }

    /// Creates a constraint over two variables.
    #[must_use]
    pub fn binary<F>(name: impl Into<String>, first: &str, second: &str, test: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        Self::new(name, &[first, second], move |values| {
            test(values[0], values[1])
        })
    }

    /// Returns the constraint name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the variables the constraint depends on.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Evaluates the constraint.
    #[must_use]
    pub fn check(&self, values: &[&str]) -> bool {
        (self.test)(values)
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constraint({} over {:?})", self.name, self.variables)
    }
}

// =============================================================================
// Solution
// =============================================================================

/// A complete assignment, one value per variable in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Solution {
    values: Vec<(String, String)>,
}

impl Solution {
    /// Returns the value assigned to `variable`.
    #[must_use]
    pub fn get(&self, variable: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(name, _)| name == variable)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates `(variable, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

// =============================================================================
// Problem
// =============================================================================

/// A constraint satisfaction problem.
#[derive(Clone, Debug, Default)]
pub struct Problem {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
}

impl Problem {
    /// Creates an empty problem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable.
    ///
    /// # Errors
    /// Returns an error if the name is already taken.
    pub fn add_variable<I, S>(&mut self, name: impl Into<String>, domain: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if self.variables.iter().any(|v| v.name == name) {
            return Err(SchedulerError::DuplicateVariable(name));
        }
        self.variables.push(Variable {
            name,
            domain: domain.into_iter().map(Into::into).collect(),
        });
        Ok(())
    }

    /// Adds a constraint.
    ///
    /// # Errors
    /// Returns an error if the constraint names an unknown variable.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<()> {
        if let Some(missing) = constraint
            .variables
            .iter()
            .find(|name| self.position(name).is_none())
        {
            return Err(SchedulerError::UnknownVariable {
                constraint: constraint.name.clone(),
                variable: missing.clone(),
            });
        }
        self.constraints.push(constraint);
        Ok(())
    }

    /// Returns the variables.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Returns the constraints.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.name == name)
    }

    /// Enumerates every solution.
    ///
    /// Solutions come out in search order: the first variable varies
    /// slowest. An empty domain anywhere yields no solutions.
    #[must_use]
    pub fn solutions(&self) -> Vec<Solution> {
        let plan = self.plan();
        let mut assigned: Vec<&str> = Vec::with_capacity(self.variables.len());
        let mut found = Vec::new();

        if plan.ready[0].iter().all(|c| self.holds(c, &assigned)) {
            self.search(&plan, &mut assigned, &mut found);
        }

        tracing::debug!(
            variables = self.variables.len(),
            constraints = self.constraints.len(),
            solutions = found.len(),
            "csp solved"
        );
        found
    }

    /// Groups constraint indices by the depth at which they become checkable.
    fn plan(&self) -> Plan {
        let mut ready: Vec<Vec<ConstraintSlot>> =
            (0..=self.variables.len()).map(|_| Vec::new()).collect();
        for (index, constraint) in self.constraints.iter().enumerate() {
            let depth = constraint
                .variables
                .iter()
                .filter_map(|name| self.position(name))
                .max()
                .map_or(0, |last| last + 1);
            ready[depth].push(ConstraintSlot {
                index,
                positions: constraint
                    .variables
                    .iter()
                    .filter_map(|name| self.position(name))
                    .collect(),
            });
        }
        Plan { ready }
    }

    fn holds(&self, slot: &ConstraintSlot, assigned: &[&str]) -> bool {
        let values: Vec<&str> = slot.positions.iter().map(|&p| assigned[p]).collect();
        self.constraints[slot.index].check(&values)
    }

    fn search<'p>(&'p self, plan: &Plan, assigned: &mut Vec<&'p str>, found: &mut Vec<Solution>) {
        let depth = assigned.len();
        let Some(variable) = self.variables.get(depth) else {
            found.push(Solution {
                values: self
                    .variables
                    .iter()
                    .zip(assigned.iter())
                    .map(|(v, value)| (v.name.clone(), (*value).to_string()))
                    .collect(),
            });
            return;
        };

        let ready = &plan.ready[depth + 1];
        for value in &variable.domain {
            assigned.push(value);
            if ready.iter().all(|c| self.holds(c, assigned)) {
                self.search(plan, assigned, found);
            }
            assigned.pop();
        }
    }
}

struct ConstraintSlot {
    index: usize,
    positions: Vec<usize>,
}

struct Plan {
    /// `ready[d]` holds constraints whose variables are all bound once `d`
    /// variables are assigned.
    ready: Vec<Vec<ConstraintSlot>>,
}
