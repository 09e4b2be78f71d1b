//! Per-run diagnosis state.

use std::fmt;

/// The dominant remediation type for a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InterventionCategory {
    /// Chemistry lab work (pH, sulfate, disinfection by-products).
    Chemical,
    /// Physical or biological treatment (turbidity, solids).
    Physical,
    /// Emergency response; overrides every other category.
    Critical,
}

impl InterventionCategory {
    /// Returns the lowercase name used by the scheduler.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chemical => "chemical",
            Self::Physical => "physical",
            Self::Critical => "critical",
        }
    }

    /// Parses a lowercase category name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "chemical" => Some(Self::Chemical),
            "physical" => Some(Self::Physical),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for InterventionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Problem counter and intervention category for one analysis run.
///
/// Created fresh for every run. Once the category is `Critical` it stays
/// `Critical` for the rest of the run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosisState {
    problem_count: u32,
    intervention: Option<InterventionCategory>,
}

impl DiagnosisState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct problems detected.
    #[must_use]
    pub const fn problem_count(&self) -> u32 {
        self.problem_count
    }

    /// The resolved intervention category, if any problem was found.
    #[must_use]
    pub const fn intervention(&self) -> Option<InterventionCategory> {
        self.intervention
    }

    /// Returns true when no problem was detected.
    #[must_use]
    pub const fn is_potable(&self) -> bool {
        self.problem_count == 0 && self.intervention.is_none()
    }

    /// Counts one more problem.
    pub fn record_problem(&mut self) {
        self.problem_count = self.problem_count.saturating_add(1);
    }

    /// Proposes a category.
    ///
    /// `Critical` always wins; any other category replaces the current one
    /// unless it is already `Critical`. Returns true if the category changed.
    pub fn suggest(&mut self, category: InterventionCategory) -> bool {
        if self.intervention == Some(InterventionCategory::Critical)
            || self.intervention == Some(category)
        {
            return false;
        }
        self.intervention = Some(category);
        true
    }
}
