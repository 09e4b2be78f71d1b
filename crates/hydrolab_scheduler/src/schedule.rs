//! Staff/day/shift assignments for an intervention category.

use std::fmt;

use crate::model::{self, Category, DAY, Day, SHIFT, STAFF, Shift};

/// One bookable slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Assignment {
    /// Assigned staff member
    pub staff: String,
    /// Day of the week
    pub day: Day,
    /// Work window
    pub shift: Shift,
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}: {}", self.day, self.shift, self.staff)
    }
}

/// Returns every valid assignment for `category`, ordered by day, then
/// shift, then staff preference.
///
/// Unknown categories use the default staff. No availability yields an
/// empty list.
#[must_use]
pub fn schedule(category: &str) -> Vec<Assignment> {
    schedule_category(Category::parse(category))
}

/// Typed form of [`schedule`].
#[must_use]
pub fn schedule_category(category: Category) -> Vec<Assignment> {
    let problem = match model::problem(category) {
        Ok(problem) => problem,
        Err(error) => {
            tracing::warn!(%category, %error, "invalid scheduling model");
            return Vec::new();
        }
    };

    let staff = category.staff();
    let mut assignments: Vec<Assignment> = problem
        .solutions()
        .iter()
        .filter_map(|solution| {
            Some(Assignment {
                staff: solution.get(STAFF)?.to_string(),
                day: Day::parse(solution.get(DAY)?)?,
                shift: Shift::parse(solution.get(SHIFT)?)?,
            })
        })
        .collect();

    assignments.sort_by_key(|a| {
        let rank = staff.iter().position(|s| *s == a.staff);
        (a.day, a.shift, rank.unwrap_or(usize::MAX))
    });

    tracing::debug!(%category, slots = assignments.len(), "schedule built");
    assignments
}

/// Selects a slot by its 1-based position in `assignments`.
#[must_use]
pub fn book(assignments: &[Assignment], slot: usize) -> Option<&Assignment> {
    slot.checked_sub(1).and_then(|i| assignments.get(i))
}
