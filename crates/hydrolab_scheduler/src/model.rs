//! Scheduling domains and the laboratory availability policy.

use std::fmt;

use crate::solver::{Constraint, Problem, Result};

/// Staff variable.
pub const STAFF: &str = "staff";
/// Day variable.
pub const DAY: &str = "day";
/// Shift variable.
pub const SHIFT: &str = "shift";

/// Senior chemist, unavailable on Mondays.
pub const ROSSI: &str = "Dr. Rossi (Senior Chemist)";
/// Junior chemist, mornings only.
pub const VERDI: &str = "Dr. Verdi (Junior Chemist)";
/// Maintenance engineer.
pub const BIANCHI: &str = "Eng. Bianchi (Maintenance)";
/// Plumber.
pub const NERI: &str = "Tech. Neri (Plumber)";
/// Emergency response crew.
pub const EMERGENCY_TEAM: &str = "Emergency Team";
/// Safety officer.
pub const SAFETY_OFFICER: &str = "Safety Officer";
/// Fallback technician.
pub const GENERAL_TECHNICIAN: &str = "General Technician";

// =============================================================================
// Category
// =============================================================================

/// Intervention category as seen by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Chemists in the chemistry lab.
    Chemical,
    /// Technicians in the physical lab.
    Physical,
    /// Emergency crew, always available.
    Critical,
    /// Anything else.
    Default,
}

impl Category {
    /// Parses a category name. Unknown names map to [`Category::Default`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "chemical" => Self::Chemical,
            "physical" => Self::Physical,
            "critical" => Self::Critical,
            _ => Self::Default,
        }
    }

    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chemical => "chemical",
            Self::Physical => "physical",
            Self::Critical => "critical",
            Self::Default => "default",
        }
    }

    /// Staff domain, in preference order.
    #[must_use]
    pub const fn staff(self) -> &'static [&'static str] {
        match self {
            Self::Chemical => &[ROSSI, VERDI],
            Self::Physical => &[BIANCHI, NERI],
            Self::Critical => &[EMERGENCY_TEAM, SAFETY_OFFICER],
            Self::Default => &[GENERAL_TECHNICIAN],
        }
    }

    /// Name of the facility that handles this category.
    #[must_use]
    pub const fn facility(self) -> &'static str {
        match self {
            Self::Chemical => "Chemical Analysis Lab",
            Self::Physical => "Physical Analysis Lab",
            Self::Critical => "Emergency Response",
            Self::Default => "General Maintenance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Day and Shift
// =============================================================================

/// A workable day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Day {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
}

impl Day {
    /// Days in priority order.
    pub const ALL: [Self; 6] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    /// Returns the day name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        }
    }

    /// Parses a day name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A work window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shift {
    /// 08:00 to 14:00
    Morning,
    /// 14:00 to 20:00
    Afternoon,
}

impl Shift {
    /// Shifts in priority order.
    pub const ALL: [Self; 2] = [Self::Morning, Self::Afternoon];

    /// Returns the shift label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Morning => "Morning (08-14)",
            Self::Afternoon => "Afternoon (14-20)",
        }
    }

    /// Parses a shift label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Availability Policy
// =============================================================================

fn is_open(open: &[(Day, &[Shift])], day: &str, shift: &str) -> bool {
    let (Some(day), Some(shift)) = (Day::parse(day), Shift::parse(shift)) else {
        return false;
    };
    open.iter()
        .any(|(d, shifts)| *d == day && shifts.contains(&shift))
}

/// Chemistry lab hours: Monday, Wednesday, Thursday all day, Friday morning.
const CHEMISTRY_LAB: &[(Day, &[Shift])] = &[
    (Day::Monday, &Shift::ALL),
    (Day::Wednesday, &Shift::ALL),
    (Day::Thursday, &Shift::ALL),
    (Day::Friday, &[Shift::Morning]),
];

/// Physical lab hours: Tuesday, Friday all day, Thursday afternoon.
const PHYSICAL_LAB: &[(Day, &[Shift])] = &[
    (Day::Tuesday, &Shift::ALL),
    (Day::Thursday, &[Shift::Afternoon]),
    (Day::Friday, &Shift::ALL),
];

/// Constraints registered for a category.
#[must_use]
pub fn constraints(category: Category) -> Vec<Constraint> {
    let mut constraints = vec![
        Constraint::binary("rossi-not-monday", STAFF, DAY, |staff, day| {
            !(staff == ROSSI && day == Day::Monday.name())
        }),
        Constraint::binary("verdi-mornings-only", STAFF, SHIFT, |staff, shift| {
            !(staff == VERDI && shift == Shift::Afternoon.label())
        }),
    ];

    match category {
        Category::Chemical => constraints.push(Constraint::binary(
            "chemistry-lab-hours",
            DAY,
            SHIFT,
            |day, shift| is_open(CHEMISTRY_LAB, day, shift),
        )),
        Category::Physical => constraints.push(Constraint::binary(
            "physical-lab-hours",
            DAY,
            SHIFT,
            |day, shift| is_open(PHYSICAL_LAB, day, shift),
        )),
        Category::Critical | Category::Default => {}
    }

    constraints
}

/// Builds the scheduling problem for a category.
///
/// # Errors
/// Never fails for the built-in model; errors indicate an inconsistent
/// constraint table.
pub fn problem(category: Category) -> Result<Problem> {
    let mut problem = Problem::new();
    problem.add_variable(STAFF, category.staff().iter().copied())?;
    problem.add_variable(DAY, Day::ALL.map(Day::name))?;
    problem.add_variable(SHIFT, Shift::ALL.map(Shift::label))?;
    for constraint in constraints(category) {
        problem.add_constraint(constraint)?;
    }
    Ok(problem)
}
