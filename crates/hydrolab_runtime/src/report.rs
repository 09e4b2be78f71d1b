//! Plain-text rendering of analysis results.

use std::fmt::{self, Write as _};

use hydrolab_engine::water::Parameter;
use hydrolab_scheduler::{Assignment, Category};

use crate::analysis::Report;

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "== {title} ==")
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, "Diagnosis")?;
        for notification in &self.notifications {
            writeln!(f, "{notification}")?;
        }

        writeln!(f)?;
        heading(f, "Semantic check")?;
        match self.corrosive {
            Some(true) => writeln!(f, "Ontology classifies the sample as CORROSIVE WATER")?,
            Some(false) => writeln!(f, "Not classified as corrosive")?,
            None => writeln!(f, "Not available (needs pH and sulfate)")?,
        }

        writeln!(f)?;
        heading(f, "Risk")?;
        writeln!(f, "{}", self.risk)?;

        writeln!(f)?;
        heading(f, "Result")?;
        match self.intervention() {
            None if self.diagnosis.is_potable() => writeln!(f, "Water is potable.")?,
            intervention => {
                writeln!(f, "{} anomalies detected.", self.diagnosis.problem_count())?;
                if let Some(category) = intervention {
                    let category = Category::parse(category.as_str());
                    writeln!(f, "Intervention: {category} ({})", category.facility())?;
                }
            }
        }

        if self.intervention().is_some() {
            writeln!(f)?;
            heading(f, "Schedule")?;
            f.write_str(&format_schedule(&self.schedule))?;
        }

        if !self.explanations.is_empty() {
            writeln!(f)?;
            heading(f, "Trace")?;
            for explanation in &self.explanations {
                write!(f, "{explanation}")?;
            }
        }
        Ok(())
    }
}

/// Numbered slot list, one per line, numbered from 1.
#[must_use]
pub fn format_schedule(assignments: &[Assignment]) -> String {
    if assignments.is_empty() {
        return "No availability.\n".to_string();
    }
    let mut out = String::new();
    for (i, assignment) in assignments.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {assignment}", i + 1);
    }
    out
}

/// The parameter encyclopedia: name, unit, default limits, description.
#[must_use]
pub fn format_parameters() -> String {
    let mut out = String::new();
    for (i, param) in Parameter::ALL.iter().enumerate() {
        let limits = param.default_limits();
        let range = match (limits.min, limits.max) {
            (Some(min), Some(max)) => format!("{min} - {max}"),
            (None, Some(max)) => format!("<= {max}"),
            (Some(min), None) => format!(">= {min}"),
            (None, None) => "unbounded".to_string(),
        };
        let unit = if param.unit().is_empty() {
            String::new()
        } else {
            format!(" {}", param.unit())
        };
        let n = i + 1;
        let _ = writeln!(out, "[{n}] {} ({})", param.display_name(), param.name());
        let _ = writeln!(out, "    Limits: {range}{unit}");
        let _ = writeln!(out, "    {}", param.description());
    }
    out
}
