//! Laboratory scheduling for hydrolab.
//!
//! This crate provides:
//! - [`Problem`] - A small general-purpose CSP with complete backtracking search
//! - [`model`] - Staff, day and shift domains and the lab availability policy
//! - [`schedule()`] - Ordered staff/day/shift assignments for a category

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod model;
pub mod schedule;
pub mod solver;

pub use model::{Category, Day, Shift};
pub use schedule::{Assignment, book, schedule, schedule_category};
pub use solver::{Constraint, Problem, SchedulerError, Solution, Variable};
