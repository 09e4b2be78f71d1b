//! Tests for the laboratory schedules

use std::collections::HashSet;

use hydrolab_scheduler::model::{
    self, BIANCHI, EMERGENCY_TEAM, GENERAL_TECHNICIAN, NERI, ROSSI, SAFETY_OFFICER, VERDI,
};
use hydrolab_scheduler::{Category, Day, Shift, book, schedule, schedule_category};

const ALL: [Category; 4] = [
    Category::Chemical,
    Category::Physical,
    Category::Critical,
    Category::Default,
];

#[test]
fn slot_counts() {
    assert_eq!(schedule("chemical").len(), 9);
    assert_eq!(schedule("physical").len(), 10);
    assert_eq!(schedule("critical").len(), 24);
    assert_eq!(schedule("default").len(), 12);
}

#[test]
fn category_names_are_case_insensitive() {
    assert_eq!(schedule("Chemical"), schedule("chemical"));
    assert_eq!(schedule("  PHYSICAL "), schedule("physical"));
    assert_eq!(schedule(""), schedule("default"));
}

#[test]
fn staff_comes_from_the_category() {
    let staff = |category: &str| -> HashSet<String> {
        schedule(category).into_iter().map(|a| a.staff).collect()
    };
    assert_eq!(
        staff("chemical"),
        HashSet::from([ROSSI.into(), VERDI.into()])
    );
    assert_eq!(
        staff("physical"),
        HashSet::from([BIANCHI.into(), NERI.into()])
    );
    assert_eq!(
        staff("critical"),
        HashSet::from([EMERGENCY_TEAM.into(), SAFETY_OFFICER.into()])
    );
    assert_eq!(
        staff("anything"),
        HashSet::from([GENERAL_TECHNICIAN.into()])
    );
}

#[test]
fn personal_availability_holds_everywhere() {
    for category in ALL {
        for slot in schedule_category(category) {
            assert!(!(slot.staff == ROSSI && slot.day == Day::Monday), "{slot}");
            assert!(
                !(slot.staff == VERDI && slot.shift == Shift::Afternoon),
                "{slot}"
            );
        }
    }
}

#[test]
fn chemistry_lab_is_closed_on_tuesday_and_saturday() {
    for slot in schedule("chemical") {
        assert!(!matches!(slot.day, Day::Tuesday | Day::Saturday), "{slot}");
        assert!(
            !(slot.day == Day::Friday && slot.shift == Shift::Afternoon),
            "{slot}"
        );
    }
}

#[test]
fn slots_are_sorted_and_distinct() {
    for category in ALL {
        let slots = schedule_category(category);
        let unique: HashSet<_> = slots.iter().collect();
        assert_eq!(unique.len(), slots.len());
        assert!(slots.is_sorted_by_key(|slot| (slot.day, slot.shift)));
    }
}

#[test]
fn schedule_matches_the_model() {
    for category in ALL {
        let solutions = model::problem(category).unwrap().solutions();
        assert_eq!(solutions.len(), schedule_category(category).len());
    }
}

/// Counts the staff, day and shift combinations every constraint of
/// `category` admits, without the solver.
fn brute_force_count(category: Category) -> usize {
    let constraints = model::constraints(category);
    let mut count = 0;
    for &staff in category.staff() {
        for day in Day::ALL {
            for shift in Shift::ALL {
                let value = |variable: &String| match variable.as_str() {
                    model::STAFF => staff,
                    model::DAY => day.name(),
                    model::SHIFT => shift.label(),
                    other => panic!("unknown variable {other}"),
                };
                let admitted = constraints.iter().all(|constraint| {
                    let values: Vec<&str> = constraint.variables().iter().map(value).collect();
                    constraint.check(&values)
                });
                if admitted {
                    count += 1;
                }
            }
        }
    }
    count
}

#[test]
fn solver_agrees_with_brute_force() {
    for (category, expected) in ALL.into_iter().zip([9, 10, 24, 12]) {
        assert_eq!(brute_force_count(category), expected, "{category}");
        assert_eq!(schedule_category(category).len(), expected, "{category}");
    }
}

#[test]
fn booking() {
    let slots = schedule("physical");
    assert_eq!(book(&slots, 1).map(|a| a.day), Some(Day::Tuesday));
    assert_eq!(book(&slots, 10), slots.last());
    assert!(book(&slots, 11).is_none());
    assert!(book(&[], 1).is_none());
}

#[test]
fn display_format() {
    let first = &schedule("critical")[0];
    assert_eq!(
        first.to_string(),
        "Monday - Morning (08-14): Emergency Team"
    );
}
