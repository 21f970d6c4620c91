//! Property-based tests for the overlap and conflict engine using proptest.
//!
//! These verify invariants that should hold for *any* slot shape, not just the
//! hand-picked cases in `conflict_tests.rs`.

use chrono::NaiveTime;
use planner_engine::config::PeriodTable;
use planner_engine::model::{Availability, Course, Slot};
use planner_engine::{
    check_course_conflicts, detect_all_conflicts, is_available, sessions_overlap, PlannerConfig,
    Snapshot,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_days() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(1u8..=5, 1..=5)
}

/// Start and end on a 15-minute grid between 06:00 and 22:00, end after start.
fn arb_times() -> impl Strategy<Value = (NaiveTime, NaiveTime)> {
    (24u32..88, 1u32..=16).prop_map(|(start_q, len_q)| {
        let end_q = (start_q + len_q).min(88);
        (quarter(start_q), quarter(end_q.max(start_q + 1)))
    })
}

fn quarter(q: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(q / 4, (q % 4) * 15, 0).unwrap()
}

fn arb_slot() -> impl Strategy<Value = Slot> {
    (arb_days(), 1u32..=40, 1u32..=12, arb_times()).prop_map(
        |(days, start_week, duration, (start, end))| {
            Slot::new(days, start_week, duration, start, end)
        },
    )
}

fn arb_course(index: usize) -> impl Strategy<Value = Course> {
    (arb_slot(), prop::option::of(0u8..3), prop::option::of(0u8..3)).prop_map(
        move |(slot, tutor, location)| {
            let mut course = Course::new(format!("c{index}"), format!("Course {index}"), slot);
            course.tutor_id = tutor.map(|t| format!("t{t}"));
            course.location_id = location.map(|l| format!("l{l}"));
            course
        },
    )
}

fn arb_courses() -> impl Strategy<Value = Vec<Course>> {
    (0usize..8).prop_flat_map(|n| (0..n).map(arb_course).collect::<Vec<_>>())
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Overlap is symmetric
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn overlap_is_symmetric(a in arb_slot(), b in arb_slot()) {
        prop_assert_eq!(sessions_overlap(&a, &b), sessions_overlap(&b, &a));
    }
}

// ---------------------------------------------------------------------------
// Property 2: A slot always overlaps itself
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slot_overlaps_itself(a in arb_slot()) {
        prop_assert!(sessions_overlap(&a, &a));
    }
}

// ---------------------------------------------------------------------------
// Property 3: Disjoint week ranges never overlap
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn disjoint_weeks_never_overlap(a in arb_slot(), gap in 0u32..5) {
        let mut b = a.clone();
        b.start_week = a.end_week() + 1 + gap;
        prop_assert!(!sessions_overlap(&a, &b));
    }
}

// ---------------------------------------------------------------------------
// Property 4: A candidate is never reported against itself
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn candidate_never_conflicts_with_itself(courses in arb_courses()) {
        let snapshot = Snapshot { courses: courses.clone(), ..Snapshot::new() };
        for course in &courses {
            let conflicts = check_course_conflicts(course, &snapshot, &PlannerConfig::default());
            prop_assert!(conflicts.iter().all(|c| c.conflicting_course != course.id));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: Every reported pair really overlaps and shares a resource
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn reported_pairs_overlap(courses in arb_courses()) {
        let snapshot = Snapshot { courses, ..Snapshot::new() };
        for conflict in detect_all_conflicts(&snapshot) {
            let a = snapshot.course(&conflict.course).unwrap();
            let b = snapshot.course(&conflict.conflicting_course).unwrap();
            prop_assert!(sessions_overlap(&a.slot, &b.slot));
            prop_assert!(
                (a.tutor().is_some() && a.tutor() == b.tutor())
                    || (a.location().is_some() && a.location() == b.location())
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 6: Unconfigured availability is open for any day and time
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn unconfigured_availability_is_always_open(day in 0u8..=6, (start, end) in arb_times()) {
        prop_assert!(is_available(
            Some(&Availability::unconfigured()),
            day,
            start,
            end,
            &PeriodTable::default(),
        ));
    }
}
