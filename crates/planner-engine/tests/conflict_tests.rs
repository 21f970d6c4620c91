//! Tests for overlap and double-booking detection.

use chrono::NaiveTime;
use planner_engine::model::{Course, Location, Slot, Tutor};
use planner_engine::{
    check_course_conflicts, detect_all_conflicts, sessions_overlap, ConflictKind, PlannerConfig,
    Severity, Snapshot,
};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Helper to build a slot from day list, week range, and hour:minute times.
fn slot(days: &[u8], start_week: u32, duration: u32, start: (u32, u32), end: (u32, u32)) -> Slot {
    Slot::new(
        days.iter().copied(),
        start_week,
        duration,
        t(start.0, start.1),
        t(end.0, end.1),
    )
}

fn roster(courses: Vec<Course>) -> Snapshot {
    let mut snapshot = Snapshot::new();
    snapshot.tutors.push(Tutor::new("t1", "Ada"));
    snapshot.tutors.push(Tutor::new("t2", "Grace"));
    snapshot.locations.push(Location::new("l1", "Main Hall"));
    snapshot.locations.push(Location::new("l2", "Annex"));
    snapshot.courses = courses;
    snapshot
}

// ── sessions_overlap ────────────────────────────────────────────────────────

#[test]
fn overlapping_day_week_and_time_overlap() {
    let a = slot(&[1], 1, 10, (9, 0), (11, 0));
    let b = slot(&[1, 3], 5, 4, (10, 0), (12, 0));
    assert!(sessions_overlap(&a, &b));
    assert!(sessions_overlap(&b, &a));
}

#[test]
fn different_days_do_not_overlap() {
    let a = slot(&[1, 2], 1, 10, (9, 0), (11, 0));
    let b = slot(&[3, 4], 1, 10, (9, 0), (11, 0));
    assert!(!sessions_overlap(&a, &b));
}

#[test]
fn disjoint_week_ranges_do_not_overlap() {
    // Weeks 1-4 and 5-8.
    let a = slot(&[1], 1, 4, (9, 0), (11, 0));
    let b = slot(&[1], 5, 4, (9, 0), (11, 0));
    assert!(!sessions_overlap(&a, &b));
}

#[test]
fn touching_week_ranges_overlap() {
    // Weeks 1-4 and 4-7 share week 4.
    let a = slot(&[1], 1, 4, (9, 0), (11, 0));
    let b = slot(&[1], 4, 4, (9, 0), (11, 0));
    assert!(sessions_overlap(&a, &b));
}

#[test]
fn back_to_back_sessions_do_not_overlap() {
    let a = slot(&[1], 1, 4, (9, 0), (10, 0));
    let b = slot(&[1], 1, 4, (10, 0), (11, 0));
    assert!(!sessions_overlap(&a, &b));
}

#[test]
fn contained_session_overlaps() {
    let a = slot(&[5], 1, 40, (9, 0), (17, 0));
    let b = slot(&[5], 20, 1, (12, 0), (12, 30));
    assert!(sessions_overlap(&a, &b));
}

// ── detect_all_conflicts ────────────────────────────────────────────────────

#[test]
fn shared_tutor_in_overlapping_courses_is_reported() {
    let snapshot = roster(vec![
        Course::new("c1", "Algebra", slot(&[1], 1, 10, (9, 0), (11, 0))).with_tutor("t1"),
        Course::new("c2", "Geometry", slot(&[1], 1, 10, (10, 0), (12, 0))).with_tutor("t1"),
    ]);

    let conflicts = detect_all_conflicts(&snapshot);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::TutorDoubleBooking);
    assert_eq!(conflicts[0].course, "c1");
    assert_eq!(conflicts[0].conflicting_course, "c2");
    assert_eq!(
        conflicts[0].message,
        "Tutor Ada is double-booked: \"Algebra\" and \"Geometry\""
    );
    assert_eq!(conflicts[0].severity(), Severity::Overridable);
}

#[test]
fn sharing_tutor_and_location_yields_two_records() {
    let snapshot = roster(vec![
        Course::new("c1", "Algebra", slot(&[1], 1, 10, (9, 0), (11, 0)))
            .with_tutor("t1")
            .with_location("l1"),
        Course::new("c2", "Geometry", slot(&[1], 1, 10, (9, 0), (11, 0)))
            .with_tutor("t1")
            .with_location("l1"),
    ]);

    let kinds: Vec<ConflictKind> = detect_all_conflicts(&snapshot)
        .into_iter()
        .map(|c| c.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![
            ConflictKind::TutorDoubleBooking,
            ConflictKind::LocationDoubleBooking
        ]
    );
}

#[test]
fn location_double_booking_names_the_location() {
    let snapshot = roster(vec![
        Course::new("c1", "Algebra", slot(&[2], 1, 10, (9, 0), (11, 0))).with_location("l2"),
        Course::new("c2", "Geometry", slot(&[2], 1, 10, (9, 0), (11, 0))).with_location("l2"),
    ]);

    let conflicts = detect_all_conflicts(&snapshot);

    assert_eq!(conflicts.len(), 1);
    assert!(conflicts[0].message.starts_with("Location Annex is double-booked"));
}

#[test]
fn unassigned_resources_never_conflict() {
    let snapshot = roster(vec![
        Course::new("c1", "Algebra", slot(&[1], 1, 10, (9, 0), (11, 0))),
        Course::new("c2", "Geometry", slot(&[1], 1, 10, (9, 0), (11, 0))),
    ]);
    assert!(detect_all_conflicts(&snapshot).is_empty());
}

#[test]
fn different_tutors_do_not_conflict() {
    let snapshot = roster(vec![
        Course::new("c1", "Algebra", slot(&[1], 1, 10, (9, 0), (11, 0))).with_tutor("t1"),
        Course::new("c2", "Geometry", slot(&[1], 1, 10, (9, 0), (11, 0))).with_tutor("t2"),
    ]);
    assert!(detect_all_conflicts(&snapshot).is_empty());
}

#[test]
fn three_way_overlap_reports_every_pair() {
    let snapshot = roster(vec![
        Course::new("c1", "A", slot(&[1], 1, 10, (9, 0), (12, 0))).with_tutor("t1"),
        Course::new("c2", "B", slot(&[1], 1, 10, (10, 0), (12, 0))).with_tutor("t1"),
        Course::new("c3", "C", slot(&[1], 1, 10, (11, 0), (12, 0))).with_tutor("t1"),
    ]);

    let pairs: Vec<(String, String)> = detect_all_conflicts(&snapshot)
        .into_iter()
        .map(|c| (c.course, c.conflicting_course))
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("c1".to_string(), "c2".to_string()),
            ("c1".to_string(), "c3".to_string()),
            ("c2".to_string(), "c3".to_string()),
        ]
    );
}

#[test]
fn dangling_tutor_reference_is_named_unknown() {
    let snapshot = roster(vec![
        Course::new("c1", "A", slot(&[1], 1, 10, (9, 0), (10, 0))).with_tutor("ghost"),
        Course::new("c2", "B", slot(&[1], 1, 10, (9, 0), (10, 0))).with_tutor("ghost"),
    ]);
    let conflicts = detect_all_conflicts(&snapshot);
    assert_eq!(conflicts.len(), 1);
    assert!(conflicts[0].message.contains("Tutor Unknown"));
}

#[test]
fn empty_course_list_has_no_conflicts() {
    assert!(detect_all_conflicts(&roster(vec![])).is_empty());
}

// ── check_course_conflicts ──────────────────────────────────────────────────

#[test]
fn candidate_is_never_compared_with_itself() {
    let course =
        Course::new("c1", "Algebra", slot(&[1], 1, 10, (9, 0), (11, 0))).with_tutor("t1");
    let snapshot = roster(vec![course.clone()]);

    let conflicts = check_course_conflicts(&course, &snapshot, &PlannerConfig::default());

    assert!(conflicts.is_empty());
}

#[test]
fn candidate_conflicts_use_directional_messages() {
    let snapshot = roster(vec![Course::new(
        "c1",
        "Algebra",
        slot(&[1], 1, 10, (9, 0), (11, 0)),
    )
    .with_tutor("t1")
    .with_location("l1")]);
    let candidate = Course::new("new", "Geometry", slot(&[1], 3, 2, (10, 0), (11, 0)))
        .with_tutor("t1")
        .with_location("l1");

    let conflicts = check_course_conflicts(&candidate, &snapshot, &PlannerConfig::default());

    assert_eq!(conflicts.len(), 2);
    assert_eq!(
        conflicts[0].message,
        "Tutor \"Ada\" is already teaching \"Algebra\" at this time"
    );
    assert_eq!(
        conflicts[1].message,
        "Location \"Main Hall\" is already being used for \"Algebra\" at this time"
    );
    assert!(conflicts.iter().all(|c| c.course == "new" && c.conflicting_course == "c1"));
    assert!(conflicts.iter().all(|c| !c.is_blocking()));
}

#[test]
fn edited_course_ignores_its_stored_version() {
    let stored = Course::new("c1", "Algebra", slot(&[1], 1, 10, (9, 0), (11, 0))).with_tutor("t1");
    let other = Course::new("c2", "Geometry", slot(&[1], 1, 10, (13, 0), (14, 0))).with_tutor("t1");
    let snapshot = roster(vec![stored, other]);

    // Move c1 onto c2's time.
    let edited =
        Course::new("c1", "Algebra", slot(&[1], 1, 10, (13, 0), (14, 0))).with_tutor("t1");
    let conflicts = check_course_conflicts(&edited, &snapshot, &PlannerConfig::default());

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].conflicting_course, "c2");
}

#[test]
fn conflicts_serialize_with_snake_case_kind() {
    let snapshot = roster(vec![
        Course::new("c1", "A", slot(&[1], 1, 10, (9, 0), (10, 0))).with_tutor("t1"),
        Course::new("c2", "B", slot(&[1], 1, 10, (9, 0), (10, 0))).with_tutor("t1"),
    ]);
    let json = serde_json::to_value(detect_all_conflicts(&snapshot)).unwrap();
    assert_eq!(json[0]["kind"], "tutor_double_booking");
    assert!(json[0].get("travel").is_none());
}
