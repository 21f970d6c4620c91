//! Double-booking detection across a course set.
//!
//! Two courses conflict on a resource when their slots overlap (see
//! [`crate::overlap`]) and they are assigned the same tutor or the same
//! location. Unassigned resources never conflict. No deduplication happens:
//! every overlapping pair yields its own records, and a pair sharing both
//! tutor and location yields two.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::PlannerConfig;
use crate::model::Course;
use crate::overlap::sessions_overlap;
use crate::snapshot::Snapshot;
use crate::travel::{check_tutor_travel_conflicts, TravelShortfall};

/// What kind of clash a [`Conflict`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// The same tutor is booked for two overlapping courses.
    TutorDoubleBooking,
    /// The same location is booked for two overlapping courses.
    LocationDoubleBooking,
    /// The tutor cannot get between two locations in time.
    Travel,
}

/// How a caller should treat a conflict when saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The user may confirm and save anyway.
    Overridable,
    /// The course must not be saved.
    Blocking,
}

/// A detected conflict between two courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    /// Human-readable description naming the resource and both courses.
    pub message: String,
    /// The first course of the pair, or the candidate being checked.
    pub course: String,
    /// The other course of the pair.
    pub conflicting_course: String,
    /// Travel details, present only for [`ConflictKind::Travel`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel: Option<TravelShortfall>,
}

impl Conflict {
    pub fn severity(&self) -> Severity {
        match self.kind {
            ConflictKind::Travel => Severity::Blocking,
            ConflictKind::TutorDoubleBooking | ConflictKind::LocationDoubleBooking => {
                Severity::Overridable
            }
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity() == Severity::Blocking
    }
}

/// Find every tutor and location double-booking among the snapshot's courses.
///
/// Each unordered pair is examined once, in course order.
pub fn detect_all_conflicts(snapshot: &Snapshot) -> Vec<Conflict> {
    let courses = &snapshot.courses;
    let mut conflicts = Vec::new();

    for (index, course) in courses.iter().enumerate() {
        for other in &courses[index + 1..] {
            if !sessions_overlap(&course.slot, &other.slot) {
                continue;
            }

            if let Some(tutor_id) = shared(course.tutor(), other.tutor()) {
                trace!(a = %course.id, b = %other.id, tutor = tutor_id, "tutor double-booked");
                conflicts.push(Conflict {
                    kind: ConflictKind::TutorDoubleBooking,
                    message: format!(
                        "Tutor {} is double-booked: \"{}\" and \"{}\"",
                        snapshot.tutor_name(tutor_id),
                        course.name,
                        other.name
                    ),
                    course: course.id.clone(),
                    conflicting_course: other.id.clone(),
                    travel: None,
                });
            }

            if let Some(location_id) = shared(course.location(), other.location()) {
                trace!(a = %course.id, b = %other.id, location = location_id, "location double-booked");
                conflicts.push(Conflict {
                    kind: ConflictKind::LocationDoubleBooking,
                    message: format!(
                        "Location {} is double-booked: \"{}\" and \"{}\"",
                        snapshot.location_name(location_id),
                        course.name,
                        other.name
                    ),
                    course: course.id.clone(),
                    conflicting_course: other.id.clone(),
                    travel: None,
                });
            }
        }
    }

    debug!(
        courses = courses.len(),
        conflicts = conflicts.len(),
        "detected all conflicts"
    );
    conflicts
}

/// Check one candidate course against every other course in the snapshot.
///
/// The candidate need not be in the snapshot yet; if it is (same id), it is
/// never compared against itself. Travel-time violations for the candidate's
/// tutor are appended after the double-bookings.
pub fn check_course_conflicts(
    candidate: &Course,
    snapshot: &Snapshot,
    config: &PlannerConfig,
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for existing in snapshot.courses.iter().filter(|c| c.id != candidate.id) {
        if !sessions_overlap(&candidate.slot, &existing.slot) {
            continue;
        }

        if let Some(tutor_id) = shared(candidate.tutor(), existing.tutor()) {
            conflicts.push(Conflict {
                kind: ConflictKind::TutorDoubleBooking,
                message: format!(
                    "Tutor \"{}\" is already teaching \"{}\" at this time",
                    snapshot.tutor_name(tutor_id),
                    existing.name
                ),
                course: candidate.id.clone(),
                conflicting_course: existing.id.clone(),
                travel: None,
            });
        }

        if let Some(location_id) = shared(candidate.location(), existing.location()) {
            conflicts.push(Conflict {
                kind: ConflictKind::LocationDoubleBooking,
                message: format!(
                    "Location \"{}\" is already being used for \"{}\" at this time",
                    snapshot.location_name(location_id),
                    existing.name
                ),
                course: candidate.id.clone(),
                conflicting_course: existing.id.clone(),
                travel: None,
            });
        }
    }

    conflicts.extend(check_tutor_travel_conflicts(
        candidate,
        snapshot,
        config.travel_buffer_minutes,
    ));

    debug!(
        course = %candidate.id,
        conflicts = conflicts.len(),
        "checked course conflicts"
    );
    conflicts
}

/// The resource id both sides are assigned to, if any.
fn shared<'a>(a: Option<&'a str>, b: Option<&str>) -> Option<&'a str> {
    match (a, b) {
        (Some(a), Some(b)) if a == b => Some(a),
        _ => None,
    }
}
