//! Save-time assessment of a single course.
//!
//! Bundles every check a course goes through before it is persisted into one
//! typed result. The engine does not decide whether to save: it reports which
//! findings are blocking (travel-time violations, blackout dates) and which
//! are warnings the user may override (availability, double-bookings,
//! qualification, capacity).

use serde::Serialize;
use tracing::debug;

use crate::availability::is_available;
use crate::blackout::{blocked_occurrences, BlockedOccurrence};
use crate::calendar::day_name;
use crate::config::PlannerConfig;
use crate::conflict::{check_course_conflicts, Conflict};
use crate::model::Course;
use crate::rules::within_capacity;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseAssessment {
    pub course: String,
    /// Course days on which the assigned tutor is not available.
    pub tutor_unavailable_days: Vec<u8>,
    /// Course days on which the assigned location is not available.
    pub location_unavailable_days: Vec<u8>,
    /// False when the assigned tutor is not among the course's qualified tutors.
    pub qualified: bool,
    /// False when the student count exceeds the location's capacity.
    pub within_capacity: bool,
    /// Double-bookings and travel-time violations.
    pub conflicts: Vec<Conflict>,
    /// Occurrences landing on blackout dates.
    pub blocked_dates: Vec<BlockedOccurrence>,
    #[serde(skip)]
    messages: Messages,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Messages {
    warnings: Vec<String>,
    blocking: Vec<String>,
}

impl CourseAssessment {
    /// Whether the course must not be saved.
    pub fn is_blocking(&self) -> bool {
        !self.blocked_dates.is_empty() || self.conflicts.iter().any(Conflict::is_blocking)
    }

    /// Whether there is nothing to report at all.
    pub fn is_clean(&self) -> bool {
        self.messages.warnings.is_empty() && self.messages.blocking.is_empty()
    }

    /// Findings the user may confirm and override.
    pub fn warnings(&self) -> &[String] {
        &self.messages.warnings
    }

    /// Findings that prevent saving.
    pub fn blocking_reasons(&self) -> &[String] {
        &self.messages.blocking
    }
}

/// Run every check against `candidate`.
///
/// The candidate is compared with the snapshot's other courses; if a course
/// with the same id is already in the snapshot it is treated as the version
/// being edited and ignored.
pub fn assess_course(
    candidate: &Course,
    snapshot: &Snapshot,
    config: &PlannerConfig,
) -> CourseAssessment {
    let slot = &candidate.slot;
    let window = format!(
        "{}-{}",
        slot.start_time.format("%H:%M"),
        slot.end_time.format("%H:%M")
    );
    let mut messages = Messages::default();

    let tutor_unavailable_days: Vec<u8> = match candidate.tutor() {
        Some(tutor_id) => {
            let tutor = snapshot.tutor(tutor_id).map(|t| &t.availability);
            let days = unavailable_days(candidate, |day| {
                is_available(tutor, day, slot.start_time, slot.end_time, &config.periods)
            });
            for day in &days {
                messages.warnings.push(format!(
                    "{} is not marked as available on {} during {}",
                    snapshot.tutor_name(tutor_id),
                    day_name(*day),
                    window
                ));
            }
            days
        }
        None => Vec::new(),
    };

    let location_unavailable_days: Vec<u8> = match candidate.location() {
        Some(location_id) => {
            let location = snapshot.location(location_id).map(|l| &l.availability);
            let days = unavailable_days(candidate, |day| {
                is_available(location, day, slot.start_time, slot.end_time, &config.periods)
            });
            for day in &days {
                messages.warnings.push(format!(
                    "{} is not marked as available on {} during {}",
                    snapshot.location_name(location_id),
                    day_name(*day),
                    window
                ));
            }
            days
        }
        None => Vec::new(),
    };

    let qualified = candidate
        .tutor()
        .is_none_or(|tutor_id| snapshot.qualifications.permits(&candidate.id, tutor_id));
    if !qualified {
        if let Some(tutor_id) = candidate.tutor() {
            messages.warnings.push(format!(
                "{} is not qualified to teach \"{}\"",
                snapshot.tutor_name(tutor_id),
                candidate.name
            ));
        }
    }

    let location = candidate.location().and_then(|id| snapshot.location(id));
    let within_capacity = within_capacity(location, candidate.student_count);
    if !within_capacity {
        if let (Some(location), Some(students)) = (location, candidate.student_count) {
            messages.warnings.push(format!(
                "{} students exceed the capacity of {} ({})",
                students,
                location.name,
                location.capacity.unwrap_or_default()
            ));
        }
    }

    let conflicts = check_course_conflicts(candidate, snapshot, config);
    for conflict in &conflicts {
        if conflict.is_blocking() {
            messages.blocking.push(conflict.message.clone());
        } else {
            messages.warnings.push(conflict.message.clone());
        }
    }

    let blocked_dates = blocked_occurrences(
        candidate,
        snapshot.week1_start,
        &snapshot.unavailable_dates,
        config.planning_weeks,
    );
    for blocked in &blocked_dates {
        messages.blocking.push(format!(
            "Week {} {} ({}) is unavailable: {}",
            blocked.week,
            day_name(blocked.day),
            blocked.date,
            blocked.reason
        ));
    }

    let assessment = CourseAssessment {
        course: candidate.id.clone(),
        tutor_unavailable_days,
        location_unavailable_days,
        qualified,
        within_capacity,
        conflicts,
        blocked_dates,
        messages,
    };

    debug!(
        course = %candidate.id,
        blocking = assessment.is_blocking(),
        warnings = assessment.warnings().len(),
        "assessed course"
    );
    assessment
}

fn unavailable_days(course: &Course, available: impl Fn(u8) -> bool) -> Vec<u8> {
    course
        .slot
        .days
        .iter()
        .copied()
        .filter(|day| !available(*day))
        .collect()
}
