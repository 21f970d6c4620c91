//! Qualification and capacity rules.
//!
//! Qualification is stored once, as a set of `(course, tutor)` pairs. The
//! "tutors qualified for a course" and "courses a tutor can teach" views are
//! both computed from that set, so they can never drift apart.

use std::collections::BTreeSet;

use crate::model::Location;

/// The tutor ↔ course qualification relation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qualifications {
    pairs: BTreeSet<(String, String)>,
}

impl Qualifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `tutor_id` may teach `course_id`.
    pub fn grant(&mut self, course_id: impl Into<String>, tutor_id: impl Into<String>) -> bool {
        self.pairs.insert((course_id.into(), tutor_id.into()))
    }

    /// Remove a qualification. Returns whether it existed.
    pub fn revoke(&mut self, course_id: &str, tutor_id: &str) -> bool {
        self.pairs
            .remove(&(course_id.to_string(), tutor_id.to_string()))
    }

    /// Drop every pair mentioning `course_id`.
    pub fn forget_course(&mut self, course_id: &str) {
        self.pairs.retain(|(course, _)| course != course_id);
    }

    /// Drop every pair mentioning `tutor_id`.
    pub fn forget_tutor(&mut self, tutor_id: &str) {
        self.pairs.retain(|(_, tutor)| tutor != tutor_id);
    }

    /// Tutors qualified for `course_id` (empty = unrestricted).
    pub fn tutors_for<'a>(&'a self, course_id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(course, _)| course == course_id)
            .map(|(_, tutor)| tutor.as_str())
    }

    /// Courses `tutor_id` is qualified to teach.
    pub fn courses_for<'a>(&'a self, tutor_id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(_, tutor)| tutor == tutor_id)
            .map(|(course, _)| course.as_str())
    }

    /// Whether any tutor restriction exists for `course_id`.
    pub fn is_restricted(&self, course_id: &str) -> bool {
        self.tutors_for(course_id).next().is_some()
    }

    /// Whether `tutor_id` may teach `course_id`.
    ///
    /// A course with no qualified tutors recorded accepts anyone.
    pub fn permits(&self, course_id: &str, tutor_id: &str) -> bool {
        !self.is_restricted(course_id)
            || self
                .pairs
                .contains(&(course_id.to_string(), tutor_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Whether a location can hold `student_count` students.
///
/// An unknown location, unset or zero capacity, or unset student count is
/// never a violation.
pub fn within_capacity(location: Option<&Location>, student_count: Option<u32>) -> bool {
    let capacity = location
        .and_then(|l| l.capacity)
        .filter(|capacity| *capacity > 0);
    match (capacity, student_count) {
        (Some(capacity), Some(students)) => students <= capacity,
        _ => true,
    }
}
