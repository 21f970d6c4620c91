//! Core entities of a timetable snapshot: tutors, locations, and courses.
//!
//! These are the decoded, normalized forms. Legacy wire shapes are handled in
//! [`crate::snapshot`]; everything here has already been validated.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::config::Period;

/// A one-off availability window on a specific date.
///
/// Stored and carried through, but not consulted by the availability predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomWindow {
    pub date: NaiveDate,
    #[serde(with = "calendar::clock")]
    pub start_time: NaiveTime,
    #[serde(with = "calendar::clock")]
    pub end_time: NaiveTime,
}

/// Recurring weekly availability of a tutor or location.
///
/// An empty `recurring` map means nothing has been configured, which the
/// availability predicate treats as "always available".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Availability {
    /// Day index (0 = Sunday) → available periods on that day.
    pub recurring: BTreeMap<u8, BTreeSet<Period>>,
    pub custom: Vec<CustomWindow>,
}

impl Availability {
    /// Availability with nothing configured (default-open).
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Builder: mark `periods` available on `day`.
    pub fn with_day(mut self, day: u8, periods: impl IntoIterator<Item = Period>) -> Self {
        self.recurring.entry(day).or_default().extend(periods);
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.recurring.is_empty()
    }

    /// Periods available on `day`, if any are configured for it.
    pub fn periods_on(&self, day: u8) -> Option<&BTreeSet<Period>> {
        self.recurring.get(&day).filter(|periods| !periods.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tutor {
    pub id: String,
    pub name: String,
    pub availability: Availability,
}

impl Tutor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            availability: Availability::default(),
        }
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: String,
    pub name: String,
    /// Maximum number of students; `None` means unlimited.
    pub capacity: Option<u32>,
    pub availability: Availability,
    /// Other location id → minutes needed to travel there from here.
    pub travel_times: BTreeMap<String, u32>,
}

impl Location {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capacity: None,
            availability: Availability::default(),
            travel_times: BTreeMap::new(),
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_travel_time(mut self, to: impl Into<String>, minutes: u32) -> Self {
        self.travel_times.insert(to.into(), minutes);
        self
    }

    /// Configured travel time to `other`, ignoring zero entries.
    pub fn travel_minutes_to(&self, other: &str) -> Option<u32> {
        self.travel_times
            .get(other)
            .copied()
            .filter(|minutes| *minutes > 0)
    }
}

/// The recurring shape of a course: which days, which weeks, what time.
///
/// A slot occupies `days × [start_week, end_week] × [start_time, end_time)`;
/// every occurrence has the same time of day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Day indices (0 = Sunday) on which the course meets.
    pub days: BTreeSet<u8>,
    /// 1-based first week.
    pub start_week: u32,
    /// Number of consecutive weeks.
    pub duration: u32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Slot {
    pub fn new(
        days: impl IntoIterator<Item = u8>,
        start_week: u32,
        duration: u32,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            days: days.into_iter().collect(),
            start_week,
            duration,
            start_time,
            end_time,
        }
    }

    /// Last week the slot runs in (inclusive).
    pub fn end_week(&self) -> u32 {
        self.start_week.saturating_add(self.duration).saturating_sub(1)
    }

    pub fn runs_in_week(&self, week: u32) -> bool {
        week >= self.start_week && week <= self.end_week()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub tutor_id: Option<String>,
    pub location_id: Option<String>,
    pub slot: Slot,
    pub student_count: Option<u32>,
    /// Reporting only.
    pub funded: bool,
}

impl Course {
    pub fn new(id: impl Into<String>, name: impl Into<String>, slot: Slot) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tutor_id: None,
            location_id: None,
            slot,
            student_count: None,
            funded: false,
        }
    }

    pub fn with_tutor(mut self, tutor_id: impl Into<String>) -> Self {
        self.tutor_id = Some(tutor_id.into());
        self
    }

    pub fn with_location(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    pub fn with_students(mut self, count: u32) -> Self {
        self.student_count = Some(count);
        self
    }

    pub fn tutor(&self) -> Option<&str> {
        self.tutor_id.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location_id.as_deref()
    }
}
