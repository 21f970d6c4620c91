//! Calendar blackout dates.
//!
//! A blackout is a single date or an inclusive date range on which no course
//! may run, regardless of tutor or location availability. A course that would
//! occur on any blackout date fails validation outright.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::{course_occurrences, parse_iso_date};
use crate::error::Result;
use crate::model::Course;

/// A blackout entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum UnavailableDate {
    Single {
        #[serde(default)]
        id: String,
        date: NaiveDate,
        #[serde(default)]
        reason: String,
    },
    Range {
        #[serde(default)]
        id: String,
        #[serde(rename = "startDate")]
        start: NaiveDate,
        #[serde(rename = "endDate")]
        end: NaiveDate,
        #[serde(default)]
        reason: String,
    },
}

impl UnavailableDate {
    pub fn single(date: NaiveDate, reason: impl Into<String>) -> Self {
        Self::Single {
            id: String::new(),
            date,
            reason: reason.into(),
        }
    }

    pub fn range(start: NaiveDate, end: NaiveDate, reason: impl Into<String>) -> Self {
        Self::Range {
            id: String::new(),
            start,
            end,
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::Single { reason, .. } | Self::Range { reason, .. } => reason,
        }
    }

    /// Whether `date` falls on this entry (ranges are inclusive at both ends).
    pub fn covers(&self, date: NaiveDate) -> bool {
        match self {
            Self::Single { date: blocked, .. } => *blocked == date,
            Self::Range { start, end, .. } => *start <= date && date <= *end,
        }
    }
}

/// Whether `date` is covered by any blackout entry.
pub fn is_date_unavailable(date: NaiveDate, unavailable: &[UnavailableDate]) -> bool {
    unavailable.iter().any(|entry| entry.covers(date))
}

/// [`is_date_unavailable`] for an ISO `YYYY-MM-DD` string.
pub fn is_iso_date_unavailable(date: &str, unavailable: &[UnavailableDate]) -> Result<bool> {
    Ok(is_date_unavailable(parse_iso_date(date)?, unavailable))
}

/// A course occurrence that lands on a blackout date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockedOccurrence {
    pub week: u32,
    pub day: u8,
    pub date: NaiveDate,
    pub reason: String,
}

/// Every occurrence of `course` within the planning horizon that falls on a
/// blackout date.
///
/// Without a week-1 anchor no occurrence has a concrete date, so nothing can
/// be blocked and the result is empty.
pub fn blocked_occurrences(
    course: &Course,
    week1_start: Option<NaiveDate>,
    unavailable: &[UnavailableDate],
    planning_weeks: u32,
) -> Vec<BlockedOccurrence> {
    let Some(anchor) = week1_start else {
        return Vec::new();
    };
    if unavailable.is_empty() {
        return Vec::new();
    }

    let blocked: Vec<BlockedOccurrence> = course_occurrences(course, anchor, planning_weeks)
        .filter_map(|(week, day, date)| {
            let entry = unavailable.iter().find(|entry| entry.covers(date))?;
            Some(BlockedOccurrence {
                week,
                day,
                date,
                reason: entry.reason().to_string(),
            })
        })
        .collect();

    debug!(course = %course.id, blocked = blocked.len(), "checked blackout dates");
    blocked
}
