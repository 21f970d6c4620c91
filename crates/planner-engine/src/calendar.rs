//! Clock and calendar arithmetic for the planning horizon.
//!
//! Clock times are wall-clock `NaiveTime`s with no timezone. Planning weeks are
//! 1-based and anchored on a single "week 1 start" date which must be a Monday;
//! week `n` starts `(n - 1) * 7` days after the anchor.
//!
//! Day indices follow the Sunday = 0 … Saturday = 6 convention throughout the
//! crate. Within a Monday-anchored week, Monday is offset 0 and Sunday is
//! offset 6.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, TimeDelta, Timelike};
use tracing::warn;

use crate::error::{PlannerError, Result};
use crate::model::Course;

/// Number of weeks in the default planning horizon.
pub const DEFAULT_PLANNING_WEEKS: u32 = 40;

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Parse a 24-hour `HH:MM` clock string (seconds are tolerated).
pub fn parse_clock(s: &str) -> Result<NaiveTime> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| PlannerError::InvalidTime(s.to_string()))
}

/// Minutes since midnight for a parsed clock time.
pub fn minutes_of(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Convert an `HH:MM` clock string to minutes since midnight.
///
/// ```
/// assert_eq!(planner_engine::calendar::time_to_minutes("14:45").unwrap(), 885);
/// ```
pub fn time_to_minutes(s: &str) -> Result<u32> {
    parse_clock(s).map(minutes_of)
}

/// Parse an ISO `YYYY-MM-DD` calendar date.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| PlannerError::InvalidDate(s.to_string()))
}

/// English name of a Sunday-based day index, or `"Unknown"` when out of range.
pub fn day_name(day: u8) -> &'static str {
    DAY_NAMES.get(day as usize).copied().unwrap_or("Unknown")
}

/// Offset of a Sunday-based day index within a Monday-anchored week.
///
/// Monday (1) → 0, …, Saturday (6) → 5, Sunday (0) → 6.
pub fn day_offset_from_monday(day: u8) -> u64 {
    (u64::from(day) + 6) % 7
}

/// Start date of planning week `week_number`, or `None` without an anchor.
///
/// Week `n` starts `(n - 1) * 7` days after the anchor, so week 0 is the week
/// before it.
pub fn week_start_date(week_number: u32, week1_start: Option<NaiveDate>) -> Option<NaiveDate> {
    let anchor = week1_start?;
    let offset = TimeDelta::try_days((i64::from(week_number) - 1) * 7)?;
    anchor.checked_add_signed(offset)
}

/// Planning week containing `today`, clamped to `None` outside `1..=planning_weeks`.
pub fn current_week(
    week1_start: Option<NaiveDate>,
    today: NaiveDate,
    planning_weeks: u32,
) -> Option<u32> {
    let anchor = week1_start?;
    let elapsed_days = (today - anchor).num_days();
    let week = elapsed_days.div_euclid(7) + 1;

    if week >= 1 && week <= i64::from(planning_weeks) {
        u32::try_from(week).ok()
    } else {
        None
    }
}

/// Result of aligning a configured week-1 anchor to a Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorAlignment {
    /// The Monday on or before the configured date.
    pub anchor: NaiveDate,
    /// The configured date when it was not already a Monday.
    pub corrected_from: Option<NaiveDate>,
}

impl AnchorAlignment {
    pub fn was_corrected(&self) -> bool {
        self.corrected_from.is_some()
    }
}

/// Move a week-1 anchor back to the preceding Monday if needed.
///
/// Calendar math assumes Monday-aligned weeks, so a mid-week anchor is
/// corrected here and reported via `corrected_from`.
pub fn align_week1_anchor(date: NaiveDate) -> AnchorAlignment {
    let back = u64::from(date.weekday().num_days_from_monday());
    if back == 0 {
        return AnchorAlignment {
            anchor: date,
            corrected_from: None,
        };
    }

    let anchor = date - Days::new(back);
    warn!(configured = %date, corrected = %anchor, "week 1 anchor is not a Monday");
    AnchorAlignment {
        anchor,
        corrected_from: Some(date),
    }
}

/// Concrete calendar date of day `day` in planning week `week`.
pub fn occurrence_date(week1_start: NaiveDate, week: u32, day: u8) -> Option<NaiveDate> {
    week_start_date(week, Some(week1_start))?
        .checked_add_days(Days::new(day_offset_from_monday(day)))
}

/// Every `(week, day, date)` occurrence of `course` up to week
/// `planning_weeks`, week-major.
pub fn course_occurrences(
    course: &Course,
    week1_start: NaiveDate,
    planning_weeks: u32,
) -> impl Iterator<Item = (u32, u8, NaiveDate)> + '_ {
    let last_week = course.slot.end_week().min(planning_weeks);
    (course.slot.start_week..=last_week).flat_map(move |week| {
        course
            .slot
            .days
            .iter()
            .filter_map(move |day| Some((week, *day, occurrence_date(week1_start, week, *day)?)))
    })
}

/// Serde adapter for `HH:MM` clock strings.
pub mod clock {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock(&raw).map_err(de::Error::custom)
    }
}
