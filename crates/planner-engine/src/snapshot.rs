//! In-memory planner snapshot and its JSON wire format.
//!
//! The persisted store holds `tutors`, `locations`, `courses`,
//! `unavailableDates`, and `week1StartDate` in camelCase JSON. Older stores may
//! lack `canTeach`, `qualifiedTutors`, `travelTimes`, or `daysOfWeek` (using a
//! singular `dayOfWeek` instead), and may use `""` or `"none"` for an
//! unassigned tutor or location. All of that is normalized here, once, so the
//! engine only ever sees the clean model.
//!
//! Unknown fields (display settings, colours, notes) are ignored. Unknown
//! period names and incomplete custom windows are skipped with a warning.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::blackout::UnavailableDate;
use crate::calendar::{align_week1_anchor, parse_clock, parse_iso_date, DEFAULT_PLANNING_WEEKS};
use crate::config::Period;
use crate::error::{PlannerError, Result};
use crate::model::{Availability, Course, CustomWindow, Location, Slot, Tutor};
use crate::rules::Qualifications;

const UNASSIGNED: &str = "none";

/// A read-only view of everything the engine reasons about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub tutors: Vec<Tutor>,
    pub locations: Vec<Location>,
    pub courses: Vec<Course>,
    pub unavailable_dates: Vec<UnavailableDate>,
    /// Monday of planning week 1, if configured.
    pub week1_start: Option<NaiveDate>,
    pub qualifications: Qualifications,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a persisted snapshot, normalizing legacy shapes.
    ///
    /// # Errors
    /// Returns `PlannerError::Snapshot` for malformed JSON, and
    /// `InvalidTime` / `InvalidDate` / `InvalidDay` / `InvalidCourse` for
    /// values that cannot be turned into a valid model.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_with_horizon(json, DEFAULT_PLANNING_WEEKS)
    }

    /// [`Snapshot::from_json`] with an explicit planning horizon.
    ///
    /// Courses starting after week `planning_weeks` are rejected; courses
    /// running past it are cut off at the last planning week.
    pub fn from_json_with_horizon(json: &str, planning_weeks: u32) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(json)?;
        raw.normalize(planning_weeks)
    }

    pub fn tutor(&self, id: &str) -> Option<&Tutor> {
        self.tutors.iter().find(|t| t.id == id)
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Display name of a tutor, or `"Unknown"` for a dangling reference.
    pub fn tutor_name(&self, id: &str) -> &str {
        self.tutor(id).map_or("Unknown", |t| t.name.as_str())
    }

    /// Display name of a location, or `"Unknown"` for a dangling reference.
    pub fn location_name(&self, id: &str) -> &str {
        self.location(id).map_or("Unknown", |l| l.name.as_str())
    }

    /// Builder: set the week-1 anchor, aligning it to a Monday.
    pub fn with_week1_start(mut self, date: NaiveDate) -> Self {
        self.week1_start = Some(align_week1_anchor(date).anchor);
        self
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    #[serde(default)]
    tutors: Option<Vec<RawTutor>>,
    #[serde(default)]
    locations: Option<Vec<RawLocation>>,
    #[serde(default)]
    courses: Option<Vec<RawCourse>>,
    #[serde(default)]
    unavailable_dates: Option<Vec<UnavailableDate>>,
    #[serde(default)]
    week1_start_date: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTutor {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    recurring_availability: Option<BTreeMap<u8, Vec<String>>>,
    #[serde(default)]
    custom_availability: Option<Vec<RawWindow>>,
    #[serde(default)]
    can_teach: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLocation {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    capacity: Option<u32>,
    #[serde(default)]
    recurring_availability: Option<BTreeMap<u8, Vec<String>>>,
    #[serde(default)]
    custom_availability: Option<Vec<RawWindow>>,
    #[serde(default)]
    travel_times: Option<BTreeMap<String, u32>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCourse {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    tutor_id: Option<String>,
    #[serde(default)]
    location_id: Option<String>,
    #[serde(default)]
    days_of_week: Option<Vec<RawDay>>,
    #[serde(default)]
    day_of_week: Option<RawDay>,
    start_time: String,
    end_time: String,
    start_week: u32,
    duration: u32,
    #[serde(default)]
    qualified_tutors: Option<Vec<String>>,
    #[serde(default)]
    student_count: Option<u32>,
    #[serde(default)]
    funded: bool,
}

/// Custom windows are kept as entered; blank form rows are common.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWindow {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    end_time: Option<String>,
}

impl RawWindow {
    fn parse(&self) -> Option<CustomWindow> {
        Some(CustomWindow {
            date: parse_iso_date(self.date.as_deref()?).ok()?,
            start_time: parse_clock(self.start_time.as_deref()?).ok()?,
            end_time: parse_clock(self.end_time.as_deref()?).ok()?,
        })
    }
}

/// Day indices were stored as numbers or as numeric strings from form values.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDay {
    Index(u8),
    Text(String),
}

impl RawDay {
    fn index(&self, course_id: &str) -> Result<u8> {
        let day = match self {
            RawDay::Index(day) => *day,
            RawDay::Text(text) => text.trim().parse().map_err(|_| PlannerError::InvalidCourse {
                id: course_id.to_string(),
                reason: format!("day '{}' is not a day index", text),
            })?,
        };
        if day > 6 {
            return Err(PlannerError::InvalidDay(day));
        }
        Ok(day)
    }
}

impl RawSnapshot {
    fn normalize(self, planning_weeks: u32) -> Result<Snapshot> {
        let mut qualifications = Qualifications::new();

        let tutors = self
            .tutors
            .unwrap_or_default()
            .into_iter()
            .map(|raw| {
                for course_id in raw.can_teach.iter().flatten() {
                    qualifications.grant(course_id.clone(), raw.id.clone());
                }
                Tutor {
                    id: raw.id.clone(),
                    name: raw.name,
                    availability: availability(
                        &raw.id,
                        raw.recurring_availability,
                        raw.custom_availability,
                    ),
                }
            })
            .collect();

        let locations = self
            .locations
            .unwrap_or_default()
            .into_iter()
            .map(|raw| Location {
                id: raw.id.clone(),
                name: raw.name,
                capacity: raw.capacity.filter(|capacity| *capacity > 0),
                availability: availability(
                    &raw.id,
                    raw.recurring_availability,
                    raw.custom_availability,
                ),
                travel_times: raw.travel_times.unwrap_or_default(),
            })
            .collect();

        let mut courses = Vec::new();
        for raw in self.courses.unwrap_or_default() {
            for tutor_id in raw.qualified_tutors.iter().flatten() {
                qualifications.grant(raw.id.clone(), tutor_id.clone());
            }
            courses.push(raw.into_course(planning_weeks)?);
        }

        let week1_start = self
            .week1_start_date
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_iso_date(&s))
            .transpose()?
            .map(|date| align_week1_anchor(date).anchor);

        let snapshot = Snapshot {
            tutors,
            locations,
            courses,
            unavailable_dates: self.unavailable_dates.unwrap_or_default(),
            week1_start,
            qualifications,
        };

        debug!(
            tutors = snapshot.tutors.len(),
            locations = snapshot.locations.len(),
            courses = snapshot.courses.len(),
            blackouts = snapshot.unavailable_dates.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }
}

impl RawCourse {
    fn into_course(self, planning_weeks: u32) -> Result<Course> {
        let invalid = |reason: &str| PlannerError::InvalidCourse {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        let days: BTreeSet<u8> = match (&self.days_of_week, &self.day_of_week) {
            (Some(days), _) if !days.is_empty() => days
                .iter()
                .map(|d| d.index(&self.id))
                .collect::<Result<_>>()?,
            (_, Some(day)) => {
                warn!(course = %self.id, "normalizing legacy single dayOfWeek");
                BTreeSet::from([day.index(&self.id)?])
            }
            _ => return Err(invalid("no days of week")),
        };

        let start_time = parse_clock(&self.start_time)?;
        let end_time = parse_clock(&self.end_time)?;
        if end_time <= start_time {
            return Err(invalid("end time must be after start time"));
        }
        if self.start_week == 0 {
            return Err(invalid("start week is 1-based"));
        }
        if self.duration == 0 {
            return Err(invalid("duration must be at least one week"));
        }
        if self.start_week > planning_weeks {
            return Err(invalid("start week is beyond the planning horizon"));
        }

        let remaining = planning_weeks - self.start_week + 1;
        let duration = if self.duration > remaining {
            warn!(
                course = %self.id,
                duration = self.duration,
                kept = remaining,
                "course runs past the planning horizon"
            );
            remaining
        } else {
            self.duration
        };

        Ok(Course {
            slot: Slot::new(days, self.start_week, duration, start_time, end_time),
            tutor_id: assigned(self.tutor_id),
            location_id: assigned(self.location_id),
            id: self.id,
            name: self.name,
            student_count: self.student_count,
            funded: self.funded,
        })
    }
}

fn availability(
    owner: &str,
    recurring: Option<BTreeMap<u8, Vec<String>>>,
    custom: Option<Vec<RawWindow>>,
) -> Availability {
    let recurring = recurring
        .unwrap_or_default()
        .into_iter()
        .map(|(day, names)| {
            let periods: BTreeSet<Period> = names
                .iter()
                .filter_map(|name| {
                    let period = Period::from_name(name);
                    if period.is_none() {
                        warn!(owner, day, period = %name, "skipping unknown availability period");
                    }
                    period
                })
                .collect();
            (day, periods)
        })
        .collect();

    let raw_custom = custom.unwrap_or_default();
    let custom: Vec<CustomWindow> = raw_custom.iter().filter_map(RawWindow::parse).collect();
    if custom.len() < raw_custom.len() {
        warn!(
            owner,
            dropped = raw_custom.len() - custom.len(),
            "dropping incomplete custom availability windows"
        );
    }

    Availability { recurring, custom }
}

/// Map the empty and `"none"` sentinels to `None`.
fn assigned(id: Option<String>) -> Option<String> {
    id.filter(|id| !id.is_empty() && id != UNASSIGNED)
}
