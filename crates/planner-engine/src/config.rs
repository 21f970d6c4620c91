//! Engine configuration.
//!
//! The period table, travel buffer, and planning horizon are plain data so
//! callers (and tests) can swap them out. `PlannerConfig::default()` carries
//! the standard values; the CLI can load overrides from JSON.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::calendar::{self, DEFAULT_PLANNING_WEEKS};
use crate::error::Result;

/// Fixed safety margin added to every configured inter-location travel time.
pub const DEFAULT_TRAVEL_BUFFER_MINUTES: u32 = 15;

/// A named coarse time bucket used for recurring availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Morning,
    Afternoon,
    Evening,
}

impl Period {
    /// All periods in adjacency order. Only neighbours in this order may be
    /// joined into a longer available span.
    pub const ALL: [Period; 3] = [Period::Morning, Period::Afternoon, Period::Evening];

    /// Look up a period by its stored name.
    pub fn from_name(name: &str) -> Option<Period> {
        match name {
            "morning" => Some(Period::Morning),
            "afternoon" => Some(Period::Afternoon),
            "evening" => Some(Period::Evening),
            _ => None,
        }
    }
}

/// Half-open `[start, end)` clock bounds of one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBounds {
    #[serde(with = "calendar::clock")]
    pub start: NaiveTime,
    #[serde(with = "calendar::clock")]
    pub end: NaiveTime,
}

impl PeriodBounds {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    fn hours(start: u32, end: u32) -> Self {
        Self {
            start: NaiveTime::from_hms_opt(start, 0, 0).unwrap_or_default(),
            end: NaiveTime::from_hms_opt(end, 0, 0).unwrap_or_default(),
        }
    }

    /// Whether `[start, end)` lies entirely inside these bounds.
    pub fn contains(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start >= self.start && end <= self.end
    }
}

/// Clock bounds for each [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTable {
    pub morning: PeriodBounds,
    pub afternoon: PeriodBounds,
    pub evening: PeriodBounds,
}

impl PeriodTable {
    pub fn bounds(&self, period: Period) -> PeriodBounds {
        match period {
            Period::Morning => self.morning,
            Period::Afternoon => self.afternoon,
            Period::Evening => self.evening,
        }
    }
}

impl Default for PeriodTable {
    fn default() -> Self {
        Self {
            morning: PeriodBounds::hours(6, 12),
            afternoon: PeriodBounds::hours(12, 17),
            evening: PeriodBounds::hours(17, 22),
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Clock bounds of the availability periods.
    pub periods: PeriodTable,

    /// Minutes added to every configured travel time.
    pub travel_buffer_minutes: u32,

    /// Length of the planning horizon in weeks.
    pub planning_weeks: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            periods: PeriodTable::default(),
            travel_buffer_minutes: DEFAULT_TRAVEL_BUFFER_MINUTES,
            planning_weeks: DEFAULT_PLANNING_WEEKS,
        }
    }
}

impl PlannerConfig {
    /// Decode a configuration from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
