//! # planner-engine
//!
//! Constraint engine for recurring, multi-week course timetables.
//!
//! Given a snapshot of tutors, locations, courses, and blackout dates, the
//! engine answers feasibility questions about resource availability,
//! double-bookings, travel between back-to-back sessions, and blackout dates.
//! It detects and reports; it never rearranges anything.
//!
//! Every function is pure over the snapshot passed in. There is no global or
//! cached state, so calling on every keystroke of an edit form is fine.
//!
//! ## Modules
//!
//! - [`calendar`]: clock parsing, week numbers, week-1 anchor alignment
//! - [`config`]: period table, travel buffer, planning horizon
//! - [`model`]: tutors, locations, courses, slots
//! - [`snapshot`]: the snapshot container and its legacy-tolerant JSON decoding
//! - [`availability`]: period-based availability predicate
//! - [`overlap`]: day × week × time overlap test
//! - [`conflict`]: tutor/location double-booking detection
//! - [`travel`]: travel-time feasibility between locations
//! - [`rules`]: qualification relation and capacity check
//! - [`blackout`]: blackout dates
//! - [`assessment`]: all checks for one course, split into blocking and overridable
//! - [`schedule`]: read-only calendar/report queries
//! - [`error`]: Error types

pub mod assessment;
pub mod availability;
pub mod blackout;
pub mod calendar;
pub mod config;
pub mod conflict;
pub mod error;
pub mod model;
pub mod overlap;
pub mod rules;
pub mod schedule;
pub mod snapshot;
pub mod travel;

pub use assessment::{assess_course, CourseAssessment};
pub use availability::{is_available, is_location_available, is_tutor_available};
pub use blackout::{blocked_occurrences, is_date_unavailable, UnavailableDate};
pub use calendar::{current_week, time_to_minutes, week_start_date};
pub use config::{Period, PlannerConfig};
pub use conflict::{check_course_conflicts, detect_all_conflicts, Conflict, ConflictKind, Severity};
pub use error::PlannerError;
pub use model::{Availability, Course, Location, Slot, Tutor};
pub use overlap::sessions_overlap;
pub use rules::{within_capacity, Qualifications};
pub use snapshot::Snapshot;
pub use travel::{check_tutor_travel_conflicts, fill_reverse_travel_times};
