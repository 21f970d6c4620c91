//! Error types for planner-engine operations.
//!
//! Engine predicates never fail; errors only arise at the boundary where raw
//! snapshot data (clock strings, ISO dates, day indices) is decoded.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid clock time: {0}")]
    InvalidTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid day index: {0} (expected 0=Sunday..6=Saturday)")]
    InvalidDay(u8),

    #[error("Invalid course '{id}': {reason}")]
    InvalidCourse { id: String, reason: String },

    #[error("Snapshot decode error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
