//! Overlap test for recurring slots.
//!
//! Two slots overlap only when all three dimensions intersect: they share a
//! weekday, their week ranges intersect (closed intervals), and their clock
//! ranges intersect (half-open intervals). Back-to-back sessions where one ends
//! exactly when the other starts do NOT overlap.

use chrono::NaiveTime;

use crate::model::Slot;

/// Whether two slots ever occupy the same day, week, and time.
pub fn sessions_overlap(a: &Slot, b: &Slot) -> bool {
    days_intersect(a, b) && weeks_intersect(a, b) && times_intersect(a, b)
}

/// Whether the slots share at least one weekday.
pub fn days_intersect(a: &Slot, b: &Slot) -> bool {
    !a.days.is_disjoint(&b.days)
}

/// Whether the closed week ranges `[start_week, end_week]` intersect.
pub fn weeks_intersect(a: &Slot, b: &Slot) -> bool {
    !(a.end_week() < b.start_week || b.end_week() < a.start_week)
}

/// Whether the half-open clock ranges `[start_time, end_time)` intersect.
pub fn times_intersect(a: &Slot, b: &Slot) -> bool {
    clock_ranges_intersect(a.start_time, a.end_time, b.start_time, b.end_time)
}

fn clock_ranges_intersect(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    !(a_end <= b_start || b_end <= a_start)
}
