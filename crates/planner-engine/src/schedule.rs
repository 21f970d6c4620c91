//! Read-only queries over a course list, used by calendar and report views.

use std::ops::RangeInclusive;

use crate::calendar::minutes_of;
use crate::model::Course;

/// Courses occupying the one-hour cell starting at `hour` on `day`, in any
/// week of `weeks`.
///
/// A course occupies the cell when its clock range intersects
/// `[hour:00, hour+1:00)`; the 23:00 cell runs to midnight.
pub fn courses_at_time_slot<'a>(
    courses: &'a [Course],
    weeks: RangeInclusive<u32>,
    day: u8,
    hour: u32,
) -> Vec<&'a Course> {
    if hour > 23 {
        return Vec::new();
    }
    let cell_start = hour * 60;
    let cell_end = cell_start + 60;

    courses
        .iter()
        .filter(|course| {
            let slot = &course.slot;
            slot.days.contains(&day)
                && !(slot.end_week() < *weeks.start() || slot.start_week > *weeks.end())
                && minutes_of(slot.start_time) < cell_end
                && cell_start < minutes_of(slot.end_time)
        })
        .collect()
}

/// Courses running in `current_week` or starting in the following week.
///
/// Sorted by start week, then by first meeting day, and truncated to `limit`.
pub fn upcoming_courses(courses: &[Course], current_week: u32, limit: usize) -> Vec<&Course> {
    let mut upcoming: Vec<&Course> = courses
        .iter()
        .filter(|c| {
            c.slot.start_week <= current_week.saturating_add(1) && c.slot.end_week() >= current_week
        })
        .collect();

    upcoming.sort_by_key(|c| (c.slot.start_week, c.slot.days.first().copied()));
    upcoming.truncate(limit);
    upcoming
}

/// Courses assigned to `tutor_id`, in list order.
pub fn courses_for_tutor<'a>(courses: &'a [Course], tutor_id: &str) -> Vec<&'a Course> {
    courses
        .iter()
        .filter(|c| c.tutor() == Some(tutor_id))
        .collect()
}

/// Courses held at `location_id`, in list order.
pub fn courses_for_location<'a>(courses: &'a [Course], location_id: &str) -> Vec<&'a Course> {
    courses
        .iter()
        .filter(|c| c.location() == Some(location_id))
        .collect()
}
