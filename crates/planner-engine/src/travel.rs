//! Travel-time feasibility for a tutor teaching at different locations.
//!
//! A tutor finishing at location A and starting at location B on the same day
//! needs at least `travel_times[B] + buffer` minutes in between. Travel times
//! are read from the candidate course's location; a missing or zero entry means
//! there is no known constraint and the pair is skipped.
//!
//! Violations are reported as [`ConflictKind::Travel`] and are always blocking.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::calendar::{day_name, minutes_of};
use crate::conflict::{Conflict, ConflictKind};
use crate::model::{Course, Location};
use crate::overlap::weeks_intersect;
use crate::snapshot::Snapshot;

/// Details of a travel-time violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelShortfall {
    /// Day index (0 = Sunday) on which the violation occurs.
    pub day: u8,
    /// Location the tutor leaves from.
    pub from_location: String,
    /// Location the tutor must reach.
    pub to_location: String,
    /// Travel time plus buffer.
    pub required_minutes: u32,
    /// Gap between the two sessions.
    pub available_minutes: u32,
}

/// Find travel-time violations between `candidate` and the tutor's other courses.
///
/// Courses without a tutor or without a location are never checked. Courses at
/// the same location, or that overlap in time (a double-booking, reported
/// elsewhere), are skipped. One record is produced per shared day.
pub fn check_tutor_travel_conflicts(
    candidate: &Course,
    snapshot: &Snapshot,
    buffer_minutes: u32,
) -> Vec<Conflict> {
    let (Some(tutor_id), Some(location_id)) = (candidate.tutor(), candidate.location()) else {
        return Vec::new();
    };
    let Some(location) = snapshot.location(location_id) else {
        return Vec::new();
    };

    let others: Vec<&Course> = snapshot
        .courses
        .iter()
        .filter(|c| c.id != candidate.id && c.tutor() == Some(tutor_id) && c.location().is_some())
        .collect();

    let mut conflicts = Vec::new();

    for day in &candidate.slot.days {
        for other in &others {
            if !other.slot.days.contains(day) || !weeks_intersect(&candidate.slot, &other.slot) {
                continue;
            }

            let Some(other_location_id) = other.location() else {
                continue;
            };
            if other_location_id == location_id {
                continue;
            }

            let Some(travel) = location.travel_minutes_to(other_location_id) else {
                continue;
            };
            let required = travel + buffer_minutes;

            let (first, second, from_id, to_id) = if candidate.slot.start_time >= other.slot.end_time {
                (*other, candidate, other_location_id, location_id)
            } else if other.slot.start_time >= candidate.slot.end_time {
                (candidate, *other, location_id, other_location_id)
            } else {
                continue;
            };

            let Some(gap) = gap_shortfall(first.slot.end_time, second.slot.start_time, required)
            else {
                continue;
            };

            trace!(
                candidate = %candidate.id,
                other = %other.id,
                day,
                required,
                gap,
                "travel time too short"
            );

            conflicts.push(Conflict {
                kind: ConflictKind::Travel,
                message: format!(
                    "Tutor \"{}\" cannot travel from \"{}\" to \"{}\" in time on {}: \"{}\" ends at {} and \"{}\" starts at {} ({} min available, {} min required including {} min buffer)",
                    snapshot.tutor_name(tutor_id),
                    snapshot.location_name(from_id),
                    snapshot.location_name(to_id),
                    day_name(*day),
                    first.name,
                    first.slot.end_time.format("%H:%M"),
                    second.name,
                    second.slot.start_time.format("%H:%M"),
                    gap,
                    required,
                    buffer_minutes,
                ),
                course: candidate.id.clone(),
                conflicting_course: other.id.clone(),
                travel: Some(TravelShortfall {
                    day: *day,
                    from_location: from_id.to_string(),
                    to_location: to_id.to_string(),
                    required_minutes: required,
                    available_minutes: gap,
                }),
            });
        }
    }

    debug!(course = %candidate.id, travel_conflicts = conflicts.len(), "checked travel times");
    conflicts
}

/// The gap between `earlier_end` and `later_start` if it is below `required`.
fn gap_shortfall(earlier_end: NaiveTime, later_start: NaiveTime, required: u32) -> Option<u32> {
    let gap = minutes_of(later_start).saturating_sub(minutes_of(earlier_end));
    (gap < required).then_some(gap)
}

/// Seed missing reverse travel times.
///
/// For every configured `A → B` where `B → A` is unset (or zero), `B → A` gets
/// the same minutes. Existing reverse entries are never overwritten, so an
/// intentionally asymmetric pair stays asymmetric. Returns the number of
/// entries filled.
pub fn fill_reverse_travel_times(locations: &mut [Location]) -> usize {
    let forward: Vec<(String, String, u32)> = locations
        .iter()
        .flat_map(|from| {
            from.travel_times
                .iter()
                .filter(|(_, minutes)| **minutes > 0)
                .map(move |(to, minutes)| (from.id.clone(), to.clone(), *minutes))
        })
        .collect();

    let index: BTreeMap<String, usize> = locations
        .iter()
        .enumerate()
        .map(|(i, l)| (l.id.clone(), i))
        .collect();

    let mut filled = 0;
    for (from, to, minutes) in forward {
        let Some(&target) = index.get(&to) else {
            continue;
        };
        let reverse = locations[target].travel_times.entry(from).or_insert(0);
        if *reverse == 0 {
            *reverse = minutes;
            filled += 1;
        }
    }

    if filled > 0 {
        debug!(filled, "seeded reverse travel times");
    }
    filled
}
