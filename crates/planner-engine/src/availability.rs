//! Recurring availability of tutors and locations.
//!
//! Availability is expressed in coarse periods (morning, afternoon, evening)
//! per weekday rather than exact clock ranges. A requested `[start, end)`
//! interval is available when it fits inside one open period, or inside a run
//! of open periods that are neighbours in [`Period::ALL`] order.
//!
//! The same predicate serves tutors and locations; only the lookup differs.

use std::collections::BTreeSet;

use chrono::NaiveTime;
use tracing::trace;

use crate::config::{Period, PeriodBounds, PeriodTable};
use crate::model::{Availability, Slot};
use crate::snapshot::Snapshot;

/// Whether a resource is available for `[start, end)` on `day`.
///
/// - Unknown resource (`None`) → `false`.
/// - Nothing configured at all → `true` (default-open).
/// - Configured, but nothing open on `day` → `false`.
/// - Otherwise the interval must fit inside a single open period or a run of
///   consecutive open periods.
pub fn is_available(
    availability: Option<&Availability>,
    day: u8,
    start: NaiveTime,
    end: NaiveTime,
    periods: &PeriodTable,
) -> bool {
    let Some(availability) = availability else {
        return false;
    };

    if !availability.is_configured() {
        return true;
    }

    let Some(open) = availability.periods_on(day) else {
        return false;
    };

    if open
        .iter()
        .any(|period| periods.bounds(*period).contains(start, end))
    {
        return true;
    }

    open_spans(open, periods)
        .iter()
        .any(|span| span.contains(start, end))
}

/// Whether the resource is available for the slot's time on every slot day.
pub fn is_available_for_slot(
    availability: Option<&Availability>,
    slot: &Slot,
    periods: &PeriodTable,
) -> bool {
    slot.days.iter().all(|day| {
        is_available(
            availability,
            *day,
            slot.start_time,
            slot.end_time,
            periods,
        )
    })
}

/// Look up a tutor in `snapshot` and check availability.
pub fn is_tutor_available(
    snapshot: &Snapshot,
    tutor_id: &str,
    day: u8,
    start: NaiveTime,
    end: NaiveTime,
    periods: &PeriodTable,
) -> bool {
    let available = is_available(
        snapshot.tutor(tutor_id).map(|t| &t.availability),
        day,
        start,
        end,
        periods,
    );
    trace!(tutor = tutor_id, day, %start, %end, available, "tutor availability");
    available
}

/// Look up a location in `snapshot` and check availability.
pub fn is_location_available(
    snapshot: &Snapshot,
    location_id: &str,
    day: u8,
    start: NaiveTime,
    end: NaiveTime,
    periods: &PeriodTable,
) -> bool {
    let available = is_available(
        snapshot.location(location_id).map(|l| &l.availability),
        day,
        start,
        end,
        periods,
    );
    trace!(location = location_id, day, %start, %end, available, "location availability");
    available
}

/// Maximal runs of consecutive open periods, each merged into one span.
///
/// A run starts at an open period and extends through each following period
/// in adjacency order for as long as that period is also open.
pub fn open_spans(open: &BTreeSet<Period>, periods: &PeriodTable) -> Vec<PeriodBounds> {
    let mut spans: Vec<PeriodBounds> = Vec::new();
    let mut current: Option<PeriodBounds> = None;

    for period in Period::ALL {
        if open.contains(&period) {
            let bounds = periods.bounds(period);
            current = Some(match current {
                Some(span) => PeriodBounds::new(span.start, bounds.end),
                None => bounds,
            });
        } else if let Some(span) = current.take() {
            spans.push(span);
        }
    }

    spans.extend(current);
    spans
}
