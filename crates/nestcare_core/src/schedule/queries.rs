//! Read-side views derived from a date's or week's records.
//!
//! # Responsibility
//! - Partition one day's records by kind in chronological order.
//! - Lay a week's records out per date key for the calendar strip.
//! - Classify records as future for the reminder affordance.
//!
//! # Invariants
//! - Within a kind, records are ascending by `start_time`; the fixed-width
//!   zero-padded `HH:MM` format makes plain string comparison correct.
//! - A week map always carries all seven date keys, empty days included.

use crate::model::activity::{ActivityKind, ActivityRecord};
use crate::schedule::date_key::{clock_minutes, date_key, is_future, month_days, parse_date_key};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// One day's records partitioned by kind, each ascending by start time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySchedule {
    pub meals: Vec<ActivityRecord>,
    pub medicines: Vec<ActivityRecord>,
    pub sleeps: Vec<ActivityRecord>,
    pub plays: Vec<ActivityRecord>,
}

impl DaySchedule {
    /// True when no records exist for the day.
    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
            && self.medicines.is_empty()
            && self.sleeps.is_empty()
            && self.plays.is_empty()
    }
}

/// Partitions records by kind, sorting each partition by start time.
///
/// Sorting is stable, so records sharing a start time keep their incoming
/// relative order.
pub fn group_by_kind(records: Vec<ActivityRecord>) -> DaySchedule {
    let mut schedule = DaySchedule::default();
    for record in records {
        match record.kind {
            ActivityKind::Meal => schedule.meals.push(record),
            ActivityKind::Medicine => schedule.medicines.push(record),
            ActivityKind::Sleep => schedule.sleeps.push(record),
            ActivityKind::Play => schedule.plays.push(record),
        }
    }
    for partition in [
        &mut schedule.meals,
        &mut schedule.medicines,
        &mut schedule.sleeps,
        &mut schedule.plays,
    ] {
        partition.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    }
    schedule
}

/// Lays `records` out per date key over the given week window.
///
/// Every one of the seven keys is present in the result; a date with no
/// matching records maps to an empty vector, never to a missing entry.
/// Records dated outside the window are dropped. Each day is ascending by
/// start time.
pub fn items_for_week(
    week: &[NaiveDate; 7],
    records: Vec<ActivityRecord>,
) -> BTreeMap<String, Vec<ActivityRecord>> {
    let mut by_day: BTreeMap<String, Vec<ActivityRecord>> = week
        .iter()
        .map(|day| (date_key(*day), Vec::new()))
        .collect();
    for record in records {
        if let Some(day) = by_day.get_mut(&record.date) {
            day.push(record);
        }
    }
    for day in by_day.values_mut() {
        day.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    }
    by_day
}

/// True iff the record's `(date, start_time)` lies strictly after `now`.
///
/// A record whose fields fail to parse is never considered future.
pub fn is_record_future(record: &ActivityRecord, now: NaiveDateTime) -> bool {
    match (parse_date_key(&record.date), clock_minutes(&record.start_time)) {
        (Ok(date), Ok(minutes)) => is_future(date, minutes, now),
        _ => false,
    }
}

/// Caller-side gate for offering the reminder control.
///
/// The underlying toggle stays a plain flip (see
/// [`crate::model::activity::ActivityRecord::toggle_reminder`]); this check
/// only decides whether the affordance should be shown.
pub fn is_reminder_eligible(record: &ActivityRecord, now: NaiveDateTime) -> bool {
    is_record_future(record, now) && !record.is_completed
}

/// Per-day kind presence for a month grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayMarks {
    pub date: String,
    pub has_meal: bool,
    pub has_medicine: bool,
    pub has_sleep: bool,
}

/// Kind-presence marks for every day of the given month, in date order.
///
/// Returns `None` for an invalid month number.
pub fn month_marks(year: i32, month: u32, records: &[ActivityRecord]) -> Option<Vec<DayMarks>> {
    let days = month_days(year, month)?;
    Some(
        days.into_iter()
            .map(|day| {
                let key = date_key(day);
                let mut has_meal = false;
                let mut has_medicine = false;
                let mut has_sleep = false;
                for record in records.iter().filter(|record| record.date == key) {
                    match record.kind {
                        ActivityKind::Meal => has_meal = true,
                        ActivityKind::Medicine => has_medicine = true,
                        ActivityKind::Sleep => has_sleep = true,
                        ActivityKind::Play => {}
                    }
                }
                DayMarks {
                    date: key,
                    has_meal,
                    has_medicine,
                    has_sleep,
                }
            })
            .collect(),
    )
}
