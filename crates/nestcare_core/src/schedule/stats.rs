//! Daily summary aggregation.
//!
//! # Responsibility
//! - Compute per-date completion counts and cumulative sleep duration from
//!   one day's grouped records.
//!
//! # Invariants
//! - The summary is a pure function of the record set and is recomputed on
//!   every read; toggling a flag is reflected immediately with no cache to
//!   invalidate.
//! - Sleep sessions without an `end_time` contribute zero minutes.

use crate::model::activity::ActivityRecord;
use crate::schedule::date_key::duration_minutes;
use crate::schedule::queries::DaySchedule;
use serde::Serialize;

/// Completion tally for one activity kind on one date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompletionStats {
    pub total: u32,
    pub completed: u32,
}

impl CompletionStats {
    fn tally(records: &[ActivityRecord]) -> Self {
        Self {
            total: records.len() as u32,
            completed: records.iter().filter(|record| record.is_completed).count() as u32,
        }
    }

    /// Completion ratio for progress display.
    ///
    /// The denominator is floored to 1 so an empty day renders as 0 rather
    /// than dividing by zero; this is a display convention, not a population
    /// ratio.
    pub fn display_ratio(&self) -> f64 {
        f64::from(self.completed) / f64::from(self.total.max(1))
    }
}

/// Cumulative sleep tally for one date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SleepStats {
    /// Number of sleep sessions logged, with or without a wake time.
    pub sessions: u32,
    /// Total slept minutes across sessions with both times set.
    pub total_minutes: u32,
    /// `total_minutes` whole-hour part.
    pub hours: u32,
    /// `total_minutes` remainder minutes.
    pub minutes: u32,
}

/// Derived per-date metrics; never stored, always recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub date: String,
    pub meals: CompletionStats,
    pub medicines: CompletionStats,
    pub sleep: SleepStats,
}

/// Computes the summary for one date from its grouped records.
pub fn daily_summary(date: &str, schedule: &DaySchedule) -> DailySummary {
    let mut total_minutes = 0;
    for sleep in &schedule.sleeps {
        if let Some(end_time) = &sleep.end_time {
            total_minutes += duration_minutes(&sleep.start_time, end_time).unwrap_or(0);
        }
    }

    DailySummary {
        date: date.to_string(),
        meals: CompletionStats::tally(&schedule.meals),
        medicines: CompletionStats::tally(&schedule.medicines),
        sleep: SleepStats {
            sessions: schedule.sleeps.len() as u32,
            total_minutes,
            hours: total_minutes / 60,
            minutes: total_minutes % 60,
        },
    }
}
