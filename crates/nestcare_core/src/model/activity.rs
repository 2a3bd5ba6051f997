//! Activity record domain model.
//!
//! # Responsibility
//! - Define the canonical daily-care record shared by meal/medicine/sleep/play
//!   projections.
//! - Provide lifecycle helpers for completion and reminder flags.
//!
//! # Invariants
//! - `id` is stable and never reused for another record.
//! - `kind` is fixed at creation; update paths cannot express a kind change.
//! - `start_time`/`end_time` are strict zero-padded `HH:MM` strings, `date`
//!   is a strict `YYYY-MM-DD` local date key.
//! - An `end_time` numerically smaller than `start_time` means the interval
//!   crosses midnight; it is never invalid on its own.

use crate::schedule::date_key::{clock_minutes, parse_date_key};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every activity record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ActivityId = Uuid;

/// Category of a scheduled or logged care activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// Feeding slot (breakfast, lunch, snack, ...).
    Meal,
    /// Medicine or vitamin dose.
    Medicine,
    /// Sleep session; the only kind where `end_time` carries meaning.
    Sleep,
    /// Free play or tummy time.
    Play,
}

/// Validation failures for activity records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityValidationError {
    /// Record id is the nil UUID.
    NilId,
    /// Title is empty after trimming.
    BlankTitle,
    /// A time-of-day field is not a valid zero-padded `HH:MM` string.
    InvalidClockTime {
        field: &'static str,
        value: String,
    },
    /// `date` is not a valid `YYYY-MM-DD` local date key.
    InvalidDateKey(String),
}

impl Display for ActivityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "activity id must not be the nil uuid"),
            Self::BlankTitle => write!(f, "activity title must not be blank"),
            Self::InvalidClockTime { field, value } => {
                write!(f, "{field} must be a valid HH:MM time, got `{value}`")
            }
            Self::InvalidDateKey(value) => {
                write!(f, "date must be a valid YYYY-MM-DD date key, got `{value}`")
            }
        }
    }
}

impl Error for ActivityValidationError {}

/// Canonical domain record for one scheduled or logged care activity.
///
/// The record's `date` is its primary temporal key and is independent of
/// "now"; past, present and future records share one shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawActivityRecord")]
pub struct ActivityRecord {
    /// Stable global ID used for lookups, toggles and deletion.
    pub id: ActivityId,
    /// Serialized as `type` to match the external schema naming.
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    /// Display label, e.g. "Breakfast" or "Vitamin D".
    pub title: String,
    /// Wall-clock start as zero-padded 24h `HH:MM`.
    pub start_time: String,
    /// Optional wall-clock end (`HH:MM`); wake time for sleep sessions.
    pub end_time: Option<String>,
    /// Free-text annotation (dosage, amount, ...).
    pub details: Option<String>,
    /// Local calendar date key (`YYYY-MM-DD`) the record is scheduled on.
    pub date: String,
    /// User-toggled completion mark.
    pub is_completed: bool,
    /// User-toggled reminder mark; delivery is outside this crate.
    pub has_reminder: bool,
}

/// Wire shape deserialized before validation is applied.
#[derive(Deserialize)]
struct RawActivityRecord {
    id: ActivityId,
    #[serde(rename = "type")]
    kind: ActivityKind,
    title: String,
    start_time: String,
    #[serde(default)]
    end_time: Option<String>,
    #[serde(default)]
    details: Option<String>,
    date: String,
    #[serde(default)]
    is_completed: bool,
    #[serde(default)]
    has_reminder: bool,
}

impl TryFrom<RawActivityRecord> for ActivityRecord {
    type Error = ActivityValidationError;

    fn try_from(raw: RawActivityRecord) -> Result<Self, Self::Error> {
        let record = ActivityRecord {
            id: raw.id,
            kind: raw.kind,
            title: raw.title,
            start_time: raw.start_time,
            end_time: raw.end_time,
            details: raw.details,
            date: raw.date,
            is_completed: raw.is_completed,
            has_reminder: raw.has_reminder,
        };
        record.validate()?;
        Ok(record)
    }
}

impl ActivityRecord {
    /// Creates a new record with a generated stable ID.
    ///
    /// # Invariants
    /// - Optional fields are initialized to `None`.
    /// - Both flags start as `false`.
    pub fn new(
        kind: ActivityKind,
        title: impl Into<String>,
        date: impl Into<String>,
        start_time: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            start_time: start_time.into(),
            end_time: None,
            details: None,
            date: date.into(),
            is_completed: false,
            has_reminder: false,
        }
    }

    /// Creates a record with a caller-provided stable ID.
    ///
    /// Used by tests and fixtures where identity must be deterministic.
    ///
    /// # Errors
    /// Rejects the nil UUID; any other field problems surface via
    /// [`ActivityRecord::validate`] on the write path.
    pub fn with_id(
        id: ActivityId,
        kind: ActivityKind,
        title: impl Into<String>,
        date: impl Into<String>,
        start_time: impl Into<String>,
    ) -> Result<Self, ActivityValidationError> {
        if id.is_nil() {
            return Err(ActivityValidationError::NilId);
        }
        let mut record = Self::new(kind, title, date, start_time);
        record.id = id;
        Ok(record)
    }

    /// Checks all field invariants.
    ///
    /// Write paths must call this before persisting; deserialization calls
    /// it automatically.
    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        if self.id.is_nil() {
            return Err(ActivityValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(ActivityValidationError::BlankTitle);
        }
        if clock_minutes(&self.start_time).is_err() {
            return Err(ActivityValidationError::InvalidClockTime {
                field: "start_time",
                value: self.start_time.clone(),
            });
        }
        if let Some(end_time) = &self.end_time {
            if clock_minutes(end_time).is_err() {
                return Err(ActivityValidationError::InvalidClockTime {
                    field: "end_time",
                    value: end_time.clone(),
                });
            }
        }
        if parse_date_key(&self.date).is_err() {
            return Err(ActivityValidationError::InvalidDateKey(self.date.clone()));
        }
        Ok(())
    }

    /// Flips the completion mark.
    ///
    /// Allowed in any state at any time; marking a past item complete
    /// retroactively is a supported flow.
    pub fn toggle_completed(&mut self) {
        self.is_completed = !self.is_completed;
    }

    /// Flips the reminder mark.
    ///
    /// No temporal guard is applied here. Callers that only want to offer
    /// reminders on upcoming items must check
    /// [`crate::schedule::queries::is_record_future`] before presenting the
    /// control.
    pub fn toggle_reminder(&mut self) {
        self.has_reminder = !self.has_reminder;
    }
}
