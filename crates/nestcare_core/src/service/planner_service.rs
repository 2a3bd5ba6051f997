//! Day-planner use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for planning, toggling and summarizing
//!   activities.
//! - Own the all-or-nothing import of externally suggested routines.
//!
//! # Invariants
//! - Service APIs never bypass repository validation contracts.
//! - Imported items always receive fresh ids and the caller's target date;
//!   nothing identity-bearing is accepted from the collaborator.

use crate::model::activity::{ActivityId, ActivityKind, ActivityRecord, ActivityValidationError};
use crate::repo::activity_repo::{ActivityPatch, ActivityRepository, RepoError, RepoResult};
use crate::schedule::date_key::{date_key, month_days, parse_date_key, week_window};
use crate::schedule::queries::{self, group_by_kind, items_for_week, DayMarks, DaySchedule};
use crate::schedule::stats::{daily_summary, DailySummary};
use crate::suggest::SuggestedActivity;
use chrono::NaiveDate;
use log::{info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Request model for adding one activity.
///
/// The service always assigns a fresh id; callers cannot supply one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub kind: ActivityKind,
    pub title: String,
    /// Target local date key (`YYYY-MM-DD`).
    pub date: String,
    /// Start as zero-padded 24h `HH:MM`.
    pub start_time: String,
    /// Kept only for sleep records; dropped for every other kind.
    pub end_time: Option<String>,
    pub details: Option<String>,
    pub has_reminder: bool,
}

/// One calendar week of records, Sunday first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSchedule {
    pub days: [NaiveDate; 7],
    /// Per-date records; every one of the seven keys is present.
    pub items: BTreeMap<String, Vec<ActivityRecord>>,
}

/// Batch-import failures; any failing item rejects the whole batch.
#[derive(Debug)]
pub enum ImportError {
    /// Target date is not a valid date key.
    InvalidDate(String),
    /// One suggested item failed schema validation.
    InvalidItem {
        index: usize,
        source: ActivityValidationError,
    },
    Repo(RepoError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(value) => {
                write!(f, "import target date is not a valid date key: `{value}`")
            }
            Self::InvalidItem { index, source } => {
                write!(f, "suggested item {index} is invalid: {source}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDate(_) => None,
            Self::InvalidItem { source, .. } => Some(source),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service wrapper for planning operations.
pub struct PlannerService<R: ActivityRepository> {
    repo: R,
}

impl<R: ActivityRepository> PlannerService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one activity with a fresh id and returns that id.
    ///
    /// # Contract
    /// - `end_time` is stored only when `kind == Sleep`; other kinds have no
    ///   meaningful end and the field is dropped.
    pub fn add_activity(&self, request: &NewActivity) -> RepoResult<ActivityId> {
        let mut record = ActivityRecord::new(
            request.kind,
            request.title.clone(),
            request.date.clone(),
            request.start_time.clone(),
        );
        if request.kind == ActivityKind::Sleep {
            record.end_time = request.end_time.clone();
        }
        record.details = request.details.clone();
        record.has_reminder = request.has_reminder;
        self.repo.create(&record)
    }

    /// Applies a merge-patch and returns the updated record.
    pub fn update_activity(
        &self,
        id: ActivityId,
        patch: &ActivityPatch,
    ) -> RepoResult<ActivityRecord> {
        self.repo.update(id, patch)
    }

    /// Gets one record by id.
    pub fn get_activity(&self, id: ActivityId) -> RepoResult<Option<ActivityRecord>> {
        self.repo.get(id)
    }

    /// Deletes one record by id.
    pub fn delete_activity(&self, id: ActivityId) -> RepoResult<()> {
        self.repo.delete(id)
    }

    /// Full snapshot in insertion order, for list views.
    pub fn list_activities(&self) -> RepoResult<Vec<ActivityRecord>> {
        self.repo.list_all()
    }

    /// Flips one record's completion mark.
    ///
    /// Permitted in any state at any time; completing a past item
    /// retroactively is a supported flow.
    pub fn toggle_completed(&self, id: ActivityId) -> RepoResult<ActivityRecord> {
        self.repo.toggle_completed(id)
    }

    /// Flips one record's reminder mark.
    ///
    /// The data layer applies no temporal guard; callers gate the control
    /// with [`crate::schedule::queries::is_reminder_eligible`].
    pub fn toggle_reminder(&self, id: ActivityId) -> RepoResult<ActivityRecord> {
        self.repo.toggle_reminder(id)
    }

    /// One day's records partitioned by kind, chronological within kinds.
    pub fn day_schedule(&self, date: &str) -> RepoResult<DaySchedule> {
        require_date_key(date)?;
        Ok(group_by_kind(self.repo.by_date(date)?))
    }

    /// The Sunday-first week containing `anchor`, laid out per date key.
    ///
    /// The window depends only on the anchor; navigating weeks is shifting
    /// the anchor by seven days and recomputing.
    pub fn week_schedule(&self, anchor: NaiveDate) -> RepoResult<WeekSchedule> {
        let days = week_window(anchor);
        let first_key = date_key(days[0]);
        let last_key = date_key(days[6]);
        let records = self.repo.list_between(&first_key, &last_key)?;
        Ok(WeekSchedule {
            days,
            items: items_for_week(&days, records),
        })
    }

    /// Recomputes the daily summary for one date from current records.
    pub fn daily_summary(&self, date: &str) -> RepoResult<DailySummary> {
        let schedule = self.day_schedule(date)?;
        Ok(daily_summary(date, &schedule))
    }

    /// Kind-presence marks for every day of the given month.
    pub fn month_marks(&self, year: i32, month: u32) -> RepoResult<Vec<DayMarks>> {
        let days = month_days(year, month).ok_or_else(|| {
            RepoError::Validation(ActivityValidationError::InvalidDateKey(format!(
                "{year:04}-{month:02}"
            )))
        })?;
        let first_key = date_key(days[0]);
        let last_key = date_key(days[days.len() - 1]);
        let records = self.repo.list_between(&first_key, &last_key)?;
        Ok(queries::month_marks(year, month, &records).unwrap_or_default())
    }

    /// Imports an externally suggested routine onto one date, all or
    /// nothing.
    ///
    /// Every item is validated before anything is written; fresh ids and
    /// the caller's `date` are assigned here, never taken from the
    /// collaborator. Any invalid item rejects the whole batch and leaves
    /// the store unchanged.
    pub fn import_routine(
        &self,
        date: &str,
        items: &[SuggestedActivity],
    ) -> Result<Vec<ActivityId>, ImportError> {
        if parse_date_key(date).is_err() {
            return Err(ImportError::InvalidDate(date.to_string()));
        }

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let mut record = ActivityRecord::new(
                item.kind,
                item.title.clone(),
                date.to_string(),
                item.start_time.clone(),
            );
            record.details = item.details.clone();
            if let Err(source) = record.validate() {
                warn!(
                    "event=routine_import module=service status=rejected date={date} item_index={index} error={source}"
                );
                return Err(ImportError::InvalidItem { index, source });
            }
            records.push(record);
        }

        let ids = self.repo.create_batch(&records)?;
        info!(
            "event=routine_import module=service status=ok date={date} count={}",
            ids.len()
        );
        Ok(ids)
    }
}

fn require_date_key(date: &str) -> RepoResult<()> {
    parse_date_key(date).map_err(|_| {
        RepoError::Validation(ActivityValidationError::InvalidDateKey(date.to_string()))
    })?;
    Ok(())
}
