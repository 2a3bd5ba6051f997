//! Core domain logic for NestCare, a daily baby-care tracker.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;
pub mod suggest;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::activity::{ActivityId, ActivityKind, ActivityRecord, ActivityValidationError};
pub use model::care::{
    CareValidationError, GrowthKind, GrowthRecord, HospitalVisit, ShoppingCategory, ShoppingItem,
};
pub use model::profile::{BabyProfile, ParentType, ProfileValidationError};
pub use repo::activity_repo::{
    ActivityPatch, ActivityRepository, RepoError, RepoResult, SqliteActivityRepository,
};
pub use repo::care_repo::{
    CareLogRepository, CareRepoError, CareRepoResult, SqliteCareLogRepository,
};
pub use schedule::date_key::{
    clock_minutes, date_key, days_in_month, duration_minutes, is_future, local_now, local_today,
    month_days, parse_date_key, week_window, DateKeyError,
};
pub use schedule::queries::{
    group_by_kind, is_record_future, is_reminder_eligible, items_for_week, DayMarks, DaySchedule,
};
pub use schedule::stats::{daily_summary, CompletionStats, DailySummary, SleepStats};
pub use service::care_service::CareService;
pub use service::planner_service::{ImportError, NewActivity, PlannerService, WeekSchedule};
pub use suggest::{
    ProviderRegistry, ProviderRegistryError, RoutineProvider, RoutineRequest,
    StaticRoutineProvider, SuggestedActivity, SuggestionError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
