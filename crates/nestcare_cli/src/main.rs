//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `nestcare_core` wiring.
//! - Keep output deterministic enough for quick local sanity checks.

use nestcare_core::db::open_memory_db;
use nestcare_core::{
    date_key, local_today, PlannerService, ProviderRegistry, RoutineProvider, RoutineRequest,
    SqliteActivityRepository, StaticRoutineProvider,
};
use std::error::Error;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn Error>> {
    println!("nestcare_core version={}", nestcare_core::core_version());

    let conn = open_memory_db()?;
    let service = PlannerService::new(SqliteActivityRepository::try_new(&conn)?);

    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(StaticRoutineProvider))?;
    registry.set_active("static-fallback")?;

    let request = RoutineRequest {
        baby_name: "demo".to_string(),
        age_months: 6,
        weight: "7.0".to_string(),
    };
    let plan = registry.active()?.suggest_routine(&request)?;

    let today = date_key(local_today());
    let ids = service.import_routine(&today, &plan)?;
    println!("imported {} routine items for {today}", ids.len());

    let summary = service.daily_summary(&today)?;
    println!(
        "meals={}/{} medicine={}/{} sleep={}h{:02}m sessions={}",
        summary.meals.completed,
        summary.meals.total,
        summary.medicines.completed,
        summary.medicines.total,
        summary.sleep.hours,
        summary.sleep.minutes,
        summary.sleep.sessions
    );

    Ok(())
}
