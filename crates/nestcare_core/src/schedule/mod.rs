//! Date-keyed scheduling and statistics engine.
//!
//! # Responsibility
//! - Own all calendar/clock arithmetic (date keys, week windows, durations).
//! - Derive per-date and per-week read views from stored records.
//! - Aggregate daily summary metrics on demand.

pub mod date_key;
pub mod queries;
pub mod stats;
