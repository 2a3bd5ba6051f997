//! Activity repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and query APIs over canonical `activities` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `ActivityRecord::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Batch writes are atomic; a failing item leaves the store unchanged.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::activity::{ActivityId, ActivityKind, ActivityRecord, ActivityValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ACTIVITY_SELECT_SQL: &str = "SELECT
    uuid,
    type,
    title,
    start_time,
    end_time,
    details,
    date_key,
    is_completed,
    has_reminder
FROM activities";

const ACTIVITY_COLUMNS: &[&str] = &[
    "uuid",
    "type",
    "title",
    "start_time",
    "end_time",
    "details",
    "date_key",
    "is_completed",
    "has_reminder",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for activity persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ActivityValidationError),
    Db(DbError),
    NotFound(ActivityId),
    InvalidData(String),
    /// Connection schema version does not match this binary.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "activity not found: {id}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted activity data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ActivityValidationError> for RepoError {
    fn from(value: ActivityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Merge-patch for updating one activity record in place.
///
/// Fields left as `None` are preserved. The nested options on `end_time`
/// and `details` distinguish "leave unchanged" (`None`) from "clear"
/// (`Some(None)`). There is no `kind` field: the kind is fixed at creation
/// and an update cannot express a change to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityPatch {
    pub title: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<Option<String>>,
    pub details: Option<Option<String>>,
    pub date: Option<String>,
    pub is_completed: Option<bool>,
    pub has_reminder: Option<bool>,
}

/// Repository interface for activity CRUD, queries and flag toggles.
pub trait ActivityRepository {
    /// Validates and inserts one record, returning its stable id.
    fn create(&self, record: &ActivityRecord) -> RepoResult<ActivityId>;
    /// Validates and inserts a whole batch atomically; on any failure the
    /// store is left unchanged.
    fn create_batch(&self, records: &[ActivityRecord]) -> RepoResult<Vec<ActivityId>>;
    /// Gets one record by id.
    fn get(&self, id: ActivityId) -> RepoResult<Option<ActivityRecord>>;
    /// Applies a merge-patch and returns the updated record.
    fn update(&self, id: ActivityId, patch: &ActivityPatch) -> RepoResult<ActivityRecord>;
    /// Hard-deletes one record. Returns `NotFound` when the id is absent.
    fn delete(&self, id: ActivityId) -> RepoResult<()>;
    /// All records scheduled on the given date key, `(start_time, uuid)`
    /// ordered for determinism.
    fn by_date(&self, date_key: &str) -> RepoResult<Vec<ActivityRecord>>;
    /// All records with `first_key <= date <= last_key`.
    fn list_between(&self, first_key: &str, last_key: &str) -> RepoResult<Vec<ActivityRecord>>;
    /// Full snapshot in insertion order.
    fn list_all(&self) -> RepoResult<Vec<ActivityRecord>>;
    /// Flips the completion mark and returns the updated record.
    fn toggle_completed(&self, id: ActivityId) -> RepoResult<ActivityRecord>;
    /// Flips the reminder mark and returns the updated record. No temporal
    /// guard is applied; eligibility checks are a caller concern.
    fn toggle_reminder(&self, id: ActivityId) -> RepoResult<ActivityRecord>;
}

/// SQLite-backed activity repository.
pub struct SqliteActivityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActivityRepository<'conn> {
    /// Wraps a connection after verifying its schema is ready.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema does
    ///   not carry the expected shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_activities_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn require(&self, id: ActivityId) -> RepoResult<ActivityRecord> {
        self.get(id)?.ok_or(RepoError::NotFound(id))
    }

    fn persist_flags(&self, record: &ActivityRecord) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE activities
             SET
                is_completed = ?1,
                has_reminder = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?3;",
            params![
                bool_to_int(record.is_completed),
                bool_to_int(record.has_reminder),
                record.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(record.id));
        }

        Ok(())
    }

    fn insert_row(&self, record: &ActivityRecord) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO activities (
                uuid,
                type,
                title,
                start_time,
                end_time,
                details,
                date_key,
                is_completed,
                has_reminder
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                record.id.to_string(),
                kind_to_db(record.kind),
                record.title.as_str(),
                record.start_time.as_str(),
                record.end_time.as_deref(),
                record.details.as_deref(),
                record.date.as_str(),
                bool_to_int(record.is_completed),
                bool_to_int(record.has_reminder),
            ],
        )?;
        Ok(())
    }

    fn query_records(
        &self,
        sql: &str,
        bind: &[&dyn rusqlite::ToSql],
    ) -> RepoResult<Vec<ActivityRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_activity_row(row)?);
        }
        Ok(records)
    }
}

impl ActivityRepository for SqliteActivityRepository<'_> {
    fn create(&self, record: &ActivityRecord) -> RepoResult<ActivityId> {
        record.validate()?;
        self.insert_row(record)?;
        Ok(record.id)
    }

    fn create_batch(&self, records: &[ActivityRecord]) -> RepoResult<Vec<ActivityId>> {
        for record in records {
            record.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        for record in records {
            self.insert_row(record)?;
        }
        tx.commit()?;

        Ok(records.iter().map(|record| record.id).collect())
    }

    fn get(&self, id: ActivityId) -> RepoResult<Option<ActivityRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACTIVITY_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_activity_row(row)?));
        }

        Ok(None)
    }

    fn update(&self, id: ActivityId, patch: &ActivityPatch) -> RepoResult<ActivityRecord> {
        let mut record = self.require(id)?;
        apply_patch(&mut record, patch);
        record.validate()?;

        let changed = self.conn.execute(
            "UPDATE activities
             SET
                title = ?1,
                start_time = ?2,
                end_time = ?3,
                details = ?4,
                date_key = ?5,
                is_completed = ?6,
                has_reminder = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?8;",
            params![
                record.title.as_str(),
                record.start_time.as_str(),
                record.end_time.as_deref(),
                record.details.as_deref(),
                record.date.as_str(),
                bool_to_int(record.is_completed),
                bool_to_int(record.has_reminder),
                record.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(record)
    }

    fn delete(&self, id: ActivityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM activities WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn by_date(&self, date_key: &str) -> RepoResult<Vec<ActivityRecord>> {
        self.query_records(
            &format!(
                "{ACTIVITY_SELECT_SQL}
                 WHERE date_key = ?1
                 ORDER BY start_time ASC, uuid ASC;"
            ),
            &[&date_key],
        )
    }

    fn list_between(&self, first_key: &str, last_key: &str) -> RepoResult<Vec<ActivityRecord>> {
        self.query_records(
            &format!(
                "{ACTIVITY_SELECT_SQL}
                 WHERE date_key BETWEEN ?1 AND ?2
                 ORDER BY date_key ASC, start_time ASC, uuid ASC;"
            ),
            &[&first_key, &last_key],
        )
    }

    fn list_all(&self) -> RepoResult<Vec<ActivityRecord>> {
        self.query_records(
            &format!("{ACTIVITY_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"),
            &[],
        )
    }

    fn toggle_completed(&self, id: ActivityId) -> RepoResult<ActivityRecord> {
        let mut record = self.require(id)?;
        record.toggle_completed();
        self.persist_flags(&record)?;
        Ok(record)
    }

    fn toggle_reminder(&self, id: ActivityId) -> RepoResult<ActivityRecord> {
        let mut record = self.require(id)?;
        record.toggle_reminder();
        self.persist_flags(&record)?;
        Ok(record)
    }
}

fn apply_patch(record: &mut ActivityRecord, patch: &ActivityPatch) {
    if let Some(title) = &patch.title {
        record.title = title.clone();
    }
    if let Some(start_time) = &patch.start_time {
        record.start_time = start_time.clone();
    }
    if let Some(end_time) = &patch.end_time {
        record.end_time = end_time.clone();
    }
    if let Some(details) = &patch.details {
        record.details = details.clone();
    }
    if let Some(date) = &patch.date {
        record.date = date.clone();
    }
    if let Some(is_completed) = patch.is_completed {
        record.is_completed = is_completed;
    }
    if let Some(has_reminder) = patch.has_reminder {
        record.has_reminder = has_reminder;
    }
}

fn parse_activity_row(row: &Row<'_>) -> RepoResult<ActivityRecord> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in activities.uuid"))
    })?;

    let type_text: String = row.get("type")?;
    let kind = parse_kind(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid activity kind `{type_text}` in activities.type"))
    })?;

    let record = ActivityRecord {
        id,
        kind,
        title: row.get("title")?,
        start_time: row.get("start_time")?,
        end_time: row.get("end_time")?,
        details: row.get("details")?,
        date: row.get("date_key")?,
        is_completed: int_to_bool(row.get("is_completed")?, "is_completed")?,
        has_reminder: int_to_bool(row.get("has_reminder")?, "has_reminder")?,
    };
    record.validate()?;
    Ok(record)
}

fn kind_to_db(kind: ActivityKind) -> &'static str {
    match kind {
        ActivityKind::Meal => "meal",
        ActivityKind::Medicine => "medicine",
        ActivityKind::Sleep => "sleep",
        ActivityKind::Play => "play",
    }
}

fn parse_kind(value: &str) -> Option<ActivityKind> {
    match value {
        "meal" => Some(ActivityKind::Meal),
        "medicine" => Some(ActivityKind::Medicine),
        "sleep" => Some(ActivityKind::Sleep),
        "play" => Some(ActivityKind::Play),
        _ => None,
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid {column} value `{other}`"
        ))),
    }
}

fn ensure_activities_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "activities")? {
        return Err(RepoError::MissingRequiredTable("activities"));
    }

    for &column in ACTIVITY_COLUMNS {
        if !table_has_column(conn, "activities", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "activities",
                column,
            });
        }
    }

    Ok(())
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
