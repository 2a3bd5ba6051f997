//! Care-log repository: growth, hospital visits, shopping list, profile.
//!
//! # Responsibility
//! - Provide list-CRUD persistence for the secondary care collections.
//! - Keep the single-row profile upsert semantics in one place.
//!
//! # Invariants
//! - Listings are insertion-ordered; these collections have no scheduling
//!   semantics beyond that.
//! - Write paths validate models before SQL mutations.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::care::{
    CareValidationError, GrowthKind, GrowthRecord, HospitalVisit, ShoppingCategory, ShoppingItem,
};
use crate::model::profile::{BabyProfile, ParentType, ProfileValidationError};
use crate::repo::activity_repo::{bool_to_int, int_to_bool, table_exists};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type CareRepoResult<T> = Result<T, CareRepoError>;

/// Repository error for care-log persistence and query operations.
#[derive(Debug)]
pub enum CareRepoError {
    Validation(CareValidationError),
    ProfileValidation(ProfileValidationError),
    Db(DbError),
    NotFound(Uuid),
    InvalidData(String),
    /// Connection schema version does not match this binary.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for CareRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ProfileValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "care entry not found: {id}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted care data: {message}")
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
        }
    }
}

impl Error for CareRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::ProfileValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CareValidationError> for CareRepoError {
    fn from(value: CareValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ProfileValidationError> for CareRepoError {
    fn from(value: ProfileValidationError) -> Self {
        Self::ProfileValidation(value)
    }
}

impl From<DbError> for CareRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for CareRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the care-log collections.
pub trait CareLogRepository {
    fn add_growth(&self, record: &GrowthRecord) -> CareRepoResult<Uuid>;
    fn list_growth(&self) -> CareRepoResult<Vec<GrowthRecord>>;
    fn delete_growth(&self, id: Uuid) -> CareRepoResult<()>;

    fn add_visit(&self, visit: &HospitalVisit) -> CareRepoResult<Uuid>;
    fn list_visits(&self) -> CareRepoResult<Vec<HospitalVisit>>;
    fn delete_visit(&self, id: Uuid) -> CareRepoResult<()>;

    fn add_shopping_item(&self, item: &ShoppingItem) -> CareRepoResult<Uuid>;
    fn list_shopping_items(&self) -> CareRepoResult<Vec<ShoppingItem>>;
    /// Flips the checked-off mark and returns the updated item.
    fn toggle_shopping_item(&self, id: Uuid) -> CareRepoResult<ShoppingItem>;
    fn delete_shopping_item(&self, id: Uuid) -> CareRepoResult<()>;

    /// Inserts or replaces the single profile row.
    fn save_profile(&self, profile: &BabyProfile) -> CareRepoResult<()>;
    fn get_profile(&self) -> CareRepoResult<Option<BabyProfile>>;
}

/// SQLite-backed care-log repository.
pub struct SqliteCareLogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCareLogRepository<'conn> {
    /// Wraps a connection after verifying its schema is ready.
    pub fn try_new(conn: &'conn Connection) -> CareRepoResult<Self> {
        ensure_care_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn delete_row(&self, table: &str, id: Uuid) -> CareRepoResult<()> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {table} WHERE uuid = ?1;"),
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(CareRepoError::NotFound(id));
        }
        Ok(())
    }
}

impl CareLogRepository for SqliteCareLogRepository<'_> {
    fn add_growth(&self, record: &GrowthRecord) -> CareRepoResult<Uuid> {
        record.validate()?;
        self.conn.execute(
            "INSERT INTO growth_records (uuid, type, value, date_key)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                record.id.to_string(),
                growth_kind_to_db(record.kind),
                record.value.as_str(),
                record.date.as_str(),
            ],
        )?;
        Ok(record.id)
    }

    fn list_growth(&self) -> CareRepoResult<Vec<GrowthRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, type, value, date_key
             FROM growth_records
             ORDER BY created_at ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_growth_row(row)?);
        }
        Ok(records)
    }

    fn delete_growth(&self, id: Uuid) -> CareRepoResult<()> {
        self.delete_row("growth_records", id)
    }

    fn add_visit(&self, visit: &HospitalVisit) -> CareRepoResult<Uuid> {
        visit.validate()?;
        self.conn.execute(
            "INSERT INTO hospital_visits (uuid, hospital_name, date_key, reason, notes)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                visit.id.to_string(),
                visit.hospital_name.as_str(),
                visit.date.as_str(),
                visit.reason.as_str(),
                visit.notes.as_deref(),
            ],
        )?;
        Ok(visit.id)
    }

    fn list_visits(&self) -> CareRepoResult<Vec<HospitalVisit>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, hospital_name, date_key, reason, notes
             FROM hospital_visits
             ORDER BY created_at ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut visits = Vec::new();
        while let Some(row) = rows.next()? {
            visits.push(parse_visit_row(row)?);
        }
        Ok(visits)
    }

    fn delete_visit(&self, id: Uuid) -> CareRepoResult<()> {
        self.delete_row("hospital_visits", id)
    }

    fn add_shopping_item(&self, item: &ShoppingItem) -> CareRepoResult<Uuid> {
        item.validate()?;
        self.conn.execute(
            "INSERT INTO shopping_items (uuid, name, category, is_checked)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                item.id.to_string(),
                item.name.as_str(),
                category_to_db(item.category),
                bool_to_int(item.is_checked),
            ],
        )?;
        Ok(item.id)
    }

    fn list_shopping_items(&self) -> CareRepoResult<Vec<ShoppingItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, name, category, is_checked
             FROM shopping_items
             ORDER BY created_at ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_shopping_row(row)?);
        }
        Ok(items)
    }

    fn toggle_shopping_item(&self, id: Uuid) -> CareRepoResult<ShoppingItem> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, name, category, is_checked
             FROM shopping_items
             WHERE uuid = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        let mut item = match rows.next()? {
            Some(row) => parse_shopping_row(row)?,
            None => return Err(CareRepoError::NotFound(id)),
        };

        item.toggle_checked();
        self.conn.execute(
            "UPDATE shopping_items SET is_checked = ?1 WHERE uuid = ?2;",
            params![bool_to_int(item.is_checked), id.to_string()],
        )?;
        Ok(item)
    }

    fn delete_shopping_item(&self, id: Uuid) -> CareRepoResult<()> {
        self.delete_row("shopping_items", id)
    }

    fn save_profile(&self, profile: &BabyProfile) -> CareRepoResult<()> {
        profile.validate()?;
        self.conn.execute(
            "INSERT INTO baby_profile (id, name, parent_name, birth_date, weight, height, parent_type)
             VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                parent_name = excluded.parent_name,
                birth_date = excluded.birth_date,
                weight = excluded.weight,
                height = excluded.height,
                parent_type = excluded.parent_type,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                profile.name.as_str(),
                profile.parent_name.as_str(),
                profile.birth_date.as_str(),
                profile.weight.as_str(),
                profile.height.as_str(),
                parent_type_to_db(profile.parent_type),
            ],
        )?;
        Ok(())
    }

    fn get_profile(&self) -> CareRepoResult<Option<BabyProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, parent_name, birth_date, weight, height, parent_type
             FROM baby_profile
             WHERE id = 1;",
        )?;
        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_profile_row(row)?));
        }
        Ok(None)
    }
}

fn parse_growth_row(row: &Row<'_>) -> CareRepoResult<GrowthRecord> {
    let id = parse_uuid(row.get::<_, String>("uuid")?, "growth_records.uuid")?;
    let type_text: String = row.get("type")?;
    let kind = match type_text.as_str() {
        "weight" => GrowthKind::Weight,
        "height" => GrowthKind::Height,
        other => {
            return Err(CareRepoError::InvalidData(format!(
                "invalid growth kind `{other}` in growth_records.type"
            )));
        }
    };
    let record = GrowthRecord {
        id,
        kind,
        value: row.get("value")?,
        date: row.get("date_key")?,
    };
    record.validate()?;
    Ok(record)
}

fn parse_visit_row(row: &Row<'_>) -> CareRepoResult<HospitalVisit> {
    let id = parse_uuid(row.get::<_, String>("uuid")?, "hospital_visits.uuid")?;
    let visit = HospitalVisit {
        id,
        hospital_name: row.get("hospital_name")?,
        date: row.get("date_key")?,
        reason: row.get("reason")?,
        notes: row.get("notes")?,
    };
    visit.validate()?;
    Ok(visit)
}

fn parse_shopping_row(row: &Row<'_>) -> CareRepoResult<ShoppingItem> {
    let id = parse_uuid(row.get::<_, String>("uuid")?, "shopping_items.uuid")?;
    let category_text: String = row.get("category")?;
    let category = match category_text.as_str() {
        "food" => ShoppingCategory::Food,
        "medicine" => ShoppingCategory::Medicine,
        "clothes" => ShoppingCategory::Clothes,
        "other" => ShoppingCategory::Other,
        unknown => {
            return Err(CareRepoError::InvalidData(format!(
                "invalid shopping category `{unknown}` in shopping_items.category"
            )));
        }
    };
    let is_checked = int_to_bool(row.get("is_checked")?, "is_checked")
        .map_err(|err| CareRepoError::InvalidData(err.to_string()))?;
    let item = ShoppingItem {
        id,
        name: row.get("name")?,
        category,
        is_checked,
    };
    item.validate()?;
    Ok(item)
}

fn parse_profile_row(row: &Row<'_>) -> CareRepoResult<BabyProfile> {
    let parent_text: String = row.get("parent_type")?;
    let parent_type = match parent_text.as_str() {
        "mother" => ParentType::Mother,
        "father" => ParentType::Father,
        other => {
            return Err(CareRepoError::InvalidData(format!(
                "invalid parent type `{other}` in baby_profile.parent_type"
            )));
        }
    };
    let profile = BabyProfile {
        name: row.get("name")?,
        parent_name: row.get("parent_name")?,
        birth_date: row.get("birth_date")?,
        weight: row.get("weight")?,
        height: row.get("height")?,
        parent_type,
    };
    profile.validate()?;
    Ok(profile)
}

fn parse_uuid(value: String, column: &'static str) -> CareRepoResult<Uuid> {
    Uuid::parse_str(&value)
        .map_err(|_| CareRepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn growth_kind_to_db(kind: GrowthKind) -> &'static str {
    match kind {
        GrowthKind::Weight => "weight",
        GrowthKind::Height => "height",
    }
}

fn category_to_db(category: ShoppingCategory) -> &'static str {
    match category {
        ShoppingCategory::Food => "food",
        ShoppingCategory::Medicine => "medicine",
        ShoppingCategory::Clothes => "clothes",
        ShoppingCategory::Other => "other",
    }
}

fn parent_type_to_db(parent_type: ParentType) -> &'static str {
    match parent_type {
        ParentType::Mother => "mother",
        ParentType::Father => "father",
    }
}

fn ensure_care_connection_ready(conn: &Connection) -> CareRepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(CareRepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    const CARE_TABLES: &[&str] = &[
        "growth_records",
        "hospital_visits",
        "shopping_items",
        "baby_profile",
    ];
    for &table in CARE_TABLES {
        if !table_exists_for_care(conn, table)? {
            return Err(CareRepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

fn table_exists_for_care(conn: &Connection, table: &str) -> CareRepoResult<bool> {
    table_exists(conn, table).map_err(|err| match err {
        crate::repo::activity_repo::RepoError::Db(db) => CareRepoError::Db(db),
        other => CareRepoError::InvalidData(other.to_string()),
    })
}
