//! Care-log models: growth measurements, hospital visits, shopping items.
//!
//! These collections are plain timestamped lists; all temporal logic lives
//! with activity records in [`crate::schedule`].

use crate::schedule::date_key::parse_date_key;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Validation failures for care-log entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CareValidationError {
    /// Entry id is the nil UUID.
    NilId,
    /// A required display field is empty after trimming.
    BlankField(&'static str),
    /// A date field is not a valid `YYYY-MM-DD` date key.
    InvalidDateKey(String),
}

impl Display for CareValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "care entry id must not be the nil uuid"),
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::InvalidDateKey(value) => {
                write!(f, "date must be a valid YYYY-MM-DD date key, got `{value}`")
            }
        }
    }
}

impl Error for CareValidationError {}

/// Which body measurement a growth record captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthKind {
    Weight,
    Height,
}

/// One logged growth measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: GrowthKind,
    /// Kept as entered text (e.g. "7.4"), unit handling stays with the UI.
    pub value: String,
    pub date: String,
}

impl GrowthRecord {
    pub fn new(kind: GrowthKind, value: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            value: value.into(),
            date: date.into(),
        }
    }

    pub fn validate(&self) -> Result<(), CareValidationError> {
        if self.id.is_nil() {
            return Err(CareValidationError::NilId);
        }
        if self.value.trim().is_empty() {
            return Err(CareValidationError::BlankField("value"));
        }
        if parse_date_key(&self.date).is_err() {
            return Err(CareValidationError::InvalidDateKey(self.date.clone()));
        }
        Ok(())
    }
}

/// One logged hospital or pediatrician visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalVisit {
    pub id: Uuid,
    pub hospital_name: String,
    pub date: String,
    pub reason: String,
    pub notes: Option<String>,
}

impl HospitalVisit {
    pub fn new(
        hospital_name: impl Into<String>,
        date: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            hospital_name: hospital_name.into(),
            date: date.into(),
            reason: reason.into(),
            notes: None,
        }
    }

    pub fn validate(&self) -> Result<(), CareValidationError> {
        if self.id.is_nil() {
            return Err(CareValidationError::NilId);
        }
        if self.hospital_name.trim().is_empty() {
            return Err(CareValidationError::BlankField("hospital_name"));
        }
        if self.reason.trim().is_empty() {
            return Err(CareValidationError::BlankField("reason"));
        }
        if parse_date_key(&self.date).is_err() {
            return Err(CareValidationError::InvalidDateKey(self.date.clone()));
        }
        Ok(())
    }
}

/// Shopping list categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShoppingCategory {
    Food,
    Medicine,
    Clothes,
    Other,
}

/// One shopping list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: Uuid,
    pub name: String,
    pub category: ShoppingCategory,
    pub is_checked: bool,
}

impl ShoppingItem {
    pub fn new(name: impl Into<String>, category: ShoppingCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            is_checked: false,
        }
    }

    /// Flips the checked-off mark; reversible indefinitely.
    pub fn toggle_checked(&mut self) {
        self.is_checked = !self.is_checked;
    }

    pub fn validate(&self) -> Result<(), CareValidationError> {
        if self.id.is_nil() {
            return Err(CareValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(CareValidationError::BlankField("name"));
        }
        Ok(())
    }
}
