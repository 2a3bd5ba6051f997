//! Baby profile model.
//!
//! # Responsibility
//! - Hold the onboarding profile backing greetings and routine suggestions.
//! - Derive the baby's age in whole months for the suggestion request.

use crate::schedule::date_key::{parse_date_key, DateKeyResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Which parent is using the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParentType {
    Mother,
    Father,
}

/// Profile validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    /// A required display field is empty after trimming.
    BlankField(&'static str),
    /// `birth_date` is not a valid `YYYY-MM-DD` date key.
    InvalidBirthDate(String),
}

impl Display for ProfileValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::InvalidBirthDate(value) => {
                write!(f, "birth_date must be a valid YYYY-MM-DD date key, got `{value}`")
            }
        }
    }
}

impl Error for ProfileValidationError {}

/// The tracked baby's profile, one per store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BabyProfile {
    pub name: String,
    pub parent_name: String,
    /// Local `YYYY-MM-DD` date key.
    pub birth_date: String,
    /// Kept as entered text for input handling.
    pub weight: String,
    /// Kept as entered text for input handling.
    pub height: String,
    pub parent_type: ParentType,
}

impl BabyProfile {
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProfileValidationError::BlankField("name"));
        }
        if self.parent_name.trim().is_empty() {
            return Err(ProfileValidationError::BlankField("parent_name"));
        }
        if parse_date_key(&self.birth_date).is_err() {
            return Err(ProfileValidationError::InvalidBirthDate(self.birth_date.clone()));
        }
        Ok(())
    }

    /// The baby's age in whole calendar months on the given date.
    ///
    /// Counts year/month components only; a birth date later in its month
    /// than `on` still counts that month. Negative when `on` precedes the
    /// birth month.
    pub fn age_in_months(&self, on: NaiveDate) -> DateKeyResult<i32> {
        let birth = parse_date_key(&self.birth_date)?;
        Ok((on.year() - birth.year()) * 12 + on.month() as i32 - birth.month() as i32)
    }
}
