//! Routine suggestion boundary: provider port, registry, fallback plan.
//!
//! # Responsibility
//! - Define the only data shape accepted from external routine-suggestion
//!   collaborators.
//! - Select between provider adapters at runtime.
//!
//! # Invariants
//! - [`SuggestedActivity`] carries no id and no date; the core assigns both
//!   on import, so foreign identity can never enter the store.
//! - Registered provider ids are unique and normalized.

use crate::model::activity::ActivityKind;
use crate::model::profile::BabyProfile;
use crate::schedule::date_key::DateKeyResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// One proposed routine slot from an external suggestion collaborator.
///
/// Deliberately id-less and date-less: the import path mints fresh ids and
/// stamps the caller's target date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedActivity {
    pub title: String,
    /// Wall-clock start as zero-padded 24h `HH:MM`.
    #[serde(rename = "time")]
    pub start_time: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    #[serde(default)]
    pub details: Option<String>,
}

/// Profile-derived context handed to a suggestion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineRequest {
    pub baby_name: String,
    /// Whole calendar months on the request date.
    pub age_months: i32,
    /// Raw entered weight text; unit handling stays with the UI.
    pub weight: String,
}

impl RoutineRequest {
    /// Builds a request from the stored profile as of `on`.
    pub fn for_profile(profile: &BabyProfile, on: NaiveDate) -> DateKeyResult<Self> {
        Ok(Self {
            baby_name: profile.name.clone(),
            age_months: profile.age_in_months(on)?,
            weight: profile.weight.clone(),
        })
    }
}

/// Failure reported by a suggestion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionError {
    /// The provider could not produce a routine.
    ProviderFailure(String),
}

impl Display for SuggestionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProviderFailure(message) => write!(f, "suggestion provider failed: {message}"),
        }
    }
}

impl Error for SuggestionError {}

/// Adapter interface for routine-suggestion backends.
///
/// Implementations live outside the core (network clients, test doubles);
/// the built-in [`StaticRoutineProvider`] is the offline fallback.
pub trait RoutineProvider: std::fmt::Debug {
    /// Stable registry key, e.g. `static-fallback`.
    fn provider_id(&self) -> &str;
    /// Proposes a finite routine for the given request.
    fn suggest_routine(
        &self,
        request: &RoutineRequest,
    ) -> Result<Vec<SuggestedActivity>, SuggestionError>;
}

/// Provider registration/selection errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderRegistryError {
    InvalidProviderId(String),
    DuplicateProviderId(String),
    ProviderNotFound(String),
    NoActiveProvider,
}

impl Display for ProviderRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProviderId(value) => write!(f, "provider id is invalid: {value}"),
            Self::DuplicateProviderId(value) => {
                write!(f, "provider id already registered: {value}")
            }
            Self::ProviderNotFound(value) => write!(f, "provider not found: {value}"),
            Self::NoActiveProvider => write!(f, "no active suggestion provider selected"),
        }
    }
}

impl Error for ProviderRegistryError {}

/// Runtime registry of routine-suggestion providers.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, Arc<dyn RoutineProvider>>,
    active_provider_id: Option<String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one provider adapter.
    pub fn register(
        &mut self,
        provider: Arc<dyn RoutineProvider>,
    ) -> Result<(), ProviderRegistryError> {
        let provider_id = provider.provider_id().trim().to_string();
        if !is_valid_provider_id(&provider_id) {
            return Err(ProviderRegistryError::InvalidProviderId(provider_id));
        }
        if self.providers.contains_key(provider_id.as_str()) {
            return Err(ProviderRegistryError::DuplicateProviderId(provider_id));
        }
        self.providers.insert(provider_id, provider);
        Ok(())
    }

    /// Marks one registered provider as the active suggestion source.
    pub fn set_active(&mut self, provider_id: &str) -> Result<(), ProviderRegistryError> {
        let normalized = provider_id.trim();
        if !self.providers.contains_key(normalized) {
            return Err(ProviderRegistryError::ProviderNotFound(
                normalized.to_string(),
            ));
        }
        self.active_provider_id = Some(normalized.to_string());
        Ok(())
    }

    /// Returns the active provider, if one has been selected.
    pub fn active(&self) -> Result<Arc<dyn RoutineProvider>, ProviderRegistryError> {
        let provider_id = self
            .active_provider_id
            .as_deref()
            .ok_or(ProviderRegistryError::NoActiveProvider)?;
        self.providers
            .get(provider_id)
            .cloned()
            .ok_or_else(|| ProviderRegistryError::ProviderNotFound(provider_id.to_string()))
    }

    /// All registered provider ids in sorted order.
    pub fn provider_ids(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }
}

fn is_valid_provider_id(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_')
}

/// Built-in offline provider serving a fixed starter plan.
///
/// Used when no networked provider is configured or a configured one fails;
/// the caller can always fall back to this plan.
#[derive(Debug, Default)]
pub struct StaticRoutineProvider;

impl RoutineProvider for StaticRoutineProvider {
    fn provider_id(&self) -> &str {
        "static-fallback"
    }

    fn suggest_routine(
        &self,
        _request: &RoutineRequest,
    ) -> Result<Vec<SuggestedActivity>, SuggestionError> {
        Ok(vec![
            SuggestedActivity {
                title: "Breakfast".to_string(),
                start_time: "08:00".to_string(),
                kind: ActivityKind::Meal,
                details: Some("Cereal or Milk".to_string()),
            },
            SuggestedActivity {
                title: "Morning Nap".to_string(),
                start_time: "10:00".to_string(),
                kind: ActivityKind::Sleep,
                details: Some("1 hour".to_string()),
            },
            SuggestedActivity {
                title: "Lunch".to_string(),
                start_time: "12:30".to_string(),
                kind: ActivityKind::Meal,
                details: Some("Pureed veggies".to_string()),
            },
        ])
    }
}
