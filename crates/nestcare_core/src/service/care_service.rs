//! Care-log use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for the growth/visit/shopping collections
//!   and the profile.
//! - Delegate persistence to repository implementations.

use crate::model::care::{GrowthKind, GrowthRecord, HospitalVisit, ShoppingCategory, ShoppingItem};
use crate::model::profile::BabyProfile;
use crate::repo::care_repo::{CareLogRepository, CareRepoResult};
use uuid::Uuid;

/// Use-case service wrapper for care-log operations.
pub struct CareService<R: CareLogRepository> {
    repo: R,
}

impl<R: CareLogRepository> CareService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Logs one growth measurement and returns its id.
    pub fn add_growth(
        &self,
        kind: GrowthKind,
        value: impl Into<String>,
        date: impl Into<String>,
    ) -> CareRepoResult<Uuid> {
        let record = GrowthRecord::new(kind, value, date);
        self.repo.add_growth(&record)
    }

    pub fn list_growth(&self) -> CareRepoResult<Vec<GrowthRecord>> {
        self.repo.list_growth()
    }

    pub fn delete_growth(&self, id: Uuid) -> CareRepoResult<()> {
        self.repo.delete_growth(id)
    }

    /// Logs one hospital visit and returns its id.
    pub fn add_visit(&self, visit: &HospitalVisit) -> CareRepoResult<Uuid> {
        self.repo.add_visit(visit)
    }

    pub fn list_visits(&self) -> CareRepoResult<Vec<HospitalVisit>> {
        self.repo.list_visits()
    }

    pub fn delete_visit(&self, id: Uuid) -> CareRepoResult<()> {
        self.repo.delete_visit(id)
    }

    /// Adds one unchecked shopping item and returns its id.
    pub fn add_shopping_item(
        &self,
        name: impl Into<String>,
        category: ShoppingCategory,
    ) -> CareRepoResult<Uuid> {
        let item = ShoppingItem::new(name, category);
        self.repo.add_shopping_item(&item)
    }

    pub fn list_shopping_items(&self) -> CareRepoResult<Vec<ShoppingItem>> {
        self.repo.list_shopping_items()
    }

    /// Flips one item's checked-off mark and returns the updated item.
    pub fn toggle_shopping_item(&self, id: Uuid) -> CareRepoResult<ShoppingItem> {
        self.repo.toggle_shopping_item(id)
    }

    pub fn delete_shopping_item(&self, id: Uuid) -> CareRepoResult<()> {
        self.repo.delete_shopping_item(id)
    }

    /// Inserts or replaces the single stored profile.
    pub fn save_profile(&self, profile: &BabyProfile) -> CareRepoResult<()> {
        self.repo.save_profile(profile)
    }

    pub fn get_profile(&self) -> CareRepoResult<Option<BabyProfile>> {
        self.repo.get_profile()
    }
}
