//! Category Bundle Config Aggregate
//!
//! A promotion linked to a bundle config only holds while the cart carries at
//! least `min_quantity` items from `category_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::aggregates::cart::Cart;
use crate::domain::value_objects::MinQuantity;

pub const ID_PREFIX: &str = "catbun";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBundleConfig {
    pub id: String,
    pub category_id: String,
    pub min_quantity: MinQuantity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCategoryBundleConfig {
    pub category_id: String,
    pub min_quantity: MinQuantity,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryBundleConfigUpdate {
    pub id: String,
    pub category_id: String,
    pub min_quantity: MinQuantity,
}

impl CategoryBundleConfig {
    pub fn create(input: NewCategoryBundleConfig) -> Self {
        let now = Utc::now();
        Self {
            id: format!("{}_{}", ID_PREFIX, Uuid::now_v7().simple()),
            category_id: input.category_id,
            min_quantity: input.min_quantity,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: CategoryBundleConfigUpdate) {
        self.category_id = update.category_id;
        self.min_quantity = update.min_quantity;
        self.updated_at = Utc::now();
    }

    /// A config with a blank category places no requirement on the cart.
    pub fn is_active(&self) -> bool { !self.category_id.trim().is_empty() }

    pub fn is_satisfied_by(&self, cart: &Cart) -> bool {
        cart.quantity_in_category(&self.category_id).meets(self.min_quantity)
    }
}
