//! Promotion workflow hooks.
//!
//! Promotion create/update requests may carry `additional_data` with a
//! `category_id` and optional `min_quantity`; these hooks persist it as the
//! promotion's category bundle config.

use validator::Validate;

use crate::domain::aggregates::{CategoryBundleConfig, CategoryBundleConfigUpdate, NewCategoryBundleConfig};
use crate::domain::events::{BundleAdditionalData, PromotionsHookInput};
use crate::domain::value_objects::MinQuantity;
use crate::modules::category_bundle::CategoryBundleService;
use crate::{CommerceError, Result};

#[derive(Clone)]
pub struct PromotionHooks {
    bundles: CategoryBundleService,
}

impl PromotionHooks {
    pub fn new(bundles: CategoryBundleService) -> Self {
        Self { bundles }
    }

    /// Creates and links a config for every new promotion.
    pub async fn promotions_created(&self, input: PromotionsHookInput) -> Result<Vec<CategoryBundleConfig>> {
        let Some((category_id, min_quantity)) = requested(input.additional_data.as_ref())? else {
            return Ok(vec![]);
        };
        let mut configs = Vec::with_capacity(input.promotions.len());
        for promotion in &input.promotions {
            let new = NewCategoryBundleConfig { category_id: category_id.clone(), min_quantity: min_quantity.unwrap_or_default() };
            configs.push(self.bundles.create_linked(&promotion.id, new).await?);
        }
        Ok(configs)
    }

    /// Updates linked configs, keeping their minimum when none was sent, or
    /// creates and links one.
    pub async fn promotions_updated(&self, input: PromotionsHookInput) -> Result<Vec<CategoryBundleConfig>> {
        let Some((category_id, min_quantity)) = requested(input.additional_data.as_ref())? else {
            return Ok(vec![]);
        };
        let mut configs = Vec::with_capacity(input.promotions.len());
        for promotion in &input.promotions {
            let config = match self.bundles.config_for_promotion(&promotion.id).await? {
                Some(existing) => {
                    self.bundles
                        .update_config(CategoryBundleConfigUpdate {
                            min_quantity: min_quantity.unwrap_or(existing.min_quantity),
                            id: existing.id,
                            category_id: category_id.clone(),
                        })
                        .await?
                }
                None => {
                    let new = NewCategoryBundleConfig { category_id: category_id.clone(), min_quantity: min_quantity.unwrap_or_default() };
                    self.bundles.create_linked(&promotion.id, new).await?
                }
            };
            configs.push(config);
        }
        Ok(configs)
    }
}

/// `None` when the request carries no bundle requirement.
fn requested(data: Option<&BundleAdditionalData>) -> Result<Option<(String, Option<MinQuantity>)>> {
    let Some(data) = data else { return Ok(None) };
    data.validate()?;
    let Some(category_id) = data.category_id.as_deref().map(str::trim).filter(|c| !c.is_empty()) else { return Ok(None) };
    let min_quantity = data
        .min_quantity
        .map(MinQuantity::new)
        .transpose()
        .map_err(|e| CommerceError::InvalidInput(e.to_string()))?;
    Ok(Some((category_id.to_string(), min_quantity)))
}
