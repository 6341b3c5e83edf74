//! Cart promotion guard (`cart.updated`).
//!
//! Promotions carrying a category bundle requirement are revoked from a cart
//! that no longer holds enough items of the required category. Revoking means
//! soft-deleting the promotion's line item adjustments.

use std::sync::Arc;

use crate::domain::ports::CartRepository;
use crate::modules::category_bundle::CategoryBundleService;
use crate::Result;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuardOutcome {
    pub revoked_codes: Vec<String>,
    pub removed_adjustment_ids: Vec<String>,
}

#[derive(Clone)]
pub struct CartPromotionGuard {
    carts: Arc<dyn CartRepository>,
    bundles: CategoryBundleService,
}

impl CartPromotionGuard {
    pub fn new(carts: Arc<dyn CartRepository>, bundles: CategoryBundleService) -> Self {
        Self { carts, bundles }
    }

    pub async fn evaluate(&self, cart_id: &str) -> Result<GuardOutcome> {
        let Some(cart) = self.carts.retrieve_cart(cart_id).await? else {
            return Ok(GuardOutcome::default());
        };
        if !cart.has_promotions() {
            return Ok(GuardOutcome::default());
        }

        let mut revoked_codes = Vec::new();
        for promo in &cart.promotions {
            let config = match self.bundles.config_for_promotion(&promo.id).await {
                Ok(Some(config)) if config.is_active() => config,
                Ok(_) => continue,
                Err(e) => {
                    tracing::debug!(promotion_id = %promo.id, error = %e, "bundle config lookup failed, skipping");
                    continue;
                }
            };
            if config.is_satisfied_by(&cart) {
                continue;
            }
            tracing::info!(
                cart_id,
                promotion_id = %promo.id,
                category_id = %config.category_id,
                required = config.min_quantity.value(),
                found = cart.quantity_in_category(&config.category_id).value(),
                "bundle requirement not met"
            );
            if let Some(code) = promo.code.clone().filter(|c| !c.is_empty()) {
                revoked_codes.push(code);
            }
        }

        if revoked_codes.is_empty() {
            return Ok(GuardOutcome::default());
        }
        let removed_adjustment_ids = cart.adjustment_ids_for_codes(&revoked_codes);
        if !removed_adjustment_ids.is_empty() {
            self.carts.soft_delete_line_item_adjustments(&removed_adjustment_ids).await?;
        }
        Ok(GuardOutcome { revoked_codes, removed_adjustment_ids })
    }

    /// Event entry point; failures are logged, never raised.
    pub async fn handle(&self, cart_id: &str) {
        match self.evaluate(cart_id).await {
            Ok(outcome) if !outcome.revoked_codes.is_empty() => tracing::info!(
                cart_id,
                codes = ?outcome.revoked_codes,
                adjustments = outcome.removed_adjustment_ids.len(),
                "revoked bundle promotions"
            ),
            Ok(_) => {}
            Err(e) => tracing::error!(cart_id, error = %e, "cart promotion guard failed"),
        }
    }
}
