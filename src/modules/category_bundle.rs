//! Category bundle config module service.

use std::sync::Arc;

use crate::domain::aggregates::{CategoryBundleConfig, CategoryBundleConfigUpdate, NewCategoryBundleConfig};
use crate::domain::ports::CategoryBundleStore;
use crate::domain::value_objects::MinQuantity;
use crate::Result;

#[derive(Clone)]
pub struct CategoryBundleService {
    store: Arc<dyn CategoryBundleStore>,
}

impl CategoryBundleService {
    pub fn new(store: Arc<dyn CategoryBundleStore>) -> Self {
        Self { store }
    }

    pub async fn update_config(&self, update: CategoryBundleConfigUpdate) -> Result<CategoryBundleConfig> {
        self.store.update(update).await
    }

    pub async fn config_for_promotion(&self, promotion_id: &str) -> Result<Option<CategoryBundleConfig>> {
        self.store.for_promotion(promotion_id).await
    }

    /// Creates a config and links it to the promotion.
    pub async fn create_linked(&self, promotion_id: &str, input: NewCategoryBundleConfig) -> Result<CategoryBundleConfig> {
        let config = self.store.create(input).await?;
        self.store.link(promotion_id, &config.id).await?;
        tracing::info!(promotion_id, config_id = %config.id, category_id = %config.category_id, "category bundle config linked");
        Ok(config)
    }

    /// Updates the promotion's config in place, or creates and links one.
    pub async fn upsert_for_promotion(&self, promotion_id: &str, category_id: &str, min_quantity: MinQuantity) -> Result<CategoryBundleConfig> {
        match self.store.for_promotion(promotion_id).await? {
            Some(existing) => {
                self.update_config(CategoryBundleConfigUpdate { id: existing.id, category_id: category_id.to_string(), min_quantity })
                    .await
            }
            None => {
                self.create_linked(promotion_id, NewCategoryBundleConfig { category_id: category_id.to_string(), min_quantity })
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::InMemoryCategoryBundleStore;
    use crate::CommerceError;

    fn service() -> (CategoryBundleService, InMemoryCategoryBundleStore) {
        let store = InMemoryCategoryBundleStore::new();
        (CategoryBundleService::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn test_upsert_reuses_linked_config() {
        let (svc, store) = service();
        let first = svc.upsert_for_promotion("promo_1", "pcat_tees", MinQuantity::DEFAULT).await.unwrap();
        let second = svc.upsert_for_promotion("promo_1", "pcat_hats", MinQuantity::new(3).unwrap()).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.category_id, "pcat_hats");
        assert_eq!(second.min_quantity.value(), 3);
        assert_eq!(store.config_count().await, 1);
    }

    #[tokio::test]
    async fn test_configs_are_per_promotion() {
        let (svc, store) = service();
        let a = svc.upsert_for_promotion("promo_a", "pcat_tees", MinQuantity::DEFAULT).await.unwrap();
        let b = svc.upsert_for_promotion("promo_b", "pcat_tees", MinQuantity::DEFAULT).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.config_count().await, 2);
        assert_eq!(svc.config_for_promotion("promo_b").await.unwrap().unwrap().id, b.id);
        assert!(svc.config_for_promotion("promo_c").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_second_link_is_rejected() {
        let (svc, _) = service();
        svc.create_linked("promo_1", NewCategoryBundleConfig { category_id: "pcat_tees".into(), min_quantity: MinQuantity::DEFAULT }).await.unwrap();
        let err = svc
            .create_linked("promo_1", NewCategoryBundleConfig { category_id: "pcat_hats".into(), min_quantity: MinQuantity::DEFAULT })
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::AlreadyLinked(_)));
    }
}
