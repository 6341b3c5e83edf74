use super::aggregates::{Cart, CategoryBundleConfig, CategoryBundleConfigUpdate, NewCategoryBundleConfig, Order};
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Persistence for bundle configs and their promotion links.
#[async_trait]
pub trait CategoryBundleStore: Send + Sync {
    async fn create(&self, input: NewCategoryBundleConfig) -> Result<CategoryBundleConfig>;
    async fn update(&self, update: CategoryBundleConfigUpdate) -> Result<CategoryBundleConfig>;
    async fn retrieve(&self, id: &str) -> Result<Option<CategoryBundleConfig>>;
    /// Fails with `AlreadyLinked` if the promotion has a config.
    async fn link(&self, promotion_id: &str, config_id: &str) -> Result<()>;
    async fn for_promotion(&self, promotion_id: &str) -> Result<Option<CategoryBundleConfig>>;
}

/// Host cart module.
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn retrieve_cart(&self, cart_id: &str) -> Result<Option<Cart>>;
    async fn soft_delete_line_item_adjustments(&self, adjustment_ids: &[String]) -> Result<()>;
}

/// Host order module.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn retrieve_order(&self, order_id: &str) -> Result<Order>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub to: String,
    pub channel: String,
    pub template: String,
    pub subject: String,
    pub html: String,
}

/// Host notification module.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn create_notification(&self, notification: Notification) -> Result<()>;
}
