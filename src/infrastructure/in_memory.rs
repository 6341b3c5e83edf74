use crate::domain::aggregates::{Cart, CategoryBundleConfig, CategoryBundleConfigUpdate, NewCategoryBundleConfig, Order};
use crate::domain::ports::{CartRepository, CategoryBundleStore, Notification, Notifier, OrderRepository};
use crate::{CommerceError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for bundle configs and promotion links.
#[derive(Default, Clone)]
pub struct InMemoryCategoryBundleStore {
    configs: Arc<RwLock<HashMap<String, CategoryBundleConfig>>>,
    links: Arc<RwLock<HashMap<String, String>>>,
    failing: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryCategoryBundleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn config_count(&self) -> usize {
        self.configs.read().await.len()
    }

    /// Makes lookups for `promotion_id` fail with a storage error.
    pub async fn fail_lookups_for(&self, promotion_id: &str) {
        self.failing.write().await.insert(promotion_id.to_string());
    }
}

#[async_trait]
impl CategoryBundleStore for InMemoryCategoryBundleStore {
    async fn create(&self, input: NewCategoryBundleConfig) -> Result<CategoryBundleConfig> {
        let config = CategoryBundleConfig::create(input);
        self.configs.write().await.insert(config.id.clone(), config.clone());
        Ok(config)
    }

    async fn update(&self, update: CategoryBundleConfigUpdate) -> Result<CategoryBundleConfig> {
        let mut configs = self.configs.write().await;
        let config = configs.get_mut(&update.id).ok_or_else(|| CommerceError::BundleConfigNotFound(update.id.clone()))?;
        config.apply(update);
        Ok(config.clone())
    }

    async fn retrieve(&self, id: &str) -> Result<Option<CategoryBundleConfig>> {
        Ok(self.configs.read().await.get(id).cloned())
    }

    async fn link(&self, promotion_id: &str, config_id: &str) -> Result<()> {
        let mut links = self.links.write().await;
        if links.contains_key(promotion_id) {
            return Err(CommerceError::AlreadyLinked(promotion_id.to_string()));
        }
        links.insert(promotion_id.to_string(), config_id.to_string());
        Ok(())
    }

    async fn for_promotion(&self, promotion_id: &str) -> Result<Option<CategoryBundleConfig>> {
        if self.failing.read().await.contains(promotion_id) {
            return Err(CommerceError::StorageError(format!("lookup failed for {}", promotion_id)));
        }
        let Some(config_id) = self.links.read().await.get(promotion_id).cloned() else { return Ok(None) };
        Ok(self.configs.read().await.get(&config_id).cloned())
    }
}

/// In-memory cart module. Soft-deleted adjustments disappear from retrieved carts.
#[derive(Default, Clone)]
pub struct InMemoryCartRepository {
    carts: Arc<RwLock<HashMap<String, Cart>>>,
    deleted: Arc<RwLock<Vec<String>>>,
}

impl InMemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, cart: Cart) {
        self.carts.write().await.insert(cart.id.clone(), cart);
    }

    pub async fn deleted_adjustments(&self) -> Vec<String> {
        self.deleted.read().await.clone()
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn retrieve_cart(&self, cart_id: &str) -> Result<Option<Cart>> {
        Ok(self.carts.read().await.get(cart_id).cloned())
    }

    async fn soft_delete_line_item_adjustments(&self, adjustment_ids: &[String]) -> Result<()> {
        let ids: HashSet<&str> = adjustment_ids.iter().map(String::as_str).collect();
        let mut carts = self.carts.write().await;
        for item in carts.values_mut().flat_map(|c| c.items.iter_mut()) {
            item.adjustments.retain(|a| !ids.contains(a.id.as_str()));
        }
        self.deleted.write().await.extend(adjustment_ids.iter().cloned());
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<String, Order>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, order: Order) {
        self.orders.write().await.insert(order.id.clone(), order);
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn retrieve_order(&self, order_id: &str) -> Result<Order> {
        self.orders.read().await.get(order_id).cloned().ok_or(CommerceError::OrderNotFound)
    }
}

/// Records notifications instead of sending them.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<RwLock<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn create_notification(&self, notification: Notification) -> Result<()> {
        self.sent.write().await.push(notification);
        Ok(())
    }
}
