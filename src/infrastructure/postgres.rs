//! Postgres adapters.
//!
//! Bundle configs and their promotion links live in tables owned by this
//! service (see `migrations/`). Carts and orders are read from the host's
//! tables; adjustments are soft-deleted by stamping `deleted_at`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;

use crate::domain::aggregates::{
    Cart, CartLineItem, CartPromotion, CategoryBundleConfig, CategoryBundleConfigUpdate, LineItemAdjustment,
    NewCategoryBundleConfig, Order, OrderAddress, OrderLineItem,
};
use crate::domain::ports::{CartRepository, CategoryBundleStore, OrderRepository};
use crate::domain::value_objects::MinQuantity;
use crate::{CommerceError, Result};

#[derive(Debug, sqlx::FromRow)]
struct BundleConfigRow {
    id: String,
    category_id: String,
    min_quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BundleConfigRow> for CategoryBundleConfig {
    type Error = CommerceError;
    fn try_from(r: BundleConfigRow) -> Result<Self> {
        let min_quantity = MinQuantity::new(i64::from(r.min_quantity)).map_err(|e| CommerceError::StorageError(e.to_string()))?;
        Ok(Self { id: r.id, category_id: r.category_id, min_quantity, created_at: r.created_at, updated_at: r.updated_at })
    }
}

/// `min_quantity` as bound to the `INTEGER` column.
fn min_quantity_column(q: MinQuantity) -> Result<i32> {
    i32::try_from(q.value()).map_err(|_| CommerceError::InvalidInput(format!("min_quantity {} is too large", q)))
}

#[derive(Clone)]
pub struct PgCategoryBundleStore {
    db: PgPool,
}

impl PgCategoryBundleStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryBundleStore for PgCategoryBundleStore {
    async fn create(&self, input: NewCategoryBundleConfig) -> Result<CategoryBundleConfig> {
        let c = CategoryBundleConfig::create(input);
        let row = sqlx::query_as::<_, BundleConfigRow>(
            "INSERT INTO category_bundle_config (id, category_id, min_quantity, created_at, updated_at) VALUES ($1, $2, $3, $4, $5) RETURNING id, category_id, min_quantity, created_at, updated_at",
        )
        .bind(&c.id).bind(&c.category_id).bind(min_quantity_column(c.min_quantity)?).bind(c.created_at).bind(c.updated_at)
        .fetch_one(&self.db).await?;
        row.try_into()
    }

    async fn update(&self, update: CategoryBundleConfigUpdate) -> Result<CategoryBundleConfig> {
        let row = sqlx::query_as::<_, BundleConfigRow>(
            "UPDATE category_bundle_config SET category_id = $2, min_quantity = $3, updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL RETURNING id, category_id, min_quantity, created_at, updated_at",
        )
        .bind(&update.id).bind(&update.category_id).bind(min_quantity_column(update.min_quantity)?)
        .fetch_optional(&self.db).await?
        .ok_or_else(|| CommerceError::BundleConfigNotFound(update.id.clone()))?;
        row.try_into()
    }

    async fn retrieve(&self, id: &str) -> Result<Option<CategoryBundleConfig>> {
        sqlx::query_as::<_, BundleConfigRow>(
            "SELECT id, category_id, min_quantity, created_at, updated_at FROM category_bundle_config WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id).fetch_optional(&self.db).await?
        .map(CategoryBundleConfig::try_from).transpose()
    }

    async fn link(&self, promotion_id: &str, config_id: &str) -> Result<()> {
        let inserted = sqlx::query(
            "INSERT INTO promotion_category_bundle_config (id, promotion_id, category_bundle_config_id, created_at, updated_at) VALUES ($1, $2, $3, NOW(), NOW()) ON CONFLICT (promotion_id) DO NOTHING",
        )
        .bind(format!("promocatbun_{}", uuid::Uuid::now_v7().simple())).bind(promotion_id).bind(config_id)
        .execute(&self.db).await?;
        if inserted.rows_affected() == 0 {
            return Err(CommerceError::AlreadyLinked(promotion_id.to_string()));
        }
        Ok(())
    }

    async fn for_promotion(&self, promotion_id: &str) -> Result<Option<CategoryBundleConfig>> {
        sqlx::query_as::<_, BundleConfigRow>(
            "SELECT c.id, c.category_id, c.min_quantity, c.created_at, c.updated_at FROM category_bundle_config c \
             JOIN promotion_category_bundle_config l ON l.category_bundle_config_id = c.id \
             WHERE l.promotion_id = $1 AND l.deleted_at IS NULL AND c.deleted_at IS NULL",
        )
        .bind(promotion_id).fetch_optional(&self.db).await?
        .map(CategoryBundleConfig::try_from).transpose()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LineItemRow { id: String, product_id: Option<String>, quantity: i32 }

#[derive(Debug, sqlx::FromRow)]
struct ItemCategoryRow { item_id: String, category_id: String }

#[derive(Debug, sqlx::FromRow)]
struct AdjustmentRow { id: String, item_id: String, code: Option<String>, promotion_id: Option<String> }

#[derive(Debug, sqlx::FromRow)]
struct PromotionRow { id: String, code: Option<String> }

#[derive(Clone)]
pub struct PgCartRepository {
    db: PgPool,
}

impl PgCartRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn retrieve_cart(&self, cart_id: &str) -> Result<Option<Cart>> {
        let exists: Option<(String,)> = sqlx::query_as("SELECT id FROM cart WHERE id = $1 AND deleted_at IS NULL")
            .bind(cart_id).fetch_optional(&self.db).await?;
        if exists.is_none() {
            return Ok(None);
        }

        let items = sqlx::query_as::<_, LineItemRow>(
            "SELECT id, product_id, quantity::int4 AS quantity FROM cart_line_item WHERE cart_id = $1 AND deleted_at IS NULL ORDER BY created_at",
        )
        .bind(cart_id).fetch_all(&self.db).await?;

        let categories = sqlx::query_as::<_, ItemCategoryRow>(
            "SELECT li.id AS item_id, pcp.product_category_id AS category_id FROM cart_line_item li \
             JOIN product_category_product pcp ON pcp.product_id = li.product_id \
             WHERE li.cart_id = $1 AND li.deleted_at IS NULL",
        )
        .bind(cart_id).fetch_all(&self.db).await?;

        let adjustments = sqlx::query_as::<_, AdjustmentRow>(
            "SELECT a.id, a.item_id, a.code, a.promotion_id FROM cart_line_item_adjustment a \
             JOIN cart_line_item li ON li.id = a.item_id \
             WHERE li.cart_id = $1 AND li.deleted_at IS NULL AND a.deleted_at IS NULL",
        )
        .bind(cart_id).fetch_all(&self.db).await?;

        let promotions = sqlx::query_as::<_, PromotionRow>(
            "SELECT p.id, p.code FROM cart_promotion cp JOIN promotion p ON p.id = cp.promotion_id \
             WHERE cp.cart_id = $1 AND cp.deleted_at IS NULL AND p.deleted_at IS NULL",
        )
        .bind(cart_id).fetch_all(&self.db).await?;

        let mut by_item: HashMap<String, CartLineItem> = HashMap::new();
        let order: Vec<String> = items.iter().map(|i| i.id.clone()).collect();
        for i in items {
            let quantity = u32::try_from(i.quantity).unwrap_or(0);
            by_item.insert(i.id.clone(), CartLineItem { id: i.id, product_id: i.product_id, quantity, ..Default::default() });
        }
        for c in categories {
            if let Some(item) = by_item.get_mut(&c.item_id) { item.product_categories.push(c.category_id); }
        }
        for a in adjustments {
            if let Some(item) = by_item.get_mut(&a.item_id) {
                item.adjustments.push(LineItemAdjustment { id: a.id, code: a.code, promotion_id: a.promotion_id });
            }
        }

        Ok(Some(Cart {
            id: cart_id.to_string(),
            items: order.iter().filter_map(|id| by_item.remove(id)).collect(),
            promotions: promotions.into_iter().map(|p| CartPromotion { id: p.id, code: p.code }).collect(),
        }))
    }

    async fn soft_delete_line_item_adjustments(&self, adjustment_ids: &[String]) -> Result<()> {
        sqlx::query("UPDATE cart_line_item_adjustment SET deleted_at = NOW() WHERE id = ANY($1) AND deleted_at IS NULL")
            .bind(adjustment_ids).execute(&self.db).await?;
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    display_id: i32,
    email: Option<String>,
    currency_code: Option<String>,
    total: Option<i64>,
    first_name: Option<String>,
    last_name: Option<String>,
    address_1: Option<String>,
    city: Option<String>,
    postal_code: Option<String>,
    country_code: Option<String>,
    has_address: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow { title: String, quantity: i32, total: i64 }

#[derive(Clone)]
pub struct PgOrderRepository {
    db: PgPool,
}

impl PgOrderRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn retrieve_order(&self, order_id: &str) -> Result<Order> {
        let o = sqlx::query_as::<_, OrderRow>(
            "SELECT o.id, o.display_id, o.email, o.currency_code, \
                    (s.totals->>'current_order_total')::numeric::int8 AS total, \
                    a.first_name, a.last_name, a.address_1, a.city, a.postal_code, a.country_code, \
                    (a.id IS NOT NULL) AS has_address \
             FROM \"order\" o \
             LEFT JOIN order_summary s ON s.order_id = o.id AND s.deleted_at IS NULL \
             LEFT JOIN order_address a ON a.id = o.shipping_address_id \
             WHERE o.id = $1 AND o.deleted_at IS NULL",
        )
        .bind(order_id).fetch_optional(&self.db).await?
        .ok_or(CommerceError::OrderNotFound)?;

        let items = sqlx::query_as::<_, OrderItemRow>(
            "SELECT li.title, oi.quantity::int4 AS quantity, (li.unit_price * oi.quantity)::int8 AS total \
             FROM order_item oi JOIN order_line_item li ON li.id = oi.item_id \
             WHERE oi.order_id = $1 AND oi.deleted_at IS NULL ORDER BY li.created_at",
        )
        .bind(order_id).fetch_all(&self.db).await?;

        let shipping_address = o.has_address.then(|| OrderAddress {
            first_name: o.first_name,
            last_name: o.last_name,
            address_1: o.address_1,
            city: o.city,
            postal_code: o.postal_code,
            country_code: o.country_code,
        });

        Ok(Order {
            id: o.id,
            display_id: i64::from(o.display_id),
            email: o.email,
            currency_code: o.currency_code,
            total: o.total.unwrap_or_default(),
            items: items
                .into_iter()
                .map(|i| OrderLineItem { title: i.title, quantity: u32::try_from(i.quantity).unwrap_or(0), total: i.total })
                .collect(),
            shipping_address,
        })
    }
}
