//! Order Aggregate
//!
//! Read-side view of a placed order, enough to render notification emails.

use serde::{Deserialize, Serialize};
use crate::domain::value_objects::{Money, DEFAULT_CURRENCY};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub display_id: i64,
    pub email: Option<String>,
    pub currency_code: Option<String>,
    /// Minor units.
    pub total: i64,
    pub items: Vec<OrderLineItem>,
    pub shipping_address: Option<OrderAddress>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub title: String,
    pub quantity: u32,
    /// Minor units.
    pub total: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAddress {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address_1: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country_code: Option<String>,
}

impl Order {
    pub fn currency(&self) -> String {
        self.currency_code
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
            .to_uppercase()
    }

    pub fn total_money(&self) -> Money { Money::new(self.total, &self.currency()) }

    /// One bullet line per item, or `No items`.
    pub fn items_list(&self) -> String {
        if self.items.is_empty() { return "No items".to_string(); }
        let currency = self.currency();
        self.items
            .iter()
            .map(|i| format!("• {} (x{}) — {}", i.title, i.quantity, Money::new(i.total, &currency)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn shipping_block(&self) -> String {
        self.shipping_address.as_ref().map(OrderAddress::block).unwrap_or_else(|| "N/A".to_string())
    }
}

impl OrderAddress {
    fn block(&self) -> String {
        let f = |v: &Option<String>| v.clone().unwrap_or_default();
        format!(
            "{} {}\n{}\n{}, {}\n{}",
            f(&self.first_name),
            f(&self.last_name),
            f(&self.address_1),
            f(&self.city),
            f(&self.postal_code),
            f(&self.country_code).to_uppercase()
        )
    }
}
