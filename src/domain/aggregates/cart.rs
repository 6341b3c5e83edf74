//! Cart Aggregate
//!
//! Read-side view of a host cart: line items with their product categories and
//! promotion adjustments, plus the promotions applied to the cart.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use crate::domain::value_objects::Quantity;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: String,
    pub items: Vec<CartLineItem>,
    pub promotions: Vec<CartPromotion>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: String,
    pub product_id: Option<String>,
    pub quantity: u32,
    /// Category ids of the line item's product.
    pub product_categories: Vec<String>,
    pub adjustments: Vec<LineItemAdjustment>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemAdjustment {
    pub id: String,
    pub code: Option<String>,
    pub promotion_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartPromotion {
    pub id: String,
    pub code: Option<String>,
}

impl CartLineItem {
    pub fn in_category(&self, category_id: &str) -> bool {
        self.product_categories.iter().any(|c| c == category_id)
    }
}

impl Cart {
    pub fn has_promotions(&self) -> bool { !self.promotions.is_empty() }

    /// Total quantity of line items whose product belongs to `category_id`.
    pub fn quantity_in_category(&self, category_id: &str) -> Quantity {
        self.items
            .iter()
            .filter(|i| i.in_category(category_id))
            .fold(Quantity::default(), |acc, i| acc.add(i.quantity))
    }

    /// Ids of every adjustment, across all items, carrying one of `codes`.
    pub fn adjustment_ids_for_codes(&self, codes: &[String]) -> Vec<String> {
        let codes: HashSet<&str> = codes.iter().map(String::as_str).collect();
        self.items
            .iter()
            .flat_map(|i| i.adjustments.iter())
            .filter(|a| a.code.as_deref().is_some_and(|c| codes.contains(c)))
            .map(|a| a.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, qty: u32, categories: &[&str], codes: &[&str]) -> CartLineItem {
        CartLineItem {
            id: id.into(),
            product_id: Some(format!("prod_{}", id)),
            quantity: qty,
            product_categories: categories.iter().map(|c| c.to_string()).collect(),
            adjustments: codes
                .iter()
                .enumerate()
                .map(|(n, c)| LineItemAdjustment { id: format!("adj_{}_{}", id, n), code: Some(c.to_string()), promotion_id: None })
                .collect(),
        }
    }

    #[test]
    fn test_quantity_in_category() {
        let cart = Cart {
            id: "cart_1".into(),
            items: vec![item("a", 2, &["pcat_tees", "pcat_sale"], &[]), item("b", 1, &["pcat_hats"], &[]), item("c", 3, &["pcat_tees"], &[])],
            promotions: vec![],
        };
        assert_eq!(cart.quantity_in_category("pcat_tees").value(), 5);
        assert_eq!(cart.quantity_in_category("pcat_hats").value(), 1);
        assert_eq!(cart.quantity_in_category("pcat_none").value(), 0);
    }

    #[test]
    fn test_adjustment_ids_for_codes() {
        let cart = Cart {
            id: "cart_1".into(),
            items: vec![item("a", 1, &[], &["BUNDLE10", "WELCOME"]), item("b", 1, &[], &["BUNDLE10"])],
            promotions: vec![],
        };
        let ids = cart.adjustment_ids_for_codes(&["BUNDLE10".to_string()]);
        assert_eq!(ids, vec!["adj_a_0".to_string(), "adj_b_0".to_string()]);
        assert!(cart.adjustment_ids_for_codes(&[]).is_empty());
    }
}
