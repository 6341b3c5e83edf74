//! Domain events delivered by the host platform.

use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::{CommerceError, Result};

pub const CART_UPDATED: &str = "cart.updated";
pub const ORDER_PLACED: &str = "order.placed";
pub const PROMOTION_CREATED: &str = "promotion.created";
pub const PROMOTION_UPDATED: &str = "promotion.updated";

pub const SUBJECTS: [&str; 4] = [CART_UPDATED, ORDER_PLACED, PROMOTION_CREATED, PROMOTION_UPDATED];

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Cart(CartEvent),
    Order(OrderEvent),
    Promotion(PromotionEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CartEvent {
    Updated { cart_id: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum OrderEvent {
    Placed { order_id: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum PromotionEvent {
    Created(PromotionsHookInput),
    Updated(PromotionsHookInput),
}

/// Payload of `cart.updated` and `order.placed`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EntityRef {
    pub id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct PromotionRef {
    pub id: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// Extra fields accepted on promotion create/update requests.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, Validate)]
pub struct BundleAdditionalData {
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub min_quantity: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct PromotionsHookInput {
    pub promotions: Vec<PromotionRef>,
    #[serde(default)]
    pub additional_data: Option<BundleAdditionalData>,
}

impl DomainEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Cart(CartEvent::Updated { .. }) => CART_UPDATED,
            Self::Order(OrderEvent::Placed { .. }) => ORDER_PLACED,
            Self::Promotion(PromotionEvent::Created(_)) => PROMOTION_CREATED,
            Self::Promotion(PromotionEvent::Updated(_)) => PROMOTION_UPDATED,
        }
    }

    /// Decodes a message received on `subject`.
    pub fn decode(subject: &str, payload: &[u8]) -> Result<Self> {
        let bad = |e: serde_json::Error| CommerceError::EventBus(format!("{}: {}", subject, e));
        match subject {
            CART_UPDATED => {
                let r: EntityRef = serde_json::from_slice(payload).map_err(bad)?;
                Ok(Self::Cart(CartEvent::Updated { cart_id: r.id }))
            }
            ORDER_PLACED => {
                let r: EntityRef = serde_json::from_slice(payload).map_err(bad)?;
                Ok(Self::Order(OrderEvent::Placed { order_id: r.id }))
            }
            PROMOTION_CREATED => Ok(Self::Promotion(PromotionEvent::Created(serde_json::from_slice(payload).map_err(bad)?))),
            PROMOTION_UPDATED => Ok(Self::Promotion(PromotionEvent::Updated(serde_json::from_slice(payload).map_err(bad)?))),
            other => Err(CommerceError::EventBus(format!("unsupported subject {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_subjects() {
        let e = DomainEvent::decode(CART_UPDATED, br#"{"id":"cart_1"}"#).unwrap();
        assert_eq!(e, DomainEvent::Cart(CartEvent::Updated { cart_id: "cart_1".into() }));
        assert_eq!(e.subject(), CART_UPDATED);

        let e = DomainEvent::decode(PROMOTION_UPDATED, br#"{"promotions":[{"id":"promo_1"}],"additional_data":{"category_id":"pcat_1"}}"#).unwrap();
        match e {
            DomainEvent::Promotion(PromotionEvent::Updated(input)) => {
                assert_eq!(input.promotions[0].id, "promo_1");
                assert_eq!(input.additional_data.unwrap().category_id.as_deref(), Some("pcat_1"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(DomainEvent::decode(ORDER_PLACED, b"nope"), Err(CommerceError::EventBus(_))));
        assert!(matches!(DomainEvent::decode("product.created", b"{}"), Err(CommerceError::EventBus(_))));
    }

    #[test]
    fn test_additional_data_validation() {
        let ok = BundleAdditionalData { category_id: Some("pcat_1".into()), min_quantity: Some(1) };
        assert!(ok.validate().is_ok());
        let bad = BundleAdditionalData { category_id: Some("pcat_1".into()), min_quantity: Some(0) };
        assert!(bad.validate().is_err());
        assert!(BundleAdditionalData::default().validate().is_ok());
    }
}
