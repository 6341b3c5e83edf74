//! Aggregates module
pub mod bundle;
pub mod cart;
pub mod order;

pub use bundle::{CategoryBundleConfig, CategoryBundleConfigUpdate, NewCategoryBundleConfig};
pub use cart::{Cart, CartLineItem, CartPromotion, LineItemAdjustment};
pub use order::{Order, OrderAddress, OrderLineItem};
