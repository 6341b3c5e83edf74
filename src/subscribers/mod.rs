//! Event subscribers.
//!
//! `cart.updated` and `order.placed` handlers are best-effort and never fail
//! the dispatch. Promotion hooks run inside the host workflow, so their
//! errors are returned.

pub mod cart_promotion_guard;
pub mod order_placed;

pub use cart_promotion_guard::{CartPromotionGuard, GuardOutcome};
pub use order_placed::OrderPlacedNotifier;

use crate::domain::events::{CartEvent, DomainEvent, OrderEvent, PromotionEvent};
use crate::workflows::PromotionHooks;
use crate::Result;

#[derive(Clone)]
pub struct Subscribers {
    pub cart_guard: CartPromotionGuard,
    pub order_placed: OrderPlacedNotifier,
    pub promotion_hooks: PromotionHooks,
}

impl Subscribers {
    pub async fn dispatch(&self, event: DomainEvent) -> Result<()> {
        tracing::debug!(subject = event.subject(), "dispatching event");
        match event {
            DomainEvent::Cart(CartEvent::Updated { cart_id }) => self.cart_guard.handle(&cart_id).await,
            DomainEvent::Order(OrderEvent::Placed { order_id }) => self.order_placed.handle(&order_id).await,
            DomainEvent::Promotion(PromotionEvent::Created(input)) => {
                let configs = self.promotion_hooks.promotions_created(input).await?;
                tracing::info!(count = configs.len(), "bundle configs created for new promotions");
            }
            DomainEvent::Promotion(PromotionEvent::Updated(input)) => {
                let configs = self.promotion_hooks.promotions_updated(input).await?;
                tracing::info!(count = configs.len(), "bundle configs saved for updated promotions");
            }
        }
        Ok(())
    }
}
