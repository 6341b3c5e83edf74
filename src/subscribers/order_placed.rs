//! Order notification emails (`order.placed`).

use std::sync::Arc;

use crate::domain::aggregates::Order;
use crate::domain::ports::{Notification, Notifier, OrderRepository};
use crate::Result;

pub const ADMIN_TEMPLATE: &str = "admin-order-notification";
pub const CUSTOMER_TEMPLATE: &str = "order-confirmation";
const CHANNEL: &str = "email";

#[derive(Clone)]
pub struct OrderPlacedNotifier {
    orders: Arc<dyn OrderRepository>,
    notifier: Arc<dyn Notifier>,
    admin_email: Option<String>,
}

impl OrderPlacedNotifier {
    pub fn new(orders: Arc<dyn OrderRepository>, notifier: Arc<dyn Notifier>, admin_email: Option<String>) -> Self {
        Self { orders, notifier, admin_email }
    }

    /// Sends the admin alert (when an admin address is configured) and then the
    /// customer confirmation (when the order has an email). Returns recipients.
    pub async fn send_notifications(&self, order_id: &str) -> Result<Vec<String>> {
        let order = self.orders.retrieve_order(order_id).await?;
        let mut sent = Vec::new();

        if let Some(admin) = &self.admin_email {
            self.notifier.create_notification(admin_notification(&order, admin)).await?;
            tracing::info!(display_id = order.display_id, "admin notification sent");
            sent.push(admin.clone());
        }

        if let Some(email) = order.email.as_deref().filter(|e| !e.is_empty()) {
            self.notifier.create_notification(customer_notification(&order, email)).await?;
            tracing::info!(display_id = order.display_id, to = email, "order confirmation sent");
            sent.push(email.to_string());
        }
        Ok(sent)
    }

    pub async fn handle(&self, order_id: &str) {
        if let Err(e) = self.send_notifications(order_id).await {
            tracing::error!(order_id, error = %e, "failed to send order notification emails");
        }
    }
}

fn admin_notification(order: &Order, to: &str) -> Notification {
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #333; border-bottom: 2px solid #e0e0e0; padding-bottom: 10px;">New Order Received</h1>
  <table style="width: 100%; border-collapse: collapse; margin: 20px 0;">
    <tr><td style="padding: 8px; font-weight: bold; color: #555;">Order ID:</td><td style="padding: 8px;">#{display_id}</td></tr>
    <tr style="background: #f9f9f9;"><td style="padding: 8px; font-weight: bold; color: #555;">Customer Email:</td><td style="padding: 8px;">{email}</td></tr>
    <tr><td style="padding: 8px; font-weight: bold; color: #555;">Total:</td><td style="padding: 8px; font-size: 18px; font-weight: bold; color: #2a9d8f;">{total}</td></tr>
  </table>
  <h2 style="color: #555; font-size: 16px;">Items Ordered</h2>
  <pre style="background: #f5f5f5; padding: 15px; border-radius: 5px; font-size: 14px;">{items}</pre>
  <h2 style="color: #555; font-size: 16px;">Shipping Address</h2>
  <pre style="background: #f5f5f5; padding: 15px; border-radius: 5px; font-size: 14px;">{address}</pre>
</div>"#,
        display_id = order.display_id,
        email = order.email.as_deref().unwrap_or("N/A"),
        total = order.total_money(),
        items = order.items_list(),
        address = order.shipping_block(),
    );
    Notification {
        to: to.to_string(),
        channel: CHANNEL.to_string(),
        template: ADMIN_TEMPLATE.to_string(),
        subject: format!("🛒 New Order Received — #{}", order.display_id),
        html,
    }
}

fn customer_notification(order: &Order, to: &str) -> Notification {
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #333; text-align: center;">Thank You for Your Order!</h1>
  <p style="color: #666; text-align: center; font-size: 16px;">Your order <strong>#{display_id}</strong> has been confirmed.</p>
  <hr style="border: none; border-top: 1px solid #e0e0e0; margin: 20px 0;">
  <h2 style="color: #555; font-size: 16px;">Order Summary</h2>
  <pre style="background: #f5f5f5; padding: 15px; border-radius: 5px; font-size: 14px;">{items}</pre>
  <table style="width: 100%; margin: 20px 0;">
    <tr><td style="padding: 8px; font-weight: bold; font-size: 18px;">Total:</td><td style="padding: 8px; font-weight: bold; font-size: 18px; text-align: right; color: #2a9d8f;">{total}</td></tr>
  </table>
  <hr style="border: none; border-top: 1px solid #e0e0e0; margin: 20px 0;">
  <p style="color: #999; font-size: 12px; text-align: center;">If you have any questions about your order, please reply to this email.</p>
</div>"#,
        display_id = order.display_id,
        items = order.items_list(),
        total = order.total_money(),
    );
    Notification {
        to: to.to_string(),
        channel: CHANNEL.to_string(),
        template: CUSTOMER_TEMPLATE.to_string(),
        subject: format!("Order Confirmed — #{}", order.display_id),
        html,
    }
}
