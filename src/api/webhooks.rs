//! `/webhooks/sumup`
//!
//! SumUp retries deliveries that don't get a 2xx, so every request is
//! acknowledged with 200, including ones we fail to process.
//! TODO: verify the delivery signature once SumUp exposes a signing secret.

use axum::{body::Body, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AppState;
use crate::payment::{PaymentData, PaymentInput};

pub const CHECKOUT_STATUS_CHANGED: &str = "CHECKOUT_STATUS_CHANGED";

/// Largest delivery we buffer. The route disables axum's own limit so that
/// oversize bodies are still acknowledged.
pub const WEBHOOK_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct SumUpWebhook {
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookAck {
    pub success: bool,
    pub message: String,
}

pub async fn sumup(State(s): State<AppState>, body: Body) -> (StatusCode, Json<WebhookAck>) {
    let body = match axum::body::to_bytes(body, WEBHOOK_BODY_LIMIT).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, limit = WEBHOOK_BODY_LIMIT, "[SumUp Webhook] could not read body");
            return ack(false, "Webhook received but processing failed");
        }
    };
    let event: SumUpWebhook = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(error = %e, "[SumUp Webhook] error processing webhook");
            return ack(false, "Webhook received but processing failed");
        }
    };

    let event_type = event.event_type.as_deref().unwrap_or_default();
    let checkout_id = event.id.as_deref().unwrap_or_default();
    tracing::info!(event_type, checkout_id, "[SumUp Webhook] received event");

    if event_type == CHECKOUT_STATUS_CHANGED && !checkout_id.is_empty() {
        let mut data = PaymentData::new();
        data.insert("id".into(), Value::String(checkout_id.to_string()));
        match s.payments.get_payment_status(PaymentInput { data }).await {
            Ok(status) => tracing::info!(checkout_id, ?status, "[SumUp Webhook] checkout status changed"),
            Err(e) => tracing::error!(checkout_id, error = %e, "[SumUp Webhook] status lookup failed"),
        }
    }

    ack(true, "Webhook received and processed")
}

fn ack(success: bool, message: &str) -> (StatusCode, Json<WebhookAck>) {
    (StatusCode::OK, Json(WebhookAck { success, message: message.to_string() }))
}
