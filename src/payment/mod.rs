//! Payment provider contract.
//!
//! The host's payment module drives a provider through these calls over the
//! lifetime of a payment session. Provider-specific state lives in the session
//! `data` blob, a free-form JSON object persisted by the host.

pub mod sumup;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;

pub type PaymentData = Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSessionStatus {
    Authorized,
    Captured,
    Pending,
    RequiresMore,
    Error,
    Canceled,
}

#[derive(Clone, Debug, Default)]
pub struct InitiatePaymentInput {
    pub amount: Decimal,
    pub currency_code: String,
    pub data: PaymentData,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InitiatePaymentOutput {
    pub id: String,
    pub data: PaymentData,
}

/// Input for calls that only need the session data.
#[derive(Clone, Debug, Default)]
pub struct PaymentInput {
    pub data: PaymentData,
}

#[derive(Clone, Debug, Default)]
pub struct RefundPaymentInput {
    pub amount: Decimal,
    pub data: PaymentData,
}

#[derive(Clone, Debug, Default)]
pub struct UpdatePaymentInput {
    pub amount: Decimal,
    pub currency_code: String,
    pub data: PaymentData,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuthorizePaymentOutput {
    pub status: PaymentSessionStatus,
    pub data: PaymentData,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PaymentOutput {
    pub data: PaymentData,
}

#[derive(Clone, Debug, Default)]
pub struct WebhookPayload {
    pub data: PaymentData,
    pub raw_data: Vec<u8>,
    pub headers: Vec<(String, String)>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookAction {
    Authorized,
    Captured,
    Failed,
    NotSupported,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WebhookActionResult {
    pub action: WebhookAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    fn identifier(&self) -> &'static str;

    async fn initiate_payment(&self, input: InitiatePaymentInput) -> Result<InitiatePaymentOutput>;
    async fn authorize_payment(&self, input: PaymentInput) -> Result<AuthorizePaymentOutput>;
    async fn capture_payment(&self, input: PaymentInput) -> Result<PaymentOutput>;
    async fn refund_payment(&self, input: RefundPaymentInput) -> Result<PaymentOutput>;
    async fn cancel_payment(&self, input: PaymentInput) -> Result<PaymentOutput>;
    async fn delete_payment(&self, input: PaymentInput) -> Result<PaymentOutput>;
    async fn get_payment_status(&self, input: PaymentInput) -> Result<PaymentSessionStatus>;
    async fn update_payment(&self, input: UpdatePaymentInput) -> Result<PaymentOutput>;
    async fn retrieve_payment(&self, input: PaymentInput) -> Result<PaymentOutput>;
    async fn get_webhook_action_and_data(&self, payload: WebhookPayload) -> Result<WebhookActionResult>;
}

/// Non-empty string value of `key` in the session data.
pub fn data_str(data: &PaymentData, key: &str) -> Option<String> {
    data.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_string)
}
