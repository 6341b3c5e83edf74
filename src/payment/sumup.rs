//! SumUp hosted-checkout payment provider.
//!
//! SumUp captures automatically once the shopper pays, so authorization and
//! capture only read the checkout back.

use async_trait::async_trait;
use reqwest::{header, Method};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use super::{
    data_str, AuthorizePaymentOutput, InitiatePaymentInput, InitiatePaymentOutput, PaymentData, PaymentInput,
    PaymentOutput, PaymentProvider, PaymentSessionStatus, RefundPaymentInput, UpdatePaymentInput, WebhookAction,
    WebhookActionResult, WebhookPayload,
};
use crate::domain::value_objects::CheckoutReference;
use crate::Result;

pub const IDENTIFIER: &str = "sumup";
pub const DEFAULT_BASE_URL: &str = "https://api.sumup.com";

#[derive(Error, Debug)]
pub enum SumUpError {
    #[error("SumUp {0} is required in the provider's options.")]
    MissingOption(&'static str),

    #[error("SumUp API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("SumUp request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SumUp response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No SumUp transaction_id found for refund")]
    MissingTransactionId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SumUpOptions {
    pub api_key: String,
    pub merchant_code: String,
    pub base_url: String,
}

impl SumUpOptions {
    pub fn validate(&self) -> std::result::Result<(), SumUpError> {
        if self.api_key.trim().is_empty() { return Err(SumUpError::MissingOption("API key")); }
        if self.merchant_code.trim().is_empty() { return Err(SumUpError::MissingOption("merchant code")); }
        Ok(())
    }
}

/// Checkout status as reported by SumUp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckoutStatus {
    Pending,
    Paid,
    Failed,
    Expired,
    Unknown(String),
}

impl CheckoutStatus {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else { return Self::Unknown(String::new()) };
        match raw.to_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "PAID" => Self::Paid,
            "FAILED" => Self::Failed,
            "EXPIRED" => Self::Expired,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    /// Mapping used by status queries.
    pub fn session_status(&self) -> PaymentSessionStatus {
        match self {
            Self::Paid => PaymentSessionStatus::Authorized,
            Self::Failed => PaymentSessionStatus::Error,
            Self::Expired => PaymentSessionStatus::Canceled,
            Self::Pending | Self::Unknown(_) => PaymentSessionStatus::Pending,
        }
    }

    /// Mapping used by authorization: an expired checkout is a failed attempt.
    pub fn authorization_status(&self) -> PaymentSessionStatus {
        match self {
            Self::Expired => PaymentSessionStatus::Error,
            other => other.session_status(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Checkout {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosted_checkout_url: Option<String>,
}

impl Checkout {
    pub fn checkout_status(&self) -> CheckoutStatus { CheckoutStatus::parse(self.status.as_deref()) }

    /// Session data stored after creating a checkout.
    fn session_data(&self) -> PaymentData {
        object(json!({
            "id": self.id,
            "checkout_reference": self.checkout_reference,
            "status": self.status,
            "hosted_checkout_url": self.hosted_checkout_url,
        }))
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CreateCheckout {
    pub checkout_reference: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub merchant_code: String,
    pub description: String,
    pub hosted_checkout: HostedCheckout,
}

#[derive(Clone, Debug, Serialize)]
pub struct HostedCheckout {
    pub enabled: bool,
}

#[derive(Clone, Debug, Serialize)]
struct RefundRequest {
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
}

/// Bearer-authenticated JSON client for the SumUp REST API.
#[derive(Clone, Debug)]
pub struct SumUpClient {
    http: reqwest::Client,
    options: SumUpOptions,
}

impl SumUpClient {
    pub fn new(options: SumUpOptions) -> std::result::Result<Self, SumUpError> {
        options.validate()?;
        Ok(Self { http: reqwest::Client::new(), options })
    }

    pub fn merchant_code(&self) -> &str { &self.options.merchant_code }

    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> std::result::Result<Value, SumUpError> {
        let url = format!("{}{}", self.options.base_url.trim_end_matches('/'), path);
        let mut req = self
            .http
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(&self.options.api_key);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), path, body = %text, "SumUp API error");
            return Err(SumUpError::Api { status: status.as_u16(), body: text });
        }
        // DELETE and friends answer with an empty body
        if text.trim().is_empty() {
            return Ok(Value::Object(PaymentData::new()));
        }
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn create_checkout(&self, checkout: &CreateCheckout) -> std::result::Result<Checkout, SumUpError> {
        let v = self.request(Method::POST, "/v0.1/checkouts", Some(serde_json::to_value(checkout)?)).await?;
        Ok(serde_json::from_value(v)?)
    }

    pub async fn get_checkout(&self, checkout_id: &str) -> std::result::Result<Checkout, SumUpError> {
        Ok(serde_json::from_value(self.get_checkout_raw(checkout_id).await?)?)
    }

    /// The checkout exactly as SumUp returned it, including fields `Checkout` does not model.
    pub async fn get_checkout_raw(&self, checkout_id: &str) -> std::result::Result<Value, SumUpError> {
        self.request(Method::GET, &format!("/v0.1/checkouts/{}", checkout_id), None).await
    }

    pub async fn deactivate_checkout(&self, checkout_id: &str) -> std::result::Result<(), SumUpError> {
        self.request(Method::DELETE, &format!("/v0.1/checkouts/{}", checkout_id), None).await?;
        Ok(())
    }

    pub async fn refund(&self, transaction_id: &str, amount: Decimal) -> std::result::Result<(), SumUpError> {
        let body = serde_json::to_value(RefundRequest { amount })?;
        self.request(Method::POST, &format!("/v0.1/me/refund/{}", transaction_id), Some(body)).await?;
        Ok(())
    }
}

pub struct SumUpProvider {
    client: SumUpClient,
}

impl SumUpProvider {
    pub fn new(options: SumUpOptions) -> Result<Self> {
        let client = SumUpClient::new(options)?;
        tracing::info!(provider = IDENTIFIER, "payment provider initialized");
        Ok(Self { client })
    }

    fn checkout_request(&self, amount: Decimal, currency_code: &str, description: &str) -> CreateCheckout {
        CreateCheckout {
            checkout_reference: CheckoutReference::generate().to_string(),
            amount,
            currency: currency_code.to_uppercase(),
            merchant_code: self.client.merchant_code().to_string(),
            description: description.to_string(),
            hosted_checkout: HostedCheckout { enabled: true },
        }
    }
}

#[async_trait]
impl PaymentProvider for SumUpProvider {
    fn identifier(&self) -> &'static str { IDENTIFIER }

    async fn initiate_payment(&self, input: InitiatePaymentInput) -> Result<InitiatePaymentOutput> {
        let req = self.checkout_request(input.amount, &input.currency_code, "Order payment");
        let checkout = self.client.create_checkout(&req).await?;
        tracing::info!(checkout_id = %checkout.id, reference = %req.checkout_reference, "SumUp checkout created");
        Ok(InitiatePaymentOutput { id: checkout.id.clone(), data: checkout.session_data() })
    }

    async fn authorize_payment(&self, input: PaymentInput) -> Result<AuthorizePaymentOutput> {
        let Some(checkout_id) = data_str(&input.data, "id") else {
            return Ok(AuthorizePaymentOutput { status: PaymentSessionStatus::Error, data: input.data });
        };

        let checkout = match self.client.get_checkout(&checkout_id).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(checkout_id = %checkout_id, error = %e, "SumUp authorize error");
                let mut data = input.data;
                data.insert("error".into(), Value::String(e.to_string()));
                return Ok(AuthorizePaymentOutput { status: PaymentSessionStatus::Error, data });
            }
        };

        let status = checkout.checkout_status().authorization_status();
        let amount = checkout.amount.map(|a| serde_json::to_value(FloatAmount(a))).transpose().map_err(SumUpError::from)?;
        let data = if status == PaymentSessionStatus::Authorized {
            object(json!({
                "id": checkout.id,
                "transaction_id": checkout.transaction_id,
                "transaction_code": checkout.transaction_code,
                "status": checkout.status,
                "amount": amount,
            }))
        } else {
            object(json!({ "id": checkout.id, "status": checkout.status }))
        };
        Ok(AuthorizePaymentOutput { status, data })
    }

    async fn capture_payment(&self, input: PaymentInput) -> Result<PaymentOutput> {
        let mut data = input.data;
        if let Some(checkout_id) = data_str(&data, "id") {
            match self.client.get_checkout(&checkout_id).await {
                Ok(checkout) => {
                    insert_opt(&mut data, "status", checkout.status);
                    insert_opt(&mut data, "transaction_id", checkout.transaction_id);
                    insert_opt(&mut data, "transaction_code", checkout.transaction_code);
                }
                Err(e) => tracing::error!(checkout_id = %checkout_id, error = %e, "SumUp capture check error"),
            }
        }
        Ok(PaymentOutput { data })
    }

    async fn refund_payment(&self, input: RefundPaymentInput) -> Result<PaymentOutput> {
        let transaction_id = data_str(&input.data, "transaction_id").ok_or(SumUpError::MissingTransactionId)?;
        self.client.refund(&transaction_id, input.amount).await?;
        tracing::info!(transaction_id = %transaction_id, amount = %input.amount, "SumUp refund processed");

        let mut data = input.data;
        data.insert("refunded".into(), Value::Bool(true));
        data.insert("refund_amount".into(), serde_json::to_value(FloatAmount(input.amount)).map_err(SumUpError::from)?);
        Ok(PaymentOutput { data })
    }

    async fn cancel_payment(&self, input: PaymentInput) -> Result<PaymentOutput> {
        if let Some(checkout_id) = data_str(&input.data, "id") {
            match self.client.deactivate_checkout(&checkout_id).await {
                Ok(()) => tracing::info!(checkout_id = %checkout_id, "SumUp checkout cancelled"),
                Err(e) => tracing::warn!(checkout_id = %checkout_id, error = %e, "SumUp cancel failed (may already be completed)"),
            }
        }
        let mut data = input.data;
        data.insert("cancelled".into(), Value::Bool(true));
        Ok(PaymentOutput { data })
    }

    async fn delete_payment(&self, input: PaymentInput) -> Result<PaymentOutput> {
        if let Some(checkout_id) = data_str(&input.data, "id") {
            if let Err(e) = self.client.deactivate_checkout(&checkout_id).await {
                tracing::warn!(checkout_id = %checkout_id, error = %e, "SumUp delete checkout failed");
            }
        }
        Ok(PaymentOutput { data: input.data })
    }

    async fn get_payment_status(&self, input: PaymentInput) -> Result<PaymentSessionStatus> {
        let Some(checkout_id) = data_str(&input.data, "id") else {
            return Ok(PaymentSessionStatus::Pending);
        };
        match self.client.get_checkout(&checkout_id).await {
            Ok(checkout) => Ok(checkout.checkout_status().session_status()),
            Err(e) => {
                tracing::error!(checkout_id = %checkout_id, error = %e, "SumUp getPaymentStatus error");
                Ok(PaymentSessionStatus::Error)
            }
        }
    }

    async fn update_payment(&self, input: UpdatePaymentInput) -> Result<PaymentOutput> {
        if let Some(checkout_id) = data_str(&input.data, "id") {
            if let Err(e) = self.client.deactivate_checkout(&checkout_id).await {
                tracing::debug!(checkout_id = %checkout_id, error = %e, "ignoring failed checkout deactivation");
            }
        }
        let req = self.checkout_request(input.amount, &input.currency_code, "Order payment (updated)");
        let checkout = self.client.create_checkout(&req).await?;
        tracing::info!(checkout_id = %checkout.id, reference = %req.checkout_reference, "SumUp checkout re-created");
        Ok(PaymentOutput { data: checkout.session_data() })
    }

    async fn retrieve_payment(&self, input: PaymentInput) -> Result<PaymentOutput> {
        let Some(checkout_id) = data_str(&input.data, "id") else {
            return Ok(PaymentOutput { data: input.data });
        };
        match self.client.get_checkout_raw(&checkout_id).await {
            Ok(checkout) => {
                let mut data = input.data;
                data.extend(object(checkout));
                Ok(PaymentOutput { data })
            }
            Err(e) => {
                tracing::error!(checkout_id = %checkout_id, error = %e, "SumUp retrievePayment error");
                Ok(PaymentOutput { data: input.data })
            }
        }
    }

    async fn get_webhook_action_and_data(&self, _payload: WebhookPayload) -> Result<WebhookActionResult> {
        Ok(WebhookActionResult { action: WebhookAction::NotSupported, session_id: None })
    }
}

#[derive(Serialize)]
struct FloatAmount(#[serde(with = "rust_decimal::serde::float")] Decimal);

fn object(v: Value) -> PaymentData {
    match v {
        Value::Object(map) => map,
        _ => PaymentData::new(),
    }
}

fn insert_opt(data: &mut PaymentData, key: &str, value: Option<String>) {
    if let Some(v) = value {
        data.insert(key.to_string(), Value::String(v));
    }
}
