#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use turncoat_commerce::api::AppState;
use turncoat_commerce::infrastructure::in_memory::InMemoryCategoryBundleStore;
use turncoat_commerce::modules::category_bundle::CategoryBundleService;
use turncoat_commerce::payment::sumup::{SumUpOptions, SumUpProvider};

pub const API_KEY: &str = "sk_test_123";
pub const MERCHANT: &str = "MTEST01";

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct FakeState {
    checkouts: HashMap<String, Value>,
    requests: Vec<RecordedRequest>,
    next_id: u32,
    fail_all: bool,
}

/// Local stand-in for the SumUp REST API.
#[derive(Clone, Default)]
pub struct FakeSumUp {
    state: Arc<Mutex<FakeState>>,
    pub base_url: String,
}

impl FakeSumUp {
    pub async fn start() -> Self {
        let mut fake = FakeSumUp::default();
        let app = Router::new()
            .route("/v0.1/checkouts", post(create_checkout))
            .route("/v0.1/checkouts/:id", get(get_checkout).delete(delete_checkout))
            .route("/v0.1/me/refund/:txn", post(refund))
            .with_state(fake.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        fake.base_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        fake
    }

    pub fn options(&self) -> SumUpOptions {
        SumUpOptions { api_key: API_KEY.into(), merchant_code: MERCHANT.into(), base_url: self.base_url.clone() }
    }

    pub fn provider(&self) -> SumUpProvider {
        SumUpProvider::new(self.options()).unwrap()
    }

    pub fn insert_checkout(&self, checkout: Value) {
        let id = checkout["id"].as_str().unwrap().to_string();
        self.state.lock().unwrap().checkouts.insert(id, checkout);
    }

    /// Stores a checkout body under `id` as-is, even when the body has no `id` of its own.
    pub fn insert_checkout_at(&self, id: &str, checkout: Value) {
        self.state.lock().unwrap().checkouts.insert(id.to_string(), checkout);
    }

    pub fn set_status(&self, id: &str, status: &str) {
        let mut s = self.state.lock().unwrap();
        let c = s.checkouts.get_mut(id).unwrap();
        c["status"] = json!(status);
        if status == "PAID" {
            c["transaction_id"] = json!("txn_1");
            c["transaction_code"] = json!("TC001");
        }
    }

    pub fn fail_all(&self) {
        self.state.lock().unwrap().fail_all = true;
    }

    pub fn has_checkout(&self, id: &str) -> bool {
        self.state.lock().unwrap().checkouts.contains_key(id)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    fn record(&self, method: &'static str, path: String, headers: &HeaderMap, body: &Bytes) -> bool {
        let mut s = self.state.lock().unwrap();
        s.requests.push(RecordedRequest {
            method,
            path,
            authorization: headers.get("authorization").and_then(|v| v.to_str().ok()).map(str::to_string),
            body: serde_json::from_slice(body).unwrap_or(Value::Null),
        });
        s.fail_all
    }
}

fn failure() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error_code": "NOT_FOUND"}))).into_response()
}

async fn create_checkout(State(f): State<FakeSumUp>, headers: HeaderMap, body: Bytes) -> Response {
    if f.record("POST", "/v0.1/checkouts".into(), &headers, &body) {
        return failure();
    }
    let req: Value = serde_json::from_slice(&body).unwrap();
    let mut s = f.state.lock().unwrap();
    s.next_id += 1;
    let id = format!("chk_{}", s.next_id);
    let checkout = json!({
        "id": id,
        "checkout_reference": req["checkout_reference"],
        "amount": req["amount"],
        "currency": req["currency"],
        "status": "PENDING",
        "hosted_checkout_url": format!("https://checkout.sumup.test/{}", id),
    });
    s.checkouts.insert(id, checkout.clone());
    Json(checkout).into_response()
}

async fn get_checkout(State(f): State<FakeSumUp>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    if f.record("GET", format!("/v0.1/checkouts/{}", id), &headers, &Bytes::new()) {
        return failure();
    }
    match f.state.lock().unwrap().checkouts.get(&id) {
        Some(c) => Json(c.clone()).into_response(),
        None => not_found(),
    }
}

async fn delete_checkout(State(f): State<FakeSumUp>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    if f.record("DELETE", format!("/v0.1/checkouts/{}", id), &headers, &Bytes::new()) {
        return failure();
    }
    match f.state.lock().unwrap().checkouts.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}

async fn refund(State(f): State<FakeSumUp>, Path(txn): Path<String>, headers: HeaderMap, body: Bytes) -> Response {
    if f.record("POST", format!("/v0.1/me/refund/{}", txn), &headers, &body) {
        return failure();
    }
    StatusCode::NO_CONTENT.into_response()
}

pub fn app_state(payments: SumUpProvider) -> (AppState, InMemoryCategoryBundleStore) {
    let store = InMemoryCategoryBundleStore::new();
    let state = AppState { bundles: CategoryBundleService::new(Arc::new(store.clone())), payments: Arc::new(payments) };
    (state, store)
}

pub fn unreachable_provider() -> SumUpProvider {
    SumUpProvider::new(SumUpOptions { api_key: API_KEY.into(), merchant_code: MERCHANT.into(), base_url: "http://127.0.0.1:9".into() }).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
