//! HTTP routes.

pub mod admin;
pub mod webhooks;

use axum::{extract::DefaultBodyLimit, routing::{get, post}, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::modules::category_bundle::CategoryBundleService;
use crate::payment::PaymentProvider;

#[derive(Clone)]
pub struct AppState {
    pub bundles: CategoryBundleService,
    pub payments: Arc<dyn PaymentProvider>,
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

pub type ApiError = (axum::http::StatusCode, Json<MessageBody>);

pub fn api_error(status: axum::http::StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(MessageBody { message: message.into() }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "turncoat-commerce"})) }))
        .route("/admin/promotions/:id/category-bundle", get(admin::get_category_bundle).post(admin::upsert_category_bundle))
        .route("/webhooks/sumup", post(webhooks::sumup).layer(DefaultBodyLimit::disable()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
