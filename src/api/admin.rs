//! `/admin/promotions/:id/category-bundle`

use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{api_error, ApiError, AppState};
use crate::domain::aggregates::CategoryBundleConfig;
use crate::domain::value_objects::MinQuantity;

#[derive(Debug, Serialize)]
pub struct CategoryBundleResponse {
    pub category_bundle_config: Option<CategoryBundleConfig>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertCategoryBundleRequest {
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub min_quantity: Option<i64>,
}

/// Lookup failures answer with a null config.
pub async fn get_category_bundle(State(s): State<AppState>, Path(id): Path<String>) -> Json<CategoryBundleResponse> {
    let config = s.bundles.config_for_promotion(&id).await.unwrap_or_else(|e| {
        tracing::warn!(promotion_id = %id, error = %e, "category bundle lookup failed");
        None
    });
    Json(CategoryBundleResponse { category_bundle_config: config })
}

pub async fn upsert_category_bundle(
    State(s): State<AppState>,
    Path(id): Path<String>,
    Json(r): Json<UpsertCategoryBundleRequest>,
) -> Result<Json<CategoryBundleResponse>, ApiError> {
    let category_id = r
        .category_id
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "category_id is required"))?;
    r.validate().map_err(|_| api_error(StatusCode::BAD_REQUEST, "min_quantity must be at least 1"))?;
    let min_quantity = match r.min_quantity {
        Some(n) => MinQuantity::new(n).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?,
        None => MinQuantity::DEFAULT,
    };

    let config = s
        .bundles
        .upsert_for_promotion(&id, category_id, min_quantity)
        .await
        .map_err(|e| {
            tracing::error!(promotion_id = %id, error = %e, "failed to save category bundle config");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    Ok(Json(CategoryBundleResponse { category_bundle_config: Some(config) }))
}
