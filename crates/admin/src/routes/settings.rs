//! App settings and decoration fee tables.

use axum::{
    Form, Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireShop;
use crate::services::AppSettings;
use crate::services::fees::rebuild_screenprint_fees;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/app/api/settings", get(show).post(update))
        .route("/app/api/fees/rebuild", post(rebuild_fees))
}

#[instrument(skip_all)]
async fn show(
    RequireShop(_shop): RequireShop,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let settings = state.settings().load().await?;
    Ok(Json(json!({ "success": true, "settings": settings })))
}

#[instrument(skip_all, fields(shop = %shop.shop))]
async fn update(
    RequireShop(shop): RequireShop,
    State(state): State<AppState>,
    Json(settings): Json<AppSettings>,
) -> Result<Json<Value>, AppError> {
    settings.validate().map_err(AppError::BadRequest)?;
    state.settings().save(&settings).await?;
    tracing::info!("Settings saved");

    Ok(Json(json!({
        "success": true,
        "message": "Settings saved successfully!",
        "settings": settings,
    })))
}

#[derive(Debug, Deserialize)]
pub struct FeeRebuildForm {
    pub screenprint_handle: String,
    pub tiers_json: Option<String>,
}

#[instrument(skip_all, fields(handle = %form.screenprint_handle))]
async fn rebuild_fees(
    RequireShop(_shop): RequireShop,
    State(state): State<AppState>,
    Form(form): Form<FeeRebuildForm>,
) -> Result<Json<Value>, AppError> {
    if form.screenprint_handle.trim().is_empty() {
        return Err(AppError::BadRequest("Fee product handle is required".to_string()));
    }
    let summary =
        rebuild_screenprint_fees(state.shopify(), &form.screenprint_handle, form.tiers_json.as_deref())
            .await?;
    Ok(Json(json!({ "success": true, "rebuilt": summary })))
}
