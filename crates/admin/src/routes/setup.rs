//! Embedded app launch and the product setup wizard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json, Router,
    extract::{Query, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use product_configurator_core::{
    Axis, OptionSet, ValidationIssue, WizardInput, combination_count, filter_suggestions,
    suggestions::common_suggestions, validate_step,
};

use crate::error::AppError;
use crate::middleware::{RequireShop, set_current_shop, verify_launch};
use crate::services::{
    ConfigureOutcome, ConfigureRequest, StoreOptionValues, WizardError, configure_product,
};
use crate::shopify::{ProductSortKey, ProductSummary};
use crate::state::AppState;

/// Products offered in the wizard's product picker.
const SETUP_PRODUCT_LIMIT: i64 = 50;
/// Products scanned for existing option values.
const OPTION_SCAN_LIMIT: i64 = 250;

const GENERATE_VARIANTS: &str = "generateVariants";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/app", get(launch))
        .route("/app/setup", get(setup_page))
        .route("/app/api/setup", get(setup_data).post(submit))
        .route("/app/api/setup/validate", post(validate))
        .route("/app/api/autocomplete", get(autocomplete))
}

// =============================================================================
// Launch
// =============================================================================

/// Query Shopify appends to the launch URL.
#[derive(Debug, Deserialize)]
pub struct LaunchParams {
    pub host: Option<String>,
}

/// Verify the signed launch request and start a session.
#[instrument(skip_all)]
async fn launch(
    State(state): State<AppState>,
    session: Session,
    RawQuery(query): RawQuery,
) -> Result<Redirect, AppError> {
    let shop = verify_launch(
        query.as_deref().unwrap_or_default(),
        &state.config().shopify,
        Utc::now().timestamp(),
    )?;

    set_current_shop(&session, &shop).await.map_err(|e| {
        tracing::error!("Failed to store shop in session: {e}");
        AppError::Internal("Session error".to_string())
    })?;
    tracing::info!(shop = %shop.shop, "Embedded app launched");

    let target = shop.host.as_deref().map_or_else(
        || "/app/setup".to_string(),
        |host| format!("/app/setup?host={}", urlencoding::encode(host)),
    );
    Ok(Redirect::to(&target))
}

// =============================================================================
// Wizard data
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SetupQuery {
    pub product_id: Option<String>,
    pub host: Option<String>,
}

/// Options stored by an earlier run of the wizard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConfiguration {
    pub product_id: String,
    pub title: String,
    #[serde(flatten)]
    pub options: OptionSet,
    pub base_price: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupData {
    pub products: Vec<ProductSummary>,
    pub existing_options: StoreOptionValues,
    pub configuration: Option<StoredConfiguration>,
}

async fn load_setup_data(state: &AppState, product_id: Option<&str>) -> Result<SetupData, AppError> {
    let client = state.shopify();
    let (products, options) = futures::try_join!(
        client.list_products(SETUP_PRODUCT_LIMIT, None, Some(ProductSortKey::Title)),
        client.product_options(OPTION_SCAN_LIMIT),
    )?;

    let configuration = match product_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => client
            .get_product_configuration(id)
            .await?
            .map(|config| StoredConfiguration {
                options: config.stored_options(),
                base_price: config.stored_base_price().map(ToString::to_string),
                product_id: config.id,
                title: config.title,
            }),
        None => None,
    };

    Ok(SetupData {
        products,
        existing_options: StoreOptionValues::collect(&options),
        configuration,
    })
}

/// Wizard page.
#[derive(Template, WebTemplate)]
#[template(path = "setup.html")]
pub struct SetupTemplate {
    pub api_key: String,
    pub host: String,
    pub shop: String,
    pub products: Vec<ProductSummary>,
    pub existing_options: StoreOptionValues,
    pub configuration: Option<StoredConfiguration>,
    pub initial_json: String,
}

#[instrument(skip(state, shop))]
async fn setup_page(
    RequireShop(shop): RequireShop,
    State(state): State<AppState>,
    Query(query): Query<SetupQuery>,
) -> Result<SetupTemplate, AppError> {
    let data = load_setup_data(&state, query.product_id.as_deref()).await?;
    let initial_json = serde_json::to_string(&data).unwrap_or_else(|_| "{}".to_string());

    Ok(SetupTemplate {
        api_key: state.config().shopify.api_key.clone(),
        host: query.host.or(shop.host).unwrap_or_default(),
        shop: shop.shop,
        products: data.products,
        existing_options: data.existing_options,
        configuration: data.configuration,
        initial_json,
    })
}

#[instrument(skip(state, _shop))]
async fn setup_data(
    RequireShop(_shop): RequireShop,
    State(state): State<AppState>,
    Query(query): Query<SetupQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let data = load_setup_data(&state, query.product_id.as_deref()).await?;
    Ok(Json(json!({ "success": true, "data": data })))
}

// =============================================================================
// Submission
// =============================================================================

/// Wizard form as posted by the page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupForm {
    pub action: Option<String>,
    pub product_id: Option<String>,
    pub is_creating_product: Option<String>,
    pub new_product_title: Option<String>,
    #[serde(default)]
    pub colors: String,
    #[serde(default)]
    pub sizes: String,
    #[serde(default)]
    pub decorations: String,
    pub price: Option<String>,
}

impl SetupForm {
    fn options(&self) -> OptionSet {
        let split = |list: &str| -> Vec<String> {
            list.split(',').map(ToString::to_string).collect()
        };
        OptionSet::new(split(&self.colors), split(&self.sizes), split(&self.decorations))
    }

    fn creating_product(&self) -> bool {
        self.is_creating_product.as_deref() == Some("true")
    }

    fn request(&self) -> Result<ConfigureRequest, WizardError> {
        ConfigureRequest::new(
            self.creating_product(),
            self.new_product_title.as_deref(),
            self.product_id.as_deref(),
            self.options(),
            self.price.as_deref(),
        )
    }
}

fn wizard_response(result: Result<ConfigureOutcome, WizardError>) -> Response {
    match result {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "productId": outcome.product_id,
                "message": outcome.message,
                "createdVariants": outcome.created_variants,
                "skippedVariants": outcome.skipped_variants,
                "existingVariants": outcome.existing_variants,
            })),
        )
            .into_response(),
        Err(e) => {
            let status = match &e {
                WizardError::Validation(_) | WizardError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                WizardError::ProductNotFound => StatusCode::NOT_FOUND,
                WizardError::Shopify(_) => {
                    tracing::error!(error = %e, "Product configuration failed");
                    StatusCode::BAD_GATEWAY
                }
            };
            (
                status,
                Json(json!({ "success": false, "error": e.user_message() })),
            )
                .into_response()
        }
    }
}

#[instrument(skip(state, shop, form), fields(shop = %shop.shop))]
async fn submit(
    RequireShop(shop): RequireShop,
    State(state): State<AppState>,
    Form(form): Form<SetupForm>,
) -> Response {
    if form.action.as_deref() != Some(GENERATE_VARIANTS) {
        return AppError::BadRequest("Invalid action type".to_string()).into_response();
    }

    let result = match form.request() {
        Ok(request) => configure_product(state.shopify(), &request).await,
        Err(e) => Err(e),
    };
    wizard_response(result)
}

// =============================================================================
// Step validation
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    #[serde(default = "last_step")]
    pub step: u8,
    #[serde(flatten)]
    pub input: WizardInput,
}

const fn last_step() -> u8 {
    4
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub success: bool,
    pub valid: bool,
    pub combination_count: usize,
    pub issues: Vec<ValidationIssue>,
}

async fn validate(
    RequireShop(_shop): RequireShop,
    Json(request): Json<ValidateRequest>,
) -> Json<ValidateResponse> {
    let issues = validate_step(request.step, &request.input);
    Json(ValidateResponse {
        success: true,
        valid: !issues.iter().any(ValidationIssue::is_error),
        combination_count: combination_count(&request.input.options),
        issues,
    })
}

// =============================================================================
// Autocomplete
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    pub option_type: String,
    #[serde(default)]
    pub input: String,
    pub product_id: Option<String>,
}

#[instrument(skip(state, _shop))]
async fn autocomplete(
    RequireShop(_shop): RequireShop,
    State(state): State<AppState>,
    Query(query): Query<AutocompleteQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let axis = Axis::from_option_name(&query.option_type)
        .ok_or_else(|| AppError::BadRequest("Unknown option type".to_string()))?;
    if query.input.trim().is_empty() {
        return Ok(Json(json!({ "success": true, "suggestions": [] })));
    }

    let client = state.shopify();
    let mut existing: Vec<String> = Vec::new();
    if let Some(id) = query.product_id.as_deref().filter(|id| !id.trim().is_empty())
        && let Some(config) = client.get_product_configuration(id).await?
    {
        existing.extend(config.stored_options().values(axis).iter().cloned());
    }
    let store = StoreOptionValues::collect(&client.product_options(OPTION_SCAN_LIMIT).await?);
    for value in store.values(axis) {
        if !existing.iter().any(|e| e.eq_ignore_ascii_case(value)) {
            existing.push(value.clone());
        }
    }

    let label = axis.option_name().to_lowercase();
    let suggestions = filter_suggestions(&query.input, &existing, common_suggestions(axis), &label);
    Ok(Json(json!({ "success": true, "suggestions": suggestions })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_form_options_split_and_clean() {
        let form = SetupForm {
            action: Some(GENERATE_VARIANTS.to_string()),
            colors: "Red, Blue,,red".to_string(),
            sizes: "S,M".to_string(),
            ..SetupForm::default()
        };
        let options = form.options();
        assert_eq!(options.colors, ["Red", "Blue"]);
        assert_eq!(options.sizes, ["S", "M"]);
        assert!(options.decorations.is_empty());
    }

    #[test]
    fn test_form_requires_title_when_creating() {
        let form = SetupForm {
            is_creating_product: Some("true".to_string()),
            colors: "Red".to_string(),
            ..SetupForm::default()
        };
        let err = form.request().err().map(|e| e.user_message());
        assert_eq!(
            err.as_deref(),
            Some("Product title is required when creating a new product.")
        );
    }

    #[test]
    fn test_validation_error_is_bad_request() {
        let response = wizard_response(Err(WizardError::Validation("nope".to_string())));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validate_request_defaults_to_review_step() {
        let request: ValidateRequest =
            serde_json::from_value(json!({ "colors": ["Red"], "price": "10" }))
                .unwrap();
        assert_eq!(request.step, 4);
        assert_eq!(request.input.options.colors, ["Red"]);
    }
}
