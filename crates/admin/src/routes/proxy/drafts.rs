//! Customer design rows: drafts, saved designs and the saved-design list.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use product_configurator_core::{DesignStatus, Email};

use super::ProxyJson;
use crate::db::CustomerDesignRepository;
use crate::error::AppError;
use crate::models::{
    CustomerDesign, CustomerDesignFilter, CustomerDesignUpdate, DesignFiles, NewCustomerDesign,
    customer_design::DEFAULT_DECORATION_TYPE,
};
use crate::services::fixtures;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/designs/draft", get(read_draft).post(write_draft))
        .route("/api/designs/save", axum::routing::post(save))
        .route("/api/customer-designs", get(customer_designs))
}

/// Design row fields as the storefront posts them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignBody {
    pub action: Option<String>,
    pub id: Option<String>,
    pub design_id: Option<String>,
    pub customer_id: Option<String>,
    pub customer_email: Option<String>,
    pub product_id: Option<String>,
    pub product_title: Option<String>,
    pub design_name: Option<String>,
    pub decoration_type: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub files: DesignFiles,
    pub transforms: Option<Value>,
    pub quantities: Option<Value>,
}

/// `None` for missing or blank strings.
fn present(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn non_null(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}

impl DesignBody {
    fn email(&self) -> Result<Option<Email>, AppError> {
        present(self.customer_email.as_ref())
            .map(|e| Email::parse(&e).map_err(|err| AppError::BadRequest(err.to_string())))
            .transpose()
    }

    fn status(&self) -> Result<Option<DesignStatus>, AppError> {
        present(self.status.as_ref())
            .map(|s| {
                s.parse()
                    .map_err(|_| AppError::BadRequest("Invalid status".to_string()))
            })
            .transpose()
    }

    fn files(&self) -> DesignFiles {
        DesignFiles {
            front_file_id: present(self.files.front_file_id.as_ref()),
            back_file_id: present(self.files.back_file_id.as_ref()),
            left_file_id: present(self.files.left_file_id.as_ref()),
            right_file_id: present(self.files.right_file_id.as_ref()),
        }
    }

    /// New row; only `status` is taken from `forced_status` when given.
    fn new_row(
        &self,
        id: Option<String>,
        forced_status: Option<DesignStatus>,
    ) -> Result<NewCustomerDesign, AppError> {
        let status = match forced_status {
            Some(status) => status,
            None => self.status()?.unwrap_or(DesignStatus::Draft),
        };
        Ok(NewCustomerDesign {
            id,
            customer_id: present(self.customer_id.as_ref()),
            customer_email: self.email()?,
            product_id: present(self.product_id.as_ref()),
            product_title: present(self.product_title.as_ref()),
            design_name: present(self.design_name.as_ref()),
            decoration_type: present(self.decoration_type.as_ref())
                .unwrap_or_else(|| DEFAULT_DECORATION_TYPE.to_string()),
            status,
            notes: present(self.notes.as_ref()),
            files: self.files(),
            transforms: non_null(self.transforms.as_ref()),
            quantities: non_null(self.quantities.as_ref()),
        })
    }

    fn update(&self) -> Result<CustomerDesignUpdate, AppError> {
        Ok(CustomerDesignUpdate {
            customer_id: present(self.customer_id.as_ref()),
            customer_email: self.email()?,
            product_id: present(self.product_id.as_ref()),
            product_title: present(self.product_title.as_ref()),
            design_name: present(self.design_name.as_ref()),
            decoration_type: present(self.decoration_type.as_ref()),
            status: self.status()?,
            notes: present(self.notes.as_ref()),
            files: self.files(),
            transforms: non_null(self.transforms.as_ref()),
            quantities: non_null(self.quantities.as_ref()),
        })
    }
}

/// Apply `update` to row `id`, checking a status change against the
/// workflow first.
///
/// The write only lands if the status is still the one that was checked.
async fn update_row(
    repo: &CustomerDesignRepository<'_>,
    id: &str,
    update: CustomerDesignUpdate,
) -> Result<CustomerDesign, AppError> {
    let Some(requested) = update.status else {
        return Ok(repo.update(id, update).await?);
    };
    let current = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Design not found".to_string()))?;
    if current.status != requested {
        current.status.transition(requested)?;
    }
    Ok(repo.update_if_status(id, current.status, update).await?)
}

#[instrument(skip_all, fields(action = ?body.action))]
async fn write_draft(
    State(state): State<AppState>,
    ProxyJson(body): ProxyJson<DesignBody>,
) -> Result<Json<Value>, AppError> {
    let repo = CustomerDesignRepository::new(state.pool());

    match body.action.as_deref() {
        Some("create") => {
            let design = repo
                .create(body.new_row(None, Some(DesignStatus::Draft))?)
                .await?;
            Ok(Json(json!({
                "success": true,
                "design": design,
                "message": "Draft saved successfully",
            })))
        }
        Some("update") => {
            let id = present(body.id.as_ref()).ok_or_else(|| {
                AppError::BadRequest("Design ID is required for update".to_string())
            })?;
            let design = update_row(&repo, &id, body.update()?).await?;
            Ok(Json(json!({
                "success": true,
                "design": design,
                "message": "Draft updated successfully",
            })))
        }
        Some("delete") => {
            let id = present(body.id.as_ref()).ok_or_else(|| {
                AppError::BadRequest("Design ID is required for deletion".to_string())
            })?;
            repo.delete(&id).await?;
            Ok(Json(json!({
                "success": true,
                "message": "Draft deleted successfully",
            })))
        }
        _ => Err(AppError::BadRequest("Invalid action specified".to_string())),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftQuery {
    pub action: Option<String>,
    pub id: Option<String>,
    pub customer_id: Option<String>,
    pub customer_email: Option<String>,
}

impl DraftQuery {
    /// Filter for a customer's rows; at least one of id or email is needed.
    fn customer_filter(&self) -> Result<CustomerDesignFilter, AppError> {
        let customer_id = present(self.customer_id.as_ref());
        let customer_email = present(self.customer_email.as_ref());
        if customer_id.is_none() && customer_email.is_none() {
            return Err(AppError::BadRequest(
                "Customer ID or email is required".to_string(),
            ));
        }
        Ok(CustomerDesignFilter {
            customer_id,
            customer_email,
            ..CustomerDesignFilter::default()
        })
    }
}

#[instrument(skip_all, fields(action = ?query.action))]
async fn read_draft(
    State(state): State<AppState>,
    Query(query): Query<DraftQuery>,
) -> Result<Json<Value>, AppError> {
    let repo = CustomerDesignRepository::new(state.pool());

    match query.action.as_deref().unwrap_or("list") {
        "get" => {
            let id = present(query.id.as_ref())
                .ok_or_else(|| AppError::BadRequest("Design ID is required".to_string()))?;
            let design = repo
                .get(&id)
                .await?
                .ok_or_else(|| AppError::NotFound("Design not found".to_string()))?;
            Ok(Json(json!({ "success": true, "design": design })))
        }
        "list" => {
            let filter = CustomerDesignFilter {
                status: Some(DesignStatus::Draft),
                ..query.customer_filter()?
            };
            let designs = repo.list(&filter).await?;
            Ok(Json(json!({ "success": true, "designs": designs })))
        }
        _ => Err(AppError::BadRequest("Invalid action specified".to_string())),
    }
}

#[instrument(skip_all)]
async fn save(
    State(state): State<AppState>,
    ProxyJson(body): ProxyJson<DesignBody>,
) -> Result<Json<Value>, AppError> {
    let repo = CustomerDesignRepository::new(state.pool());

    if let Some(id) = present(body.design_id.as_ref()) {
        let design = update_row(&repo, &id, body.update()?).await?;
        Ok(Json(json!({
            "success": true,
            "design": design,
            "message": "Design updated successfully",
        })))
    } else {
        let design = repo.create(body.new_row(None, None)?).await?;
        Ok(Json(json!({
            "success": true,
            "design": design,
            "message": "Design saved successfully",
        })))
    }
}

#[instrument(skip_all)]
async fn customer_designs(
    State(state): State<AppState>,
    Query(query): Query<DraftQuery>,
) -> Result<Json<Value>, AppError> {
    let filter = query.customer_filter()?;
    if state.fixture_mode() {
        return Ok(Json(json!({
            "success": true,
            "designs": fixtures::customer_designs(),
        })));
    }

    let designs = CustomerDesignRepository::new(state.pool())
        .list(&filter)
        .await?;
    Ok(Json(json!({ "success": true, "designs": designs })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn body(value: Value) -> DesignBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_new_row_defaults() {
        let row = body(json!({
            "action": "create",
            "customerEmail": " jane@example.com ",
            "productId": "gid://shopify/Product/1",
            "decorationType": "",
            "transforms": null,
            "frontFileId": "gid://shopify/GenericFile/9",
        }))
        .new_row(None, Some(DesignStatus::Draft))
        .unwrap();

        assert_eq!(row.decoration_type, "Screenprint");
        assert_eq!(row.status, DesignStatus::Draft);
        assert_eq!(row.customer_email.as_ref().map(Email::as_str), Some("jane@example.com"));
        assert_eq!(row.files.front_file_id.as_deref(), Some("gid://shopify/GenericFile/9"));
        assert!(row.transforms.is_none());
    }

    #[test]
    fn test_invalid_email_and_status_rejected() {
        let bad_email = body(json!({ "customerEmail": "nope" })).new_row(None, None);
        assert!(matches!(bad_email, Err(AppError::BadRequest(_))));

        let bad_status = body(json!({ "status": "shipped" })).update();
        assert!(matches!(bad_status, Err(AppError::BadRequest(m)) if m == "Invalid status"));
    }

    #[test]
    fn test_save_keeps_requested_status() {
        let row = body(json!({ "status": "pending" }))
            .new_row(None, None)
            .unwrap();
        assert_eq!(row.status, DesignStatus::Pending);
    }

    #[test]
    fn test_customer_filter_requires_id_or_email() {
        let query = DraftQuery {
            action: None,
            id: None,
            customer_id: Some(" ".to_string()),
            customer_email: None,
        };
        assert!(matches!(
            query.customer_filter(),
            Err(AppError::BadRequest(m)) if m == "Customer ID or email is required"
        ));

        let query = DraftQuery {
            customer_email: Some("jane@example.com".to_string()),
            ..query
        };
        let filter = query.customer_filter().unwrap();
        assert_eq!(filter.customer_email.as_deref(), Some("jane@example.com"));
        assert_eq!(filter.limit, 50);
    }
}
