//! Design metaobject endpoints for the storefront designer.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{instrument, warn};

use product_configurator_core::{DesignStatus, Email};

use super::ProxyJson;
use super::files::{SideImages, side_payloads, upload_checked};
use crate::db::CustomerDesignRepository;
use crate::error::AppError;
use crate::models::{CustomerDesignUpdate, DesignFiles, NewCustomerDesign};
use crate::services::fees::load_fee_maps;
use crate::services::{Design, NewDesign, Side, SideFiles};
use crate::shopify::CreatedFile;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/designs/create", post(create))
        .route("/api/designs/configuration", get(read_configuration).post(save_configuration))
        .route("/api/designs/status", post(set_status))
        .route("/api/designs/files", post(attach_files))
        .route("/api/fee-maps", get(fee_maps))
}

/// Design fields posted by the designer.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRequest {
    #[serde(alias = "productGID")]
    pub product_id: Option<String>,
    pub product_title: Option<String>,
    pub customer_id: Option<String>,
    pub customer_email: Option<String>,
    pub design_name: Option<String>,
    pub decoration: Option<String>,
    pub notes: Option<String>,
    pub transforms: Option<Value>,
    pub quantities: Option<Value>,
    #[serde(default)]
    pub images: SideImages,
    #[serde(default)]
    pub filenames: SideImages,
}

impl DesignRequest {
    fn email(&self) -> Result<Option<Email>, AppError> {
        self.customer_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(|e| Email::parse(e).map_err(|err| AppError::BadRequest(err.to_string())))
            .transpose()
    }

    fn new_design(&self, status: DesignStatus) -> Result<NewDesign, AppError> {
        Ok(NewDesign {
            product_id: self.product_id.clone(),
            customer_email: self.email()?.map(String::from),
            status: Some(status),
            decoration: self.decoration.clone(),
            notes: self.notes.clone(),
            files: SideFiles::default(),
            transforms: None,
        })
    }
}

#[instrument(skip_all)]
async fn create(
    State(state): State<AppState>,
    ProxyJson(request): ProxyJson<DesignRequest>,
) -> Result<Json<Value>, AppError> {
    let design = state
        .designs()
        .create_design(&request.new_design(DesignStatus::Pending)?)
        .await?;
    Ok(Json(json!({
        "success": true,
        "id": design.id,
        "handle": design.handle,
        "type": crate::services::designs::DESIGN_TYPE,
        "status": design.status,
    })))
}

/// Upload each side image and return the created files.
async fn upload_sides(
    state: &AppState,
    images: &SideImages,
    filenames: &SideImages,
) -> Result<BTreeMap<Side, CreatedFile>, AppError> {
    let mut uploaded = BTreeMap::new();
    for (side, file) in side_payloads(images, filenames)? {
        let created = upload_checked(state, file, Some(side.as_str())).await?;
        uploaded.insert(side, created);
    }
    Ok(uploaded)
}

fn side_files(uploaded: &BTreeMap<Side, CreatedFile>) -> SideFiles {
    let mut files = SideFiles::default();
    for (side, file) in uploaded {
        files.set(*side, file.id.clone());
    }
    files
}

impl From<&SideFiles> for DesignFiles {
    fn from(files: &SideFiles) -> Self {
        let id = |side| files.get(side).map(ToString::to_string);
        Self {
            front_file_id: id(Side::Front),
            back_file_id: id(Side::Back),
            left_file_id: id(Side::Left),
            right_file_id: id(Side::Right),
        }
    }
}

/// Create a draft design metaobject with a matching customer row, then
/// attach any uploaded images to both.
#[instrument(skip_all)]
async fn save_configuration(
    State(state): State<AppState>,
    ProxyJson(request): ProxyJson<DesignRequest>,
) -> Result<Json<Value>, AppError> {
    let design = state
        .designs()
        .create_design(&request.new_design(DesignStatus::Draft)?)
        .await?;

    let repo = CustomerDesignRepository::new(state.pool());
    let row = NewCustomerDesign {
        id: Some(design.id.clone()),
        customer_id: request.customer_id.clone(),
        customer_email: request.email()?,
        product_id: request.product_id.clone(),
        product_title: request.product_title.clone(),
        design_name: request.design_name.clone(),
        decoration_type: request
            .decoration
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| crate::models::customer_design::DEFAULT_DECORATION_TYPE.to_string()),
        transforms: request.transforms.clone().filter(|t| !t.is_null()),
        quantities: request.quantities.clone().filter(|q| !q.is_null()),
        notes: request.notes.clone(),
        ..NewCustomerDesign::default()
    };
    if let Err(e) = repo.create(row).await {
        // Row is best effort; the metaobject already exists.
        warn!(error = %e, design_id = %design.id, "Failed to store customer design row");
    }

    let uploaded = upload_sides(&state, &request.images, &request.filenames).await?;
    let files = side_files(&uploaded);
    if !files.is_empty() || request.transforms.is_some() {
        state
            .designs()
            .update_design_files(&design.id, &files, request.transforms.as_ref())
            .await?;
    }
    if !files.is_empty() {
        let update = CustomerDesignUpdate {
            files: DesignFiles::from(&files),
            ..CustomerDesignUpdate::default()
        };
        if let Err(e) = repo.update(&design.id, update).await {
            warn!(error = %e, design_id = %design.id, "Failed to store design files on row");
        }
    }

    Ok(Json(json!({
        "success": true,
        "designId": design.id,
        "designHandle": design.handle,
        "files": uploaded,
        "message": "Design configuration saved successfully",
    })))
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[instrument(skip_all)]
async fn read_configuration(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Value>, AppError> {
    let id = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Design ID is required".to_string()))?;
    let design = CustomerDesignRepository::new(state.pool())
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Design not found".to_string()))?;
    Ok(Json(json!({ "success": true, "design": design })))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub id: String,
    pub status: String,
    pub message: Option<String>,
}

#[instrument(skip_all, fields(design_id = %request.id, status = %request.status))]
async fn set_status(
    State(state): State<AppState>,
    ProxyJson(request): ProxyJson<StatusRequest>,
) -> Result<Json<Value>, AppError> {
    let status: DesignStatus = request
        .status
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid status".to_string()))?;
    let design: Design = state
        .designs()
        .set_design_status(&request.id, status, request.message.as_deref())
        .await?;
    Ok(Json(json!({ "success": true, "status": design.status })))
}

#[derive(Debug, Deserialize)]
pub struct FilesRequest {
    pub id: String,
    #[serde(default)]
    pub images: SideImages,
    #[serde(default)]
    pub filenames: SideImages,
    pub transforms: Option<Value>,
}

#[instrument(skip_all, fields(design_id = %request.id))]
async fn attach_files(
    State(state): State<AppState>,
    ProxyJson(request): ProxyJson<FilesRequest>,
) -> Result<Json<Value>, AppError> {
    let uploaded = upload_sides(&state, &request.images, &request.filenames).await?;
    state
        .designs()
        .update_design_files(
            &request.id,
            &side_files(&uploaded),
            request.transforms.as_ref().filter(|t| !t.is_null()),
        )
        .await?;
    Ok(Json(json!({ "success": true, "files": uploaded })))
}

#[instrument(skip_all)]
async fn fee_maps(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let maps = load_fee_maps(state.shopify()).await?;
    Ok(Json(json!({
        "success": true,
        "screenprint": maps.screenprint,
        "embroidery": maps.embroidery,
        "tiers": maps.tiers,
    })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_product_gid_alias() {
        let request: DesignRequest = serde_json::from_value(json!({
            "productGID": "gid://shopify/Product/7",
            "customerEmail": "Jane@Example.com",
            "images": { "front": "data:image/png;base64,aGk=" },
        }))
        .unwrap();
        assert_eq!(request.product_id.as_deref(), Some("gid://shopify/Product/7"));
        assert!(request.images.get(Side::Front).is_some());

        let design = request
            .new_design(DesignStatus::Draft)
            .unwrap();
        assert_eq!(design.status, Some(DesignStatus::Draft));
        assert_eq!(design.customer_email.as_deref(), Some("Jane@Example.com"));
    }

    #[test]
    fn test_side_files_to_row_files() {
        let mut uploaded = BTreeMap::new();
        uploaded.insert(
            Side::Back,
            CreatedFile {
                id: "gid://shopify/GenericFile/2".to_string(),
                url: None,
            },
        );
        let files = side_files(&uploaded);
        let row = DesignFiles::from(&files);
        assert_eq!(row.back_file_id.as_deref(), Some("gid://shopify/GenericFile/2"));
        assert!(row.front_file_id.is_none());
    }
}
