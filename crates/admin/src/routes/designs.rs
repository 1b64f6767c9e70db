//! Design review pages in the embedded admin.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::Redirect,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use product_configurator_core::{DesignStatus, MetaobjectGid};

use crate::error::AppError;
use crate::middleware::RequireShop;
use crate::services::{Design, Side};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/designs", get(index))
        .route("/designs/{id}", get(show).post(update))
}

/// Row of the review list.
#[derive(Debug, Clone)]
pub struct DesignRow {
    pub id: String,
    pub handle: String,
    pub customer_email: String,
    pub decoration: String,
    pub status: String,
    pub status_label: &'static str,
    pub updated_at: String,
}

impl From<&Design> for DesignRow {
    fn from(design: &Design) -> Self {
        Self {
            id: design.id.clone(),
            handle: design.handle.clone(),
            customer_email: design.customer_email.clone().unwrap_or_default(),
            decoration: design.decoration.clone().unwrap_or_default(),
            status: design.status.to_string(),
            status_label: design.status.label(),
            updated_at: design.updated_at.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub status: Option<String>,
}

/// Keep designs whose status matches `filter` (any case); blank keeps all.
fn filter_by_status(designs: Vec<Design>, filter: Option<&str>) -> Vec<Design> {
    match filter.map(str::trim).filter(|f| !f.is_empty()) {
        Some(filter) => designs
            .into_iter()
            .filter(|d| d.status.as_str().eq_ignore_ascii_case(filter))
            .collect(),
        None => designs,
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "designs/index.html")]
pub struct DesignsIndexTemplate {
    pub api_key: String,
    pub designs: Vec<DesignRow>,
    pub statuses: Vec<&'static str>,
    pub current_status: String,
}

#[instrument(skip(state, _shop))]
async fn index(
    RequireShop(_shop): RequireShop,
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Result<DesignsIndexTemplate, AppError> {
    let designs = filter_by_status(state.designs().list_designs().await?, query.status.as_deref());

    Ok(DesignsIndexTemplate {
        api_key: state.config().shopify.api_key.clone(),
        designs: designs.iter().map(DesignRow::from).collect(),
        statuses: DesignStatus::ALL.iter().map(|s| s.as_str()).collect(),
        current_status: query.status.unwrap_or_default(),
    })
}

/// One side's artwork on the detail page.
#[derive(Debug, Clone)]
pub struct SideView {
    pub name: &'static str,
    pub file_id: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "designs/show.html")]
pub struct DesignShowTemplate {
    pub api_key: String,
    pub design: DesignRow,
    pub product_id: String,
    pub notes: String,
    pub sides: Vec<SideView>,
    pub next_statuses: Vec<&'static str>,
}

fn design_gid(id: &str) -> Result<MetaobjectGid, AppError> {
    MetaobjectGid::parse(id).map_err(|e| AppError::BadRequest(e.to_string()))
}

#[instrument(skip(state, _shop))]
async fn show(
    RequireShop(_shop): RequireShop,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<DesignShowTemplate, AppError> {
    let gid = design_gid(&id)?;
    let design = state
        .designs()
        .get_design(gid.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound("Design not found".to_string()))?;

    let sides = Side::ALL
        .into_iter()
        .filter_map(|side| {
            design.files.get(side).map(|file_id| SideView {
                name: side.as_str(),
                file_id: file_id.to_string(),
            })
        })
        .collect();

    Ok(DesignShowTemplate {
        api_key: state.config().shopify.api_key.clone(),
        product_id: design.product_id.clone().unwrap_or_default(),
        notes: design.notes.clone().unwrap_or_default(),
        next_statuses: design
            .status
            .allowed_transitions()
            .iter()
            .map(|s| s.as_str())
            .collect(),
        design: DesignRow::from(&design),
        sides,
    })
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
    pub notes: Option<String>,
}

#[instrument(skip(state, shop, form), fields(shop = %shop.shop))]
async fn update(
    RequireShop(shop): RequireShop,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect, AppError> {
    let gid = design_gid(&id)?;
    let status: DesignStatus = form
        .status
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid status".to_string()))?;

    state
        .designs()
        .set_design_status(gid.as_str(), status, form.notes.as_deref())
        .await?;

    Ok(Redirect::to(&format!(
        "/designs/{}",
        urlencoding::encode(gid.as_str())
    )))
}
