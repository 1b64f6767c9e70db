//! Customer-facing design pages served through the app proxy.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use product_configurator_core::DesignStatus;

use crate::error::AppError;
use crate::services::{Design, Side};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/apps/my-designs", get(my_designs))
        .route("/apps/proof/{id}", get(proof).post(respond_to_proof))
}

/// A design in the customer's list.
#[derive(Debug, Clone)]
pub struct DesignItem {
    pub id: String,
    pub status_label: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct MyDesignsQuery {
    #[serde(default)]
    pub email: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "proxy/my_designs.html")]
pub struct MyDesignsTemplate {
    pub email: String,
    pub items: Vec<DesignItem>,
}

/// Designs owned by `email`; a blank email matches nothing.
fn owned_by(designs: Vec<Design>, email: &str) -> Vec<Design> {
    if email.trim().is_empty() {
        return Vec::new();
    }
    designs.into_iter().filter(|d| d.belongs_to(email)).collect()
}

#[instrument(skip_all)]
async fn my_designs(
    State(state): State<AppState>,
    Query(query): Query<MyDesignsQuery>,
) -> Result<MyDesignsTemplate, AppError> {
    let designs = if query.email.trim().is_empty() {
        Vec::new()
    } else {
        owned_by(state.designs().list_designs().await?, &query.email)
    };
    Ok(MyDesignsTemplate {
        items: designs
            .iter()
            .map(|d| DesignItem {
                id: d.id.clone(),
                status_label: d.status.label(),
            })
            .collect(),
        email: query.email.trim().to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct ProofSide {
    pub name: &'static str,
    pub file_id: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "proxy/proof.html")]
pub struct ProofTemplate {
    pub id: String,
    pub status_label: &'static str,
    pub sides: Vec<ProofSide>,
    pub can_respond: bool,
    pub notice: Option<String>,
}

impl ProofTemplate {
    fn new(design: &Design, notice: Option<String>) -> Self {
        Self {
            id: design.id.clone(),
            status_label: design.status.label(),
            sides: Side::ALL
                .into_iter()
                .map(|side| ProofSide {
                    name: side.as_str(),
                    file_id: design.files.get(side).unwrap_or_default().to_string(),
                })
                .collect(),
            can_respond: design.status == DesignStatus::Pending,
            notice,
        }
    }
}

async fn load_design(state: &AppState, id: &str) -> Result<Design, AppError> {
    state
        .designs()
        .get_design(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Design not found".to_string()))
}

#[instrument(skip(state))]
async fn proof(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ProofTemplate, AppError> {
    Ok(ProofTemplate::new(&load_design(&state, &id).await?, None))
}

#[derive(Debug, Deserialize)]
pub struct ProofResponse {
    pub status: Option<String>,
    pub message: Option<String>,
}

/// Customers may only approve or reject a proof.
fn customer_decision(status: Option<&str>) -> Result<DesignStatus, AppError> {
    let status = status
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing status".to_string()))?;
    match status.parse() {
        Ok(decision @ (DesignStatus::Approved | DesignStatus::Rejected)) => Ok(decision),
        _ => Err(AppError::BadRequest("Invalid status".to_string())),
    }
}

#[instrument(skip(state, form))]
async fn respond_to_proof(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ProofResponse>,
) -> Result<ProofTemplate, AppError> {
    let decision = customer_decision(form.status.as_deref())?;
    let design = state
        .designs()
        .set_design_status(&id, decision, form.message.as_deref())
        .await?;
    let notice = match decision {
        DesignStatus::Approved => "Thanks! Your design has been approved.",
        _ => "Your feedback has been sent to the shop.",
    };
    Ok(ProofTemplate::new(&design, Some(notice.to_string())))
}
