//! Customer design metaobjects.
//!
//! A design is a Shopify metaobject of type `design`. Status changes go
//! through [`DesignStatus::transition`], and every change that reaches a
//! customer-visible status sends the matching email. Email failures are
//! logged and never fail the operation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use product_configurator_core::DesignStatus;

use super::notifications::{DesignNotice, NotificationKind, Notifier, ShopContext};
use super::settings::{AppSettings, SettingsStore};
use crate::error::AppError;
use crate::shopify::{
    AdminClient, AdminShopifyError, FieldDefinitionInput, Metaobject, MetaobjectDefinition,
    MetaobjectDefinitionInput, MetaobjectFieldInput,
};

/// Metaobject type holding designs.
pub const DESIGN_TYPE: &str = "design";

/// How many designs list views fetch.
pub const DESIGN_LIST_LIMIT: i64 = 100;

/// Side of a garment a design file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Self; 4] = [Self::Front, Self::Back, Self::Left, Self::Right];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Metaobject field holding this side's file.
    #[must_use]
    pub const fn field_key(self) -> &'static str {
        match self {
            Self::Front => "front_file",
            Self::Back => "back_file",
            Self::Left => "left_file",
            Self::Right => "right_file",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|side| side.as_str() == lower)
            .ok_or_else(|| format!("Unknown side: {s}"))
    }
}

/// File GIDs per side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideFiles {
    pub front: Option<String>,
    pub back: Option<String>,
    pub left: Option<String>,
    pub right: Option<String>,
}

impl SideFiles {
    #[must_use]
    pub fn get(&self, side: Side) -> Option<&str> {
        match side {
            Side::Front => self.front.as_deref(),
            Side::Back => self.back.as_deref(),
            Side::Left => self.left.as_deref(),
            Side::Right => self.right.as_deref(),
        }
    }

    pub fn set(&mut self, side: Side, file_id: String) {
        let slot = match side {
            Side::Front => &mut self.front,
            Side::Back => &mut self.back,
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        *slot = Some(file_id);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        Side::ALL.into_iter().all(|side| self.get(side).is_none())
    }

    fn field_inputs(&self) -> impl Iterator<Item = MetaobjectFieldInput> + '_ {
        Side::ALL.into_iter().filter_map(|side| {
            self.get(side)
                .map(|id| MetaobjectFieldInput::new(side.field_key(), id))
        })
    }
}

/// Definition registered for [`DESIGN_TYPE`].
#[must_use]
pub fn design_definition() -> MetaobjectDefinitionInput {
    MetaobjectDefinitionInput {
        kind: DESIGN_TYPE.to_string(),
        name: "Design".to_string(),
        field_definitions: vec![
            FieldDefinitionInput::new("product", "Product", "product_reference"),
            FieldDefinitionInput::new("customer_email", "Customer Email", "single_line_text_field"),
            FieldDefinitionInput::new("status", "Status", "single_line_text_field"),
            FieldDefinitionInput::new("decoration", "Decoration", "single_line_text_field"),
            FieldDefinitionInput::new("notes", "Notes", "multi_line_text_field"),
            FieldDefinitionInput::new("front_file", "Front File", "file_reference"),
            FieldDefinitionInput::new("back_file", "Back File", "file_reference"),
            FieldDefinitionInput::new("left_file", "Left File", "file_reference"),
            FieldDefinitionInput::new("right_file", "Right File", "file_reference"),
            FieldDefinitionInput::new("transforms", "Transforms", "json"),
        ],
    }
}

/// A design as read back from its metaobject.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub id: String,
    pub handle: String,
    pub product_id: Option<String>,
    pub customer_email: Option<String>,
    /// `pending` when the stored value is missing or unknown.
    pub status: DesignStatus,
    pub decoration: Option<String>,
    pub notes: Option<String>,
    pub files: SideFiles,
    pub transforms: Option<serde_json::Value>,
    pub updated_at: Option<String>,
}

impl From<Metaobject> for Design {
    fn from(object: Metaobject) -> Self {
        let text = |key: &str| {
            object
                .field(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
        };
        let mut files = SideFiles::default();
        for side in Side::ALL {
            if let Some(id) = text(side.field_key()) {
                files.set(side, id);
            }
        }

        Self {
            product_id: text("product"),
            customer_email: text("customer_email"),
            status: object
                .field("status")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DesignStatus::Pending),
            decoration: text("decoration"),
            notes: text("notes"),
            transforms: object
                .field("transforms")
                .and_then(|t| serde_json::from_str(t).ok()),
            files,
            id: object.id,
            handle: object.handle,
            updated_at: object.updated_at,
        }
    }
}

impl Design {
    /// Whether the design belongs to `email` (case-insensitive).
    #[must_use]
    pub fn belongs_to(&self, email: &str) -> bool {
        self.customer_email
            .as_deref()
            .is_some_and(|e| e.trim().eq_ignore_ascii_case(email.trim()))
    }

    fn notice(&self, message: Option<&str>) -> Option<DesignNotice> {
        self.customer_email.as_ref().map(|email| DesignNotice {
            design_gid: self.id.clone(),
            handle: Some(self.handle.clone()),
            customer_email: email.clone(),
            message: message.map(ToString::to_string),
        })
    }
}

/// A design to create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDesign {
    pub product_id: Option<String>,
    pub customer_email: Option<String>,
    /// Defaults to `pending`.
    pub status: Option<DesignStatus>,
    pub decoration: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub files: SideFiles,
    pub transforms: Option<serde_json::Value>,
}

impl NewDesign {
    /// Status the design is stored with, after auto-approval.
    fn initial_status(&self, settings: &AppSettings) -> DesignStatus {
        let status = self.status.unwrap_or(DesignStatus::Pending);
        if status == DesignStatus::Pending && settings.auto_approve_designs {
            status.transition(DesignStatus::Approved).unwrap_or(status)
        } else {
            status
        }
    }

    /// Fields for `metaobjectCreate`; unset values are left out.
    fn field_inputs(&self, status: DesignStatus) -> Vec<MetaobjectFieldInput> {
        let optional = [
            ("product", &self.product_id),
            ("customer_email", &self.customer_email),
            ("decoration", &self.decoration),
            ("notes", &self.notes),
        ];

        let mut fields: Vec<MetaobjectFieldInput> = optional
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| MetaobjectFieldInput::new(key, v))
            })
            .collect();
        fields.push(MetaobjectFieldInput::new("status", status.as_str()));
        fields.extend(self.files.field_inputs());
        if let Some(transforms) = &self.transforms {
            fields.push(MetaobjectFieldInput::new("transforms", transforms.to_string()));
        }
        fields
    }
}

/// Design metaobject operations with notifications.
#[derive(Clone)]
pub struct DesignService {
    client: AdminClient,
    settings: SettingsStore,
    notifier: Notifier,
    storefront_domain: String,
}

impl DesignService {
    #[must_use]
    pub const fn new(
        client: AdminClient,
        settings: SettingsStore,
        notifier: Notifier,
        storefront_domain: String,
    ) -> Self {
        Self {
            client,
            settings,
            notifier,
            storefront_domain,
        }
    }

    /// Register the `design` metaobject definition unless it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if Shopify cannot be read or rejects the definition.
    #[instrument(skip(self))]
    pub async fn ensure_definition(&self) -> Result<MetaobjectDefinition, AdminShopifyError> {
        if let Some(existing) = self.client.get_metaobject_definition(DESIGN_TYPE).await? {
            return Ok(existing);
        }
        let created = self
            .client
            .create_metaobject_definition(design_definition())
            .await?;
        info!(definition_id = %created.id, "Created design metaobject definition");
        Ok(created)
    }

    /// Create a design and tell the customer and the shop about it.
    ///
    /// # Errors
    ///
    /// Returns an error if Shopify rejects the metaobject.
    #[instrument(skip(self, design))]
    pub async fn create_design(&self, design: &NewDesign) -> Result<Design, AppError> {
        let settings = self.settings.load().await?;
        let status = design.initial_status(&settings);

        let created: Design = self
            .client
            .create_metaobject(DESIGN_TYPE, design.field_inputs(status))
            .await?
            .into();
        info!(design_id = %created.id, status = %status, "Design created");

        if status != DesignStatus::Draft {
            self.notify_submission(&created, status, &settings).await;
        }
        Ok(created)
    }

    /// Attach files and placement transforms to a design.
    ///
    /// # Errors
    ///
    /// Returns an error if Shopify rejects the update.
    #[instrument(skip(self, files, transforms))]
    pub async fn update_design_files(
        &self,
        id: &str,
        files: &SideFiles,
        transforms: Option<&serde_json::Value>,
    ) -> Result<Design, AppError> {
        let mut fields: Vec<MetaobjectFieldInput> = files.field_inputs().collect();
        if let Some(transforms) = transforms {
            fields.push(MetaobjectFieldInput::new("transforms", transforms.to_string()));
        }
        if fields.is_empty() {
            return Err(AppError::BadRequest("No files provided".to_string()));
        }

        Ok(self.client.update_metaobject(id, fields).await?.into())
    }

    /// Fetch one design.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_design(&self, id: &str) -> Result<Option<Design>, AdminShopifyError> {
        Ok(self.client.get_metaobject(id).await?.map(Design::from))
    }

    /// Most recently updated designs.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn list_designs(&self) -> Result<Vec<Design>, AdminShopifyError> {
        Ok(self
            .client
            .list_metaobjects(DESIGN_TYPE, DESIGN_LIST_LIMIT)
            .await?
            .into_iter()
            .map(Design::from)
            .collect())
    }

    /// Move a design to `requested`, storing `message` as its notes.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown design, `Transition` when the
    /// workflow does not allow the move, or the Shopify error.
    #[instrument(skip(self, message))]
    pub async fn set_design_status(
        &self,
        id: &str,
        requested: DesignStatus,
        message: Option<&str>,
    ) -> Result<Design, AppError> {
        let current = self
            .get_design(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Design not found".to_string()))?;
        let next = current.status.transition(requested)?;

        let mut fields = vec![MetaobjectFieldInput::new("status", next.as_str())];
        let message = message.map(str::trim).filter(|m| !m.is_empty());
        if let Some(message) = message {
            fields.push(MetaobjectFieldInput::new("notes", message));
        }

        let updated: Design = self.client.update_metaobject(id, fields).await?.into();
        info!(design_id = %id, from = %current.status, to = %next, "Design status changed");

        if let (Some(kind), Some(notice)) =
            (NotificationKind::for_status(next), updated.notice(message))
        {
            match self.shop_context().await {
                Ok((shop, settings)) if settings.customer_notifications => {
                    self.send_customer(kind, &shop, &notice).await;
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Could not load shop for design email"),
            }
        }
        Ok(updated)
    }

    async fn notify_submission(&self, design: &Design, status: DesignStatus, settings: &AppSettings) {
        let Some(notice) = design.notice(None) else {
            return;
        };
        let shop = match self.shop_context().await {
            Ok((shop, _)) => shop,
            Err(e) => {
                warn!(error = %e, "Could not load shop for design email");
                return;
            }
        };

        if settings.customer_notifications {
            let kind = NotificationKind::for_status(status).unwrap_or(NotificationKind::DesignSubmitted);
            self.send_customer(kind, &shop, &notice).await;
        }

        let admin_email = settings.notification_email.trim();
        if !admin_email.is_empty()
            && let Err(e) = self.notifier.notify_admin(admin_email, &shop, &notice).await
        {
            warn!(error = %e, design_id = %design.id, "Failed to send admin notification");
        }
    }

    async fn send_customer(&self, kind: NotificationKind, shop: &ShopContext, notice: &DesignNotice) {
        if let Err(e) = self.notifier.notify_customer(kind, shop, notice).await {
            warn!(error = %e, design_id = %notice.design_gid, "Failed to send customer notification");
        }
    }

    async fn shop_context(&self) -> Result<(ShopContext, AppSettings), AdminShopifyError> {
        let settings = self.settings.load().await?;
        let shop = self.client.shop_info().await?;
        let from = Some(settings.notification_email.trim().to_string())
            .filter(|e| !e.is_empty())
            .or(shop.email);

        Ok((
            ShopContext {
                name: shop.name,
                domain: self.storefront_domain.clone(),
                admin_domain: shop.myshopify_domain,
                from,
            },
            settings,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopify::MetaobjectField;

    fn metaobject(fields: &[(&str, &str)]) -> Metaobject {
        Metaobject {
            id: "gid://shopify/Metaobject/42".to_string(),
            handle: "design-42".to_string(),
            kind: Some(DESIGN_TYPE.to_string()),
            fields: fields
                .iter()
                .map(|(key, value)| MetaobjectField {
                    key: (*key).to_string(),
                    value: Some((*value).to_string()),
                })
                .collect(),
            updated_at: None,
        }
    }

    #[test]
    fn test_design_from_metaobject() {
        let design = Design::from(metaobject(&[
            ("customer_email", "Ana@Example.com"),
            ("status", "in_production"),
            ("back_file", "gid://shopify/MediaImage/7"),
            ("transforms", r#"{"front":{"x":10}}"#),
            ("notes", "  "),
        ]));

        assert_eq!(design.status, DesignStatus::InProduction);
        assert_eq!(design.files.back.as_deref(), Some("gid://shopify/MediaImage/7"));
        assert!(design.files.front.is_none());
        assert_eq!(design.notes, None);
        assert_eq!(
            design.transforms,
            Some(serde_json::json!({"front": {"x": 10}}))
        );
        assert!(design.belongs_to("ana@example.com "));
        assert!(!design.belongs_to("bob@example.com"));
    }

    #[test]
    fn test_unknown_status_reads_as_pending() {
        let design = Design::from(metaobject(&[("status", "archived")]));
        assert_eq!(design.status, DesignStatus::Pending);
    }

    #[test]
    fn test_new_design_fields_skip_unset_values() {
        let mut files = SideFiles::default();
        files.set(Side::Front, "gid://shopify/MediaImage/1".to_string());
        let design = NewDesign {
            customer_email: Some("ana@example.com".to_string()),
            notes: Some(String::new()),
            files,
            ..NewDesign::default()
        };

        let fields = design.field_inputs(DesignStatus::Pending);
        let keys: Vec<&str> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["customer_email", "status", "front_file"]);
    }

    #[test]
    fn test_auto_approve() {
        let design = NewDesign::default();
        let mut settings = AppSettings::default();
        assert_eq!(design.initial_status(&settings), DesignStatus::Pending);

        settings.auto_approve_designs = true;
        assert_eq!(design.initial_status(&settings), DesignStatus::Approved);

        let draft = NewDesign {
            status: Some(DesignStatus::Draft),
            ..NewDesign::default()
        };
        assert_eq!(draft.initial_status(&settings), DesignStatus::Draft);
    }

    #[test]
    fn test_definition_fields() {
        let definition = design_definition();
        assert_eq!(definition.kind, "design");
        assert_eq!(definition.field_definitions.len(), 10);
        assert!(
            definition
                .field_definitions
                .iter()
                .any(|f| f.key == "transforms" && f.kind == "json")
        );
    }

    #[test]
    fn test_side_parse() {
        assert_eq!("Front".parse::<Side>(), Ok(Side::Front));
        assert!("top".parse::<Side>().is_err());
    }
}
