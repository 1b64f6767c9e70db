//! Customer design drafts stored in `PostgreSQL`.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use product_configurator_core::{DesignStatus, Email};

/// Default decoration for drafts that do not name one.
pub const DEFAULT_DECORATION_TYPE: &str = "Screenprint";
/// Page size when a list request gives no limit.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

const ID_SUFFIX_LEN: usize = 9;

/// A customer's saved design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDesign {
    pub id: String,
    pub customer_id: Option<String>,
    pub customer_email: Option<Email>,
    pub product_id: Option<String>,
    pub product_title: Option<String>,
    pub design_name: Option<String>,
    pub decoration_type: String,
    pub status: DesignStatus,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub files: DesignFiles,
    pub transforms: Option<serde_json::Value>,
    pub quantities: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shopify file ids for each side of a design.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignFiles {
    #[serde(default)]
    pub front_file_id: Option<String>,
    #[serde(default)]
    pub back_file_id: Option<String>,
    #[serde(default)]
    pub left_file_id: Option<String>,
    #[serde(default)]
    pub right_file_id: Option<String>,
}

/// Values for a new row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomerDesign {
    /// Explicit id; generated when `None`.
    pub id: Option<String>,
    pub customer_id: Option<String>,
    pub customer_email: Option<Email>,
    pub product_id: Option<String>,
    pub product_title: Option<String>,
    pub design_name: Option<String>,
    pub decoration_type: String,
    pub status: DesignStatus,
    pub notes: Option<String>,
    pub files: DesignFiles,
    pub transforms: Option<serde_json::Value>,
    pub quantities: Option<serde_json::Value>,
}

impl Default for NewCustomerDesign {
    fn default() -> Self {
        Self {
            id: None,
            customer_id: None,
            customer_email: None,
            product_id: None,
            product_title: None,
            design_name: None,
            decoration_type: DEFAULT_DECORATION_TYPE.to_string(),
            status: DesignStatus::Draft,
            notes: None,
            files: DesignFiles::default(),
            transforms: None,
            quantities: None,
        }
    }
}

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDesignUpdate {
    pub customer_id: Option<String>,
    pub customer_email: Option<Email>,
    pub product_id: Option<String>,
    pub product_title: Option<String>,
    pub design_name: Option<String>,
    pub decoration_type: Option<String>,
    pub status: Option<DesignStatus>,
    pub notes: Option<String>,
    pub files: DesignFiles,
    pub transforms: Option<serde_json::Value>,
    pub quantities: Option<serde_json::Value>,
}

/// List filters; every set field must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDesignFilter {
    pub customer_id: Option<String>,
    pub customer_email: Option<String>,
    pub product_id: Option<String>,
    pub status: Option<DesignStatus>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for CustomerDesignFilter {
    fn default() -> Self {
        Self {
            customer_id: None,
            customer_email: None,
            product_id: None,
            status: None,
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

/// New design id: `design_{unix millis}_{9 base36 chars}`.
#[must_use]
pub fn generate_design_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .filter_map(|_| char::from_digit(rng.random_range(0..36), 36))
        .collect();
    format!("design_{}_{suffix}", Utc::now().timestamp_millis())
}
