//! Metaobject types for Shopify Admin API.

use serde::{Deserialize, Serialize};

/// One field of a metaobject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaobjectField {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// A metaobject entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metaobject {
    pub id: String,
    pub handle: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub fields: Vec<MetaobjectField>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Metaobject {
    /// Value of the field `key`, if set.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .and_then(|f| f.value.as_deref())
    }
}

/// Field value for `metaobjectCreate` / `metaobjectUpdate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaobjectFieldInput {
    pub key: String,
    pub value: String,
}

impl MetaobjectFieldInput {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Field of a metaobject definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinitionInput {
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub required: bool,
}

impl FieldDefinitionInput {
    #[must_use]
    pub fn new(key: &str, name: &str, kind: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            required: false,
        }
    }
}

/// Input for `metaobjectDefinitionCreate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaobjectDefinitionInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub field_definitions: Vec<FieldDefinitionInput>,
}

/// Existing metaobject definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaobjectDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup() {
        let object: Metaobject = serde_json::from_value(serde_json::json!({
            "id": "gid://shopify/Metaobject/1",
            "handle": "design-1",
            "fields": [
                {"key": "status", "value": "approved"},
                {"key": "notes", "value": null}
            ],
            "updatedAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(object.field("status"), Some("approved"));
        assert_eq!(object.field("notes"), None);
        assert_eq!(object.field("missing"), None);
        assert_eq!(object.updated_at.as_deref(), Some("2024-05-01T10:00:00Z"));
    }
}
