//! Metafield types for Shopify Admin API.

use serde::{Deserialize, Serialize};

/// A metafield value as read back from Shopify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafield {
    pub namespace: String,
    pub key: String,
    pub value: String,
}

impl Metafield {
    /// `namespace.key` identifier.
    #[must_use]
    pub fn identifier(&self) -> String {
        format!("{}.{}", self.namespace, self.key)
    }

    /// Value parsed as JSON, or the raw string when it is not JSON.
    #[must_use]
    pub fn parsed_value(&self) -> serde_json::Value {
        serde_json::from_str(&self.value)
            .unwrap_or_else(|_| serde_json::Value::String(self.value.clone()))
    }
}

/// Metafield definition types used by this app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetafieldType {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "single_line_text_field")]
    SingleLineText,
    #[serde(rename = "multi_line_text_field")]
    MultiLineText,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "list.single_line_text_field")]
    SingleLineTextList,
}

/// Input for `metafieldsSet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafieldInput {
    pub owner_id: String,
    pub namespace: String,
    pub key: String,
    #[serde(rename = "type")]
    pub kind: MetafieldType,
    pub value: String,
}

impl MetafieldInput {
    pub fn new(
        owner_id: impl Into<String>,
        namespace: impl Into<String>,
        key: impl Into<String>,
        kind: MetafieldType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            namespace: namespace.into(),
            key: key.into(),
            kind,
            value: value.into(),
        }
    }

    /// A `json` metafield holding `value` serialized.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized.
    pub fn json<T: Serialize>(
        owner_id: &str,
        namespace: &str,
        key: &str,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            owner_id,
            namespace,
            key,
            MetafieldType::Json,
            serde_json::to_string(value)?,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_value_falls_back_to_string() {
        let json = Metafield {
            namespace: "custom".to_string(),
            key: "colors".to_string(),
            value: r#"["Red"]"#.to_string(),
        };
        assert_eq!(json.parsed_value(), serde_json::json!(["Red"]));
        assert_eq!(json.identifier(), "custom.colors");

        let text = Metafield {
            value: "Cotton blend".to_string(),
            ..json
        };
        assert_eq!(text.parsed_value(), serde_json::json!("Cotton blend"));
    }

    #[test]
    fn test_input_serializes_type_name() {
        let input = MetafieldInput::new(
            "gid://shopify/Order/1",
            "custom",
            "design_ids",
            MetafieldType::SingleLineTextList,
            r#"["a"]"#,
        );
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["type"], "list.single_line_text_field");
        assert_eq!(value["ownerId"], "gid://shopify/Order/1");
    }
}
