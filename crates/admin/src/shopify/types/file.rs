//! File upload types for Shopify Admin API.

use serde::{Deserialize, Serialize};

/// Form parameter Shopify requires on a staged upload POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedUploadParameter {
    pub name: String,
    pub value: String,
}

/// Signed target returned by `stagedUploadsCreate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedUploadTarget {
    pub url: String,
    pub resource_url: String,
    pub parameters: Vec<StagedUploadParameter>,
}

impl StagedUploadTarget {
    /// Value of the form parameter `name`.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Source URL to hand to `fileCreate` once the bytes are posted.
    ///
    /// Targets that carry a `key` parameter are addressed as `{url}/{key}`.
    #[must_use]
    pub fn original_source(&self) -> String {
        match self.parameter("key") {
            Some(key) => format!("{}/{}", self.url.trim_end_matches('/'), key),
            None => self.url.clone(),
        }
    }
}

/// Resource kind of a staged upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StagedUploadResource {
    File,
    Image,
}

/// A file registered through `fileCreate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedFile {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(params: &[(&str, &str)]) -> StagedUploadTarget {
        StagedUploadTarget {
            url: "https://shopify-staged-uploads.storage.googleapis.com/".to_string(),
            resource_url: "https://shopify-staged-uploads.storage.googleapis.com/tmp/1".to_string(),
            parameters: params
                .iter()
                .map(|(name, value)| StagedUploadParameter {
                    name: (*name).to_string(),
                    value: (*value).to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_original_source_uses_key() {
        let t = target(&[("key", "tmp/1/front.png"), ("policy", "abc")]);
        assert_eq!(
            t.original_source(),
            "https://shopify-staged-uploads.storage.googleapis.com/tmp/1/front.png"
        );
    }

    #[test]
    fn test_original_source_without_key() {
        let t = target(&[("policy", "abc")]);
        assert_eq!(t.original_source(), t.url);
    }
}
