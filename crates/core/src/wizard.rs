//! Setup wizard step validation.
//!
//! Errors block the step; warnings are shown but let the merchant continue.
//! The combination-count warning is raised here, before any Shopify call.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Price;
use crate::variants::OptionSet;

/// Shortest product title the wizard accepts.
pub const MIN_TITLE_LENGTH: usize = 3;
/// Combination count above which the wizard warns.
pub const MAX_RECOMMENDED_VARIANTS: usize = 100;
/// Largest design image accepted per view.
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

const PRICE_WARNING_THRESHOLD: Decimal = Decimal::ONE_THOUSAND;

/// How serious a validation issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// A single problem found in the wizard input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Form field the message belongs to.
    pub field: &'static str,
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    fn error(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Product design view uploaded for a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Front,
    Back,
}

impl View {
    const fn label(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

/// Size of an image uploaded for one color and view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedView {
    pub color: String,
    pub view: View,
    pub size_bytes: u64,
}

/// Everything the wizard has collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardInput {
    #[serde(default)]
    pub creating_product: bool,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(flatten)]
    pub options: OptionSet,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub uploads: Vec<UploadedView>,
}

/// Number of variants a configuration will create.
#[must_use]
pub fn combination_count(options: &OptionSet) -> usize {
    options.combination_count()
}

/// Step 1: product selection.
#[must_use]
pub fn validate_product_step(input: &WizardInput) -> Vec<ValidationIssue> {
    let title = input.title.as_deref().map_or("", str::trim);
    let mut issues = Vec::new();

    if input.creating_product {
        if title.is_empty() {
            issues.push(ValidationIssue::error(
                "product",
                "Product title is required. Try something descriptive like 'Custom Logo T-Shirt' or 'Personalized Coffee Mug'.",
            ));
        } else if title.chars().count() < MIN_TITLE_LENGTH {
            issues.push(ValidationIssue::error(
                "product",
                "Product title should be at least 3 characters long. Make it descriptive so customers understand what they're buying.",
            ));
        }
    } else if input
        .product_id
        .as_deref()
        .is_none_or(|id| id.trim().is_empty())
    {
        issues.push(ValidationIssue::error(
            "product",
            "Please select an existing product from your store, or switch to 'Create New Product' to make a new one.",
        ));
    }

    issues
}

/// Step 2: options and price.
#[must_use]
pub fn validate_options_step(input: &WizardInput) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !input.options.has_color_or_size() {
        issues.push(ValidationIssue::error(
            "options",
            "Please add at least one color or size option to configure the product.",
        ));
    }

    match input.price.as_deref().map(Price::parse) {
        Some(Ok(price)) if price.amount() > PRICE_WARNING_THRESHOLD => {
            issues.push(ValidationIssue::warning(
                "price",
                "Price seems unusually high. Please double-check the amount or contact support if this is correct.",
            ));
        }
        Some(Ok(price)) if price.is_positive() => {}
        _ => issues.push(ValidationIssue::error(
            "price",
            "Enter a valid price greater than $0. Consider your costs, materials, and desired profit margin.",
        )),
    }

    issues
}

/// Step 3: design images, front and back for every color.
#[must_use]
pub fn validate_images_step(input: &WizardInput) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let mut by_color: HashMap<&str, Vec<View>> = HashMap::new();
    for upload in &input.uploads {
        by_color
            .entry(upload.color.as_str())
            .or_default()
            .push(upload.view);
    }

    let missing: Vec<&str> = input
        .options
        .colors
        .iter()
        .map(String::as_str)
        .filter(|color| {
            let views = by_color.get(color);
            [View::Front, View::Back]
                .iter()
                .any(|view| !views.is_some_and(|v| v.contains(view)))
        })
        .collect();

    match missing.as_slice() {
        [] => {}
        [color] => issues.push(ValidationIssue::error(
            "files",
            format!(
                "Please upload both front and back view images for {color}. High-quality images help customers visualize their custom product."
            ),
        )),
        colors => issues.push(ValidationIssue::error(
            "files",
            format!(
                "Missing images for: {}. Each color needs both front and back view images to show customers what their product will look like.",
                colors.join(", ")
            ),
        )),
    }

    let oversized: Vec<String> = input
        .uploads
        .iter()
        .filter(|upload| upload.size_bytes > MAX_IMAGE_BYTES)
        .map(|upload| format!("{} {} view", upload.color, upload.view.label()))
        .collect();
    if !oversized.is_empty() {
        issues.push(ValidationIssue::error(
            "file_size",
            format!(
                "These files are too large (over 10MB): {}. Please compress your images or use a smaller file size.",
                oversized.join(", ")
            ),
        ));
    }

    issues
}

/// Step 4: review. Repeats the image checks and warns about large configurations.
#[must_use]
pub fn validate_review_step(input: &WizardInput) -> Vec<ValidationIssue> {
    let mut issues = validate_images_step(input);
    if let Some(warning) = combination_warning(&input.options) {
        issues.push(warning);
    }
    issues
}

/// Warning for configurations above [`MAX_RECOMMENDED_VARIANTS`].
#[must_use]
pub fn combination_warning(options: &OptionSet) -> Option<ValidationIssue> {
    let total = combination_count(options);
    (total > MAX_RECOMMENDED_VARIANTS).then(|| {
        ValidationIssue::warning(
            "variants",
            format!(
                "This configuration will create {total} product variants, which might be too many to manage effectively. Consider reducing the number of options."
            ),
        )
    })
}

/// Validate one wizard step (1-4).
#[must_use]
pub fn validate_step(step: u8, input: &WizardInput) -> Vec<ValidationIssue> {
    match step {
        1 => validate_product_step(input),
        2 => validate_options_step(input),
        3 => validate_images_step(input),
        _ => validate_review_step(input),
    }
}

/// Validate everything needed before variants are generated.
///
/// Image checks are left to the steps: products can be configured before
/// artwork exists.
#[must_use]
pub fn validate_wizard(input: &WizardInput) -> Vec<ValidationIssue> {
    let mut issues = validate_product_step(input);
    issues.extend(validate_options_step(input));
    issues.extend(combination_warning(&input.options));
    issues
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn base_input() -> WizardInput {
        WizardInput {
            creating_product: true,
            title: Some("Custom Tee".to_string()),
            product_id: None,
            options: OptionSet::new(strings(&["Red"]), strings(&["M"]), Vec::new()),
            price: Some("20".to_string()),
            uploads: Vec::new(),
        }
    }

    #[test]
    fn test_valid_input_has_no_issues() {
        assert!(validate_wizard(&base_input()).is_empty());
    }

    #[test]
    fn test_short_title() {
        let input = WizardInput {
            title: Some(" ab ".to_string()),
            ..base_input()
        };
        let issues = validate_product_step(&input);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.starts_with("Product title should be at least 3"));
    }

    #[test]
    fn test_existing_product_required() {
        let input = WizardInput {
            creating_product: false,
            product_id: Some(String::new()),
            ..base_input()
        };
        assert_eq!(validate_product_step(&input)[0].field, "product");
    }

    #[test]
    fn test_price_rules() {
        for bad in [None, Some("0"), Some("-3"), Some("free")] {
            let input = WizardInput {
                price: bad.map(str::to_string),
                ..base_input()
            };
            let issues = validate_options_step(&input);
            assert!(issues.iter().any(|i| i.field == "price" && i.is_error()), "{bad:?}");
        }

        let input = WizardInput {
            price: Some("1500".to_string()),
            ..base_input()
        };
        let issues = validate_options_step(&input);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_needs_color_or_size() {
        let input = WizardInput {
            options: OptionSet::new(Vec::<String>::new(), Vec::new(), strings(&["Embroidery"])),
            ..base_input()
        };
        let issues = validate_wizard(&input);
        assert_eq!(
            issues[0].message,
            "Please add at least one color or size option to configure the product."
        );
    }

    #[test]
    fn test_combination_warning_before_generation() {
        let letters: Vec<String> = ('a'..='k').map(String::from).collect();
        let numbers: Vec<String> = (1..=11).map(|n| n.to_string()).collect();
        let input = WizardInput {
            options: OptionSet::new(letters, numbers, Vec::new()),
            ..base_input()
        };
        let issues = validate_wizard(&input);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].message.contains("121 product variants"));
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_missing_images() {
        let mut input = base_input();
        input.options.colors = strings(&["Red", "Blue"]);
        input.uploads = vec![
            UploadedView {
                color: "Red".to_string(),
                view: View::Front,
                size_bytes: 10,
            },
            UploadedView {
                color: "Red".to_string(),
                view: View::Back,
                size_bytes: MAX_IMAGE_BYTES + 1,
            },
        ];

        let issues = validate_images_step(&input);
        assert_eq!(issues.len(), 2);
        assert!(issues[0].message.contains("for Blue."));
        assert!(issues[1].message.contains("Red back view"));
    }

    #[test]
    fn test_review_step_includes_warning() {
        let mut input = base_input();
        input.options.colors = Vec::new();
        input.options.sizes = (0..101).map(|n| n.to_string()).collect();
        let issues = validate_step(4, &input);
        assert!(issues.iter().any(|i| i.field == "variants"));
    }
}
