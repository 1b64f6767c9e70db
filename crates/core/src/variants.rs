//! Variant combination generation and duplicate filtering.
//!
//! The setup wizard turns three option lists into the Cartesian product of
//! variants, then drops the combinations the product already has. Matching
//! uses a [`VariantSignature`]: the option values lowercased, trimmed, sorted
//! and joined with `|`.
//!
//! The signature ignores which axis a value belongs to, so a color named
//! "Large" collides with a size named "Large". Existing products depend on
//! that behavior, so it is kept.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Price;

/// Title used when a combination has no option values.
pub const DEFAULT_VARIANT_TITLE: &str = "Default";

/// One configurable dimension of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Color,
    Size,
    Decoration,
}

impl Axis {
    /// Axes in generation order.
    pub const ALL: [Self; 3] = [Self::Color, Self::Size, Self::Decoration];

    /// Shopify product option name for this axis.
    #[must_use]
    pub const fn option_name(self) -> &'static str {
        match self {
            Self::Color => "Color",
            Self::Size => "Size",
            Self::Decoration => "Decoration",
        }
    }

    /// Map a Shopify option name back to an axis.
    ///
    /// Case-insensitive; `Decorations` is accepted because older products
    /// were created with the plural name.
    #[must_use]
    pub fn from_option_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "color" | "colour" => Some(Self::Color),
            "size" => Some(Self::Size),
            "decoration" | "decorations" => Some(Self::Decoration),
            _ => None,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.option_name())
    }
}

/// A value chosen on one axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionValue {
    pub axis: Axis,
    pub value: String,
}

impl OptionValue {
    #[must_use]
    pub fn new(axis: Axis, value: impl Into<String>) -> Self {
        Self {
            axis,
            value: value.into(),
        }
    }
}

/// Colors, sizes and decorations collected by the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSet {
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub decorations: Vec<String>,
}

impl OptionSet {
    /// Build an option set, trimming values and dropping blanks and
    /// case-insensitive repeats (first spelling wins).
    #[must_use]
    pub fn new<I, S>(colors: I, sizes: I, decorations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            colors: clean_values(colors),
            sizes: clean_values(sizes),
            decorations: clean_values(decorations),
        }
    }

    /// Values for one axis.
    #[must_use]
    pub fn values(&self, axis: Axis) -> &[String] {
        match axis {
            Axis::Color => &self.colors,
            Axis::Size => &self.sizes,
            Axis::Decoration => &self.decorations,
        }
    }

    /// Axes that have at least one value.
    pub fn populated_axes(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::ALL
            .into_iter()
            .filter(|axis| !self.values(*axis).is_empty())
    }

    /// Whether every axis is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.populated_axes().next().is_none()
    }

    /// Whether at least one color or size is present.
    ///
    /// Decorations alone do not make a configurable product.
    #[must_use]
    pub fn has_color_or_size(&self) -> bool {
        !self.colors.is_empty() || !self.sizes.is_empty()
    }

    /// Number of variants [`generate_combinations`] will produce.
    #[must_use]
    pub fn combination_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        Axis::ALL
            .into_iter()
            .map(|axis| self.values(axis).len().max(1))
            .product()
    }
}

fn clean_values<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .map(|v| v.as_ref().trim().to_owned())
        .filter(|v| !v.is_empty() && seen.insert(v.to_lowercase()))
        .collect()
}

/// A variant the wizard wants to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateVariant {
    pub option_values: Vec<OptionValue>,
    pub title: String,
    pub price: Price,
}

impl CandidateVariant {
    /// Duplicate-detection signature of this candidate.
    #[must_use]
    pub fn signature(&self) -> VariantSignature {
        VariantSignature::from_values(self.option_values.iter().map(|o| o.value.as_str()))
    }

    /// Value chosen on `axis`, if any.
    #[must_use]
    pub fn value_for(&self, axis: Axis) -> Option<&str> {
        self.option_values
            .iter()
            .find(|o| o.axis == axis)
            .map(|o| o.value.as_str())
    }
}

/// Normalized, order-independent identity of a variant's option values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantSignature(String);

impl VariantSignature {
    /// Build a signature from raw option values (axis is not considered).
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parts: Vec<String> = values
            .into_iter()
            .map(|v| v.as_ref().trim().to_lowercase())
            .collect();
        parts.sort();
        Self(parts.join("|"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of [`filter_duplicates`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Candidates that do not exist yet, in generation order.
    pub created: Vec<CandidateVariant>,
    /// Number of candidates that already exist.
    pub skipped_count: usize,
    /// Signatures of the skipped candidates, in generation order.
    pub skipped_signatures: Vec<VariantSignature>,
    /// Titles of the skipped candidates, in generation order.
    pub skipped_titles: Vec<String>,
}

impl GenerationResult {
    /// Every candidate already exists (and there was at least one).
    #[must_use]
    pub fn all_duplicates(&self) -> bool {
        self.created.is_empty() && self.skipped_count > 0
    }

    /// Some candidates were new and some were skipped.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.created.is_empty() && self.skipped_count > 0
    }
}

/// Expand the option lists into candidate variants.
///
/// An empty axis contributes nothing instead of removing the whole product:
/// colors `[Red, Blue]` with no sizes yields two single-value variants.
/// Iteration is colors (outer), sizes, decorations (inner). A combination
/// with no values at all is skipped, so three empty lists give no candidates.
#[must_use]
pub fn generate_combinations(
    colors: &[String],
    sizes: &[String],
    decorations: &[String],
    price: Price,
) -> Vec<CandidateVariant> {
    let axis_values = |values: &[String]| -> Vec<Option<String>> {
        if values.is_empty() {
            vec![None]
        } else {
            values.iter().cloned().map(Some).collect()
        }
    };

    let colors = axis_values(colors);
    let sizes = axis_values(sizes);
    let decorations = axis_values(decorations);

    let mut candidates = Vec::with_capacity(colors.len() * sizes.len() * decorations.len());
    for color in &colors {
        for size in &sizes {
            for decoration in &decorations {
                let option_values: Vec<OptionValue> = [
                    (Axis::Color, color),
                    (Axis::Size, size),
                    (Axis::Decoration, decoration),
                ]
                .into_iter()
                .filter_map(|(axis, value)| {
                    value
                        .as_ref()
                        .filter(|v| !v.is_empty())
                        .map(|v| OptionValue::new(axis, v.clone()))
                })
                .collect();

                if option_values.is_empty() {
                    continue;
                }

                let title = option_values
                    .iter()
                    .map(|o| o.value.as_str())
                    .collect::<Vec<_>>()
                    .join(" / ");

                candidates.push(CandidateVariant {
                    title: if title.is_empty() {
                        DEFAULT_VARIANT_TITLE.to_owned()
                    } else {
                        title
                    },
                    option_values,
                    price,
                });
            }
        }
    }
    candidates
}

/// Split candidates into new ones and ones that already exist.
///
/// Relative order is kept in both partitions. Inputs are not modified.
#[must_use]
pub fn filter_duplicates(
    candidates: &[CandidateVariant],
    existing: &HashSet<VariantSignature>,
) -> GenerationResult {
    let mut result = GenerationResult {
        created: Vec::new(),
        skipped_count: 0,
        skipped_signatures: Vec::new(),
        skipped_titles: Vec::new(),
    };

    for candidate in candidates {
        let signature = candidate.signature();
        if existing.contains(&signature) {
            result.skipped_count += 1;
            result.skipped_signatures.push(signature);
            result.skipped_titles.push(candidate.title.clone());
        } else {
            result.created.push(candidate.clone());
        }
    }

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn price() -> Price {
        Price::parse("25.00").unwrap()
    }

    #[test]
    fn test_colors_only() {
        let colors = strings(&["Red", "Blue", "Green"]);
        let candidates = generate_combinations(&colors, &[], &[], price());

        assert_eq!(candidates.len(), 3);
        for (candidate, color) in candidates.iter().zip(&colors) {
            assert_eq!(
                candidate.option_values,
                vec![OptionValue::new(Axis::Color, color.clone())]
            );
            assert_eq!(&candidate.title, color);
        }
    }

    #[test]
    fn test_colors_by_sizes_order() {
        let candidates = generate_combinations(
            &strings(&["Red", "Blue"]),
            &strings(&["S", "M"]),
            &[],
            price(),
        );
        let titles: Vec<_> = candidates.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Red / S", "Red / M", "Blue / S", "Blue / M"]);
        assert!(candidates.iter().all(|c| c.price == price()));
    }

    #[test]
    fn test_decorations_innermost() {
        let candidates = generate_combinations(
            &strings(&["Black"]),
            &strings(&["L"]),
            &strings(&["Screenprint", "Embroidery"]),
            price(),
        );
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].title, "Black / L / Screenprint");
        assert_eq!(candidates[1].value_for(Axis::Decoration), Some("Embroidery"));
    }

    #[test]
    fn test_all_empty_yields_nothing() {
        assert!(generate_combinations(&[], &[], &[], price()).is_empty());
    }

    #[test]
    fn test_signature_normalization() {
        let a = VariantSignature::from_values(["Red"]);
        let b = VariantSignature::from_values([" red "]);
        assert_eq!(a, b);

        let c = VariantSignature::from_values(["M", "Red"]);
        let d = VariantSignature::from_values(["red", "m"]);
        assert_eq!(c, d);
        assert_eq!(c.as_str(), "m|red");
    }

    #[test]
    fn test_signature_is_axis_blind() {
        let color = CandidateVariant {
            option_values: vec![OptionValue::new(Axis::Color, "Large")],
            title: "Large".to_string(),
            price: Price::ZERO,
        };
        let size = CandidateVariant {
            option_values: vec![OptionValue::new(Axis::Size, "Large")],
            title: "Large".to_string(),
            price: Price::ZERO,
        };
        assert_eq!(color.signature(), size.signature());
    }

    #[test]
    fn test_filter_partitions_in_order() {
        let candidates = generate_combinations(
            &strings(&["Red", "Blue"]),
            &strings(&["S", "M"]),
            &[],
            price(),
        );
        let existing: HashSet<_> = [VariantSignature::from_values(["RED", "m"])]
            .into_iter()
            .collect();

        let result = filter_duplicates(&candidates, &existing);
        let created: Vec<_> = result.created.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(created, ["Red / S", "Blue / S", "Blue / M"]);
        assert_eq!(result.skipped_count, 1);
        assert_eq!(result.skipped_titles, ["Red / M"]);
        assert!(result.is_partial());
        assert!(!result.all_duplicates());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let candidates = generate_combinations(
            &strings(&["Red", "Blue"]),
            &strings(&["S"]),
            &strings(&["Embroidery"]),
            price(),
        );
        let first = filter_duplicates(&candidates, &HashSet::new());
        assert_eq!(first.created.len(), candidates.len());

        let existing: HashSet<_> = first.created.iter().map(CandidateVariant::signature).collect();
        let second = filter_duplicates(&candidates, &existing);
        assert!(second.created.is_empty());
        assert_eq!(second.skipped_count, candidates.len());
        assert!(second.all_duplicates());
    }

    #[test]
    fn test_filter_does_not_mutate_inputs() {
        let candidates = generate_combinations(&strings(&["Red"]), &[], &[], price());
        let snapshot = candidates.clone();
        let _ = filter_duplicates(&candidates, &HashSet::new());
        assert_eq!(candidates, snapshot);
    }

    #[test]
    fn test_option_set_cleaning() {
        let set = OptionSet::new(
            strings(&[" Red", "red", "", "Blue "]),
            strings(&["S"]),
            Vec::new(),
        );
        assert_eq!(set.colors, ["Red", "Blue"]);
        assert!(set.has_color_or_size());
        assert_eq!(
            set.populated_axes().collect::<Vec<_>>(),
            [Axis::Color, Axis::Size]
        );
    }

    #[test]
    fn test_combination_count_treats_empty_axis_as_one() {
        let set = OptionSet::new(
            strings(&["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k"]),
            strings(&["1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11"]),
            Vec::new(),
        );
        assert_eq!(set.combination_count(), 121);
        assert_eq!(OptionSet::default().combination_count(), 0);
    }

    #[test]
    fn test_axis_from_option_name() {
        assert_eq!(Axis::from_option_name("Decorations"), Some(Axis::Decoration));
        assert_eq!(Axis::from_option_name(" color "), Some(Axis::Color));
        assert_eq!(Axis::from_option_name("Material"), None);
    }
}
