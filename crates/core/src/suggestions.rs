//! Option autocomplete suggestions for the setup wizard combobox.

use serde::{Deserialize, Serialize};

use crate::variants::Axis;

/// Most existing + suggested matches returned; the "add new" entry is extra.
pub const MAX_MATCHES: usize = 8;

pub const COMMON_COLORS: &[&str] = &[
    "Red",
    "Blue",
    "Green",
    "Yellow",
    "Orange",
    "Purple",
    "Pink",
    "Brown",
    "Black",
    "White",
    "Gray",
    "Navy",
    "Maroon",
    "Teal",
    "Lime",
    "Olive",
    "Silver",
    "Gold",
    "Beige",
    "Tan",
    "Coral",
    "Salmon",
    "Turquoise",
    "Violet",
];

pub const COMMON_SIZES: &[&str] = &[
    "XS",
    "S",
    "M",
    "L",
    "XL",
    "XXL",
    "XXXL",
    "Extra Small",
    "Small",
    "Medium",
    "Large",
    "Extra Large",
    "28",
    "30",
    "32",
    "34",
    "36",
    "38",
    "40",
    "42",
    "44",
    "46",
    "6",
    "7",
    "8",
    "9",
    "10",
    "11",
    "12",
    "13",
    "14",
    "15",
    "One Size",
    "Free Size",
    "Universal",
];

pub const COMMON_DECORATIONS: &[&str] = &[
    "Embroidery",
    "Screen Print",
    "Heat Transfer",
    "Digital Print",
    "Vinyl",
    "Sublimation",
    "Laser Engraving",
    "Debossing",
    "Embossing",
    "Foil Stamping",
    "Pad Print",
    "Direct to Garment",
    "Applique",
    "Patches",
    "Rhinestones",
    "Sequins",
    "Beading",
    "Tie Dye",
    "Distressing",
    "Stone Wash",
];

/// Built-in suggestion list for an axis.
#[must_use]
pub const fn common_suggestions(axis: Axis) -> &'static [&'static str] {
    match axis {
        Axis::Color => COMMON_COLORS,
        Axis::Size => COMMON_SIZES,
        Axis::Decoration => COMMON_DECORATIONS,
    }
}

/// Where a suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// A value already used in the store.
    Existing,
    /// A value from the built-in list.
    Suggestion,
    /// The typed text, offered as a new value.
    New,
}

/// One combobox entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub value: String,
    pub label: String,
}

impl Suggestion {
    fn existing(value: &str) -> Self {
        Self {
            kind: SuggestionKind::Existing,
            value: value.to_owned(),
            label: value.to_owned(),
        }
    }

    fn suggestion(value: &str) -> Self {
        Self {
            kind: SuggestionKind::Suggestion,
            value: value.to_owned(),
            label: value.to_owned(),
        }
    }
}

/// Build the suggestion list for `input`.
///
/// Existing values come first, then built-in suggestions not already present
/// among existing values. Both skip entries equal to the input and only keep
/// substring matches (all comparisons ignore case). The two groups together
/// are capped at [`MAX_MATCHES`]; the "add new" entry is appended after the
/// cap unless the input exactly matches an existing value. Blank input gives
/// an empty list.
#[must_use]
pub fn filter_suggestions<E, C>(
    input: &str,
    existing: &[E],
    common: &[C],
    option_type: &str,
) -> Vec<Suggestion>
where
    E: AsRef<str>,
    C: AsRef<str>,
{
    let typed = input.trim();
    if typed.is_empty() {
        return Vec::new();
    }
    let needle = typed.to_lowercase();

    let is_match = |candidate: &str| {
        let lower = candidate.to_lowercase();
        lower.contains(&needle) && lower != needle
    };
    let in_existing = |candidate: &str| {
        existing
            .iter()
            .any(|e| e.as_ref().to_lowercase() == candidate.to_lowercase())
    };

    let existing_matches = existing
        .iter()
        .map(|e| e.as_ref())
        .filter(|&e| is_match(e))
        .map(Suggestion::existing);

    let common_matches = common
        .iter()
        .map(|c| c.as_ref())
        .filter(|&c| is_match(c) && !in_existing(c))
        .map(Suggestion::suggestion);

    let mut results: Vec<Suggestion> = existing_matches
        .chain(common_matches)
        .take(MAX_MATCHES)
        .collect();

    if !in_existing(typed) {
        results.push(Suggestion {
            kind: SuggestionKind::New,
            value: typed.to_owned(),
            label: format!("Add \"{typed}\" as new {option_type}"),
        });
    }

    results
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn kinds_and_values(results: &[Suggestion]) -> Vec<(SuggestionKind, &str)> {
        results.iter().map(|s| (s.kind, s.value.as_str())).collect()
    }

    #[test]
    fn test_existing_then_suggestions_then_new() {
        let results = filter_suggestions(
            "re",
            &["Red", "Green"],
            &["Red", "Fire Brick", "Navy"],
            "color",
        );
        assert_eq!(
            kinds_and_values(&results),
            [
                (SuggestionKind::Existing, "Red"),
                (SuggestionKind::Existing, "Green"),
                (SuggestionKind::Suggestion, "Fire Brick"),
                (SuggestionKind::New, "re"),
            ]
        );
        assert_eq!(results[3].label, "Add \"re\" as new color");
    }

    #[test]
    fn test_green_matches_and_maroon_does_not() {
        let results = filter_suggestions("re", &["Red", "Green"], &["Red", "Maroon"], "color");
        assert_eq!(
            kinds_and_values(&results),
            [
                (SuggestionKind::Existing, "Red"),
                (SuggestionKind::Existing, "Green"),
                (SuggestionKind::New, "re"),
            ]
        );
        assert_eq!(results[2].label, "Add \"re\" as new color");
    }

    #[test]
    fn test_no_substring_match_excluded() {
        let results = filter_suggestions("bl", &["Red"], &["Maroon", "Blue"], "color");
        assert_eq!(
            kinds_and_values(&results),
            [
                (SuggestionKind::Suggestion, "Blue"),
                (SuggestionKind::New, "bl"),
            ]
        );
    }

    #[test]
    fn test_exact_existing_match_suppresses_new_entry() {
        let results = filter_suggestions("RED", &["Red", "Dark Red"], &["Redwood"], "color");
        assert_eq!(
            kinds_and_values(&results),
            [
                (SuggestionKind::Existing, "Dark Red"),
                (SuggestionKind::Suggestion, "Redwood"),
            ]
        );
    }

    #[test]
    fn test_exact_suggestion_match_is_not_listed() {
        let results = filter_suggestions("navy", &Vec::<String>::new(), &["Navy", "Navy Blue"], "color");
        assert_eq!(
            kinds_and_values(&results),
            [
                (SuggestionKind::Suggestion, "Navy Blue"),
                (SuggestionKind::New, "navy"),
            ]
        );
    }

    #[test]
    fn test_cap_keeps_new_entry() {
        let existing: Vec<String> = (0..12).map(|i| format!("Shade {i}")).collect();
        let results = filter_suggestions("shade", &existing, COMMON_COLORS, "color");
        assert_eq!(results.len(), MAX_MATCHES + 1);
        assert_eq!(results[MAX_MATCHES].kind, SuggestionKind::New);
    }

    #[test]
    fn test_blank_input() {
        assert!(filter_suggestions("   ", &["Red"], COMMON_COLORS, "color").is_empty());
    }

    #[test]
    fn test_input_is_trimmed() {
        let results = filter_suggestions("  xx ", &Vec::<String>::new(), COMMON_SIZES, "size");
        assert_eq!(
            kinds_and_values(&results),
            [
                (SuggestionKind::Suggestion, "XXL"),
                (SuggestionKind::Suggestion, "XXXL"),
                (SuggestionKind::New, "xx"),
            ]
        );
    }

    #[test]
    fn test_common_lists_per_axis() {
        assert!(common_suggestions(Axis::Color).contains(&"Teal"));
        assert!(common_suggestions(Axis::Size).contains(&"XL"));
        assert!(common_suggestions(Axis::Decoration).contains(&"Embroidery"));
    }
}
