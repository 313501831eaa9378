#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Matrix axis construction for the stepx build-step executor
//!
//! A matrix axis is a named, ordered sequence of unique string values.
//! The host's matrix-expansion mechanism fans one job definition into one
//! parallel build per value, exporting the value to each cell under the
//! axis key. This crate owns the merge algorithm that builds the value
//! list from a selected subset of built-in defaults plus free-form extra
//! text, and the inverse projection that recovers the extras for
//! redisplay in a configuration form.

mod tokenize;

pub use tokenize::tokenize;

use serde::{Deserialize, Serialize};

/// Built-in environment names offered as checkboxes in configuration
/// forms. The declared order is the display order and the merge order.
pub const DEFAULTS: [&str; 8] = [
    "py26", "py27", "py32", "py33", "py34", "py35", "pypy", "jython",
];

/// Merge default values with free-form extra text into a deduplicated,
/// order-preserving value list.
///
/// Defaults are appended first, in declared order; then each token of
/// `extra_text` in parse order. A value already present is silently
/// skipped, so repeating a default in the extra text is idempotent, not
/// an error. The result is a pure function of the inputs.
#[must_use]
pub fn merge<S: AsRef<str>>(defaults: &[S], extra_text: Option<&str>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for value in defaults {
        let value = value.as_ref();
        if !merged.iter().any(|v| v == value) {
            merged.push(value.to_string());
        }
    }
    for token in tokenize(extra_text) {
        if !merged.contains(&token) {
            merged.push(token);
        }
    }
    merged
}

/// Project a merged value list back to the extras-only text form.
///
/// Values found in `defaults` are dropped; the rest keep their order and
/// are joined by single spaces. This is lossy when a user-supplied extra
/// collides with a default: the value survives in the axis but is
/// redisplayed as a checked default rather than as extra text.
#[must_use]
pub fn extract_extras<S: AsRef<str>>(merged: &[S], defaults: &[&str]) -> String {
    merged
        .iter()
        .map(std::convert::AsRef::as_ref)
        .filter(|value| !defaults.contains(value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// The `TOXENV` matrix axis: an ordered set of unique environment names
///
/// Constructed once from configuration input and immutable thereafter;
/// the host's matrix expansion consumes `values()` to generate one build
/// configuration per value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    values: Vec<String>,
}

impl Axis {
    /// Environment variable name each generated matrix cell receives
    pub const KEY: &'static str = "TOXENV";

    /// Build the axis from selected defaults plus extra free text
    #[must_use]
    pub fn new<S: AsRef<str>>(values: &[S], extra_value_string: Option<&str>) -> Self {
        Self {
            values: merge(values, extra_value_string),
        }
    }

    /// Build the axis from an already-merged value list
    #[must_use]
    pub fn from_values(values: Vec<String>) -> Self {
        Self {
            values: merge(&values, None),
        }
    }

    /// Axis key, fixed for every instance
    #[must_use]
    pub fn key(&self) -> &'static str {
        Self::KEY
    }

    /// The merged, deduplicated value list in first-seen order
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of matrix cells this axis generates
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the axis generates no cells at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The values not covered by [`DEFAULTS`], joined by single spaces,
    /// for repopulating the extras text field
    #[must_use]
    pub fn extra_value_string(&self) -> String {
        extract_extras(&self.values, &DEFAULTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_defaults_in_declared_order() {
        let merged = merge(&["py26", "py27"], Some("py27 py33 py33"));
        assert_eq!(merged, vec!["py26", "py27", "py33"]);
    }

    #[test]
    fn merge_dedupes_defaults_themselves() {
        let merged = merge(&["py27", "py27", "py26"], None);
        assert_eq!(merged, vec!["py27", "py26"]);
    }

    #[test]
    fn merge_absorbs_default_repeated_in_extras() {
        // Re-typing a default in the free-text field must be a no-op
        let merged = merge(&["py26", "py27"], Some("py26"));
        assert_eq!(merged, vec!["py26", "py27"]);
    }

    #[test]
    fn merge_with_no_extra_text_is_just_defaults() {
        assert_eq!(merge(&["py35"], None), vec!["py35"]);
        assert_eq!(merge(&["py35"], Some("")), vec!["py35"]);
    }

    #[test]
    fn merge_is_idempotent() {
        let once = merge(&["py26", "py27"], Some("docs py33"));
        let twice = merge(&once, None);
        assert_eq!(twice, once);
    }

    #[test]
    fn extract_extras_round_trip() {
        let merged = merge(&["py26", "py27"], Some("py33 docs"));
        assert_eq!(extract_extras(&merged, &["py26", "py27"]), "py33 docs");
    }

    #[test]
    fn extract_extras_example_from_docs() {
        assert_eq!(
            extract_extras(&["py26", "py27", "py33"], &["py26", "py27"]),
            "py33"
        );
    }

    #[test]
    fn axis_key_is_fixed() {
        let axis = Axis::new(&["py27"], None);
        assert_eq!(axis.key(), "TOXENV");
    }

    #[test]
    fn axis_extra_value_string_skips_all_defaults() {
        let axis = Axis::new(&["py26", "py27"], Some("docs lint"));
        assert_eq!(axis.extra_value_string(), "docs lint");
    }

    #[test]
    fn axis_extra_colliding_with_default_is_absorbed() {
        // Known ambiguity, preserved on purpose: an extra equal to any
        // default (selected or not) is redisplayed as a default, not as
        // extra text. Axis membership is unaffected.
        let axis = Axis::new(&["py26"], Some("py35 docs"));
        assert_eq!(axis.values(), ["py26", "py35", "docs"]);
        assert_eq!(axis.extra_value_string(), "docs");
    }

    #[test]
    fn axis_from_values_dedupes() {
        let axis = Axis::from_values(vec!["py27".into(), "py27".into(), "docs".into()]);
        assert_eq!(axis.values(), ["py27", "docs"]);
        assert_eq!(axis.len(), 2);
        assert!(!axis.is_empty());
    }

    #[test]
    fn axis_serialization_round_trip() {
        let axis = Axis::new(&["py26", "py27"], Some("docs"));
        let json = serde_json::to_string(&axis).unwrap();
        let back: Axis = serde_json::from_str(&json).unwrap();
        assert_eq!(back, axis);
    }

    #[test]
    fn quoted_extras_keep_embedded_whitespace() {
        let merged = merge(&["py27"], Some(r#"docs "integration tests""#));
        assert_eq!(merged, vec!["py27", "docs", "integration tests"]);
    }
}
