//! Configuration for column signature detection
//!
//! The detection thresholds are calibrated against real survey exports and
//! deliberately kept as overridable named constants; changing them silently
//! reclassifies questions, so prefer overriding per run over editing the
//! defaults.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Configuration for column signature detection and header parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Minimum share of values matching the `N: label` prefix pattern for
    /// a column to classify as a Likert scale (0.0 - 1.0)
    pub likert_prefix_share: f64,

    /// Minimum share of numeric-parseable values for a column to classify
    /// as a numeric scale (0.0 - 1.0); any genuine text failure vetoes it
    pub numeric_share: f64,

    /// Distinct-value count above which a column classifies as open text
    pub open_text_distinct: usize,

    /// Maximum share of the post-identifier header text a sub-item label
    /// may occupy for a header split to be accepted (0.0 - 1.0)
    pub sub_item_max_share: f64,

    /// Token marking a selected option in multiple-choice columns
    pub mentioned_token: String,

    /// Token marking an unselected option in multiple-choice columns
    pub not_mentioned_token: String,

    /// Phrases treated as non-response when parsing values, compared
    /// case- and whitespace-insensitively
    pub non_response_values: BTreeSet<String>,

    /// Substrings that mark a Likert code label as a sentinel
    /// ("don't know" / refusal / "hard to say") response
    pub sentinel_cues: Vec<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            likert_prefix_share: 0.4,
            numeric_share: 0.5,
            open_text_distinct: 15,
            sub_item_max_share: 0.85,
            mentioned_token: "MENTIONED".to_string(),
            not_mentioned_token: "NOT MENTIONED".to_string(),
            non_response_values: [
                "",
                "-",
                "nan",
                "none",
                "nd",
                "n/d",
                "nie dotyczy",
                "nie wiem",
                "nie wiem/ nie znam",
                "nie wiem/nie znam",
                "trudno powiedzieć",
                "nie wiem/ trudno powiedzieć",
                "nie wiem, trudno powiedzieć",
                "odmowa",
                "odmowa odpowiedzi",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            sentinel_cues: vec![
                "nie wiem".to_string(),
                "odmowa".to_string(),
                "trudno".to_string(),
            ],
        }
    }
}

impl DetectionConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> DetectionConfigBuilder {
        DetectionConfigBuilder::default()
    }

    /// Check whether a raw value counts as a non-response phrase
    pub fn is_non_response(&self, value: &str) -> bool {
        self.non_response_values
            .contains(&value.trim().to_lowercase())
    }

    /// Check whether a Likert code label marks a sentinel response
    pub fn is_sentinel_label(&self, label: &str) -> bool {
        let lower = label.to_lowercase();
        self.sentinel_cues.iter().any(|cue| lower.contains(cue))
    }
}

/// Builder for [`DetectionConfig`]
#[derive(Debug, Default)]
pub struct DetectionConfigBuilder {
    config: DetectionConfig,
}

impl DetectionConfigBuilder {
    /// Set the Likert prefix share threshold
    pub fn likert_prefix_share(mut self, share: f64) -> Self {
        self.config.likert_prefix_share = share.clamp(0.0, 1.0);
        self
    }

    /// Set the numeric share threshold
    pub fn numeric_share(mut self, share: f64) -> Self {
        self.config.numeric_share = share.clamp(0.0, 1.0);
        self
    }

    /// Set the open-text distinct-value threshold
    pub fn open_text_distinct(mut self, count: usize) -> Self {
        self.config.open_text_distinct = count;
        self
    }

    /// Set the maximum sub-item share for header splitting
    pub fn sub_item_max_share(mut self, share: f64) -> Self {
        self.config.sub_item_max_share = share.clamp(0.0, 1.0);
        self
    }

    /// Set the multiple-choice tokens
    pub fn mention_tokens(
        mut self,
        mentioned: impl Into<String>,
        not_mentioned: impl Into<String>,
    ) -> Self {
        self.config.mentioned_token = mentioned.into();
        self.config.not_mentioned_token = not_mentioned.into();
        self
    }

    /// Replace the non-response phrase set
    pub fn non_response_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.non_response_values = values
            .into_iter()
            .map(|v| v.into().trim().to_lowercase())
            .collect();
        self
    }

    /// Replace the sentinel cue list
    pub fn sentinel_cues<I, S>(mut self, cues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.sentinel_cues = cues
            .into_iter()
            .map(|v| v.into().to_lowercase())
            .collect();
        self
    }

    /// Build the configuration
    pub fn build(self) -> DetectionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DetectionConfig::default();
        assert_eq!(config.likert_prefix_share, 0.4);
        assert_eq!(config.numeric_share, 0.5);
        assert_eq!(config.open_text_distinct, 15);
        assert_eq!(config.sub_item_max_share, 0.85);
    }

    #[test]
    fn test_non_response_matching() {
        let config = DetectionConfig::default();
        assert!(config.is_non_response("  Nie wiem "));
        assert!(config.is_non_response("N/D"));
        assert!(config.is_non_response(""));
        assert!(!config.is_non_response("Tak"));
    }

    #[test]
    fn test_sentinel_label_matching() {
        let config = DetectionConfig::default();
        assert!(config.is_sentinel_label("Nie wiem / trudno powiedzieć"));
        assert!(config.is_sentinel_label("Odmowa odpowiedzi"));
        assert!(!config.is_sentinel_label("Zdecydowanie tak"));
    }

    #[test]
    fn test_builder_clamping() {
        let config = DetectionConfig::builder()
            .likert_prefix_share(1.7)
            .numeric_share(-0.3)
            .build();
        assert_eq!(config.likert_prefix_share, 1.0);
        assert_eq!(config.numeric_share, 0.0);
    }
}
