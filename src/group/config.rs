//! Configuration for question grouping
//!
//! Keyword lists and identifier sets driving the skip/exclude decisions of
//! the scan. Defaults target Polish CATI/CAWI exports; substitute per run
//! for other locales.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Configuration for the grouping scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingConfig {
    /// A header containing any of these (case-insensitive) is metadata,
    /// not a question
    pub meta_keywords: Vec<String>,

    /// A header containing any of these is excluded from analysis
    /// ("other, specify" free-text columns)
    pub exclude_keywords: Vec<String>,

    /// Question identifiers marking demographic/breakdown dimensions
    pub demographic_ids: BTreeSet<String>,

    /// Question identifiers excluded from analysis entirely
    pub excluded_ids: BTreeSet<String>,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            meta_keywords: [
                "numer wywiadu",
                "aranżacja",
                "imię",
                "nazwisko",
                "telefon",
                "kod pocztowy",
                "miejscowość",
                "waga",
                "[ogółem]",
                "wyniki dla",
                "makroregion",
                "segmentacja",
                "segment",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            exclude_keywords: ["inna, jaka", "inne (jakie"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            demographic_ids: [
                "M1", "M1a", "M1b", "M2a", "M3", "M4", "M5", "M6", "M7", "M8", "M9", "M10", "M11",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            excluded_ids: ["M2"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl GroupingConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> GroupingConfigBuilder {
        GroupingConfigBuilder::default()
    }

    /// Check whether a header names survey metadata
    pub fn is_meta(&self, header: &str) -> bool {
        let lower = header.to_lowercase();
        self.meta_keywords.iter().any(|kw| lower.contains(kw))
    }

    /// Check whether a header is excluded from analysis
    pub fn is_excluded(&self, header: &str) -> bool {
        let lower = header.to_lowercase();
        self.exclude_keywords.iter().any(|kw| lower.contains(kw))
    }
}

/// Builder for [`GroupingConfig`]
#[derive(Debug, Default)]
pub struct GroupingConfigBuilder {
    config: GroupingConfig,
}

impl GroupingConfigBuilder {
    /// Replace the metadata keyword list
    pub fn meta_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.meta_keywords = keywords
            .into_iter()
            .map(|k| k.into().to_lowercase())
            .collect();
        self
    }

    /// Replace the exclusion keyword list
    pub fn exclude_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.exclude_keywords = keywords
            .into_iter()
            .map(|k| k.into().to_lowercase())
            .collect();
        self
    }

    /// Replace the demographic identifier set
    pub fn demographic_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.demographic_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the excluded identifier set
    pub fn excluded_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.excluded_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Build the configuration
    pub fn build(self) -> GroupingConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_matching_is_case_insensitive() {
        let config = GroupingConfig::default();
        assert!(config.is_meta("Numer Wywiadu"));
        assert!(config.is_meta("WAGA analityczna"));
        assert!(!config.is_meta("A1. Ocena usług"));
    }

    #[test]
    fn test_exclude_matching() {
        let config = GroupingConfig::default();
        assert!(config.is_excluded("Inna, jaka?"));
        assert!(config.is_excluded("Inne (jakie?)"));
        assert!(!config.is_excluded("Inna odpowiedź"));
    }

    #[test]
    fn test_default_demographic_ids() {
        let config = GroupingConfig::default();
        assert!(config.demographic_ids.contains("M1"));
        assert!(config.demographic_ids.contains("M10"));
        assert!(config.excluded_ids.contains("M2"));
        assert!(!config.demographic_ids.contains("M2"));
    }

    #[test]
    fn test_builder_replaces_lists() {
        let config = GroupingConfig::builder()
            .meta_keywords(["Respondent ID"])
            .demographic_ids(["D1"])
            .build();
        assert!(config.is_meta("respondent id"));
        assert!(config.demographic_ids.contains("D1"));
        assert!(!config.demographic_ids.contains("M1"));
    }
}
