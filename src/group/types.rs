//! Question group types

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::detect::ColumnSignature;

/// Group-level question type
///
/// One tag per group; every member column shares it. `Empty` columns never
/// reach group level, so the tag set is closed over the five analyzable
/// kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Ordinal scale with coded labels
    Likert,
    /// Plain numeric scale
    NumericScale,
    /// One column per option, mentioned / not mentioned
    MultipleChoice,
    /// One column, low-cardinality categories
    SingleChoice,
    /// One column, free text
    OpenText,
}

impl QuestionType {
    /// Map a column signature onto its group-level tag
    ///
    /// `Empty` has no group-level counterpart.
    pub fn from_signature(signature: &ColumnSignature) -> Option<Self> {
        match signature {
            ColumnSignature::Empty => None,
            ColumnSignature::MultiChoice => Some(QuestionType::MultipleChoice),
            ColumnSignature::Likert { .. } => Some(QuestionType::Likert),
            ColumnSignature::NumericScale { .. } => Some(QuestionType::NumericScale),
            ColumnSignature::SingleChoice { .. } => Some(QuestionType::SingleChoice),
            ColumnSignature::OpenText { .. } => Some(QuestionType::OpenText),
        }
    }

    /// Stable snake_case name, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Likert => "likert",
            QuestionType::NumericScale => "numeric_scale",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::SingleChoice => "single_choice",
            QuestionType::OpenText => "open_text",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suggested presentation for a group
///
/// Consumed only by rendering layers; carried here so a reviewed schema
/// keeps the suggestion stable across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartHint {
    /// Horizontal bar chart of per-item means
    HorizontalBarMeans,
    /// Pie chart (few categories)
    Pie,
    /// Frequency bar chart
    FrequencyBar,
    /// Bar chart of mention percentages
    MultipleChoiceBar,
}

impl ChartHint {
    /// Category count at or below which single-choice questions render as
    /// a pie chart
    pub const PIE_MAX_CATEGORIES: usize = 3;

    /// Suggest a presentation for a question type
    pub fn for_question(question_type: QuestionType, category_count: usize) -> Self {
        match question_type {
            QuestionType::Likert | QuestionType::NumericScale => ChartHint::HorizontalBarMeans,
            QuestionType::MultipleChoice => ChartHint::MultipleChoiceBar,
            QuestionType::SingleChoice => {
                if category_count <= Self::PIE_MAX_CATEGORIES {
                    ChartHint::Pie
                } else {
                    ChartHint::FrequencyBar
                }
            }
            QuestionType::OpenText => ChartHint::FrequencyBar,
        }
    }
}

/// One logical question: the unit of analysis for statistics and reporting
///
/// Member columns are contiguous in original column order except for
/// skipped empty/metadata/duplicate/excluded columns, and every member
/// shares the group's type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionGroup {
    /// Question identifier; synthesized (`group_<i>` / `choice_<i>` /
    /// `text_<i>`) when the header carried none
    pub id: String,
    /// Display label
    pub label: String,
    /// Member column positions, in original order
    pub columns: Vec<usize>,
    /// Per-member labels (inline sub-item label or raw header)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub column_labels: Vec<String>,
    /// Group-level type tag
    pub question_type: QuestionType,
    /// Suggested presentation
    pub chart_hint: ChartHint,
    /// Merged scale lower bound (min over member minimums)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_min: Option<i64>,
    /// Merged scale upper bound (max over member maximums)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_max: Option<i64>,
    /// Merged code -> label map across members
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scale_labels: BTreeMap<i64, String>,
    /// Merged sentinel codes across members
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub sentinel_codes: BTreeSet<i64>,
    /// Marks the group as a demographic/breakdown dimension
    #[serde(default)]
    pub is_demographic: bool,
}
