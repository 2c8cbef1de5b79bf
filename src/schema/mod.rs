//! Flat serializable question schema
//!
//! Detection results can be exported as a flat YAML document, reviewed and
//! hand-edited by an analyst, and loaded back verbatim - bypassing
//! re-detection on later runs. The document carries the ordered question
//! list and, optionally, the identifiers of the questions to use as
//! breakdown dimensions in cross-tabulations.
//!
//! A schema that lacks a non-empty `questions` section is a corrupted or
//! incompatible artifact: loading fails fast with [`SchemaError`] instead
//! of limping on with partial data.
//!
//! ## Example
//!
//! ```rust,ignore
//! use survey_analytics::{detect_questions, export_schema, load_schema};
//!
//! let groups = detect_questions(&dataset);
//! let yaml = export_schema(&groups)?;
//! let (reloaded, breakdowns) = load_schema(&yaml)?;
//! assert_eq!(reloaded, groups);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::group::QuestionGroup;

/// Errors raised while loading a serialized schema
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The document lacks a non-empty `questions` section
    #[error("invalid schema: missing or empty 'questions' section")]
    MissingQuestions,

    /// The document is not valid YAML for this schema
    #[error("schema parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// The flat schema document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveySchema {
    /// Ordered question groups
    #[serde(default)]
    pub questions: Vec<QuestionGroup>,

    /// Identifiers of the questions to use as breakdown dimensions;
    /// absent means "fall back to the demographic flags"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorical_questions: Option<Vec<String>>,
}

/// Serialize question groups into the flat YAML schema
pub fn export_schema(groups: &[QuestionGroup]) -> Result<String, SchemaError> {
    let schema = SurveySchema {
        questions: groups.to_vec(),
        categorical_questions: None,
    };
    Ok(serde_yaml::to_string(&schema)?)
}

/// Load a serialized schema back into question groups
///
/// Returns the ordered groups plus the optional breakdown-dimension
/// identifier list. Fails with [`SchemaError::MissingQuestions`] when the
/// `questions` section is absent or empty.
pub fn load_schema(
    serialized: &str,
) -> Result<(Vec<QuestionGroup>, Option<Vec<String>>), SchemaError> {
    let schema: SurveySchema = serde_yaml::from_str(serialized)?;
    if schema.questions.is_empty() {
        return Err(SchemaError::MissingQuestions);
    }
    let breakdowns = schema
        .categorical_questions
        .map(|ids| ids.into_iter().map(|id| id.trim().to_string()).collect());
    Ok((schema.questions, breakdowns))
}
