//! Survey Analytics Core - Question inference and weighted statistics
//!
//! Provides unified building blocks for survey analysis pipelines:
//! - Column type detection (Likert scales, numeric scales, multiple choice,
//!   single choice, open text)
//! - Header parsing (question identifiers and inline sub-item labels)
//! - Question grouping (one ordered scan partitioning columns into groups)
//! - Flat schema export/reload, so a reviewed schema can bypass re-detection
//! - Weighted descriptive statistics, frequency tables, cross-tabulations
//!   and significance tests over the detected groups
//!
//! Rendering, document assembly and file-format concerns live in consumer
//! crates; this core only ever sees an in-memory [`Dataset`].

pub mod dataset;
pub mod detect;
pub mod extract;
pub mod group;
pub mod schema;
pub mod stats;

// Re-export commonly used types
pub use dataset::{Dataset, DatasetError};
pub use detect::{
    ColumnSignature, DetectionConfig, DetectionConfigBuilder, HeaderParts, detect_column,
    parse_header,
};
pub use extract::{GroupData, extract_group_data, find_weight_column};
pub use group::{
    ChartHint, GroupScanner, GroupingConfig, GroupingConfigBuilder, QuestionGroup, QuestionType,
    detect_questions, detect_questions_with,
};
pub use schema::{SchemaError, SurveySchema, export_schema, load_schema};
pub use stats::{
    CorrelationMatrix, CorrelationMethod, CrossTab, CrossTabMeansRow, DescriptiveRow,
    FrequencyRow, MultipleChoiceRow, TestKind, TestResult, TestSelection, chi_square_test,
    correlation_matrix, cross_tab_frequencies, cross_tab_means, descriptive_stats,
    frequency_table, multiple_choice_table, test_group_differences, weighted_mean,
    weighted_median, weighted_std,
};
