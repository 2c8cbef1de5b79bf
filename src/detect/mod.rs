//! Column classification and header parsing
//!
//! This module looks at one column at a time, in isolation:
//!
//! - **Signature detection** - classify a column's value sequence as one of
//!   the closed set of signatures (empty, multiple choice, Likert, numeric
//!   scale, single choice, open text)
//! - **Header parsing** - split a raw header into an optional question
//!   identifier, a parent label, and an optional inline sub-item label
//!
//! Both are pure functions of their input: the signature depends only on
//! the column's non-missing value multiset, never on value order or on
//! neighbouring columns.
//!
//! ## Example
//!
//! ```rust
//! use survey_analytics::detect::{DetectionConfig, detect_column, parse_header, ColumnSignature};
//!
//! let config = DetectionConfig::default();
//! let cells: Vec<Option<String>> = ["1: Tak", "2: Nie", "1: Tak"]
//!     .iter()
//!     .map(|v| Some(v.to_string()))
//!     .collect();
//!
//! assert!(matches!(detect_column(&cells, &config), ColumnSignature::Likert { .. }));
//!
//! let parts = parse_header("B2a. Czy korzystasz z tej usługi", &config);
//! assert_eq!(parts.id.as_deref(), Some("B2a"));
//! ```

mod config;
mod header;
mod signature;

pub use config::{DetectionConfig, DetectionConfigBuilder};
pub use header::{HeaderParts, parse_header};
pub use signature::{ColumnSignature, detect_column, likert_code};
