//! Weighted statistics over question groups
//!
//! Every function here ignores missing values and treats the unweighted
//! case as weights of all ones, so weighted and unweighted paths share one
//! definition and one code path.
//!
//! Statistically meaningless situations (empty input, insufficient sample
//! size, a single-group comparison, a zero total weight) yield an
//! undefined result - `None` fields or a typed marker variant - never an
//! error. A batch report renders such a question as "insufficient data"
//! and moves on.
//!
//! - [`weighted`] - weighted mean / median / population standard deviation
//! - [`tables`] - descriptive statistics, frequency tables, mention
//!   tables, cross-tabulations
//! - [`significance`] - chi-square independence test and automatic
//!   group-difference testing (Mann-Whitney U, t-test, Kruskal-Wallis)
//! - [`correlation`] - Spearman / Pearson correlation matrices

pub mod correlation;
pub mod significance;
pub mod tables;
pub mod weighted;

pub use correlation::{CorrelationMatrix, CorrelationMethod, correlation_matrix};
pub use significance::{
    TestKind, TestResult, TestSelection, chi_square_test, test_group_differences,
};
pub use tables::{
    CrossTab, CrossTabMeansRow, DescriptiveRow, FrequencyRow, MultipleChoiceRow,
    cross_tab_frequencies, cross_tab_means, descriptive_stats, frequency_table,
    multiple_choice_table,
};
pub use weighted::{weighted_mean, weighted_median, weighted_std};
