//! Table transformers
//!
//! Cleanup and aggregation steps shared by the dataset families. Each one
//! implements [`Transformer`](crate::etl::Transformer) and composes with the
//! others as a tuple.

mod column_selector;
mod complete_rows;
mod count_by;
mod date_normalizer;
mod label_capitalizer;

pub use column_selector::ColumnSelector;
pub use complete_rows::CompleteRows;
pub use count_by::CountBy;
pub use date_normalizer::{DateNormalizer, parse_date};
pub use label_capitalizer::{LabelCapitalizer, capitalize};
