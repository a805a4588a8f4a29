//! Spreadsheet extraction
//!
//! - [`WorkbookLayout`]: declarative description of a spreadsheet family
//! - [`Grid`]: one worksheet in absolute coordinates
//! - [`reshape_workbook`]: header offsets, concatenation and the wide-to-long pivot
//! - [`WorkbookExtractor`]: the [`Extractor`](crate::etl::Extractor) tying them together

mod extractor;
mod grid;
mod layout;
mod reshape;

pub use extractor::WorkbookExtractor;
pub use grid::Grid;
pub use layout::{
    ANY_SHEET, LabelCase, LabelRule, PeriodPolicy, SheetDescriptor, WorkbookLayout,
};
pub use reshape::{LabelNormalizer, parse_period, reshape_sheet, reshape_workbook};
