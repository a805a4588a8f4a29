//! Statistics Ingest
//!
//! Extract-normalize-load for regional statistics: reshapes irregular
//! government spreadsheets and CSV extracts into canonical tables and loads
//! them into a dataset API one record per row.

pub mod cli;
pub mod client;
pub mod datasets;
pub mod error;
pub mod etl;
pub mod loader;
pub mod sheet;
pub mod storage;
pub mod table;
pub mod transform;

// Re-exports for convenience
pub use client::{DatasetApi, DatasetClient};
pub use datasets::{DatasetExtractor, DatasetKind, DatasetTransformer};
pub use error::ExtractError;
pub use etl::{Extractor, IdentityTransformer, Loader, Pipeline, Transformer};
pub use loader::{LoadReport, LookupJoin, Outcome, RecordLoader};
pub use sheet::{SheetDescriptor, WorkbookExtractor, WorkbookLayout};
pub use storage::{CsvReader, CsvWriter};
pub use table::{Cell, Schema, Table};
