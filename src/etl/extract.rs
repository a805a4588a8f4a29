//! Extractor trait for reading source documents into tables

use crate::table::Table;
use eyre::Result;

/// Extractor trait for producing a canonical table from a source
///
/// Implementors define how to read one kind of source:
/// - Multi-sheet spreadsheets
/// - Delimited text files
/// - Previously written checkpoints
///
/// # Example
/// ```no_run
/// use stat_ingest::etl::Extractor;
/// use stat_ingest::table::Table;
/// use eyre::Result;
/// use std::path::PathBuf;
///
/// struct EmptySource {
///     path: PathBuf,
/// }
///
/// impl Extractor for EmptySource {
///     async fn extract(&self) -> Result<Table> {
///         Ok(Table::new(["year", "worker_num", "okved_group"]))
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// Extract the whole source as one table
    ///
    /// # Errors
    /// Returns an error if the source is unreadable or its layout does not
    /// match what the extractor expects. Such errors are fatal for the run.
    fn extract(&self) -> impl std::future::Future<Output = Result<Table>> + Send;
}
