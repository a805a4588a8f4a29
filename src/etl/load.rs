//! Loader trait for writing tables to destinations

use crate::table::Table;
use eyre::Result;

/// Loader trait for loading a table to a destination
///
/// Implementors define how to load rows to destinations:
/// - Remote dataset APIs
/// - Checkpoint files
///
/// # Example
/// ```no_run
/// use stat_ingest::etl::Loader;
/// use stat_ingest::table::Table;
/// use eyre::Result;
///
/// struct RowCounter;
///
/// impl Loader for RowCounter {
///     type Report = usize;
///
///     async fn load(&self, table: &Table) -> Result<Self::Report> {
///         Ok(table.len())
///     }
/// }
/// ```
pub trait Loader: Send + Sync {
    /// What a completed load reports back
    type Report: Send + Default;

    /// Load the table to the destination
    ///
    /// # Errors
    /// Returns an error only when the load cannot proceed at all. Per-row
    /// failures belong in the report.
    fn load(&self, table: &Table)
    -> impl std::future::Future<Output = Result<Self::Report>> + Send;
}
