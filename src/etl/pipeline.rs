//! Pipeline orchestration for ETL operations

use super::{Extractor, Loader, Transformer};
use crate::storage::CsvWriter;
use eyre::{Context, Result};
use std::path::Path;

/// ETL Pipeline that orchestrates Extract, Transform, and Load operations
///
/// Runs strictly in sequence: the extracted table is fully materialized,
/// transformed, optionally written to a CSV checkpoint, and only then handed
/// to the loader.
///
/// # Type Parameters
/// - `E`: Extractor type
/// - `T`: Transformer type
/// - `L`: Loader type
///
/// # Example
/// ```no_run
/// use stat_ingest::etl::{IdentityTransformer, Pipeline};
/// use stat_ingest::storage::{CsvReader, CsvWriter};
///
/// # async fn example() -> eyre::Result<()> {
/// let pipeline = Pipeline::new(
///     CsvReader::new("okved_sections.csv"),
///     IdentityTransformer::new(),
///     CsvWriter::new("okved_out.csv"),
/// );
///
/// let rows = pipeline.run().await?;
/// println!("Wrote {} rows", rows);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
    checkpoint: Option<CsvWriter>,
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor,
    T: Transformer,
    L: Loader,
{
    /// Create a new pipeline
    pub fn new(extractor: E, transformer: T, loader: L) -> Self {
        Self {
            extractor,
            transformer,
            loader,
            checkpoint: None,
        }
    }

    /// Write the transformed table to a CSV file before loading it
    pub fn with_checkpoint(mut self, path: impl AsRef<Path>) -> Self {
        self.checkpoint = Some(CsvWriter::new(path));
        self
    }

    /// Run the complete ETL pipeline
    ///
    /// Steps:
    /// 1. Extract the table from the source
    /// 2. Transform it
    /// 3. Write the checkpoint, if configured
    /// 4. Load it to the destination
    ///
    /// # Errors
    /// Returns an error if extraction, transformation, the checkpoint write,
    /// or the loader as a whole fails
    pub async fn run(&self) -> Result<L::Report> {
        log::info!("Starting ETL pipeline");

        // Extract
        log::debug!("Extracting from source...");
        let table = self.extractor.extract().await?;
        log::info!("Extracted {} row(s)", table.len());

        if table.is_empty() {
            log::warn!("No rows extracted, pipeline complete");
            return Ok(L::Report::default());
        }

        // Transform
        log::debug!("Transforming table...");
        let table = self.transformer.transform(table)?;
        log::info!("Transformed into {} row(s)", table.len());

        if let Some(checkpoint) = &self.checkpoint {
            checkpoint
                .write(&table)
                .with_context(|| "Failed to write checkpoint")?;
            log::info!("Checkpoint written to {}", checkpoint.path().display());
        }

        // Load
        log::debug!("Loading to destination...");
        let report = self.loader.load(&table).await?;
        log::info!("Load complete");

        Ok(report)
    }
}
