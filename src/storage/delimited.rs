//! Delimited (CSV) file operations
//!
//! CSV is both a source format for registry extracts and the checkpoint
//! format the pipeline writes before submitting anything.

use crate::error::ExtractError;
use crate::etl::{Extractor, Loader};
use crate::table::{Cell, Schema, Table, coerce_text};

use eyre::{Context, Result};
use std::path::{Path, PathBuf};

/// Read a UTF-8 CSV file with a header row into a [`Table`]
///
/// Without a schema every non-blank cell is text. With a schema, columns the
/// schema declares are typed, and a required column missing from the header
/// is a fatal [`ExtractError::MissingColumn`].
pub struct CsvReader {
    path: PathBuf,
    schema: Option<Schema>,
}

impl CsvReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            schema: None,
        }
    }

    /// Type columns and require the schema's required columns
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Read the whole file
    pub fn read(&self) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| ExtractError::file_format(&self.path, e))?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| ExtractError::file_format(&self.path, e))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        if let Some(schema) = &self.schema {
            for column in schema.required_names() {
                if !columns.iter().any(|c| c == column) {
                    return Err(ExtractError::MissingColumn {
                        path: self.path.clone(),
                        column: column.to_string(),
                    }
                    .into());
                }
            }
        }

        let kinds: Vec<_> = columns
            .iter()
            .map(|c| {
                self.schema
                    .as_ref()
                    .and_then(|s| s.get(c))
                    .map(|f| f.kind)
            })
            .collect();

        let mut table = Table::new(columns.clone());
        for record in reader.records() {
            let record = record.map_err(|e| ExtractError::file_format(&self.path, e))?;
            let row = kinds
                .iter()
                .enumerate()
                .map(|(i, kind)| match (record.get(i), kind) {
                    (None, _) => Cell::Null,
                    (Some(raw), Some(kind)) => coerce_text(*kind, raw),
                    (Some(raw), None) => Cell::from_raw(raw),
                })
                .collect();
            table.push_row(row)?;
        }

        log::debug!(
            "Read {} row(s) with {} column(s) from {}",
            table.len(),
            table.columns().len(),
            self.path.display()
        );
        Ok(table)
    }
}

// Implement Extractor trait for reading CSV files

impl Extractor for CsvReader {
    async fn extract(&self) -> Result<Table> {
        self.read()
    }
}

/// Write a [`Table`] to a CSV file
pub struct CsvWriter {
    path: PathBuf,
}

impl CsvWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the header and every row, replacing any existing file
    pub fn write(&self, table: &Table) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("Failed to create CSV file: {}", self.path.display()))?;

        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to write CSV file: {}", self.path.display()))?;

        Ok(())
    }
}

// Implement Loader trait for writing CSV files

impl Loader for CsvWriter {
    type Report = usize;

    async fn load(&self, table: &Table) -> Result<usize> {
        self.write(table)?;
        Ok(table.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::FieldKind;
    use tempfile::TempDir;

    fn employment_schema() -> Schema {
        Schema::new("employment")
            .field("year", FieldKind::Integer)
            .field("worker_num", FieldKind::Decimal)
            .field("okved_group", FieldKind::Text)
    }

    #[test]
    fn test_read_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("jobs.csv");

        let mut table = Table::new(["year", "worker_num", "okved_group"]);
        table
            .push_row(vec![
                Cell::Int(2017),
                Cell::Float(83.4),
                Cell::text("Добыча полезных ископаемых"),
            ])
            .unwrap();
        table
            .push_row(vec![
                Cell::Int(2018),
                Cell::Float(90.0),
                Cell::text("Обрабатывающие производства, всего"),
            ])
            .unwrap();

        CsvWriter::new(&path).write(&table).unwrap();
        let read = CsvReader::new(&path)
            .with_schema(employment_schema())
            .read()
            .unwrap();

        assert_eq!(read, table);
    }

    #[test]
    fn test_untyped_read_keeps_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("okved.csv");
        std::fs::write(&path, "\u{feff}okved_code,okved_name\nA, Сельское хозяйство \nB,\n").unwrap();

        let table = CsvReader::new(&path).read().unwrap();
        assert_eq!(table.columns(), ["okved_code", "okved_name"]);
        assert_eq!(
            table.value(0, "okved_name"),
            Some(&Cell::text(" Сельское хозяйство "))
        );
        assert_eq!(table.value(1, "okved_name"), Some(&Cell::Null));
    }

    #[test]
    fn test_missing_required_column() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("jobs.csv");
        std::fs::write(&path, "year,okved_group\n2017,A\n").unwrap();

        let err = CsvReader::new(&path)
            .with_schema(employment_schema())
            .read()
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::MissingColumn { column, .. }) if column == "worker_num"
        ));
    }

    #[test]
    fn test_missing_file_is_file_format_error() {
        let err = CsvReader::new("/nonexistent/jobs.csv").read().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::FileFormat { .. })
        ));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fgos.csv");
        std::fs::write(&path, "fgos_code,fgos_name,fgos_prikaz\n09.02.07,Программист\n").unwrap();

        let table = CsvReader::new(&path).read().unwrap();
        assert_eq!(table.value(0, "fgos_prikaz"), Some(&Cell::Null));
    }

    #[tokio::test]
    async fn test_writer_as_loader() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("out.csv");
        let mut table = Table::new(["a", "b"]);
        table.push_row(vec![Cell::Null, Cell::Int(1)]).unwrap();

        let written = CsvWriter::new(&path).load(&table).await.unwrap();
        assert_eq!(written, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n,1\n");
    }
}
