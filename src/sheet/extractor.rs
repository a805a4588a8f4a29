//! Workbook extractor: reads an xls/xlsx/ods document and reshapes it

use super::{Grid, WorkbookLayout, reshape_workbook};
use crate::error::ExtractError;
use crate::etl::Extractor;
use crate::table::Table;

use calamine::{Reader, open_workbook_auto};
use eyre::Result;
use std::path::{Path, PathBuf};

/// Extracts a long-format table from a statistics workbook
///
/// The container format is picked from the file extension. Only sheets a
/// descriptor applies to are read; the rest are passed along by name so the
/// layout can still check that every named sheet exists.
pub struct WorkbookExtractor {
    path: PathBuf,
    layout: WorkbookLayout,
}

impl WorkbookExtractor {
    pub fn new(path: impl AsRef<Path>, layout: WorkbookLayout) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            layout,
        }
    }

    /// Read every applicable sheet into a grid, in document order
    pub fn read_sheets(&self) -> Result<Vec<Grid>, ExtractError> {
        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|e| ExtractError::file_format(&self.path, e))?;

        let names = workbook.sheet_names();
        log::debug!(
            "Workbook {} has {} sheet(s): {}",
            self.path.display(),
            names.len(),
            names.join(", ")
        );

        let mut grids = Vec::with_capacity(names.len());
        for name in names {
            if self.layout.descriptor_for(&name).is_none() {
                grids.push(Grid::empty(name));
                continue;
            }
            let range = workbook.worksheet_range(&name).map_err(|e| {
                ExtractError::file_format(&self.path, format!("sheet '{}': {}", name, e))
            })?;
            grids.push(Grid::from_range(name, &range));
        }
        Ok(grids)
    }

    /// Read and reshape the workbook
    pub fn read(&self) -> Result<Table> {
        log::info!("Reading workbook {}", self.path.display());
        let sheets = self.read_sheets()?;
        reshape_workbook(&self.layout, sheets)
    }
}

impl Extractor for WorkbookExtractor {
    async fn extract(&self) -> Result<Table> {
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::SheetDescriptor;
    use tempfile::TempDir;

    fn layout() -> WorkbookLayout {
        WorkbookLayout::new("age_group", "year", "people_num")
            .with_sheet(SheetDescriptor::new("Лист1", 0))
    }

    #[test]
    fn test_missing_file_is_format_error() {
        let temp_dir = TempDir::new().unwrap();
        let extractor = WorkbookExtractor::new(temp_dir.path().join("absent.xlsx"), layout());
        let err = extractor.read().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::FileFormat { .. })
        ));
    }

    #[test]
    fn test_not_a_spreadsheet() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("demography.xlsx");
        std::fs::write(&path, "age_group,year\n").unwrap();

        let err = WorkbookExtractor::new(&path, layout()).read().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::FileFormat { .. })
        ));
    }

    #[test]
    fn test_unknown_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("demography.txt");
        std::fs::write(&path, "hello").unwrap();

        assert!(WorkbookExtractor::new(&path, layout()).read().is_err());
    }
}
