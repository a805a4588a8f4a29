//! Column selector transformer

use crate::etl::Transformer;
use crate::table::Table;
use eyre::Result;

/// Transformer that projects a table onto the given columns, in that order
///
/// Source extracts often carry dozens of columns the target dataset never
/// uses; selecting early keeps checkpoints small.
///
/// # Example
/// ```
/// use stat_ingest::transform::ColumnSelector;
/// use stat_ingest::etl::Transformer;
/// use stat_ingest::table::{Cell, Table};
///
/// let mut table = Table::new(["okved_name", "okved_code", "parent"]);
/// table.push_row(vec![Cell::text("Растениеводство"), Cell::text("01.1"), Cell::Null]).unwrap();
///
/// let table = ColumnSelector::new(vec!["okved_code", "okved_name"]).transform(table).unwrap();
/// assert_eq!(table.columns(), ["okved_code", "okved_name"]);
/// ```
pub struct ColumnSelector {
    columns: Vec<String>,
}

impl ColumnSelector {
    pub fn new(columns: Vec<&str>) -> Self {
        Self {
            columns: columns.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Transformer for ColumnSelector {
    fn transform(&self, table: Table) -> Result<Table> {
        let columns: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        table.select(&columns)
    }
}
