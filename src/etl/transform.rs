//! Transformer trait for table-to-table steps

use crate::table::Table;
use eyre::Result;

/// Transformer trait for reshaping or cleaning a table
///
/// Implementors define one step:
/// - Dropping incomplete rows
/// - Normalizing labels
/// - Aggregating
///
/// Steps compose as tuples: `(first, second)` runs `first` then `second`.
///
/// # Example
/// ```
/// use stat_ingest::etl::Transformer;
/// use stat_ingest::table::{Cell, Table};
/// use eyre::Result;
///
/// struct UppercaseLabels;
///
/// impl Transformer for UppercaseLabels {
///     fn transform(&self, mut table: Table) -> Result<Table> {
///         table.map_column("okved_group", |cell| {
///             if let Cell::Text(s) = cell {
///                 *s = s.to_uppercase();
///             }
///         })?;
///         Ok(table)
///     }
/// }
///
/// let mut table = Table::new(["okved_group"]);
/// table.push_row(vec![Cell::text("добыча")]).unwrap();
/// let table = UppercaseLabels.transform(table).unwrap();
/// assert_eq!(table.rows()[0][0], Cell::text("ДОБЫЧА"));
/// ```
pub trait Transformer: Send + Sync {
    /// Transform a whole table
    ///
    /// # Errors
    /// Returns an error if the table lacks a column the step needs
    fn transform(&self, table: Table) -> Result<Table>;
}

impl<A: Transformer, B: Transformer> Transformer for (A, B) {
    fn transform(&self, table: Table) -> Result<Table> {
        self.1.transform(self.0.transform(table)?)
    }
}

/// Identity transformer that passes tables through unchanged
///
/// Registry datasets are validated by the loader and need no reshaping.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityTransformer;

impl IdentityTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for IdentityTransformer {
    fn transform(&self, table: Table) -> Result<Table> {
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    struct AppendRow(i64);

    impl Transformer for AppendRow {
        fn transform(&self, mut table: Table) -> Result<Table> {
            table.push_row(vec![Cell::Int(self.0)])?;
            Ok(table)
        }
    }

    #[test]
    fn test_identity_transformer() {
        let mut table = Table::new(["n"]);
        table.push_row(vec![Cell::Int(1)]).unwrap();
        let output = IdentityTransformer::new().transform(table.clone()).unwrap();
        assert_eq!(table, output);
    }

    #[test]
    fn test_tuple_runs_in_order() {
        let chain = (AppendRow(1), AppendRow(2));
        let output = chain.transform(Table::new(["n"])).unwrap();
        let values: Vec<_> = output.column("n").unwrap().cloned().collect();
        assert_eq!(values, vec![Cell::Int(1), Cell::Int(2)]);
    }
}
