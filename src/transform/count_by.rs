//! Group-and-count aggregation

use crate::etl::Transformer;
use crate::table::{Cell, Table};
use eyre::{Result, eyre};
use std::collections::BTreeMap;

/// Transformer that counts rows per distinct key
///
/// Output columns are the renamed key columns followed by the count column,
/// one row per distinct key combination, sorted by key. Rows with a blank
/// key are not counted.
///
/// # Example
/// ```
/// use stat_ingest::transform::CountBy;
/// use stat_ingest::etl::Transformer;
/// use stat_ingest::table::{Cell, Table};
///
/// let mut table = Table::new(["professional_roles_name"]);
/// for role in ["Повар", "Бухгалтер", "Повар"] {
///     table.push_row(vec![Cell::text(role)]).unwrap();
/// }
///
/// let counts = CountBy::new("vacancies_num")
///     .key("professional_roles_name", "professional_role")
///     .transform(table)
///     .unwrap();
/// assert_eq!(counts.rows()[1], vec![Cell::text("Повар"), Cell::Int(2)]);
/// ```
pub struct CountBy {
    keys: Vec<(String, String)>,
    count_column: String,
}

impl CountBy {
    pub fn new(count_column: impl Into<String>) -> Self {
        Self {
            keys: Vec::new(),
            count_column: count_column.into(),
        }
    }

    /// Group by `source`, named `target` in the output
    pub fn key(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.keys.push((source.into(), target.into()));
        self
    }
}

impl Transformer for CountBy {
    fn transform(&self, table: Table) -> Result<Table> {
        let indices = self
            .keys
            .iter()
            .map(|(source, _)| {
                table
                    .column_index(source)
                    .ok_or_else(|| eyre!("Column '{}' not found", source))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut counts: BTreeMap<Vec<String>, i64> = BTreeMap::new();
        for row in table.rows() {
            let key: Option<Vec<String>> = indices.iter().map(|&i| row[i].to_label()).collect();
            if let Some(key) = key {
                *counts.entry(key).or_default() += 1;
            }
        }

        let mut output = Table::new(
            self.keys
                .iter()
                .map(|(_, target)| target.clone())
                .chain(std::iter::once(self.count_column.clone())),
        );
        for (key, count) in counts {
            let mut row: Vec<Cell> = key.into_iter().map(Cell::Text).collect();
            row.push(Cell::Int(count));
            output.push_row(row)?;
        }

        log::debug!("Counted {} row(s) into {} group(s)", table.len(), output.len());
        Ok(output)
    }
}
