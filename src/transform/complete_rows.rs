//! Complete-rows filter

use crate::etl::Transformer;
use crate::table::Table;
use eyre::Result;

/// Transformer that drops rows with a blank cell in any of the given columns
pub struct CompleteRows {
    columns: Vec<String>,
}

impl CompleteRows {
    pub fn new(columns: Vec<&str>) -> Self {
        Self {
            columns: columns.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Transformer for CompleteRows {
    fn transform(&self, mut table: Table) -> Result<Table> {
        let dropped = table.retain_complete(&self.columns)?;
        if dropped > 0 {
            log::debug!(
                "Dropped {} incomplete row(s) (columns: {})",
                dropped,
                self.columns.join(", ")
            );
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    #[test]
    fn test_drops_incomplete_rows() {
        let mut table = Table::new(["entry_date", "professional_roles_name", "salary"]);
        table
            .push_row(vec![Cell::text("2024-01-01"), Cell::text("Бухгалтер"), Cell::Null])
            .unwrap();
        table
            .push_row(vec![Cell::text("2024-01-01"), Cell::text(" "), Cell::Int(1)])
            .unwrap();
        table
            .push_row(vec![Cell::Null, Cell::text("Повар"), Cell::Int(1)])
            .unwrap();

        let output = CompleteRows::new(vec!["entry_date", "professional_roles_name"])
            .transform(table)
            .unwrap();
        assert_eq!(output.len(), 1);
        assert_eq!(output.value(0, "professional_roles_name"), Some(&Cell::text("Бухгалтер")));
    }
}
