//! In-memory canonical table

use super::Cell;
use eyre::{Result, bail, eyre};

/// An ordered, fully materialized table with fixed column names
///
/// Every row has exactly one cell per column; [`Table::push_row`] enforces
/// that so positional access never goes out of bounds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| {
            eyre!(
                "Column '{}' not found. Available columns: {}",
                name,
                self.columns.join(", ")
            )
        })
    }

    /// Append a row, rejecting rows whose width differs from the column count
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            bail!(
                "Row has {} value(s) but the table has {} column(s)",
                row.len(),
                self.columns.len()
            );
        }
        self.rows.push(row);
        Ok(())
    }

    /// Get a cell by row index and column name
    pub fn value(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Iterate over one column's cells in row order
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Cell>> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(move |r| &r[idx]))
    }

    /// Concatenate another table with identical columns onto this one
    pub fn append(&mut self, other: Table) -> Result<()> {
        if self.columns != other.columns {
            bail!(
                "Cannot concatenate tables with different columns: [{}] vs [{}]",
                self.columns.join(", "),
                other.columns.join(", ")
            );
        }
        self.rows.extend(other.rows);
        Ok(())
    }

    /// Reorder (and project) columns
    pub fn select(self, columns: &[&str]) -> Result<Table> {
        let indices = columns
            .iter()
            .map(|c| self.require_column(c))
            .collect::<Result<Vec<_>>>()?;

        let rows = self
            .rows
            .into_iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok(Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        })
    }

    /// Drop every row with a blank cell in any of `columns`
    ///
    /// Returns the number of rows removed.
    pub fn retain_complete<S: AsRef<str>>(&mut self, columns: &[S]) -> Result<usize> {
        let indices = columns
            .iter()
            .map(|c| self.require_column(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let before = self.rows.len();
        self.rows
            .retain(|row| indices.iter().all(|&i| !row[i].is_blank()));
        Ok(before - self.rows.len())
    }

    /// Apply `f` to every cell of a column
    pub fn map_column(&mut self, name: &str, mut f: impl FnMut(&mut Cell)) -> Result<()> {
        let idx = self.require_column(name)?;
        for row in &mut self.rows {
            f(&mut row[idx]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(["year", "worker_num", "okved_group"]);
        table
            .push_row(vec![Cell::Int(2010), Cell::Float(1.5), Cell::text("A")])
            .unwrap();
        table
            .push_row(vec![Cell::Int(2011), Cell::Null, Cell::text("B")])
            .unwrap();
        table
            .push_row(vec![Cell::Int(2012), Cell::Float(3.0), Cell::text(" ")])
            .unwrap();
        table
    }

    #[test]
    fn test_push_row_checks_width() {
        let mut table = Table::new(["a", "b"]);
        assert!(table.push_row(vec![Cell::Int(1)]).is_err());
        assert!(table.push_row(vec![Cell::Int(1), Cell::Null]).is_ok());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_retain_complete() {
        let mut table = sample();
        let dropped = table.retain_complete(&["worker_num", "okved_group"]).unwrap();
        assert_eq!(dropped, 2);
        assert_eq!(table.len(), 1);
        assert_eq!(table.value(0, "okved_group"), Some(&Cell::text("A")));
    }

    #[test]
    fn test_retain_complete_unknown_column() {
        let mut table = sample();
        let err = table.retain_complete(&["people_num"]).unwrap_err();
        assert!(err.to_string().contains("Column 'people_num' not found"));
    }

    #[test]
    fn test_select_reorders() {
        let table = sample().select(&["okved_group", "year"]).unwrap();
        assert_eq!(table.columns(), ["okved_group", "year"]);
        assert_eq!(table.rows()[0], vec![Cell::text("A"), Cell::Int(2010)]);
    }

    #[test]
    fn test_append_requires_same_columns() {
        let mut table = sample();
        assert!(table.append(sample()).is_ok());
        assert_eq!(table.len(), 6);

        let other = Table::new(["year"]);
        assert!(table.append(other).is_err());
    }
}
