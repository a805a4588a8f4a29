//! Dense, absolutely indexed view of one worksheet

use crate::table::Cell;
use calamine::{Data, Range};

/// A worksheet as rows of cells
///
/// Row and column indices are absolute: row 0 is the first row of the sheet
/// even when the sheet's used range starts further down, so header offsets
/// mean the same thing they mean in a spreadsheet application.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    name: String,
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// A sheet that was not read; stands in for sheets no descriptor applies to
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Copy a calamine range into absolute coordinates
    pub fn from_range(name: impl Into<String>, range: &Range<Data>) -> Self {
        let rows = match range.end() {
            Some((last_row, last_col)) => (0..=last_row)
                .map(|r| {
                    (0..=last_col)
                        .map(|c| range.get_value((r, c)).map_or(Cell::Null, Cell::from))
                        .collect()
                })
                .collect(),
            None => Vec::new(),
        };
        Self::new(name, rows)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Widest row in the sheet
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell at an absolute position; `None` outside the used area
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(i) => Cell::Int(*i),
            Data::Float(f) => Cell::Float(*f),
            Data::String(s) => Cell::from_raw(s),
            Data::Bool(b) => Cell::Text(b.to_string()),
            Data::DateTime(dt) => Cell::Float(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from_raw(s),
            // Errors (#DIV/0!, #N/A) and empty cells carry no value
            _ => Cell::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_range_keeps_absolute_positions() {
        // Used area starts at C3
        let mut range = Range::new((2, 2), (3, 3));
        range.set_value((2, 2), Data::String("Всего".to_string()));
        range.set_value((3, 3), Data::Float(12.5));

        let grid = Grid::from_range("1", &range);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.cell(0, 0), Some(&Cell::Null));
        assert_eq!(grid.cell(2, 2), Some(&Cell::text("Всего")));
        assert_eq!(grid.cell(3, 3), Some(&Cell::Float(12.5)));
        assert_eq!(grid.cell(4, 0), None);
    }

    #[test]
    fn test_empty_range() {
        let range: Range<Data> = Range::empty();
        let grid = Grid::from_range("Содержание", &range);
        assert_eq!(grid.height(), 0);
        assert_eq!(grid.width(), 0);
    }

    #[test]
    fn test_data_conversion() {
        assert_eq!(Cell::from(&Data::Int(3)), Cell::Int(3));
        assert_eq!(Cell::from(&Data::String("  ".to_string())), Cell::Null);
        assert_eq!(Cell::from(&Data::Empty), Cell::Null);
    }
}
