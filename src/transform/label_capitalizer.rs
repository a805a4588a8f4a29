//! Label capitalizer transformer
//!
//! Normalizes the case of group labels so that "СЕЛЬСКОЕ хозяйство" and
//! "Сельское хозяйство" from different sheets become the same group.

use crate::etl::Transformer;
use crate::table::{Cell, Table};
use eyre::Result;

/// Transformer that upper-cases the first character of a text column and
/// lower-cases the rest
///
/// # Example
/// ```
/// use stat_ingest::transform::LabelCapitalizer;
/// use stat_ingest::etl::Transformer;
/// use stat_ingest::table::{Cell, Table};
///
/// let mut table = Table::new(["okved_group"]);
/// table.push_row(vec![Cell::text("ДОБЫЧА полезных ископаемых")]).unwrap();
///
/// let table = LabelCapitalizer::new("okved_group").transform(table).unwrap();
/// assert_eq!(table.rows()[0][0], Cell::text("Добыча полезных ископаемых"));
/// ```
pub struct LabelCapitalizer {
    column: String,
}

impl LabelCapitalizer {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

/// First character upper case, remainder lower case
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => {
            let mut capitalized: String = first.to_uppercase().collect();
            capitalized.push_str(&chars.as_str().to_lowercase());
            capitalized
        }
        None => String::new(),
    }
}

impl Transformer for LabelCapitalizer {
    fn transform(&self, mut table: Table) -> Result<Table> {
        table.map_column(&self.column, |cell| {
            if let Cell::Text(label) = cell {
                *label = capitalize(label);
            }
        })?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("всего"), "Всего");
        assert_eq!(capitalize("ОБРАЗОВАНИЕ"), "Образование");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("15-19 лет"), "15-19 лет");
    }

    #[test]
    fn test_non_text_cells_untouched() {
        let mut table = Table::new(["okved_group"]);
        table.push_row(vec![Cell::Int(5)]).unwrap();
        table.push_row(vec![Cell::Null]).unwrap();

        let output = LabelCapitalizer::new("okved_group").transform(table.clone()).unwrap();
        assert_eq!(output, table);
    }

    #[test]
    fn test_missing_column() {
        let table = Table::new(["year"]);
        assert!(LabelCapitalizer::new("okved_group").transform(table).is_err());
    }
}
