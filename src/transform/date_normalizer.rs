//! Date normalizer transformer
//!
//! Vacancy exports write dates day-first (`05.03.2024`), sometimes with a
//! time component; the dataset API wants `YYYY-MM-DD`.

use crate::etl::Transformer;
use crate::table::{Cell, Table};
use chrono::NaiveDate;
use eyre::Result;

const FORMATS: &[&str] = &["%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Transformer that rewrites a date column as ISO dates
///
/// Unparseable values become null so a following [`CompleteRows`] step can
/// drop them.
///
/// [`CompleteRows`]: super::CompleteRows
pub struct DateNormalizer {
    column: String,
}

impl DateNormalizer {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

/// Parse the date part of a timestamp-like string
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.trim().split([' ', 'T']).next()?;
    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date, format).ok())
}

impl Transformer for DateNormalizer {
    fn transform(&self, mut table: Table) -> Result<Table> {
        let mut invalid = 0usize;
        table.map_column(&self.column, |cell| {
            if cell.is_blank() {
                *cell = Cell::Null;
                return;
            }
            *cell = match cell.to_label().as_deref().and_then(parse_date) {
                Some(date) => Cell::Text(date.format("%Y-%m-%d").to_string()),
                None => {
                    invalid += 1;
                    Cell::Null
                }
            };
        })?;

        if invalid > 0 {
            log::warn!("{} value(s) in '{}' are not dates", invalid, self.column);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_date("05.03.2024"), expected);
        assert_eq!(parse_date("05/03/2024"), expected);
        assert_eq!(parse_date("2024-03-05T10:15:00"), expected);
        assert_eq!(parse_date(" 05.03.2024 10:15 "), expected);
        assert_eq!(parse_date("31.02.2024"), None);
        assert_eq!(parse_date("вчера"), None);
    }

    #[test]
    fn test_normalize_column() {
        let mut table = Table::new(["entry_date"]);
        for raw in ["05.03.2024", "n/a", ""] {
            table.push_row(vec![Cell::from_raw(raw)]).unwrap();
        }

        let output = DateNormalizer::new("entry_date").transform(table).unwrap();
        let dates: Vec<_> = output.column("entry_date").unwrap().cloned().collect();
        assert_eq!(dates, vec![Cell::text("2024-03-05"), Cell::Null, Cell::Null]);
    }
}
