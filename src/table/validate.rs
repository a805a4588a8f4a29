//! Row validation against a [`Schema`]
//!
//! Turns canonical rows into JSON records: text is trimmed, required fields
//! must be non-blank, numbers are coerced to the declared kind. A row that
//! fails any of this yields a [`Rejection`] instead of a record.

use super::{Cell, FieldKind, Schema, Table, whole_number};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One validated row, keyed by schema field name
pub type Record = Map<String, Value>;

static NULL: Cell = Cell::Null;

/// Why a row was excluded before submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    MissingField {
        field: String,
    },
    InvalidValue {
        field: String,
        value: String,
        expected: FieldKind,
    },
    UnresolvedLabel {
        field: String,
        label: String,
    },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "missing required field '{}'", field),
            Self::InvalidValue {
                field,
                value,
                expected,
            } => write!(f, "field '{}' value '{}' is not {}", field, value, expected),
            Self::UnresolvedLabel { field, label } => {
                write!(f, "no remote id for {} '{}'", field, label)
            }
        }
    }
}

/// Validates rows of one table against a schema
///
/// Column positions are resolved once; a schema field the table lacks is
/// treated as blank in every row.
pub struct RowValidator<'a> {
    schema: &'a Schema,
    positions: Vec<Option<usize>>,
}

impl<'a> RowValidator<'a> {
    pub fn new(schema: &'a Schema, table: &Table) -> Self {
        let positions = schema
            .fields
            .iter()
            .map(|f| table.column_index(&f.name))
            .collect();
        Self { schema, positions }
    }

    pub fn validate(&self, row: &[Cell]) -> Result<Record, Rejection> {
        let mut record = Record::new();
        for (field, position) in self.schema.fields.iter().zip(&self.positions) {
            let cell = position.and_then(|i| row.get(i)).unwrap_or(&NULL);

            if cell.is_blank() {
                if field.required {
                    return Err(Rejection::MissingField {
                        field: field.name.clone(),
                    });
                }
                record.insert(field.name.clone(), Value::Null);
                continue;
            }

            let value = coerce(field.kind, cell).ok_or_else(|| Rejection::InvalidValue {
                field: field.name.clone(),
                value: cell.to_string(),
                expected: field.kind,
            })?;
            record.insert(field.name.clone(), value);
        }
        Ok(record)
    }
}

/// Validate every row of `table`, in order
pub fn validate_table(schema: &Schema, table: &Table) -> Vec<Result<Record, Rejection>> {
    let validator = RowValidator::new(schema, table);
    table.rows().iter().map(|row| validator.validate(row)).collect()
}

fn coerce(kind: FieldKind, cell: &Cell) -> Option<Value> {
    match kind {
        FieldKind::Text => cell.to_label().map(Value::String),
        FieldKind::Integer => match cell {
            Cell::Int(i) => Some(Value::from(*i)),
            Cell::Float(f) => whole_number(*f).map(Value::from),
            Cell::Text(s) => s.trim().parse::<i64>().ok().map(Value::from),
            _ => None,
        },
        FieldKind::Decimal => cell.to_f64().map(Value::from),
        FieldKind::Date => {
            let label = cell.to_label()?;
            let date = NaiveDate::parse_from_str(&label, "%Y-%m-%d").ok()?;
            Some(Value::String(date.format("%Y-%m-%d").to_string()))
        }
    }
}

/// Type raw delimited text according to a field kind
///
/// Text that does not parse as the declared kind stays text, so validation
/// can still report it.
pub fn coerce_text(kind: FieldKind, raw: &str) -> Cell {
    if raw.trim().is_empty() {
        return Cell::Null;
    }
    match kind {
        FieldKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map_or_else(|_| Cell::text(raw), Cell::Int),
        FieldKind::Decimal => match raw.trim().parse::<f64>() {
            Ok(f) if f.is_finite() => Cell::Float(f),
            _ => Cell::text(raw),
        },
        FieldKind::Text | FieldKind::Date => Cell::text(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kcp_schema() -> Schema {
        Schema::new("kcp")
            .field("year", FieldKind::Integer)
            .field("study_field_name", FieldKind::Text)
            .field("kcp_num", FieldKind::Integer)
            .optional("share", FieldKind::Decimal)
    }

    fn table_of(rows: Vec<Vec<Cell>>) -> Table {
        let mut table = Table::new(["year", "study_field_name", "kcp_num", "share"]);
        for row in rows {
            table.push_row(row).unwrap();
        }
        table
    }

    #[test]
    fn test_trims_and_coerces() {
        let table = table_of(vec![vec![
            Cell::text(" 2024 "),
            Cell::text("  Информатика "),
            Cell::Float(25.0),
            Cell::text("0.5"),
        ]]);
        let results = validate_table(&kcp_schema(), &table);
        let record = results[0].as_ref().unwrap();
        assert_eq!(record["year"], json!(2024));
        assert_eq!(record["study_field_name"], json!("Информатика"));
        assert_eq!(record["kcp_num"], json!(25));
        assert_eq!(record["share"], json!(0.5));
    }

    #[test]
    fn test_missing_required_field() {
        let table = table_of(vec![vec![
            Cell::Int(2024),
            Cell::text("   "),
            Cell::Int(1),
            Cell::Null,
        ]]);
        let results = validate_table(&kcp_schema(), &table);
        assert_eq!(
            results[0],
            Err(Rejection::MissingField {
                field: "study_field_name".to_string()
            })
        );
    }

    #[test]
    fn test_optional_blank_is_null() {
        let table = table_of(vec![vec![
            Cell::Int(2024),
            Cell::text("Физика"),
            Cell::Int(1),
            Cell::Null,
        ]]);
        let record = validate_table(&kcp_schema(), &table).remove(0).unwrap();
        assert_eq!(record["share"], Value::Null);
    }

    #[test]
    fn test_uncoercible_integer() {
        let table = table_of(vec![vec![
            Cell::Int(2024),
            Cell::text("Физика"),
            Cell::Float(2.5),
            Cell::Null,
        ]]);
        let results = validate_table(&kcp_schema(), &table);
        assert!(matches!(
            &results[0],
            Err(Rejection::InvalidValue { field, expected: FieldKind::Integer, .. }) if field == "kcp_num"
        ));
    }

    #[test]
    fn test_out_of_range_integer() {
        let table = table_of(vec![vec![
            Cell::Int(2024),
            Cell::text("Физика"),
            Cell::Float(1e20),
            Cell::Null,
        ]]);
        let results = validate_table(&kcp_schema(), &table);
        assert!(matches!(
            &results[0],
            Err(Rejection::InvalidValue { field, .. }) if field == "kcp_num"
        ));
    }

    #[test]
    fn test_column_absent_from_table() {
        let schema = Schema::new("okved").field("okved_code", FieldKind::Text);
        let mut table = Table::new(["okved_name"]);
        table.push_row(vec![Cell::text("Добыча")]).unwrap();
        let results = validate_table(&schema, &table);
        assert_eq!(
            results[0].as_ref().unwrap_err().to_string(),
            "missing required field 'okved_code'"
        );
    }

    #[test]
    fn test_date_must_be_iso() {
        let schema = Schema::new("hh").field("entry_date", FieldKind::Date);
        let mut table = Table::new(["entry_date"]);
        table.push_row(vec![Cell::text("2024-03-01")]).unwrap();
        table.push_row(vec![Cell::text("01.03.2024")]).unwrap();
        let results = validate_table(&schema, &table);
        assert_eq!(results[0].as_ref().unwrap()["entry_date"], json!("2024-03-01"));
        assert!(results[1].is_err());
    }

    #[test]
    fn test_coerce_text() {
        assert_eq!(coerce_text(FieldKind::Integer, "42"), Cell::Int(42));
        assert_eq!(coerce_text(FieldKind::Decimal, "41.5"), Cell::Float(41.5));
        assert_eq!(coerce_text(FieldKind::Decimal, "abc"), Cell::text("abc"));
        assert_eq!(coerce_text(FieldKind::Text, ""), Cell::Null);
    }
}
