//! Vacancy counts per day and professional role
//!
//! The source is a raw export with one row per posting; it is reduced to a
//! count per (entry_date, professional role).

use crate::etl::Transformer;
use crate::table::{FieldKind, Schema, Table};
use crate::transform::{CompleteRows, CountBy, DateNormalizer};
use eyre::Result;

pub const RESOURCE: &str = "api/hh-ru-dataset/";

const DATE_COLUMN: &str = "entry_date";
const ROLE_COLUMN: &str = "professional_roles_name";

pub fn schema() -> Schema {
    Schema::new("vacancies")
        .field("entry_date", FieldKind::Date)
        .field("professional_role", FieldKind::Text)
        .field("vacancies_num", FieldKind::Integer)
}

/// Columns the raw export must carry
pub fn source_schema() -> Schema {
    Schema::new("vacancy_postings")
        .field(DATE_COLUMN, FieldKind::Text)
        .field(ROLE_COLUMN, FieldKind::Text)
}

/// Normalize dates, drop postings without a date or role, count the rest
pub fn aggregate(table: Table) -> Result<Table> {
    let steps = (
        (
            DateNormalizer::new(DATE_COLUMN),
            CompleteRows::new(vec![DATE_COLUMN, ROLE_COLUMN]),
        ),
        CountBy::new("vacancies_num")
            .key(DATE_COLUMN, "entry_date")
            .key(ROLE_COLUMN, "professional_role"),
    );
    steps.transform(table)
}
