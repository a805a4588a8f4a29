//! Canonical tables and the helpers that validate them
//!
//! Every dataset family produces a [`Table`] with fixed columns; the loader
//! checks each row against the family's [`Schema`] before it is submitted.

mod canonical;
mod cell;
mod schema;
mod validate;

pub use canonical::Table;
pub use cell::{Cell, whole_number};
pub use schema::{Field, FieldKind, Schema};
pub use validate::{Record, Rejection, RowValidator, coerce_text, validate_table};
