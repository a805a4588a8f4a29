//! Population by age group

use crate::table::{FieldKind, Schema};

pub const RESOURCE: &str = "api/demography-datasets/";
pub const LAYOUT: &str = include_str!("../../layouts/demography.yml");

pub fn schema() -> Schema {
    Schema::new("demography")
        .field("age_group", FieldKind::Text)
        .field("year", FieldKind::Integer)
        .field("people_num", FieldKind::Decimal)
}
