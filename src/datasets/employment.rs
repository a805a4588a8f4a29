//! Employment by OKVED section
//!
//! Records reference an OKVED section by remote id, so loading goes through a
//! lookup join on `okved_sections/`.

use crate::loader::LookupJoin;
use crate::table::{FieldKind, Record, Schema};
use serde_json::{Value, json};

pub const RESOURCE: &str = "employment_minstat/";
pub const SECTIONS_RESOURCE: &str = "okved_sections/";
pub const LAYOUT: &str = include_str!("../../layouts/employment.yml");
pub const ALL_SHEETS_LAYOUT: &str = include_str!("../../layouts/employment_all_sheets.yml");

pub fn schema() -> Schema {
    Schema::new("employment")
        .field("year", FieldKind::Integer)
        .field("worker_num", FieldKind::Decimal)
        .field("okved_group", FieldKind::Text)
}

pub fn payload(record: &Record) -> Value {
    let field = |name: &str| record.get(name).cloned().unwrap_or(Value::Null);
    json!({
        "year": field("year"),
        "number_of_employees": field("worker_num"),
        "okved_section_id": field("okved_section_id"),
    })
}

/// New sections carry only a name; code and image are filled in by hand
fn section_seed(label: &str) -> Value {
    json!({
        "okved_section_name": label,
        "okved_section_code": "",
        "img_url": "",
    })
}

pub fn lookup() -> LookupJoin {
    LookupJoin {
        resource: SECTIONS_RESOURCE.to_string(),
        label_field: "okved_group".to_string(),
        name_field: "okved_section_name".to_string(),
        id_field: "id".to_string(),
        target_field: "okved_section_id".to_string(),
        seed: section_seed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_renames_fields() {
        let record = json!({
            "year": 2017,
            "worker_num": 152.3,
            "okved_group": "Образование",
            "okved_section_id": 4
        });
        let payload = payload(record.as_object().unwrap());
        assert_eq!(
            payload,
            json!({"year": 2017, "number_of_employees": 152.3, "okved_section_id": 4})
        );
    }

    #[test]
    fn test_section_seed() {
        assert_eq!(section_seed("Образование")["okved_section_code"], "");
    }
}
