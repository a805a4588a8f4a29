//! Classification and registry tables
//!
//! Flat CSV extracts loaded as is: OKVED codes, the professions classifier,
//! educational standards (FGOS), professional standards and admission quotas
//! (KCP).

use crate::table::{FieldKind, Schema};

pub fn okved() -> Schema {
    Schema::new("okved")
        .field("okved_code", FieldKind::Text)
        .field("okved_name", FieldKind::Text)
}

pub fn professions() -> Schema {
    Schema::new("professions")
        .field("prof_code", FieldKind::Text)
        .field("prof_name", FieldKind::Text)
}

pub fn fgos() -> Schema {
    Schema::new("fgos")
        .field("fgos_code", FieldKind::Text)
        .field("fgos_name", FieldKind::Text)
        .field("fgos_prikaz", FieldKind::Text)
}

pub fn prof_standards() -> Schema {
    Schema::new("prof_standards")
        .field("prof_standard_code", FieldKind::Text)
        .field("prof_standard_sphere", FieldKind::Text)
        .field("prof_standard_type", FieldKind::Text)
        .field("prof_standard_name", FieldKind::Text)
}

pub fn kcp() -> Schema {
    Schema::new("kcp")
        .field("year", FieldKind::Integer)
        .field("study_field_code", FieldKind::Text)
        .field("study_field_name", FieldKind::Text)
        .field("kcp_num", FieldKind::Integer)
}
