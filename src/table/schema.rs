//! Canonical schema description
//!
//! A schema names the fields a dataset family submits, their types, and
//! whether they must be present. It drives both local validation and the
//! typing of checkpoint files read back from disk.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    /// Calendar date rendered as `YYYY-MM-DD`
    Date,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Integer => write!(f, "integer"),
            Self::Decimal => write!(f, "decimal"),
            Self::Date => write!(f, "date"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a required field
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(Field {
            name: name.into(),
            kind,
            required: true,
        });
        self
    }

    /// Add an optional field
    pub fn optional(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(Field {
            name: name.into(),
            kind,
            required: false,
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn required_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_order_and_required() {
        let schema = Schema::new("kcp")
            .field("year", FieldKind::Integer)
            .field("study_field_code", FieldKind::Text)
            .optional("note", FieldKind::Text);

        assert_eq!(schema.column_names(), ["year", "study_field_code", "note"]);
        assert_eq!(schema.required_names(), ["year", "study_field_code"]);
        assert_eq!(schema.get("year").map(|f| f.kind), Some(FieldKind::Integer));
        assert!(schema.get("missing").is_none());
    }

    #[test]
    fn test_yaml_defaults_to_required() {
        let yaml = "name: okved\nfields:\n  - name: okved_code\n    kind: text\n";
        let schema: Schema = serde_yaml::from_str(yaml).unwrap();
        assert!(schema.fields[0].required);
        assert_eq!(schema.fields[0].kind, FieldKind::Text);
    }
}
