//! Table cell values

use serde_json::Value;
use std::fmt;

/// Exact integer value of a float
///
/// `None` when the value has a fractional part, is not finite, or lies
/// outside the `i64` range.
pub fn whole_number(value: f64) -> Option<i64> {
    // 2^63, exactly representable; i64::MAX as f64 rounds up to it
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (value.fract() == 0.0 && (-LIMIT..LIMIT).contains(&value)).then_some(value as i64)
}

/// A single value in a [`Table`](super::Table)
///
/// Spreadsheets hand back numbers for cells that look like text (years are
/// often stored as `2010.0`) and text for cells that look like numbers, so
/// the accessors here convert leniently and report `None` instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Build a text cell, mapping blank input to [`Cell::Null`]
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Self::Null
        } else {
            Self::Text(raw.to_string())
        }
    }

    /// Null, or text that is empty after trimming
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Int(_) | Self::Float(_) => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the cell. Text is trimmed and parsed; non-finite
    /// values are treated as missing.
    pub fn to_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Null => return None,
            Self::Int(i) => *i as f64,
            Self::Float(f) => *f,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Trimmed textual view of the cell. Whole floats render without the
    /// fractional part so `2010.0` reads as `2010`.
    pub fn to_label(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => {
                Some((*f as i64).to_string())
            }
            Self::Float(f) => Some(f.to_string()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Text(s) => Value::String(s.clone()),
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
        }
    }
}

/// Checkpoint rendering: null is an empty field
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(s) => write!(f, "{}", s),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_number() {
        assert_eq!(whole_number(2010.0), Some(2010));
        assert_eq!(whole_number(-3.0), Some(-3));
        assert_eq!(whole_number(2010.5), None);
        assert_eq!(whole_number(1e20), None);
        assert_eq!(whole_number(-1e30), None);
        assert_eq!(whole_number(f64::INFINITY), None);
        assert_eq!(whole_number(f64::NAN), None);
    }

    #[test]
    fn test_blank_detection() {
        assert!(Cell::Null.is_blank());
        assert!(Cell::text("   ").is_blank());
        assert!(!Cell::text(" a ").is_blank());
        assert!(!Cell::Int(0).is_blank());
        assert_eq!(Cell::from_raw("\t"), Cell::Null);
    }

    #[test]
    fn test_numeric_view() {
        assert_eq!(Cell::Int(7).to_f64(), Some(7.0));
        assert_eq!(Cell::text(" 12.5 ").to_f64(), Some(12.5));
        assert_eq!(Cell::text("н/д").to_f64(), None);
        assert_eq!(Cell::Float(f64::NAN).to_f64(), None);
        assert_eq!(Cell::Null.to_f64(), None);
    }

    #[test]
    fn test_label_view() {
        assert_eq!(Cell::Float(2010.0).to_label().as_deref(), Some("2010"));
        assert_eq!(Cell::Float(2010.5).to_label().as_deref(), Some("2010.5"));
        assert_eq!(Cell::text("  Всего ").to_label().as_deref(), Some("Всего"));
        assert_eq!(Cell::text("  ").to_label(), None);
    }

    #[test]
    fn test_display_matches_checkpoint_format() {
        assert_eq!(Cell::Null.to_string(), "");
        assert_eq!(Cell::Float(418.0).to_string(), "418");
        assert_eq!(Cell::Float(41.25).to_string(), "41.25");
        assert_eq!(Cell::Int(-3).to_string(), "-3");
    }
}
