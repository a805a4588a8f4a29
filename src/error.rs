//! Structural extraction errors
//!
//! These abort a run before anything is submitted. They travel inside
//! [`eyre::Report`] like every other error in the crate, so callers that need
//! to tell them apart use `report.downcast_ref::<ExtractError>()`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The document could not be opened or decoded
    #[error("Unreadable document {}: {reason}", .path.display())]
    FileFormat { path: PathBuf, reason: String },

    /// A sheet does not have the shape its descriptor promises
    #[error("Layout mismatch in sheet '{sheet}': {reason}")]
    Layout { sheet: String, reason: String },

    /// A period header that is not a whole year
    #[error("Corrupt period header '{label}' in sheet '{sheet}'")]
    CorruptPeriod { sheet: String, label: String },

    /// A delimited source without a column the dataset requires
    #[error("Missing required column '{column}' in {}", .path.display())]
    MissingColumn { path: PathBuf, column: String },
}

impl ExtractError {
    pub fn layout(sheet: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Layout {
            sheet: sheet.into(),
            reason: reason.into(),
        }
    }

    pub fn file_format(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::FileFormat {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = ExtractError::layout("2", "header row 40 is beyond the last row (30)");
        assert_eq!(
            err.to_string(),
            "Layout mismatch in sheet '2': header row 40 is beyond the last row (30)"
        );

        let err = ExtractError::file_format("data/jobs.xlsx", "invalid zip header");
        assert!(err.to_string().contains("data/jobs.xlsx"));
    }

    #[test]
    fn test_downcast_through_eyre() {
        let report: eyre::Report = ExtractError::CorruptPeriod {
            sheet: "1".to_string(),
            label: "2010.5".to_string(),
        }
        .into();

        assert!(matches!(
            report.downcast_ref::<ExtractError>(),
            Some(ExtractError::CorruptPeriod { .. })
        ));
    }
}
