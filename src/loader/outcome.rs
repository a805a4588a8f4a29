//! Per-row outcomes and the run report

use crate::table::Rejection;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What happened to one row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Accepted,
    /// Excluded before submission
    RejectedLocally { reason: Rejection },
    /// The API answered with a status outside the accepted set
    RejectedRemotely { status: u16, body: String },
    /// The request never completed
    TransportFailed { error: String },
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accepted => write!(f, "accepted"),
            Self::RejectedLocally { reason } => write!(f, "rejected locally: {}", reason),
            Self::RejectedRemotely { status, body } => {
                write!(f, "rejected remotely ({}): {}", status, body)
            }
            Self::TransportFailed { error } => write!(f, "transport failed: {}", error),
        }
    }
}

/// A row that was not accepted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedRow {
    /// Zero-based row index in the loaded table
    pub index: usize,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Tally of one load run
///
/// Every row of the input table is counted exactly once. Failures are kept
/// in row order so the report can drive a re-run of just those rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    pub accepted: usize,
    pub rejected_locally: usize,
    pub rejected_remotely: usize,
    pub transport_failed: usize,
    pub failures: Vec<FailedRow>,
}

impl LoadReport {
    pub fn record(&mut self, index: usize, outcome: Outcome) {
        match &outcome {
            Outcome::Accepted => {
                self.accepted += 1;
                return;
            }
            Outcome::RejectedLocally { .. } => self.rejected_locally += 1,
            Outcome::RejectedRemotely { .. } => self.rejected_remotely += 1,
            Outcome::TransportFailed { .. } => self.transport_failed += 1,
        }
        self.failures.push(FailedRow { index, outcome });
    }

    /// Number of rows considered
    pub fn total(&self) -> usize {
        self.accepted + self.rejected_locally + self.rejected_remotely + self.transport_failed
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Indices of rows that were not accepted, in row order
    pub fn failed_indices(&self) -> Vec<usize> {
        self.failures.iter().map(|f| f.index).collect()
    }

    /// Read a report written by [`LoadReport::write`]
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read load report: {}", path.as_ref().display())
        })?;
        serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse load report: {}", path.as_ref().display())
        })
    }

    /// Write the report as pretty JSON
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json).with_context(|| {
            format!("Failed to write load report: {}", path.as_ref().display())
        })
    }
}

impl std::fmt::Display for LoadReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} accepted, {} rejected locally, {} rejected remotely, {} transport failed",
            self.accepted, self.rejected_locally, self.rejected_remotely, self.transport_failed
        )
    }
}
