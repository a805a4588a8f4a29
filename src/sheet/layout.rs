//! Declarative sheet layouts
//!
//! A layout describes how every sheet of one family of spreadsheets is
//! reshaped. Layouts are plain YAML so a new source format needs a new file,
//! not new code.
//!
//! Example format:
//! ```yaml
//! group_column: okved_group
//! period_column: year
//! measure_column: worker_num
//! columns: [year, worker_num, okved_group]
//! skip_sheets: [Содержание]
//! label_case: capitalize
//! sheets:
//!   - sheet: "1"
//!     header_row: 6
//!     periods: ["2010", "2011", "2012"]
//!     row_limit: 19
//!   - sheet: "2"
//!     header_row: 6
//!     periods: ["2017", "2018", "2019"]
//!     row_limit: 19
//!     label_rules:
//!       - pattern: "^сельское.*"
//!         replacement: "сельское, лесное хозяйство, охота, рыболовство и рыбоводство"
//! ```

use eyre::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::ExtractError;

/// Sheet name that matches any sheet without a descriptor of its own
pub const ANY_SHEET: &str = "*";

/// Replace a whole group label when it matches a case-insensitive prefix
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelRule {
    pub pattern: String,
    pub replacement: String,
}

impl LabelRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// What to do with a period header such as `2010.5`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PeriodPolicy {
    /// Fail the run with a corrupt-header error
    #[default]
    Strict,
    /// Drop the fraction and log a warning
    Truncate,
}

/// Post-concatenation casing of group labels
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LabelCase {
    #[default]
    AsIs,
    /// First letter upper case, the rest lower case
    Capitalize,
}

/// How one sheet is cut out of the document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SheetDescriptor {
    /// Sheet name, or `*` for every otherwise undescribed sheet
    pub sheet: String,

    /// Zero-based row holding the column headers; rows above are titles
    pub header_row: usize,

    /// Period label for each value column, in order. Empty means the labels
    /// are read from the header row.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub periods: Vec<String>,

    /// Number of data rows to keep after the header; trailing rows are
    /// derived totals and percentages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_limit: Option<usize>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub label_rules: Vec<LabelRule>,
}

impl SheetDescriptor {
    pub fn new(sheet: impl Into<String>, header_row: usize) -> Self {
        Self {
            sheet: sheet.into(),
            header_row,
            periods: Vec::new(),
            row_limit: None,
            label_rules: Vec::new(),
        }
    }

    pub fn with_periods<S: Into<String>>(mut self, periods: impl IntoIterator<Item = S>) -> Self {
        self.periods = periods.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_row_limit(mut self, rows: usize) -> Self {
        self.row_limit = Some(rows);
        self
    }

    pub fn with_label_rule(mut self, rule: LabelRule) -> Self {
        self.label_rules.push(rule);
        self
    }

    pub fn is_wildcard(&self) -> bool {
        self.sheet == ANY_SHEET
    }
}

/// Reshape rules for every sheet of one spreadsheet family
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkbookLayout {
    /// Canonical name of the first (label) column
    pub group_column: String,
    /// Canonical name of the period key produced by the pivot
    pub period_column: String,
    /// Canonical name of the measure produced by the pivot
    pub measure_column: String,
    /// Output column order; a permutation of the three names above
    pub columns: Vec<String>,

    /// Sheets to ignore, compared case-insensitively
    #[serde(default)]
    pub skip_sheets: Vec<String>,

    #[serde(default)]
    pub period_policy: PeriodPolicy,

    #[serde(default)]
    pub label_case: LabelCase,

    pub sheets: Vec<SheetDescriptor>,
}

fn same_sheet(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl WorkbookLayout {
    /// Create a layout with columns ordered group, period, measure
    pub fn new(
        group_column: impl Into<String>,
        period_column: impl Into<String>,
        measure_column: impl Into<String>,
    ) -> Self {
        let group_column = group_column.into();
        let period_column = period_column.into();
        let measure_column = measure_column.into();
        Self {
            columns: vec![
                group_column.clone(),
                period_column.clone(),
                measure_column.clone(),
            ],
            group_column,
            period_column,
            measure_column,
            skip_sheets: Vec::new(),
            period_policy: PeriodPolicy::default(),
            label_case: LabelCase::default(),
            sheets: Vec::new(),
        }
    }

    pub fn with_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn skip(mut self, sheet: impl Into<String>) -> Self {
        self.skip_sheets.push(sheet.into());
        self
    }

    pub fn with_period_policy(mut self, policy: PeriodPolicy) -> Self {
        self.period_policy = policy;
        self
    }

    pub fn with_label_case(mut self, case: LabelCase) -> Self {
        self.label_case = case;
        self
    }

    pub fn with_sheet(mut self, descriptor: SheetDescriptor) -> Self {
        self.sheets.push(descriptor);
        self
    }

    pub fn is_skipped(&self, sheet: &str) -> bool {
        self.skip_sheets.iter().any(|s| same_sheet(s, sheet))
    }

    /// The descriptor that applies to a sheet, if any
    ///
    /// Skipped sheets never match. A named descriptor wins over `*`.
    pub fn descriptor_for(&self, sheet: &str) -> Option<&SheetDescriptor> {
        if self.is_skipped(sheet) {
            return None;
        }
        self.sheets
            .iter()
            .find(|d| !d.is_wildcard() && same_sheet(&d.sheet, sheet))
            .or_else(|| self.sheets.iter().find(|d| d.is_wildcard()))
    }

    /// Fail if a named descriptor has no matching sheet in the document
    pub fn check_sheets<S: AsRef<str>>(&self, present: &[S]) -> Result<(), ExtractError> {
        for descriptor in self.sheets.iter().filter(|d| !d.is_wildcard()) {
            if !present.iter().any(|p| same_sheet(p.as_ref(), &descriptor.sheet)) {
                let available: Vec<&str> = present.iter().map(|p| p.as_ref()).collect();
                return Err(ExtractError::layout(
                    &descriptor.sheet,
                    format!(
                        "sheet not found in document (available: {})",
                        available.join(", ")
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Check the layout is internally consistent
    pub fn validate(&self) -> Result<()> {
        let roles: HashSet<&str> = [
            self.group_column.as_str(),
            self.period_column.as_str(),
            self.measure_column.as_str(),
        ]
        .into_iter()
        .collect();
        if roles.len() != 3 {
            bail!("Group, period and measure columns must have distinct names");
        }

        let ordered: HashSet<&str> = self.columns.iter().map(String::as_str).collect();
        if self.columns.len() != 3 || ordered != roles {
            bail!(
                "Column order [{}] must list exactly {}, {} and {}",
                self.columns.join(", "),
                self.group_column,
                self.period_column,
                self.measure_column
            );
        }

        if self.sheets.is_empty() {
            bail!("Layout has no sheet descriptors");
        }
        Ok(())
    }

    /// Parse a layout from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let layout: Self =
            serde_yaml::from_str(yaml).with_context(|| "Failed to parse sheet layout YAML")?;
        layout.validate()?;
        Ok(layout)
    }

    /// Read layout from YAML file
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read sheet layout: {}", path.as_ref().display())
        })?;
        Self::from_yaml(&content)
    }

    /// Write layout to YAML file
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = self.to_yaml()?;
        std::fs::write(path.as_ref(), yaml).with_context(|| {
            format!("Failed to write sheet layout: {}", path.as_ref().display())
        })?;

        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).with_context(|| "Failed to serialize sheet layout to YAML")
    }
}
