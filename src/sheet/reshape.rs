//! Wide-to-long reshaping of statistical sheets
//!
//! Government workbooks carry one row per group (industry, age bracket) and
//! one column per year, with title rows above the header and derived
//! percentage rows below the data. [`reshape_sheet`] cuts out the primary
//! block and pivots it to one row per (group, year); [`reshape_workbook`]
//! concatenates the sheets and applies the cleanup shared by all of them.

use super::{Grid, LabelCase, LabelRule, PeriodPolicy, SheetDescriptor, WorkbookLayout};
use crate::error::ExtractError;
use crate::etl::Transformer;
use crate::table::{Cell, Table, whole_number};
use crate::transform::LabelCapitalizer;

use eyre::{Context, Result, eyre};
use regex::{Regex, RegexBuilder};

/// Applies label rules to group labels
///
/// Each rule is a case-insensitive pattern anchored at the start of the
/// label; the first matching rule replaces the entire label.
pub struct LabelNormalizer {
    rules: Vec<(Regex, String)>,
}

impl LabelNormalizer {
    pub fn new(rules: &[LabelRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                let pattern = if rule.pattern.starts_with('^') {
                    rule.pattern.clone()
                } else {
                    format!("^(?:{})", rule.pattern)
                };
                let regex = RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .with_context(|| format!("Invalid label pattern: {}", rule.pattern))?;
                Ok((regex, rule.replacement.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn apply(&self, label: &str) -> String {
        self.rules
            .iter()
            .find(|(regex, _)| regex.is_match(label))
            .map_or_else(|| label.to_string(), |(_, replacement)| replacement.clone())
    }
}

/// Positions of the group, period and measure values in an output row
struct Slots {
    group: usize,
    period: usize,
    measure: usize,
}

impl Slots {
    fn of(layout: &WorkbookLayout) -> Result<Self> {
        let position = |name: &str| {
            layout
                .columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| eyre!("Column '{}' missing from layout column order", name))
        };
        Ok(Self {
            group: position(&layout.group_column)?,
            period: position(&layout.period_column)?,
            measure: position(&layout.measure_column)?,
        })
    }

    fn compose(&self, group: Cell, period: Cell, measure: Cell) -> Vec<Cell> {
        let mut row = vec![Cell::Null; 3];
        row[self.group] = group;
        row[self.period] = period;
        row[self.measure] = measure;
        row
    }
}

/// Convert a period header label to a year
pub fn parse_period(sheet: &str, label: &str, policy: PeriodPolicy) -> Result<i64, ExtractError> {
    let trimmed = label.trim();
    if let Ok(year) = trimmed.parse::<i64>() {
        return Ok(year);
    }

    let corrupt = || ExtractError::CorruptPeriod {
        sheet: sheet.to_string(),
        label: label.to_string(),
    };
    let value: f64 = trimmed.parse().map_err(|_| corrupt())?;
    if !value.is_finite() {
        return Err(corrupt());
    }
    if value.fract() == 0.0 {
        return whole_number(value).ok_or_else(corrupt);
    }

    match policy {
        PeriodPolicy::Strict => Err(corrupt()),
        PeriodPolicy::Truncate => {
            log::warn!(
                "Truncating fractional period '{}' in sheet '{}'",
                label,
                sheet
            );
            whole_number(value.trunc()).ok_or_else(corrupt)
        }
    }
}

fn period_labels(grid: &Grid, descriptor: &SheetDescriptor) -> Result<Vec<String>, ExtractError> {
    if !descriptor.periods.is_empty() {
        return Ok(descriptor.periods.clone());
    }

    let labels: Vec<String> = (1..grid.width())
        .map_while(|col| grid.cell(descriptor.header_row, col).and_then(Cell::to_label))
        .collect();
    if labels.is_empty() {
        return Err(ExtractError::layout(
            grid.name(),
            format!("no period labels in header row {}", descriptor.header_row),
        ));
    }
    Ok(labels)
}

/// Pivot one sheet into long format
///
/// Output rows are period-major: every group for the first period, then
/// every group for the next. Measures that are blank or not numeric come out
/// null; [`reshape_workbook`] drops them.
pub fn reshape_sheet(
    grid: &Grid,
    descriptor: &SheetDescriptor,
    layout: &WorkbookLayout,
) -> Result<Table> {
    let sheet = grid.name();
    let header_row = descriptor.header_row;

    if header_row >= grid.height() {
        return Err(ExtractError::layout(
            sheet,
            format!(
                "header row {} is beyond the last row of the sheet ({} row(s))",
                header_row,
                grid.height()
            ),
        )
        .into());
    }

    let labels = period_labels(grid, descriptor)?;
    let value_columns = grid.width().saturating_sub(1);
    if labels.len() > value_columns {
        return Err(ExtractError::layout(
            sheet,
            format!(
                "{} period(s) described but the sheet has {} value column(s)",
                labels.len(),
                value_columns
            ),
        )
        .into());
    }

    let periods = labels
        .iter()
        .map(|label| parse_period(sheet, label, layout.period_policy))
        .collect::<Result<Vec<_>, _>>()?;

    let normalizer = LabelNormalizer::new(&descriptor.label_rules)?;
    let slots = Slots::of(layout)?;

    let first = header_row + 1;
    let last = descriptor
        .row_limit
        .map_or(grid.height(), |limit| (first + limit).min(grid.height()));

    let groups: Vec<Cell> = (first..last)
        .map(|row| {
            grid.cell(row, 0)
                .and_then(Cell::to_label)
                .map_or(Cell::Null, |label| Cell::Text(normalizer.apply(&label)))
        })
        .collect();

    let mut table = Table::new(layout.columns.clone());
    for (offset, period) in periods.iter().enumerate() {
        let col = offset + 1;
        for (group, row) in groups.iter().zip(first..last) {
            let measure = grid
                .cell(row, col)
                .and_then(Cell::to_f64)
                .map_or(Cell::Null, Cell::Float);
            table.push_row(slots.compose(group.clone(), Cell::Int(*period), measure))?;
        }
    }

    log::info!(
        "Sheet '{}': {} group(s) x {} period(s)",
        sheet,
        groups.len(),
        periods.len()
    );
    Ok(table)
}

/// Reshape and concatenate every applicable sheet of a workbook
///
/// `sheets` lists every sheet of the document in document order; sheets
/// without a descriptor are skipped. Rows with a null in any output column
/// are dropped after concatenation.
///
/// # Errors
/// Any layout mismatch is fatal for the whole workbook.
pub fn reshape_workbook(layout: &WorkbookLayout, sheets: Vec<Grid>) -> Result<Table> {
    layout.validate()?;
    let names: Vec<&str> = sheets.iter().map(Grid::name).collect();
    layout.check_sheets(&names)?;

    let mut table = Table::new(layout.columns.clone());
    for grid in &sheets {
        match layout.descriptor_for(grid.name()) {
            Some(descriptor) => table.append(reshape_sheet(grid, descriptor, layout)?)?,
            None => log::debug!("Skipping sheet '{}'", grid.name()),
        }
    }

    if layout.label_case == LabelCase::Capitalize {
        table = LabelCapitalizer::new(&layout.group_column).transform(table)?;
    }

    let dropped = table.retain_complete(&layout.columns)?;
    if dropped > 0 {
        log::debug!("Dropped {} row(s) with missing values", dropped);
    }

    Ok(table)
}
