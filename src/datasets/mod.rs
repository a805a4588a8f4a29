//! Dataset families
//!
//! Each [`DatasetKind`] bundles what it takes to move one family of source
//! files into its remote collection: where the rows come from and how they
//! are reshaped, the canonical schema, the resource path, and how a validated
//! record becomes a request body.

mod demography;
mod employment;
mod registry;
mod vacancies;

use crate::client::DatasetApi;
use crate::etl::{Extractor, Transformer};
use crate::loader::{LookupJoin, PayloadFn, RecordLoader, record_payload};
use crate::sheet::{WorkbookExtractor, WorkbookLayout};
use crate::storage::CsvReader;
use crate::table::{Schema, Table};
use crate::transform::ColumnSelector;

use clap::ValueEnum;
use eyre::{Result, bail, eyre};
use reqwest::StatusCode;
use std::path::{Path, PathBuf};

/// Built-in sheet layouts by name
pub const BUILTIN_LAYOUTS: &[(&str, &str)] = &[
    ("employment", employment::LAYOUT),
    ("employment-all-sheets", employment::ALL_SHEETS_LAYOUT),
    ("demography", demography::LAYOUT),
];

/// YAML text of a built-in layout
pub fn builtin_layout(name: &str) -> Option<&'static str> {
    BUILTIN_LAYOUTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, yaml)| *yaml)
}

/// Where a family's rows come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// A statistics workbook reshaped by a layout
    Workbook,
    /// A delimited extract with a header row
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatasetKind {
    /// Employed persons by OKVED section (workbook, joined to okved_sections)
    Employment,
    /// Population by age group (workbook)
    Demography,
    /// Vacancy postings counted per day and role (CSV)
    Vacancies,
    /// OKVED classifier (CSV)
    Okved,
    /// Professions classifier (CSV)
    Professions,
    /// Federal educational standards (CSV)
    Fgos,
    /// Professional standards (CSV)
    ProfStandards,
    /// Admission quotas (CSV)
    Kcp,
}

impl DatasetKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Employment => "employment",
            Self::Demography => "demography",
            Self::Vacancies => "vacancies",
            Self::Okved => "okved",
            Self::Professions => "professions",
            Self::Fgos => "fgos",
            Self::ProfStandards => "prof-standards",
            Self::Kcp => "kcp",
        }
    }

    pub fn source_format(&self) -> SourceFormat {
        match self {
            Self::Employment | Self::Demography => SourceFormat::Workbook,
            _ => SourceFormat::Csv,
        }
    }

    /// Canonical table schema, also the validation contract of the loader
    pub fn schema(&self) -> Schema {
        match self {
            Self::Employment => employment::schema(),
            Self::Demography => demography::schema(),
            Self::Vacancies => vacancies::schema(),
            Self::Okved => registry::okved(),
            Self::Professions => registry::professions(),
            Self::Fgos => registry::fgos(),
            Self::ProfStandards => registry::prof_standards(),
            Self::Kcp => registry::kcp(),
        }
    }

    /// Columns a CSV source must carry
    pub fn source_schema(&self) -> Schema {
        match self {
            Self::Vacancies => vacancies::source_schema(),
            _ => self.schema(),
        }
    }

    /// Default resource path relative to the API base
    pub fn resource(&self) -> &'static str {
        match self {
            Self::Employment => employment::RESOURCE,
            Self::Demography => demography::RESOURCE,
            Self::Vacancies => vacancies::RESOURCE,
            Self::Okved => "api/okved-datasets/",
            Self::Professions => "classificator-prof-datasets/",
            Self::Fgos => "api/fgos-dataset/",
            Self::ProfStandards => "api/prof-standard-datasets/",
            Self::Kcp => "api/kcp-datasets/",
        }
    }

    /// Built-in layout for workbook families
    pub fn layout(&self) -> Result<Option<WorkbookLayout>> {
        let yaml = match self {
            Self::Employment => employment::LAYOUT,
            Self::Demography => demography::LAYOUT,
            _ => return Ok(None),
        };
        WorkbookLayout::from_yaml(yaml).map(Some)
    }

    pub fn payload(&self) -> PayloadFn {
        match self {
            Self::Employment => employment::payload,
            _ => record_payload,
        }
    }

    pub fn lookup(&self) -> Option<LookupJoin> {
        match self {
            Self::Employment => Some(employment::lookup()),
            _ => None,
        }
    }

    /// Statuses that count as a created record
    pub fn accepted_statuses(&self) -> Vec<StatusCode> {
        match self {
            // The employment collection answers 200 on create
            Self::Employment => vec![StatusCode::OK, StatusCode::CREATED],
            _ => vec![StatusCode::CREATED],
        }
    }

    /// Loader for this family, submitting to `resource` or the default one
    pub fn loader<A: DatasetApi>(&self, api: A, resource: Option<&str>) -> RecordLoader<A> {
        let loader = RecordLoader::new(api, resource.unwrap_or(self.resource()), self.schema())
            .with_payload(self.payload())
            .with_accepted_statuses(self.accepted_statuses());
        match self.lookup() {
            Some(lookup) => loader.with_lookup(lookup),
            None => loader,
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Reads the source file of a dataset family
pub struct DatasetExtractor {
    kind: DatasetKind,
    source: PathBuf,
    layout: Option<WorkbookLayout>,
}

impl DatasetExtractor {
    pub fn new(kind: DatasetKind, source: impl AsRef<Path>) -> Self {
        Self {
            kind,
            source: source.as_ref().to_path_buf(),
            layout: None,
        }
    }

    /// Use `layout` instead of the family's built-in one
    pub fn with_layout(mut self, layout: WorkbookLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn read(&self) -> Result<Table> {
        match self.kind.source_format() {
            SourceFormat::Workbook => {
                let layout = match &self.layout {
                    Some(layout) => layout.clone(),
                    None => self
                        .kind
                        .layout()?
                        .ok_or_else(|| eyre!("No built-in layout for {}", self.kind))?,
                };
                WorkbookExtractor::new(&self.source, layout).read()
            }
            SourceFormat::Csv => {
                if self.layout.is_some() {
                    bail!("Dataset {} is read from CSV; a sheet layout does not apply", self.kind);
                }
                CsvReader::new(&self.source)
                    .with_schema(self.kind.source_schema())
                    .read()
            }
        }
    }
}

impl Extractor for DatasetExtractor {
    async fn extract(&self) -> Result<Table> {
        self.read()
    }
}

/// Brings an extracted table to the family's canonical shape
pub struct DatasetTransformer {
    kind: DatasetKind,
}

impl DatasetTransformer {
    pub fn new(kind: DatasetKind) -> Self {
        Self { kind }
    }
}

impl Transformer for DatasetTransformer {
    fn transform(&self, table: Table) -> Result<Table> {
        let table = match self.kind {
            DatasetKind::Vacancies => vacancies::aggregate(table)?,
            _ => table,
        };
        let schema = self.kind.schema();
        ColumnSelector::new(schema.column_names()).transform(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    #[test]
    fn test_builtin_layouts_parse() {
        for (name, yaml) in BUILTIN_LAYOUTS {
            let layout = WorkbookLayout::from_yaml(yaml)
                .unwrap_or_else(|e| panic!("layout {} is invalid: {:#}", name, e));
            assert!(!layout.sheets.is_empty());
        }
    }

    #[test]
    fn test_workbook_layouts_match_schemas() {
        for kind in DatasetKind::value_variants() {
            if let Some(layout) = kind.layout().unwrap() {
                let schema = kind.schema();
                assert_eq!(layout.columns, schema.column_names(), "{}", kind);
            }
        }
    }

    #[test]
    fn test_employment_layout() {
        let layout = DatasetKind::Employment.layout().unwrap().unwrap();
        assert!(layout.is_skipped("СОДЕРЖАНИЕ"));
        assert_eq!(layout.sheets[0].periods.len(), 7);
        assert_eq!(layout.sheets[1].periods[0], "2017");
        assert_eq!(layout.sheets[1].row_limit, Some(19));
        assert_eq!(layout.sheets[1].label_rules.len(), 1);
    }

    #[test]
    fn test_names_match_value_enum() {
        for kind in DatasetKind::value_variants() {
            assert_eq!(DatasetKind::from_str(kind.name(), false).unwrap(), *kind);
        }
    }

    #[test]
    fn test_only_employment_joins() {
        assert!(DatasetKind::Employment.lookup().is_some());
        assert!(DatasetKind::Kcp.lookup().is_none());
    }

    #[test]
    fn test_layout_rejected_for_csv_kind() {
        let layout = DatasetKind::Demography.layout().unwrap().unwrap();
        let extractor = DatasetExtractor::new(DatasetKind::Okved, "okved.csv").with_layout(layout);
        assert!(extractor.read().is_err());
    }

    #[test]
    fn test_transformer_projects_schema_columns() {
        let mut table = Table::new(["okved_name", "extra", "okved_code"]);
        table
            .push_row(vec![Cell::text("Растениеводство"), Cell::Null, Cell::text("01.1")])
            .unwrap();

        let table = DatasetTransformer::new(DatasetKind::Okved).transform(table).unwrap();
        assert_eq!(table.columns(), ["okved_code", "okved_name"]);
    }
}
