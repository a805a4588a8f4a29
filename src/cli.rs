//! CLI helper functions

use crate::{
    client::{DEFAULT_TIMEOUT, DatasetClient, parse_headers},
    datasets::{BUILTIN_LAYOUTS, DatasetExtractor, DatasetKind, DatasetTransformer, builtin_layout},
    etl::{Extractor, IdentityTransformer, Pipeline, Transformer},
    loader::{LoadReport, dry_run},
    sheet::WorkbookLayout,
    storage::{CsvReader, CsvWriter},
};
use eyre::{Context, Result, eyre};
use reqwest::header::HeaderMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Load the dataset API client from environment variables
///
/// Expected environment variables:
/// - DATASET_API_URL: API base URL (required)
/// - DATASET_API_HEADERS: extra headers as `Name: value` pairs separated by `;` (optional)
/// - DATASET_API_TIMEOUT: request timeout in seconds (optional, defaults to 30)
pub fn load_dataset_client() -> Result<DatasetClient> {
    let url_str =
        std::env::var("DATASET_API_URL").context("DATASET_API_URL environment variable not set")?;
    let url =
        Url::parse(&url_str).with_context(|| format!("Invalid DATASET_API_URL: {}", url_str))?;

    let headers = match std::env::var("DATASET_API_HEADERS") {
        Ok(raw) => parse_headers(&raw).context("Invalid DATASET_API_HEADERS")?,
        Err(_) => HeaderMap::new(),
    };

    let timeout = match std::env::var("DATASET_API_TIMEOUT") {
        Ok(secs) => secs
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .with_context(|| format!("Invalid DATASET_API_TIMEOUT: {}", secs))?,
        Err(_) => DEFAULT_TIMEOUT,
    };

    DatasetClient::try_new(url, headers, timeout).context("Failed to create dataset API client")
}

/// Options shared by the commands that submit rows
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Resource path overriding the dataset's default
    pub resource: Option<String>,
    /// Where to write the JSON load report
    pub report: Option<PathBuf>,
    /// A previous report; only its failed rows are submitted
    pub retry_from: Option<PathBuf>,
}

impl LoadOptions {
    fn retry_rows(&self) -> Result<Option<Vec<usize>>> {
        match &self.retry_from {
            Some(path) => {
                let previous = LoadReport::read(path)?;
                log::info!(
                    "Retrying {} failed row(s) from {}",
                    previous.failures.len(),
                    path.display()
                );
                Ok(Some(previous.failed_indices()))
            }
            None => Ok(None),
        }
    }

    fn save(&self, report: &LoadReport) -> Result<()> {
        if let Some(path) = &self.report {
            report.write(path)?;
            log::info!("Load report written to {}", path.display());
        }
        Ok(())
    }
}

fn read_layout(path: Option<&Path>) -> Result<Option<WorkbookLayout>> {
    path.map(WorkbookLayout::read).transpose()
}

fn extractor(kind: DatasetKind, source: &Path, layout: Option<&Path>) -> Result<DatasetExtractor> {
    let extractor = DatasetExtractor::new(kind, source);
    Ok(match read_layout(layout)? {
        Some(layout) => extractor.with_layout(layout),
        None => extractor,
    })
}

/// Extract a source file into a canonical CSV table
///
/// Steps: DatasetExtractor → DatasetTransformer → CsvWriter, warning about
/// rows the loader would reject
pub async fn extract_dataset(
    kind: DatasetKind,
    source: impl AsRef<Path>,
    output: impl AsRef<Path>,
    layout: Option<&Path>,
) -> Result<usize> {
    let source = source.as_ref();
    let output = output.as_ref();
    log::info!("Extracting {} from {}", kind, source.display());

    let table = extractor(kind, source, layout)?.extract().await?;
    let table = DatasetTransformer::new(kind).transform(table)?;

    for (index, reason) in dry_run(&kind.schema(), &table) {
        log::warn!("Row {} will be rejected: {}", index, reason);
    }

    CsvWriter::new(output).write(&table)?;
    log::info!("✓ Wrote {} row(s) to {}", table.len(), output.display());
    Ok(table.len())
}

/// Load an existing canonical CSV table into the dataset API
///
/// Pipeline: CsvReader → IdentityTransformer → RecordLoader
pub async fn push_dataset(
    kind: DatasetKind,
    table: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<LoadReport> {
    let table = table.as_ref();
    log::info!("Pushing {} from {}", kind, table.display());

    let client = load_dataset_client()?;
    log::info!("Using dataset API at {}", client);

    let mut loader = kind.loader(client, options.resource.as_deref());
    if let Some(rows) = options.retry_rows()? {
        loader = loader.only_rows(rows);
    }

    let pipeline = Pipeline::new(
        CsvReader::new(table).with_schema(kind.schema()),
        IdentityTransformer::new(),
        loader,
    );
    let report = pipeline.run().await?;
    options.save(&report)?;
    Ok(report)
}

/// Extract a source file and load it in one run
///
/// Pipeline: DatasetExtractor → DatasetTransformer → [CSV checkpoint] → RecordLoader
pub async fn run_dataset(
    kind: DatasetKind,
    source: impl AsRef<Path>,
    checkpoint: Option<&Path>,
    layout: Option<&Path>,
    options: &LoadOptions,
) -> Result<LoadReport> {
    let source = source.as_ref();
    log::info!("Running {} from {}", kind, source.display());

    // Fail on a bad layout or missing credentials before touching the source
    let extractor = extractor(kind, source, layout)?;
    let client = load_dataset_client()?;
    log::info!("Using dataset API at {}", client);

    let mut loader = kind.loader(client, options.resource.as_deref());
    if let Some(rows) = options.retry_rows()? {
        loader = loader.only_rows(rows);
    }

    let pipeline = Pipeline::new(extractor, DatasetTransformer::new(kind), loader);
    let pipeline = match checkpoint {
        Some(path) => pipeline.with_checkpoint(path),
        None => pipeline,
    };

    let report = pipeline.run().await?;
    options.save(&report)?;
    Ok(report)
}

/// YAML text of a built-in layout
pub fn layout_yaml(name: &str) -> Result<&'static str> {
    builtin_layout(name).ok_or_else(|| {
        let names: Vec<&str> = BUILTIN_LAYOUTS.iter().map(|(n, _)| *n).collect();
        eyre!(
            "No built-in layout named '{}'. Available layouts: {}",
            name,
            names.join(", ")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn clear_env() {
        unsafe {
            std::env::remove_var("DATASET_API_URL");
            std::env::remove_var("DATASET_API_HEADERS");
            std::env::remove_var("DATASET_API_TIMEOUT");
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_load_dataset_client_no_url() {
        clear_env();

        let result = load_dataset_client();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("DATASET_API_URL"));
    }

    #[test]
    #[serial_test::serial]
    fn test_load_dataset_client_with_url() {
        clear_env();
        unsafe {
            std::env::set_var("DATASET_API_URL", "http://localhost:8000");
            std::env::set_var("DATASET_API_HEADERS", "Authorization: Token abc");
            std::env::set_var("DATASET_API_TIMEOUT", "5");
        }

        let result = load_dataset_client();
        assert!(result.is_ok());
        assert_eq!(result.unwrap().url().as_str(), "http://localhost:8000/");

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_load_dataset_client_invalid_url() {
        clear_env();
        unsafe {
            std::env::set_var("DATASET_API_URL", "not-a-valid-url");
        }

        let result = load_dataset_client();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid DATASET_API_URL")
        );

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_load_dataset_client_invalid_timeout() {
        clear_env();
        unsafe {
            std::env::set_var("DATASET_API_URL", "http://localhost:8000");
            std::env::set_var("DATASET_API_TIMEOUT", "soon");
        }

        let result = load_dataset_client();
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid DATASET_API_TIMEOUT")
        );

        clear_env();
    }

    #[tokio::test]
    async fn test_extract_registry_csv() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("okved_sections.csv");
        let output = temp_dir.path().join("out").join("okved.csv");
        std::fs::write(
            &source,
            "okved_name,okved_code,comment\nРастениеводство,01.1,\nЖивотноводство,01.4,x\n",
        )
        .unwrap();

        let count = extract_dataset(DatasetKind::Okved, &source, &output, None)
            .await
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "okved_code,okved_name\n01.1,Растениеводство\n01.4,Животноводство\n"
        );
    }

    #[tokio::test]
    async fn test_extract_missing_column() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("fgos.csv");
        std::fs::write(&source, "fgos_code,fgos_name\n01.02.03,Химия\n").unwrap();

        let result =
            extract_dataset(DatasetKind::Fgos, &source, temp_dir.path().join("o.csv"), None).await;
        assert!(result.unwrap_err().to_string().contains("fgos_prikaz"));
    }

    #[test]
    fn test_layout_yaml() {
        assert!(layout_yaml("demography").unwrap().contains("Лист1"));
        let err = layout_yaml("payroll").unwrap_err();
        assert!(err.to_string().contains("employment-all-sheets"));
    }
}
