//! Generic record loader
//!
//! One loader serves every dataset family: the family supplies a schema, a
//! resource path and a payload builder, and the loader does the validation
//! pre-pass, the optional lookup join and the per-row submission.

use super::{LoadReport, LookupJoin, Outcome};
use crate::client::DatasetApi;
use crate::etl::Loader;
use crate::table::{Record, Rejection, RowValidator, Schema, Table, validate_table};
use eyre::Result;
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::BTreeSet;

/// Builds the request body from a validated record
pub type PayloadFn = fn(&Record) -> Value;

/// Send the validated record as is
pub fn record_payload(record: &Record) -> Value {
    Value::Object(record.clone())
}

/// Submits a table one record per row
///
/// Rows are validated before anything is sent; a row that fails validation
/// never reaches the network. Submissions run strictly in row order and a
/// failed row never stops the ones after it.
///
/// # Example
/// ```no_run
/// use stat_ingest::client::DatasetClient;
/// use stat_ingest::loader::RecordLoader;
/// use stat_ingest::storage::CsvReader;
/// use stat_ingest::table::{FieldKind, Schema};
/// use reqwest::header::HeaderMap;
/// use std::time::Duration;
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let schema = Schema::new("okved")
///     .field("okved_code", FieldKind::Text)
///     .field("okved_name", FieldKind::Text);
/// let table = CsvReader::new("okved.csv").with_schema(schema.clone()).read()?;
///
/// let client = DatasetClient::try_new(
///     Url::parse("http://localhost:8000")?,
///     HeaderMap::new(),
///     Duration::from_secs(30),
/// )?;
/// let report = RecordLoader::new(client, "api/okved-datasets/", schema)
///     .submit(&table)
///     .await?;
/// println!("{}", report);
/// # Ok(())
/// # }
/// ```
pub struct RecordLoader<A> {
    api: A,
    resource: String,
    schema: Schema,
    payload: PayloadFn,
    lookup: Option<LookupJoin>,
    accepted: Vec<StatusCode>,
    only: Option<BTreeSet<usize>>,
}

impl<A: DatasetApi> RecordLoader<A> {
    pub fn new(api: A, resource: impl Into<String>, schema: Schema) -> Self {
        Self {
            api,
            resource: resource.into(),
            schema,
            payload: record_payload,
            lookup: None,
            accepted: vec![StatusCode::CREATED],
            only: None,
        }
    }

    pub fn with_payload(mut self, payload: PayloadFn) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_lookup(mut self, lookup: LookupJoin) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Replace the set of statuses that count as accepted
    pub fn with_accepted_statuses(mut self, statuses: impl IntoIterator<Item = StatusCode>) -> Self {
        self.accepted = statuses.into_iter().collect();
        self
    }

    /// Consider only the listed row indices
    ///
    /// Rows left out are neither validated nor counted; the report still
    /// refers to rows by their index in the full table.
    pub fn only_rows(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.only = Some(indices.into_iter().collect());
        self
    }

    fn considers(&self, index: usize) -> bool {
        self.only.as_ref().is_none_or(|only| only.contains(&index))
    }

    /// Validate and submit every row of `table`
    ///
    /// # Errors
    /// Only a failure that makes the whole batch meaningless is an `Err`: a
    /// lookup collection that cannot be listed. Everything row-level lands
    /// in the report.
    pub async fn submit(&self, table: &Table) -> Result<LoadReport> {
        let validator = RowValidator::new(&self.schema, table);
        let mut rows: Vec<(usize, Result<Record, Rejection>)> = table
            .rows()
            .iter()
            .enumerate()
            .filter(|(index, _)| self.considers(*index))
            .map(|(index, row)| (index, validator.validate(row)))
            .collect();

        if let Some(lookup) = &self.lookup {
            let labels = lookup.labels(rows.iter().filter_map(|(_, r)| r.as_ref().ok()));
            let ids = lookup.resolve(&self.api, &labels).await?;
            rows = rows
                .into_iter()
                .map(|(index, row)| (index, row.and_then(|record| lookup.attach(record, &ids))))
                .collect();
        }

        log::info!(
            "Submitting {} of {} row(s) to {}",
            rows.iter().filter(|(_, r)| r.is_ok()).count(),
            rows.len(),
            self.resource
        );

        let mut report = LoadReport::default();
        for (index, row) in rows {
            let outcome = match row {
                Ok(record) => self.send(&record).await,
                Err(reason) => Outcome::RejectedLocally { reason },
            };
            if outcome != Outcome::Accepted {
                log::warn!("Row {}: {}", index, outcome);
            }
            report.record(index, outcome);
        }

        log::info!("{}: {}", self.resource, report);
        Ok(report)
    }

    async fn send(&self, record: &Record) -> Outcome {
        let payload = (self.payload)(record);
        match self.api.create(&self.resource, &payload).await {
            Ok(response) if self.accepted.contains(&response.status) => Outcome::Accepted,
            Ok(response) => Outcome::RejectedRemotely {
                status: response.status.as_u16(),
                body: response.body,
            },
            Err(e) => Outcome::TransportFailed {
                error: format!("{:#}", e),
            },
        }
    }
}

impl<A: DatasetApi> Loader for RecordLoader<A> {
    type Report = LoadReport;

    async fn load(&self, table: &Table) -> Result<LoadReport> {
        self.submit(table).await
    }
}

/// Rows rejected before submission, for callers that only validate
pub fn dry_run(schema: &Schema, table: &Table) -> Vec<(usize, Rejection)> {
    validate_table(schema, table)
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| row.err().map(|reason| (index, reason)))
        .collect()
}
