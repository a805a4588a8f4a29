//! Dataset API abstraction

use eyre::Result;
use reqwest::StatusCode;
use serde_json::Value;
use std::future::Future;

/// Status and body of a completed request
///
/// A response is returned whatever its status; deciding what counts as
/// accepted is the caller's business.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Remote collection of dataset records
///
/// Resources are paths relative to the API base, one collection per dataset
/// family (e.g. `api/okved-datasets/`).
pub trait DatasetApi: Send + Sync {
    /// Create one record
    ///
    /// # Errors
    /// An `Err` means the request never completed (connection refused,
    /// timeout). Any HTTP status, including errors, is an `Ok`.
    fn create(
        &self,
        resource: &str,
        record: &Value,
    ) -> impl Future<Output = Result<ApiResponse>> + Send;

    /// List every record in a collection
    ///
    /// # Errors
    /// Fails on transport errors, non-success statuses, or a body that is
    /// not a JSON array
    fn list(&self, resource: &str) -> impl Future<Output = Result<Vec<Value>>> + Send;
}
