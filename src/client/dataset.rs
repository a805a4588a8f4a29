//! HTTP client for the dataset API
//!
//! Provides `DatasetClient`, the reqwest implementation of [`DatasetApi`].

use super::{ApiResponse, DatasetApi};
use eyre::{Context, Result, bail, eyre};
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Dataset API client
///
/// # Example
/// ```no_run
/// use stat_ingest::client::{DatasetApi, DatasetClient};
/// use reqwest::header::HeaderMap;
/// use serde_json::json;
/// use std::time::Duration;
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let url = Url::parse("http://localhost:8000")?;
/// let client = DatasetClient::try_new(url, HeaderMap::new(), Duration::from_secs(10))?;
///
/// let response = client
///     .create("api/okved-datasets/", &json!({"okved_code": "01", "okved_name": "Растениеводство"}))
///     .await?;
/// println!("{}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct DatasetClient {
    client: Client,
    url: Url,
}

impl DatasetClient {
    /// Create a client for the API rooted at `url`
    ///
    /// `headers` are sent with every request, in addition to the JSON
    /// content type.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn try_new(mut url: Url, mut headers: HeaderMap, timeout: Duration) -> Result<Self> {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .with_context(|| "Failed to build HTTP client")?;

        // Without a trailing slash `join` would replace the last path segment
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self { client, url })
    }

    /// Get the base URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Absolute URL of a resource
    pub fn resource_url(&self, resource: &str) -> Result<Url> {
        // Strip leading slash from path if present, to avoid dropping the base path
        let resource = resource.strip_prefix('/').unwrap_or(resource);
        self.url
            .join(resource)
            .with_context(|| format!("Invalid resource path: {}", resource))
    }
}

/// Parse `Name: value` pairs separated by `;`
///
/// # Example
/// ```
/// use stat_ingest::client::parse_headers;
///
/// let headers = parse_headers("Authorization: Token abc; X-Source: statin").unwrap();
/// assert_eq!(headers["x-source"], "statin");
/// ```
pub fn parse_headers(raw: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, value) = pair
            .split_once(':')
            .ok_or_else(|| eyre!("Invalid header '{}': expected 'Name: value'", pair))?;
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .with_context(|| format!("Invalid header name: {}", name.trim()))?;
        let value = HeaderValue::from_str(value.trim())
            .with_context(|| format!("Invalid value for header {}", name))?;
        headers.append(name, value);
    }
    Ok(headers)
}

impl DatasetApi for DatasetClient {
    async fn create(&self, resource: &str, record: &Value) -> Result<ApiResponse> {
        let url = self.resource_url(resource)?;
        log::trace!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(record)
            .send()
            .await
            .map_err(|e| eyre!("Failed to send request: {}", e))?;

        // The server has answered; a broken body must not hide its status
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Failed to read response body ({}): {}", status, e);
                format!("Failed to read response body: {}", e)
            }
        };
        Ok(ApiResponse { status, body })
    }

    async fn list(&self, resource: &str) -> Result<Vec<Value>> {
        let url = self.resource_url(resource)?;
        log::trace!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| eyre!("Failed to send request: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Failed to list {} ({}): {}", resource, status, body);
        }

        let value: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} listing", resource))?;
        match value {
            Value::Array(items) => Ok(items),
            other => bail!(
                "Expected a JSON array listing {}, got: {}",
                resource,
                other
            ),
        }
    }
}

impl std::fmt::Display for DatasetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}
