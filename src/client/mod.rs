//! Dataset API client.
//!
//! This module provides the [`DatasetApi`] trait the loader submits through
//! and [`DatasetClient`], its HTTP implementation.

mod api;
mod dataset;

pub use api::{ApiResponse, DatasetApi};
pub use dataset::{DEFAULT_TIMEOUT, DatasetClient, parse_headers};
