//! File system storage operations
//!
//! This module handles file I/O for delimited sources and for the CSV
//! checkpoint written before a load.

mod delimited;

pub use delimited::{CsvReader, CsvWriter};
