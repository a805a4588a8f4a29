//! Batch submission of canonical tables
//!
//! - [`RecordLoader`]: validate, optionally join, then create one record per row
//! - [`LookupJoin`]: label to remote id resolution for dependent datasets
//! - [`LoadReport`]: per-class tally plus the ordered failure log

mod lookup;
mod outcome;
mod record;

pub use lookup::{LookupJoin, LookupTable, SeedFn};
pub use outcome::{FailedRow, LoadReport, Outcome};
pub use record::{PayloadFn, RecordLoader, dry_run, record_payload};
