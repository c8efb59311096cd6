//! esrows common - normalization of search engine SQL responses into flat rows.
//!
//! Three response layouts are accepted:
//!
//! - X-Pack `columns`/`rows`
//! - Open Distro / AWS `schema`/`datarows`
//! - nested bucket `aggregations` from the search API
//!
//! All of them come out as an ordered `Vec<FlatRecord>`. Normalization is
//! pure: no I/O, no logging, no shared state.

pub mod aggregation;
pub mod config;
pub mod dialect;
pub mod error;
pub mod record;
pub mod response;
pub mod tabular;

pub use aggregation::flatten_aggregations;
pub use config::{EsrowsConfig, OutputFormat};
pub use dialect::{Dialect, TabularShape};
pub use error::{NormalizeError, Result};
pub use record::FlatRecord;
pub use response::{check_engine_error, normalize_response, Normalizer, ResponseKind};
pub use tabular::{normalize_tabular, zip_rows, Column, ColumnarResult, SchemaField, SchemaResult};
