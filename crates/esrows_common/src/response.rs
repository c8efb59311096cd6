//! Dispatch of a raw engine response to the right normalizer.

use crate::aggregation::flatten_aggregations;
use crate::dialect::Dialect;
use crate::error::{NormalizeError, Result};
use crate::record::FlatRecord;
use crate::tabular::normalize_tabular;
use serde_json::Value;

/// Layout detected in a response body, independent of the declared dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Search API response with an `aggregations` tree
    Aggregations,
    /// X-Pack `columns`/`rows`
    Columnar,
    /// Open Distro `schema`/`datarows`
    Schema,
    /// None of the above
    Unknown,
}

impl ResponseKind {
    pub fn detect(response: &Value) -> Self {
        if response.get("aggregations").is_some_and(Value::is_object) {
            ResponseKind::Aggregations
        } else if response.get("columns").is_some() {
            ResponseKind::Columnar
        } else if response.get("schema").is_some() {
            ResponseKind::Schema
        } else {
            ResponseKind::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Aggregations => "aggregations",
            ResponseKind::Columnar => "columnar",
            ResponseKind::Schema => "schema",
            ResponseKind::Unknown => "unknown",
        }
    }
}

/// Fail if the engine reported an error in-band.
///
/// The SQL endpoints answer some failures with HTTP 200 and an `error`
/// member; mapping such a body would silently produce an empty table.
pub fn check_engine_error(response: &Value) -> Result<()> {
    match response.get("error") {
        None | Some(Value::Null) => Ok(()),
        Some(error) => Err(NormalizeError::Engine(serde_json::to_string_pretty(error)?)),
    }
}

/// Turn one engine response into rows.
///
/// An `aggregations` tree is flattened regardless of dialect; anything else
/// is read with the positional layout the dialect declares.
pub fn normalize_response(dialect: Dialect, response: &Value) -> Result<Vec<FlatRecord>> {
    check_engine_error(response)?;

    match ResponseKind::detect(response) {
        ResponseKind::Aggregations => flatten_aggregations(&response["aggregations"]),
        ResponseKind::Columnar | ResponseKind::Schema | ResponseKind::Unknown => {
            normalize_tabular(dialect, response)
        }
    }
}

/// Normalizer bound to one dialect.
///
/// Holds no state besides the dialect and can be shared across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    dialect: Dialect,
}

impl Normalizer {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Build from a dialect tag, rejecting unknown tags up front.
    pub fn for_tag(tag: &str) -> Result<Self> {
        Ok(Self::new(Dialect::parse(tag)?))
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn normalize(&self, response: &Value) -> Result<Vec<FlatRecord>> {
        normalize_response(self.dialect, response)
    }

    /// Parse response text, then normalize it.
    pub fn normalize_str(&self, body: &str) -> Result<Vec<FlatRecord>> {
        let response: Value = serde_json::from_str(body)?;
        self.normalize(&response)
    }
}
