//! SQL dialects of the supported search engines.
//!
//! Each engine flavour answers a SQL query with its own positional layout.
//! X-Pack speaks `columns`/`rows`; AWS Elasticsearch and Open Distro speak
//! `schema`/`datarows`.

use crate::error::{NormalizeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Engine SQL-compatibility layer a response comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    /// Elasticsearch X-Pack SQL
    #[serde(rename = "elasticsearch")]
    Elasticsearch,
    /// Amazon-hosted Elasticsearch SQL plugin
    #[serde(rename = "awselasticsearch")]
    AwsElasticsearch,
    /// Open Distro for Elasticsearch SQL plugin
    #[serde(rename = "odelasticsearch")]
    OpenDistro,
}

/// Positional layout of a tabular response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularShape {
    /// `columns: [{name}]`, `rows: [[...]]`
    Columnar,
    /// `schema: [{alias}]`, `datarows: [[...]]`
    Schema,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [
        Dialect::Elasticsearch,
        Dialect::AwsElasticsearch,
        Dialect::OpenDistro,
    ];

    /// Parse a dialect tag. Unknown tags are rejected, never defaulted.
    pub fn parse(tag: &str) -> Result<Self> {
        match tag.trim() {
            "elasticsearch" => Ok(Dialect::Elasticsearch),
            "awselasticsearch" => Ok(Dialect::AwsElasticsearch),
            "odelasticsearch" => Ok(Dialect::OpenDistro),
            other => Err(NormalizeError::UnsupportedDialect(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Elasticsearch => "elasticsearch",
            Dialect::AwsElasticsearch => "awselasticsearch",
            Dialect::OpenDistro => "odelasticsearch",
        }
    }

    pub fn shape(&self) -> TabularShape {
        match self {
            Dialect::Elasticsearch => TabularShape::Columnar,
            Dialect::AwsElasticsearch | Dialect::OpenDistro => TabularShape::Schema,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Dialect::Elasticsearch => "Elasticsearch X-Pack SQL (columns/rows)",
            Dialect::AwsElasticsearch => "AWS Elasticsearch SQL (schema/datarows)",
            Dialect::OpenDistro => "Open Distro SQL (schema/datarows)",
        }
    }
}

impl FromStr for Dialect {
    type Err = NormalizeError;

    fn from_str(s: &str) -> Result<Self> {
        Dialect::parse(s)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TabularShape {
    /// Name of the section holding field names.
    pub fn names_section(&self) -> &'static str {
        match self {
            TabularShape::Columnar => "columns",
            TabularShape::Schema => "schema",
        }
    }

    /// Name of the section holding positional rows.
    pub fn rows_section(&self) -> &'static str {
        match self {
            TabularShape::Columnar => "rows",
            TabularShape::Schema => "datarows",
        }
    }
}
