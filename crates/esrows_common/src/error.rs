//! Error types for result normalization.

use thiserror::Error;

/// Everything that can go wrong while turning an engine response into rows.
///
/// Every variant is fatal for the response that produced it: the normalizer
/// never returns a partial row set alongside an error.
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Unsupported dialect '{0}' (expected one of: elasticsearch, awselasticsearch, odelasticsearch)")]
    UnsupportedDialect(String),

    #[error("Shape mismatch at row {row}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Response for dialect '{dialect}' has no '{section}' section")]
    MissingSection {
        dialect: &'static str,
        section: &'static str,
    },

    #[error("Malformed aggregation at '{path}': {reason}")]
    MalformedAggregation { path: String, reason: String },

    #[error("Engine returned an error:\n{0}")]
    Engine(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NormalizeError {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        NormalizeError::MalformedAggregation {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            NormalizeError::UnsupportedDialect(_) => -32010,
            NormalizeError::ShapeMismatch { .. } => -32011,
            NormalizeError::MissingSection { .. } => -32012,
            NormalizeError::MalformedAggregation { .. } => -32013,
            NormalizeError::Engine(_) => -32014,
            NormalizeError::Json(_) => -32700,
        }
    }

    /// Short machine-readable label, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizeError::UnsupportedDialect(_) => "unsupported_dialect",
            NormalizeError::ShapeMismatch { .. } => "shape_mismatch",
            NormalizeError::MissingSection { .. } => "missing_section",
            NormalizeError::MalformedAggregation { .. } => "malformed_aggregation",
            NormalizeError::Engine(_) => "engine",
            NormalizeError::Json(_) => "json",
        }
    }
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
