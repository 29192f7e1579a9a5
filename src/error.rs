//! Error types for the grade analytics engine.
//!
//! Per-cell problems never show up here: an unparseable score is a missing
//! value and an empty partition is a `None` statistic. These types cover the
//! failures a caller has to react to.

use std::path::PathBuf;
use thiserror::Error;

/// The source table could not be turned into a roster.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("required column '{column}' not found in header")]
    MissingColumn { column: String },

    #[error("table has no header row")]
    EmptyHeader,
}

/// Invalid caller input to a query. Queries have no side effects, so nothing
/// needs undoing when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("rank limit must not be negative, got {0}")]
    InvalidLimit(i64),

    #[error("unknown metric or subject '{0}'")]
    UnknownMetric(String),

    #[error("malformed search query {0:?}")]
    MalformedQuery(String),

    #[error("no student at index {index} (roster has {len})")]
    StudentOutOfRange { index: usize, len: usize },
}

/// The engine configuration is unusable.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("subject list is empty")]
    NoSubjects,

    #[error("subject '{0}' listed more than once")]
    DuplicateSubject(String),

    #[error("name column '{0}' is also listed as a subject")]
    NameIsSubject(String),

    #[error("{table} bands must have strictly descending finite lower bounds")]
    UnorderedBands { table: &'static str },

    #[error("pass threshold must be finite, got {0}")]
    BadThreshold(f64),

    #[error("histogram needs at least one bin over a non-empty range")]
    BadHistogram,
}

/// Umbrella error for callers that drive the whole pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
