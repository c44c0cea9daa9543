use crate::record::EventRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard cap on records pulled from a source for any single mining call.
pub const MAX_RECORDS: usize = 10_000;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("log source query failed: {0}")]
    Query(String),
}

/// Opaque window bounds, passed through to the source untouched. Only the
/// source implementation knows how to interpret them against its backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

impl TimeRange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        TimeRange { from: from.into(), to: to.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Record filter handed to a log source. An empty `services` list means
/// no service constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    pub time_range: Option<TimeRange>,
    pub services: Vec<String>,
    pub limit: usize,
    pub sort: SortOrder,
}

/// Retrieval seam. Implementations own backend query translation and
/// field normalization; the mining layer only consumes `EventRecord`s.
/// Fetch failures surface unchanged to the mining caller.
pub trait LogSource: Send + Sync {
    fn fetch_logs(&self, filter: &LogFilter) -> Result<Vec<EventRecord>, SourceError>;
}
