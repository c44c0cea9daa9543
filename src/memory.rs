use chrono::{DateTime, Utc};

use crate::record::EventRecord;
use crate::source::{LogFilter, LogSource, SortOrder, SourceError};

/// In-memory log source backed by a plain record vector. Useful for tests and
/// for mining logs already loaded from files.
pub struct MemoryLogSource {
    records: Vec<EventRecord>,
}

impl MemoryLogSource {
    pub fn new(records: Vec<EventRecord>) -> Self {
        MemoryLogSource { records }
    }

    /// Loads newline-delimited JSON records. Blank lines and lines that fail
    /// to parse are skipped.
    pub fn from_json_lines(input: &str) -> Self {
        let records = input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| serde_json::from_str::<EventRecord>(line).ok())
            .collect();
        MemoryLogSource { records }
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }
}

fn parse_bound(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl LogSource for MemoryLogSource {
    fn fetch_logs(&self, filter: &LogFilter) -> Result<Vec<EventRecord>, SourceError> {
        // Bounds are best-effort RFC3339; an unparseable bound is ignored.
        let (from, to) = match &filter.time_range {
            Some(range) => (parse_bound(&range.from), parse_bound(&range.to)),
            None => (None, None),
        };
        let mut out: Vec<EventRecord> = self
            .records
            .iter()
            .filter(|rec| {
                if let Some(from) = from {
                    if rec.timestamp < from {
                        return false;
                    }
                }
                if let Some(to) = to {
                    if rec.timestamp >= to {
                        return false;
                    }
                }
                if filter.services.is_empty() {
                    return true;
                }
                rec.service
                    .as_deref()
                    .map(|svc| filter.services.iter().any(|s| s == svc))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        match filter.sort {
            SortOrder::Ascending => out.sort_by_key(|rec| rec.timestamp),
            SortOrder::Descending => out.sort_by_key(|rec| std::cmp::Reverse(rec.timestamp)),
        }
        out.truncate(filter.limit);
        Ok(out)
    }
}
