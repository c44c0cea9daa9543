use std::collections::BTreeSet;

use ahash::AHashMap;
use chrono::{DateTime, Utc};

use crate::keywords::extract_keywords;
use crate::record::EventRecord;

/// Records without a correlation id fall into fixed five-minute buckets.
const SESSION_BUCKET_SECS: i64 = 300;

#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub item: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub events: Vec<SessionEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequencePattern {
    pub sequence: Vec<String>,
    pub support: f64,
    pub session_indices: Vec<usize>,
    pub time_diffs_ms: Vec<i64>,
}

/// Collapses a record to the item mined in sequences: level plus the
/// comma-joined keywords of its message.
pub fn derive_item(record: &EventRecord) -> String {
    format!(
        "{}:{}",
        record.level,
        extract_keywords(&record.message).join(",")
    )
}

fn session_id(record: &EventRecord) -> String {
    match &record.correlation_id {
        Some(id) if !id.is_empty() => id.clone(),
        _ => format!(
            "time:{}",
            record.timestamp.timestamp().div_euclid(SESSION_BUCKET_SECS)
        ),
    }
}

/// Groups records into sessions keyed by correlation id, falling back to
/// time buckets. Sessions keep first-seen order; events within a session are
/// sorted by timestamp.
pub fn group_into_sessions(records: &[EventRecord]) -> Vec<Session> {
    let mut index: AHashMap<String, usize> = AHashMap::new();
    let mut sessions: Vec<Session> = Vec::new();
    for record in records {
        let id = session_id(record);
        let slot = match index.get(&id) {
            Some(&i) => i,
            None => {
                sessions.push(Session {
                    id: id.clone(),
                    events: Vec::new(),
                });
                index.insert(id, sessions.len() - 1);
                sessions.len() - 1
            }
        };
        sessions[slot].events.push(SessionEvent {
            item: derive_item(record),
            timestamp: record.timestamp,
        });
    }
    for session in &mut sessions {
        session.events.sort_by_key(|event| event.timestamp);
    }
    sessions
}

/// Finds the first occurrence of `a` and the first occurrence of `b` strictly
/// after it, returning both positions.
pub fn find_ordered_pair(events: &[SessionEvent], a: &str, b: &str) -> Option<(usize, usize)> {
    let ia = events.iter().position(|event| event.item == a)?;
    let ib = events[ia + 1..].iter().position(|event| event.item == b)?;
    Some((ia, ia + 1 + ib))
}

/// Mines single items and ordered pairs across sessions. Support is session
/// coverage: the fraction of sessions containing the item, or containing the
/// pair in order. Pairs are drawn from frequent singles only.
pub fn mine_pair_sequences(sessions: &[Session], min_support: f64) -> Vec<SequencePattern> {
    let total = sessions.len();
    if total == 0 {
        return Vec::new();
    }
    let min_support = min_support.max(0.0);

    let mut item_sessions: AHashMap<&str, Vec<usize>> = AHashMap::new();
    for (idx, session) in sessions.iter().enumerate() {
        let distinct: BTreeSet<&str> = session.events.iter().map(|e| e.item.as_str()).collect();
        for item in distinct {
            item_sessions.entry(item).or_default().push(idx);
        }
    }

    let mut singles: Vec<(String, Vec<usize>)> = item_sessions
        .into_iter()
        .filter(|(_, indices)| indices.len() as f64 / total as f64 >= min_support)
        .map(|(item, indices)| (item.to_string(), indices))
        .collect();
    singles.sort_by(|a, b| a.0.cmp(&b.0));

    let mut patterns: Vec<SequencePattern> = singles
        .iter()
        .map(|(item, indices)| SequencePattern {
            sequence: vec![item.clone()],
            support: indices.len() as f64 / total as f64,
            session_indices: indices.clone(),
            time_diffs_ms: Vec::new(),
        })
        .collect();

    for (a, _) in &singles {
        for (b, _) in &singles {
            if a == b {
                continue;
            }
            let mut indices = Vec::new();
            let mut diffs = Vec::new();
            for (idx, session) in sessions.iter().enumerate() {
                if let Some((ia, ib)) = find_ordered_pair(&session.events, a, b) {
                    indices.push(idx);
                    diffs.push(
                        (session.events[ib].timestamp - session.events[ia].timestamp)
                            .num_milliseconds(),
                    );
                }
            }
            let support = indices.len() as f64 / total as f64;
            if support >= min_support && !indices.is_empty() {
                patterns.push(SequencePattern {
                    sequence: vec![a.clone(), b.clone()],
                    support,
                    session_indices: indices,
                    time_diffs_ms: diffs,
                });
            }
        }
    }

    patterns
}
