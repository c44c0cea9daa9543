use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::drift::{diff_pattern_sets, PatternChange};
use crate::itemsets::{mine_frequent_itemsets, Itemset};
use crate::record::EventRecord;
use crate::rules::{generate_rules, AssociationRule};
use crate::sequences::{
    find_ordered_pair, group_into_sessions, mine_pair_sequences, SequencePattern, Session,
};
use crate::source::{LogFilter, LogSource, SortOrder, SourceError, TimeRange, MAX_RECORDS};
use crate::transactions::{build_transactions, Transaction};

/// Upper bound on example records attached to any reported pattern.
const MAX_EXAMPLES: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MineOptions {
    pub min_support: f64,
    pub min_confidence: f64,
    pub max_itemset_size: usize,
    pub services: Vec<String>,
    pub attributes: Vec<String>,
    pub time_range: Option<TimeRange>,
}

impl Default for MineOptions {
    fn default() -> Self {
        MineOptions {
            min_support: 0.01,
            min_confidence: 0.5,
            max_itemset_size: 5,
            services: Vec::new(),
            attributes: Vec::new(),
            time_range: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequentPattern {
    pub items: Vec<String>,
    pub support: f64,
    /// Fixed co-occurrence marker, not a conditional probability.
    pub confidence: f64,
    pub examples: Vec<EventRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceStep {
    pub item: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExample {
    pub session_id: String,
    pub steps: Vec<SequenceStep>,
    pub time_diffs_ms: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequentialPattern {
    pub sequence: Vec<String>,
    pub support: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_time_diff_ms: Option<f64>,
    pub examples: Vec<SessionExample>,
}

/// Runs the mining passes against a log source.
pub struct PatternMiner<S> {
    source: S,
}

impl<S: LogSource> PatternMiner<S> {
    pub fn new(source: S) -> Self {
        PatternMiner { source }
    }

    fn fetch(&self, opts: &MineOptions, sort: SortOrder) -> Result<Vec<EventRecord>, SourceError> {
        let filter = LogFilter {
            time_range: opts.time_range.clone(),
            services: opts.services.clone(),
            limit: MAX_RECORDS,
            sort,
        };
        self.source.fetch_logs(&filter)
    }

    fn mine_itemsets(
        &self,
        opts: &MineOptions,
    ) -> Result<(Vec<EventRecord>, Vec<Transaction>, Vec<Itemset>), SourceError> {
        let records = self.fetch(opts, SortOrder::Descending)?;
        if records.is_empty() {
            return Ok((records, Vec::new(), Vec::new()));
        }
        let transactions = build_transactions(&records, &opts.attributes);
        let itemsets =
            mine_frequent_itemsets(&transactions, opts.min_support, opts.max_itemset_size);
        Ok((records, transactions, itemsets))
    }

    /// Mines frequent token combinations and attaches up to three example
    /// records per pattern.
    pub fn mine_frequent_patterns(
        &self,
        opts: &MineOptions,
    ) -> Result<Vec<FrequentPattern>, SourceError> {
        let (records, transactions, itemsets) = self.mine_itemsets(opts)?;
        let mut patterns: Vec<FrequentPattern> = itemsets
            .into_iter()
            .map(|set| {
                let examples = first_matching_records(&records, &transactions, &set.items);
                FrequentPattern {
                    items: set.items,
                    support: set.support,
                    confidence: 1.0,
                    examples,
                }
            })
            .collect();
        patterns.sort_by(|a, b| {
            b.support
                .partial_cmp(&a.support)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.items.cmp(&b.items))
        });
        Ok(patterns)
    }

    pub fn mine_association_rules(
        &self,
        opts: &MineOptions,
    ) -> Result<Vec<AssociationRule>, SourceError> {
        let (_, _, itemsets) = self.mine_itemsets(opts)?;
        Ok(generate_rules(&itemsets, opts.min_confidence))
    }

    /// Mines ordered item sequences over sessions, reporting session coverage
    /// and the average gap between pair steps.
    pub fn mine_sequential_patterns(
        &self,
        opts: &MineOptions,
    ) -> Result<Vec<SequentialPattern>, SourceError> {
        let records = self.fetch(opts, SortOrder::Ascending)?;
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let sessions = group_into_sessions(&records);
        let mut patterns: Vec<SequentialPattern> = mine_pair_sequences(&sessions, opts.min_support)
            .into_iter()
            .map(|pattern| {
                let avg_time_diff_ms = if pattern.time_diffs_ms.is_empty() {
                    None
                } else {
                    Some(
                        pattern.time_diffs_ms.iter().sum::<i64>() as f64
                            / pattern.time_diffs_ms.len() as f64,
                    )
                };
                let examples = session_examples(&sessions, &pattern);
                SequentialPattern {
                    sequence: pattern.sequence,
                    support: pattern.support,
                    avg_time_diff_ms,
                    examples,
                }
            })
            .collect();
        patterns.sort_by(|a, b| {
            b.support
                .partial_cmp(&a.support)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.sequence.cmp(&b.sequence))
        });
        Ok(patterns)
    }

    /// Mines both time ranges concurrently and diffs the resulting pattern
    /// sets.
    pub fn detect_anomalous_patterns(
        &self,
        baseline_range: &TimeRange,
        current_range: &TimeRange,
        opts: &MineOptions,
    ) -> Result<Vec<PatternChange>, SourceError> {
        let baseline_opts = MineOptions {
            time_range: Some(baseline_range.clone()),
            ..opts.clone()
        };
        let current_opts = MineOptions {
            time_range: Some(current_range.clone()),
            ..opts.clone()
        };
        let (baseline, current) = rayon::join(
            || self.mine_itemsets(&baseline_opts),
            || self.mine_itemsets(&current_opts),
        );
        let (_, _, baseline_sets) = baseline?;
        let (_, _, current_sets) = current?;
        Ok(diff_pattern_sets(&baseline_sets, &current_sets))
    }
}

fn first_matching_records(
    records: &[EventRecord],
    transactions: &[Transaction],
    items: &[String],
) -> Vec<EventRecord> {
    let mut examples = Vec::new();
    for (record, txn) in records.iter().zip(transactions) {
        if items.iter().all(|item| txn.contains(item)) {
            examples.push(record.clone());
            if examples.len() == MAX_EXAMPLES {
                break;
            }
        }
    }
    examples
}

fn step_at(session: &Session, idx: usize) -> SequenceStep {
    SequenceStep {
        item: session.events[idx].item.clone(),
        timestamp: session.events[idx].timestamp,
    }
}

fn session_examples(sessions: &[Session], pattern: &SequencePattern) -> Vec<SessionExample> {
    let mut examples = Vec::new();
    for &idx in pattern.session_indices.iter().take(MAX_EXAMPLES) {
        let session = &sessions[idx];
        match pattern.sequence.as_slice() {
            [single] => {
                if let Some(pos) = session.events.iter().position(|e| e.item == *single) {
                    examples.push(SessionExample {
                        session_id: session.id.clone(),
                        steps: vec![step_at(session, pos)],
                        time_diffs_ms: Vec::new(),
                    });
                }
            }
            [a, b] => {
                if let Some((ia, ib)) = find_ordered_pair(&session.events, a, b) {
                    let diff = (session.events[ib].timestamp - session.events[ia].timestamp)
                        .num_milliseconds();
                    examples.push(SessionExample {
                        session_id: session.id.clone(),
                        steps: vec![step_at(session, ia), step_at(session, ib)],
                        time_diffs_ms: vec![diff],
                    });
                }
            }
            _ => {}
        }
    }
    examples
}
