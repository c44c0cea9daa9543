use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::itemsets::{itemset_key, Itemset};

/// Absolute support shift below which a pattern present on both sides is not
/// reported.
const SUPPORT_DELTA_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    New,
    Missing,
    FrequencyChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternChange {
    pub items: Vec<String>,
    pub change_type: ChangeKind,
    pub baseline_support: f64,
    pub current_support: f64,
    pub anomaly_score: f64,
}

/// Compares two mined pattern sets and reports what appeared, what vanished,
/// and what shifted in frequency, ranked by anomaly score.
pub fn diff_pattern_sets(baseline: &[Itemset], current: &[Itemset]) -> Vec<PatternChange> {
    let baseline_by_key: BTreeMap<String, &Itemset> = baseline
        .iter()
        .map(|set| (itemset_key(&set.items), set))
        .collect();
    let current_by_key: BTreeMap<String, &Itemset> = current
        .iter()
        .map(|set| (itemset_key(&set.items), set))
        .collect();

    let mut changes = Vec::new();
    for (key, cur) in &current_by_key {
        match baseline_by_key.get(key) {
            None => changes.push(PatternChange {
                items: cur.items.clone(),
                change_type: ChangeKind::New,
                baseline_support: 0.0,
                current_support: cur.support,
                anomaly_score: cur.support,
            }),
            Some(base) => {
                let delta = (cur.support - base.support).abs();
                if delta > SUPPORT_DELTA_THRESHOLD {
                    changes.push(PatternChange {
                        items: cur.items.clone(),
                        change_type: ChangeKind::FrequencyChange,
                        baseline_support: base.support,
                        current_support: cur.support,
                        anomaly_score: delta,
                    });
                }
            }
        }
    }
    for (key, base) in &baseline_by_key {
        if !current_by_key.contains_key(key) {
            changes.push(PatternChange {
                items: base.items.clone(),
                change_type: ChangeKind::Missing,
                baseline_support: base.support,
                current_support: 0.0,
                anomaly_score: base.support,
            });
        }
    }

    changes.sort_by(|a, b| {
        b.anomaly_score
            .partial_cmp(&a.anomaly_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.items.cmp(&b.items))
    });
    changes
}
