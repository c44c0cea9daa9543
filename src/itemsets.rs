use crate::transactions::Transaction;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itemset {
    pub items: Vec<String>, // sorted
    pub support: f64,
}

/// Canonical map key for a token set: sorted and comma-joined. Identical
/// sets collide on this key regardless of discovery order.
pub fn itemset_key(items: &[String]) -> String {
    let mut sorted: Vec<&str> = items.iter().map(|s| s.as_str()).collect();
    sorted.sort_unstable();
    sorted.join(",")
}

/// Level-wise frequent itemset search. Counts single tokens first, then
/// grows candidates one token per level by joining frequent sets of the
/// previous level, stopping when a level comes up empty or `max_size` is
/// reached. A `min_support` at or below zero keeps every observed set;
/// sets exactly at the threshold are kept.
pub fn mine_frequent_itemsets(
    transactions: &[Transaction],
    min_support: f64,
    max_size: usize,
) -> Vec<Itemset> {
    let total = transactions.len();
    if total == 0 || max_size == 0 {
        return Vec::new();
    }
    let min_support = min_support.max(0.0);

    let mut counts: AHashMap<&str, usize> = AHashMap::new();
    for txn in transactions {
        for item in txn {
            *counts.entry(item.as_str()).or_insert(0) += 1;
        }
    }
    let mut level: Vec<Itemset> = counts
        .into_iter()
        .filter_map(|(item, count)| {
            let support = count as f64 / total as f64;
            (support >= min_support).then(|| Itemset { items: vec![item.to_string()], support })
        })
        .collect();
    level.sort_by(|a, b| a.items.cmp(&b.items));

    let mut out = level.clone();
    let mut size = 2;
    while size <= max_size && level.len() > 1 {
        let candidates = join_candidates(&level);
        if candidates.is_empty() {
            break;
        }
        let mut next = Vec::new();
        for items in candidates {
            let count = transactions
                .iter()
                .filter(|txn| items.iter().all(|item| txn.contains(item)))
                .count();
            let support = count as f64 / total as f64;
            if support >= min_support {
                next.push(Itemset { items, support });
            }
        }
        if next.is_empty() {
            break;
        }
        next.sort_by(|a, b| a.items.cmp(&b.items));
        out.extend(next.iter().cloned());
        level = next;
        size += 1;
    }
    out
}

/// Joins pairs of frequent size-(k-1) itemsets agreeing on their first k-2
/// tokens into de-duplicated size-k candidates. `level` must hold sorted
/// item vectors in lexicographic order, so the joined tails arrive in
/// order and the product stays sorted.
pub(crate) fn join_candidates(level: &[Itemset]) -> Vec<Vec<String>> {
    let mut seen: AHashSet<String> = AHashSet::new();
    let mut out = Vec::new();
    for i in 0..level.len() {
        for j in (i + 1)..level.len() {
            let a = &level[i].items;
            let b = &level[j].items;
            let prefix = a.len() - 1;
            if a[..prefix] != b[..prefix] {
                continue;
            }
            let mut candidate = a.clone();
            candidate.push(b[prefix].clone());
            if seen.insert(candidate.join(",")) {
                out.push(candidate);
            }
        }
    }
    out
}
