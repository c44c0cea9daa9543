use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::itemsets::{itemset_key, Itemset};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    pub antecedent: Vec<String>,
    pub consequent: Vec<String>,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
}

/// Derives association rules from mined itemsets. Every non-empty proper
/// subset of an itemset is tried as an antecedent; the remainder becomes the
/// consequent. Rules below `min_confidence` are discarded.
pub fn generate_rules(itemsets: &[Itemset], min_confidence: f64) -> Vec<AssociationRule> {
    let mut support_by_key: AHashMap<String, f64> = AHashMap::new();
    for set in itemsets {
        support_by_key.insert(itemset_key(&set.items), set.support);
    }

    let mut rules = Vec::new();
    for set in itemsets.iter().filter(|s| s.items.len() >= 2) {
        for subset in set
            .items
            .iter()
            .powerset()
            .filter(|s| !s.is_empty() && s.len() < set.items.len())
        {
            let antecedent: Vec<String> = subset.into_iter().cloned().collect();
            // Supports come from the same mining pass; an antecedent that was
            // not itself mined drops the candidate rule.
            let antecedent_support = match support_by_key.get(&itemset_key(&antecedent)) {
                Some(&s) if s > 0.0 => s,
                _ => continue,
            };
            let confidence = set.support / antecedent_support;
            if confidence < min_confidence {
                continue;
            }
            let consequent: Vec<String> = set
                .items
                .iter()
                .filter(|item| !antecedent.contains(item))
                .cloned()
                .collect();
            let lift = match support_by_key.get(&itemset_key(&consequent)) {
                Some(&s) if s > 0.0 => confidence / s,
                _ => confidence,
            };
            rules.push(AssociationRule {
                antecedent,
                consequent,
                support: set.support,
                confidence,
                lift,
            });
        }
    }

    rules.sort_by(|a, b| {
        b.lift
            .partial_cmp(&a.lift)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.confidence
                    .partial_cmp(&a.confidence)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.antecedent.cmp(&b.antecedent))
    });
    rules
}
