use logminer::itemsets::{mine_frequent_itemsets, Itemset};
use logminer::rules::generate_rules;
use logminer::transactions::Transaction;

fn txn(items: &[&str]) -> Transaction {
    items.iter().map(|s| s.to_string()).collect()
}

fn set(items: &[&str], support: f64) -> Itemset {
    Itemset {
        items: items.iter().map(|s| s.to_string()).collect(),
        support,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn derives_pair_rules_with_confidence_and_lift() {
    let txns = vec![
        txn(&["a", "b"]),
        txn(&["a", "b"]),
        txn(&["a", "c"]),
        txn(&["b", "c"]),
    ];
    let itemsets = mine_frequent_itemsets(&txns, 0.5, 5);
    let rules = generate_rules(&itemsets, 0.6);
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].antecedent, vec!["a"]);
    assert_eq!(rules[0].consequent, vec!["b"]);
    assert_eq!(rules[0].support, 0.5);
    assert!(approx(rules[0].confidence, 0.5 / 0.75));
    assert!(approx(rules[0].lift, (0.5 / 0.75) / 0.75));
    assert_eq!(rules[1].antecedent, vec!["b"]);
    assert_eq!(rules[1].consequent, vec!["a"]);
}

#[test]
fn confidence_threshold_filters_rules() {
    let txns = vec![
        txn(&["a", "b"]),
        txn(&["a", "b"]),
        txn(&["a", "c"]),
        txn(&["b", "c"]),
    ];
    let itemsets = mine_frequent_itemsets(&txns, 0.5, 5);
    assert!(generate_rules(&itemsets, 0.7).is_empty());
}

#[test]
fn antecedent_and_consequent_partition_the_itemset() {
    let txns = vec![
        txn(&["a", "b", "c"]),
        txn(&["a", "b", "c"]),
        txn(&["a", "b"]),
        txn(&["c"]),
    ];
    let itemsets = mine_frequent_itemsets(&txns, 0.5, 5);
    let rules = generate_rules(&itemsets, 0.0);
    assert!(!rules.is_empty());
    for rule in &rules {
        assert!(!rule.antecedent.is_empty());
        assert!(!rule.consequent.is_empty());
        assert!(rule.antecedent.iter().all(|i| !rule.consequent.contains(i)));
        let mut union: Vec<String> = rule
            .antecedent
            .iter()
            .chain(&rule.consequent)
            .cloned()
            .collect();
        union.sort();
        assert!(itemsets.iter().any(|set| set.items == union));
        assert!(rule.confidence > 0.0 && rule.confidence <= 1.0);
        assert!(rule.lift > 0.0);
    }
}

#[test]
fn rules_are_ranked_by_lift_then_confidence() {
    let txns = vec![
        txn(&["a", "b", "c"]),
        txn(&["a", "b", "c"]),
        txn(&["a", "b"]),
        txn(&["c"]),
    ];
    let itemsets = mine_frequent_itemsets(&txns, 0.5, 5);
    let rules = generate_rules(&itemsets, 0.0);
    for pair in rules.windows(2) {
        assert!(pair[0].lift >= pair[1].lift - 1e-9);
        if approx(pair[0].lift, pair[1].lift) {
            assert!(pair[0].confidence >= pair[1].confidence - 1e-9);
        }
    }
    // Highest lift with full confidence and the lexicographically first
    // antecedent wins the top slot.
    assert_eq!(rules[0].antecedent, vec!["a"]);
    assert_eq!(rules[0].consequent, vec!["b"]);
    assert!(approx(rules[0].confidence, 1.0));
}

#[test]
fn drops_rule_when_antecedent_missing_from_table() {
    // A pair present without its member singles yields nothing: both
    // candidate antecedents lack a mined support.
    let itemsets = vec![set(&["a", "b"], 0.5)];
    assert!(generate_rules(&itemsets, 0.0).is_empty());
}

#[test]
fn lift_falls_back_to_confidence_when_consequent_unmined() {
    let itemsets = vec![set(&["a"], 0.5), set(&["a", "b"], 0.4)];
    let rules = generate_rules(&itemsets, 0.5);
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].antecedent, vec!["a"]);
    assert_eq!(rules[0].consequent, vec!["b"]);
    assert!(approx(rules[0].confidence, 0.8));
    assert!(approx(rules[0].lift, 0.8));
}
