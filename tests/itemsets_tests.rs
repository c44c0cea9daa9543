use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use logminer::itemsets::{itemset_key, mine_frequent_itemsets, Itemset};
use logminer::transactions::Transaction;

fn txn(items: &[&str]) -> Transaction {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn mines_singles_and_pairs_at_half_support() {
    let txns = vec![
        txn(&["a", "b"]),
        txn(&["a", "b"]),
        txn(&["a", "c"]),
        txn(&["b", "c"]),
    ];
    let mined = mine_frequent_itemsets(&txns, 0.5, 5);
    let got: Vec<(String, f64)> = mined
        .iter()
        .map(|set| (set.items.join(","), set.support))
        .collect();
    assert_eq!(
        got,
        vec![
            ("a".to_string(), 0.75),
            ("b".to_string(), 0.75),
            ("c".to_string(), 0.5),
            ("a,b".to_string(), 0.5),
        ]
    );
}

fn brute_force(txns: &[Transaction], min_support: f64, max_size: usize) -> BTreeMap<String, f64> {
    let tokens: Vec<String> = txns
        .iter()
        .flatten()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let mut out = BTreeMap::new();
    for subset in tokens.iter().powerset() {
        if subset.is_empty() || subset.len() > max_size {
            continue;
        }
        let count = txns
            .iter()
            .filter(|t| subset.iter().all(|item| t.contains(*item)))
            .count();
        let support = count as f64 / txns.len() as f64;
        if support >= min_support {
            let key = subset.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(",");
            out.insert(key, support);
        }
    }
    out
}

#[test]
fn agrees_with_exhaustive_search() {
    let txns = vec![
        txn(&["a", "b", "c"]),
        txn(&["a", "b"]),
        txn(&["a", "c", "d"]),
        txn(&["b", "c"]),
        txn(&["a", "b", "c", "e"]),
        txn(&["d", "e"]),
        txn(&["a", "f"]),
        txn(&["b", "c", "f"]),
    ];
    let mined = mine_frequent_itemsets(&txns, 0.25, 4);
    let got: BTreeMap<String, f64> = mined
        .iter()
        .map(|set| (itemset_key(&set.items), set.support))
        .collect();
    assert_eq!(got.len(), mined.len(), "mined sets must be distinct");
    assert_eq!(got, brute_force(&txns, 0.25, 4));
}

#[test]
fn subsets_of_frequent_sets_are_frequent() {
    let txns = vec![
        txn(&["a", "b", "c"]),
        txn(&["a", "b", "c"]),
        txn(&["a", "b"]),
        txn(&["c", "d"]),
    ];
    let mined = mine_frequent_itemsets(&txns, 0.5, 4);
    let by_key: BTreeMap<String, &Itemset> = mined
        .iter()
        .map(|set| (itemset_key(&set.items), set))
        .collect();
    for set in mined.iter().filter(|s| s.items.len() >= 2) {
        for drop in 0..set.items.len() {
            let mut subset = set.items.clone();
            subset.remove(drop);
            let parent = by_key
                .get(&itemset_key(&subset))
                .unwrap_or_else(|| panic!("missing subset {subset:?} of {:?}", set.items));
            assert!(parent.support >= set.support);
        }
    }
}

#[test]
fn zero_min_support_keeps_every_generated_set() {
    let txns = vec![txn(&["a"]), txn(&["b"])];
    let mined = mine_frequent_itemsets(&txns, 0.0, 5);
    let got: Vec<(String, f64)> = mined
        .iter()
        .map(|set| (set.items.join(","), set.support))
        .collect();
    assert_eq!(
        got,
        vec![
            ("a".to_string(), 0.5),
            ("b".to_string(), 0.5),
            ("a,b".to_string(), 0.0),
        ]
    );
}

#[test]
fn support_exactly_at_threshold_is_kept() {
    let txns = vec![txn(&["a"]), txn(&["a"]), txn(&["b"]), txn(&["b"])];
    let mined = mine_frequent_itemsets(&txns, 0.5, 5);
    assert_eq!(mined.len(), 2);
    assert!(mined.iter().all(|set| set.support == 0.5));
}

#[test]
fn max_size_caps_itemset_growth() {
    let txns = vec![
        txn(&["a", "b", "c"]),
        txn(&["a", "b", "c"]),
        txn(&["a", "b", "c"]),
    ];
    let mined = mine_frequent_itemsets(&txns, 1.0, 2);
    assert_eq!(mined.len(), 6);
    assert!(mined.iter().all(|set| set.items.len() <= 2));

    assert!(mine_frequent_itemsets(&txns, 1.0, 0).is_empty());
}

#[test]
fn no_transactions_means_no_patterns() {
    assert!(mine_frequent_itemsets(&[], 0.5, 5).is_empty());
}
