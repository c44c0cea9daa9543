use crate::keywords;
use crate::record::EventRecord;
use std::collections::BTreeSet;

pub type Transaction = BTreeSet<String>; // deduplicated tokens of one record

/// Builds one transaction per record, in input order. `attributes` names
/// the record attributes to lift into tokens; absent attributes emit
/// nothing.
pub fn build_transactions(records: &[EventRecord], attributes: &[String]) -> Vec<Transaction> {
    records.iter().map(|rec| build_transaction(rec, attributes)).collect()
}

pub fn build_transaction(record: &EventRecord, attributes: &[String]) -> Transaction {
    let mut items = BTreeSet::new();
    items.insert(format!("level:{}", record.level));
    if let Some(service) = &record.service {
        items.insert(format!("service:{service}"));
    }
    for token in keywords::extract_keywords(&record.message) {
        items.insert(token);
    }
    for name in attributes {
        if let Some(value) = record.attributes.get(name) {
            items.insert(format!("{name}:{value}"));
        }
    }
    items
}
