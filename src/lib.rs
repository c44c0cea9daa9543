pub mod record;
pub mod source;
pub mod memory;
pub mod keywords;
pub mod transactions;
pub mod itemsets;
pub mod rules;
pub mod sequences;
pub mod drift;
pub mod engine;
