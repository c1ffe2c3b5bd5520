// Aggregate scoring over tagged skill/project/POAP records, comparison against the
// previous record, and the append-only score store.

pub mod calculator;
pub mod handlers;
pub mod models;
pub mod service;
pub mod store;
pub mod tagging;
