// file: src/store/mod.rs
// description: corpus storage and aggregation module exports
// reference: internal module structure

pub mod aggregate;
pub mod corpus;

pub use corpus::{CorpusSnapshot, CorpusStore};
