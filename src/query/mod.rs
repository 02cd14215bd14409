// file: src/query/mod.rs
// description: natural language query module exports
// reference: internal module structure

pub mod executor;
pub mod parser;
