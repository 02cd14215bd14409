// file: src/utils/mod.rs
// description: shared utilities
// reference: internal module structure

pub mod logging;
