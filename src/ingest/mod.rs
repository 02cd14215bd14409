// file: src/ingest/mod.rs
// description: ingestion module exports
// reference: internal module structure

pub mod feeds;
pub mod sync;
pub mod upload;

pub use sync::{sync_sources, SyncOutcome};
pub use upload::process_upload;
