// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod extractor;
pub mod ingest;
pub mod models;
pub mod query;
pub mod server;
pub mod store;
pub mod utils;

pub use config::{Config, ExtractionConfig, IngestConfig, ServerConfig};
pub use error::{EngineError, Result};
pub use extractor::{EntityExtractor, EvidenceCollector};
pub use ingest::{process_upload, sync_sources, SyncOutcome};
pub use models::{
    Evidence, EvidenceKind, ExtractedEntities, ParsedQuery, QueryType, SearchResult, Stats,
    ThreatItem, TimeRange,
};
pub use server::{build_router, AppState};
pub use store::{CorpusSnapshot, CorpusStore};
