// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod item;
pub mod query;
pub mod rollup;

pub use item::{Evidence, EvidenceKind, ExtractedEntities, HashEntry, ThreatItem};
pub use query::{EntityType, ParsedQuery, QueryType, SearchResult, TimeRange};
pub use rollup::{
    CveEntry, IocBreakdown, IocCollection, IocEntry, ItemRef, Stats, ThreatEntry, ThreatKind,
};
