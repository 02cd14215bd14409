// file: src/extractor/mod.rs
// description: entity extraction module exports
// reference: internal module structure

pub mod entities;
pub mod evidence;
pub mod gazetteer;
pub mod patterns;

pub use entities::EntityExtractor;
pub use evidence::EvidenceCollector;
