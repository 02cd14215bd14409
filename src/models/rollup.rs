// file: src/models/rollup.rs
// description: corpus-wide rollup models derived by aggregation
// reference: threat intelligence dashboard contracts

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lightweight back-reference to a corpus item; rollups carry these instead
/// of item copies so memory stays bounded to one corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: String,
    pub title: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IocBreakdown {
    pub ips: usize,
    pub domains: usize,
    pub hashes: usize,
    pub urls: usize,
}

/// Dashboard statistics, fully recomputed from the corpus on every request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_items: usize,
    pub articles: usize,
    pub pdfs: usize,
    pub total_cves: usize,
    pub total_iocs: usize,
    pub total_threats: usize,
    pub ioc_breakdown: IocBreakdown,
    pub top_cves: Vec<(String, usize)>,
    pub top_threats: Vec<(String, usize)>,
    pub all_cves: Vec<String>,
    pub all_threats: Vec<String>,
    pub all_malware: Vec<String>,
    pub all_actors: Vec<String>,
    pub tag_counts: BTreeMap<String, usize>,
    pub product_counts: BTreeMap<String, usize>,
    pub geography_counts: BTreeMap<String, usize>,
    pub sector_counts: BTreeMap<String, usize>,
    pub sources: BTreeMap<String, usize>,
}

/// One CVE rolled up across the corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CveEntry {
    pub id: String,
    pub count: usize,
    pub sources: Vec<String>,
    pub items: Vec<ItemRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatKind {
    Malware,
    Actor,
}

/// One malware family or actor rolled up across the corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ThreatKind,
    pub count: usize,
    pub items: Vec<ItemRef>,
}

/// A deduplicated IoC with a back-reference to the first item it was seen in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IocEntry {
    pub value: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub hash_type: Option<String>,
    pub source_item: ItemRef,
}

/// IoCs grouped by kind, deduplicated across the corpus (first seen wins).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IocCollection {
    pub ips: Vec<IocEntry>,
    pub domains: Vec<IocEntry>,
    pub urls: Vec<IocEntry>,
    pub hashes: Vec<IocEntry>,
}
