// file: src/models/item.rs
// description: threat intelligence item and extracted entity models
// reference: stix ioc standards

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single ingested article or report together with its extracted entities.
/// Immutable once created; the corpus store is its sole owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatItem {
    pub id: String,
    pub title: String,
    pub source: String,
    pub date: DateTime<Utc>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub extracted: ExtractedEntities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Vec<Evidence>>,
    pub added_at: DateTime<Utc>,
}

impl ThreatItem {
    pub fn new(title: String, source: String, date: DateTime<Utc>, description: String) -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();

        Self {
            id,
            title,
            source,
            date,
            description,
            content: None,
            url: None,
            extracted: ExtractedEntities::default(),
            evidence: None,
            added_at: Utc::now(),
        }
    }

    pub fn with_content(mut self, content: String) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_url(mut self, url: String) -> Self {
        self.url = Some(url);
        self
    }

    pub fn with_extracted(mut self, extracted: ExtractedEntities) -> Self {
        self.extracted = extracted;
        self
    }

    pub fn with_evidence(mut self, evidence: Vec<Evidence>) -> Self {
        self.evidence = Some(evidence);
        self
    }

    /// Content key used to deduplicate re-synced items: the normalized URL
    /// when one exists, otherwise a hash of title and source.
    pub fn dedup_key(&self) -> String {
        match &self.url {
            Some(url) if !url.trim().is_empty() => {
                let normalized = url.trim().trim_end_matches('/').to_lowercase();
                format!("url:{normalized}")
            }
            _ => {
                let mut hasher = Sha256::new();
                hasher.update(self.title.as_bytes());
                hasher.update(b"|");
                hasher.update(self.source.as_bytes());
                format!("ts:{:x}", hasher.finalize())
            }
        }
    }
}

/// Entities pulled out of one item's text. Every vector is set-semantic:
/// no duplicate normalized values within a single item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub cves: Vec<String>,
    pub ips: Vec<String>,
    pub domains: Vec<String>,
    pub urls: Vec<String>,
    pub hashes: Vec<HashEntry>,
    pub threats: Vec<String>,
    pub malware: Vec<String>,
    pub actors: Vec<String>,
    pub tags: Vec<String>,
    pub products: Vec<String>,
    pub geography: Vec<String>,
    pub sectors: Vec<String>,
}

impl ExtractedEntities {
    pub fn ioc_count(&self) -> usize {
        self.ips.len() + self.domains.len() + self.urls.len() + self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cves.is_empty()
            && self.ioc_count() == 0
            && self.threats.is_empty()
            && self.tags.is_empty()
            && self.products.is_empty()
            && self.geography.is_empty()
            && self.sectors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashEntry {
    #[serde(rename = "type")]
    pub hash_type: String,
    pub value: String,
}

impl HashEntry {
    pub fn new(hash_type: &str, value: String) -> Self {
        Self {
            hash_type: hash_type.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceKind {
    Cve,
    Ioc,
    Threat,
}

/// Provenance record binding an extracted entity to the sentence it was
/// found in. At most one snippet per (entity value, item) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub entity: String,
    pub snippet: String,
    #[serde(rename = "type")]
    pub kind: EvidenceKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_is_short() {
        let item = ThreatItem::new(
            "Test".to_string(),
            "pdf".to_string(),
            Utc::now(),
            "desc".to_string(),
        );
        assert_eq!(item.id.len(), 8);
    }

    #[test]
    fn test_dedup_key_prefers_url() {
        let item = ThreatItem::new(
            "Title".to_string(),
            "bleepingcomputer".to_string(),
            Utc::now(),
            String::new(),
        )
        .with_url("https://Example.com/news/".to_string());

        assert_eq!(item.dedup_key(), "url:https://example.com/news");
    }

    #[test]
    fn test_dedup_key_falls_back_to_title_source() {
        let a = ThreatItem::new(
            "Title".to_string(),
            "pdf".to_string(),
            Utc::now(),
            String::new(),
        );
        let b = ThreatItem::new(
            "Title".to_string(),
            "pdf".to_string(),
            Utc::now(),
            String::new(),
        );

        assert_eq!(a.dedup_key(), b.dedup_key());
        assert!(a.dedup_key().starts_with("ts:"));
    }

    #[test]
    fn test_ioc_count() {
        let entities = ExtractedEntities {
            ips: vec!["1.2.3.4".to_string()],
            domains: vec!["evil.com".to_string()],
            hashes: vec![HashEntry::new("md5", "a".repeat(32))],
            ..Default::default()
        };
        assert_eq!(entities.ioc_count(), 3);
    }
}
