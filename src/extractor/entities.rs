// file: src/extractor/entities.rs
// description: entity extraction over raw article and report text
// reference: threat intelligence ioc standards

use crate::extractor::gazetteer::{
    FALSE_POSITIVE_DOMAINS, GEOGRAPHY, MALWARE_FAMILIES, PRODUCTS, SECTORS, THREAT_ACTORS,
    TTP_KEYWORDS,
};
use crate::extractor::patterns::{
    is_version_like, CVE_ID, DOMAIN, IP_ADDRESS, MD5_HASH, SHA1_HASH, SHA256_HASH, URL,
};
use crate::models::{ExtractedEntities, HashEntry};
use std::collections::HashSet;

/// Which field of [`ExtractedEntities`] a list rule feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListTarget {
    Malware,
    Actors,
    Products,
    Geography,
    Sectors,
    Tags,
}

/// How a list rule matches: canonical names matched by containment, or a
/// keyword map where any keyword hit yields the mapped tag.
enum ListMatcher {
    Gazetteer(&'static [&'static str]),
    KeywordMap(&'static [(&'static str, &'static [&'static str])]),
}

struct ListRule {
    target: ListTarget,
    matcher: ListMatcher,
}

/// Categories are data: adding one means adding a row here, not a new
/// extraction code path.
const LIST_RULES: &[ListRule] = &[
    ListRule {
        target: ListTarget::Malware,
        matcher: ListMatcher::Gazetteer(MALWARE_FAMILIES),
    },
    ListRule {
        target: ListTarget::Actors,
        matcher: ListMatcher::Gazetteer(THREAT_ACTORS),
    },
    ListRule {
        target: ListTarget::Products,
        matcher: ListMatcher::KeywordMap(PRODUCTS),
    },
    ListRule {
        target: ListTarget::Geography,
        matcher: ListMatcher::KeywordMap(GEOGRAPHY),
    },
    ListRule {
        target: ListTarget::Sectors,
        matcher: ListMatcher::KeywordMap(SECTORS),
    },
    ListRule {
        target: ListTarget::Tags,
        matcher: ListMatcher::KeywordMap(TTP_KEYWORDS),
    },
];

impl ListMatcher {
    fn matches(&self, text_lower: &str) -> Vec<String> {
        let mut found = Vec::new();
        match self {
            ListMatcher::Gazetteer(names) => {
                for name in *names {
                    if text_lower.contains(&name.to_lowercase()) {
                        found.push((*name).to_string());
                    }
                }
            }
            ListMatcher::KeywordMap(map) => {
                for (canonical, keywords) in *map {
                    if keywords.iter().any(|kw| text_lower.contains(kw)) {
                        found.push((*canonical).to_string());
                    }
                }
            }
        }
        found
    }
}

/// Pattern and gazetteer based extractor. Never fails; unmatchable or
/// binary-garbled input yields an all-empty result.
pub struct EntityExtractor;

impl EntityExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> ExtractedEntities {
        let mut entities = ExtractedEntities::default();
        if text.trim().is_empty() {
            return entities;
        }

        let text_lower = text.to_lowercase();

        entities.cves = self.extract_cves(text);
        entities.ips = self.extract_ips(text);
        entities.urls = self.extract_urls(text);
        entities.domains = self.extract_domains(text, &entities.urls);
        entities.hashes = self.extract_hashes(text);

        for rule in LIST_RULES {
            let hits = rule.matcher.matches(&text_lower);
            match rule.target {
                ListTarget::Malware => entities.malware = hits,
                ListTarget::Actors => entities.actors = hits,
                ListTarget::Products => entities.products = hits,
                ListTarget::Geography => entities.geography = hits,
                ListTarget::Sectors => entities.sectors = hits,
                ListTarget::Tags => entities.tags = hits,
            }
        }

        // threats = malware + actors, deduplicated, malware first
        let mut seen = HashSet::new();
        for name in entities.malware.iter().chain(entities.actors.iter()) {
            if seen.insert(name.clone()) {
                entities.threats.push(name.clone());
            }
        }

        entities
    }

    fn extract_cves(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for m in CVE_ID.find_iter(text) {
            let cve = m.as_str().to_uppercase();
            if seen.insert(cve.clone()) {
                result.push(cve);
            }
        }
        result
    }

    fn extract_ips(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for m in IP_ADDRESS.find_iter(text) {
            let ip = m.as_str().to_string();
            if !is_version_like(&ip) && seen.insert(ip.clone()) {
                result.push(ip);
            }
        }
        result
    }

    fn extract_urls(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for m in URL.find_iter(text) {
            let url = m
                .as_str()
                .trim_end_matches(['.', ',', ';', ':', ')'])
                .to_string();
            if seen.insert(url.clone()) {
                result.push(url);
            }
        }
        result
    }

    /// Domain-like tokens from the text plus bare hostnames derived from
    /// already-captured URLs.
    fn extract_domains(&self, text: &str, urls: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();

        let mut push = |domain: String| {
            if !FALSE_POSITIVE_DOMAINS.contains(&domain.as_str()) && seen.insert(domain.clone()) {
                result.push(domain);
            }
        };

        for m in DOMAIN.find_iter(text) {
            push(m.as_str().to_lowercase());
        }

        for url in urls {
            if let Some(host) = url_host(url) {
                let host = host.to_lowercase();
                if DOMAIN.is_match(&host) {
                    push(host);
                }
            }
        }

        result
    }

    fn extract_hashes(&self, text: &str) -> Vec<HashEntry> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();

        // Longest first so a sha256 is never re-reported as its shorter prefixes
        for (hash_type, pattern) in [
            ("sha256", &*SHA256_HASH),
            ("sha1", &*SHA1_HASH),
            ("md5", &*MD5_HASH),
        ] {
            for m in pattern.find_iter(text) {
                let value = m.as_str().to_lowercase();
                if seen.insert(value.clone()) {
                    result.push(HashEntry::new(hash_type, value));
                }
            }
        }

        result
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Hostname of a URL, without scheme, credentials, port, path, or query.
fn url_host(url: &str) -> Option<&str> {
    let rest = url.split("://").nth(1)?;
    let host = rest.split(['/', '?', '#']).next()?;
    let host = host.rsplit('@').next()?;
    let host = host.split(':').next()?;
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}
