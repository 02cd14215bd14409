// file: src/store/aggregate.rs
// description: corpus-wide aggregation into stats and entity rollups
// reference: pure recomputation, no incremental counters

use crate::models::{
    CveEntry, IocBreakdown, IocCollection, IocEntry, ItemRef, Stats, ThreatEntry, ThreatKind,
    ThreatItem,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::warn;

const TOP_N: usize = 10;

/// Occurrence counter that remembers first-seen order so ranking ties are
/// broken deterministically by corpus order.
#[derive(Default)]
struct OrderedCounter {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl OrderedCounter {
    fn add(&mut self, value: &str) {
        if !self.counts.contains_key(value) {
            self.order.push(value.to_string());
        }
        *self.counts.entry(value.to_string()).or_insert(0) += 1;
    }

    fn ranked(&self, limit: usize) -> Vec<(String, usize)> {
        let mut entries: Vec<(String, usize)> = self
            .order
            .iter()
            .map(|v| (v.clone(), self.counts[v]))
            .collect();
        // Stable sort keeps first-seen order among equal counts
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(limit);
        entries
    }

    fn values(&self) -> Vec<String> {
        self.order.clone()
    }
}

/// Items missing required fields are skipped, never fatal for the pass.
fn usable(item: &ThreatItem) -> bool {
    if item.id.is_empty() || item.title.is_empty() {
        warn!(id = %item.id, "skipping malformed corpus item during aggregation");
        return false;
    }
    true
}

fn item_ref(item: &ThreatItem) -> ItemRef {
    ItemRef {
        id: item.id.clone(),
        title: item.title.clone(),
        source: item.source.clone(),
    }
}

fn count_into(counts: &mut BTreeMap<String, usize>, values: &[String]) {
    for value in values {
        *counts.entry(value.clone()).or_insert(0) += 1;
    }
}

/// Dashboard statistics over one corpus snapshot.
pub fn stats(items: &[Arc<ThreatItem>]) -> Stats {
    let mut stats = Stats::default();

    let mut cves = OrderedCounter::default();
    let mut threats = OrderedCounter::default();
    let mut malware = OrderedCounter::default();
    let mut actors = OrderedCounter::default();

    let mut ips: HashSet<&str> = HashSet::new();
    let mut domains: HashSet<&str> = HashSet::new();
    let mut urls: HashSet<&str> = HashSet::new();
    let mut hashes: HashSet<&str> = HashSet::new();

    for item in items.iter().filter(|i| usable(i)) {
        stats.total_items += 1;
        if item.source == "pdf" || item.source == "upload" {
            stats.pdfs += 1;
        } else {
            stats.articles += 1;
        }
        *stats.sources.entry(item.source.clone()).or_insert(0) += 1;

        let extracted = &item.extracted;
        for cve in &extracted.cves {
            cves.add(cve);
        }
        for threat in &extracted.threats {
            threats.add(threat);
        }
        for name in &extracted.malware {
            malware.add(name);
        }
        for name in &extracted.actors {
            actors.add(name);
        }

        ips.extend(extracted.ips.iter().map(String::as_str));
        domains.extend(extracted.domains.iter().map(String::as_str));
        urls.extend(extracted.urls.iter().map(String::as_str));
        hashes.extend(extracted.hashes.iter().map(|h| h.value.as_str()));

        count_into(&mut stats.tag_counts, &extracted.tags);
        count_into(&mut stats.product_counts, &extracted.products);
        count_into(&mut stats.geography_counts, &extracted.geography);
        count_into(&mut stats.sector_counts, &extracted.sectors);
    }

    stats.ioc_breakdown = IocBreakdown {
        ips: ips.len(),
        domains: domains.len(),
        hashes: hashes.len(),
        urls: urls.len(),
    };
    stats.total_iocs = ips.len() + domains.len() + hashes.len() + urls.len();

    stats.top_cves = cves.ranked(TOP_N);
    stats.top_threats = threats.ranked(TOP_N);
    stats.all_cves = cves.values();
    stats.all_threats = threats.values();
    stats.all_malware = malware.values();
    stats.all_actors = actors.values();
    stats.total_cves = stats.all_cves.len();
    stats.total_threats = stats.all_threats.len();

    stats
}

/// Every CVE with mention count, contributing sources and item references,
/// sorted by count descending with corpus order breaking ties.
pub fn cve_entries(items: &[Arc<ThreatItem>]) -> Vec<CveEntry> {
    let mut order: Vec<String> = Vec::new();
    let mut rollups: HashMap<String, CveEntry> = HashMap::new();

    for item in items.iter().filter(|i| usable(i)) {
        for cve in &item.extracted.cves {
            let entry = rollups.entry(cve.clone()).or_insert_with(|| {
                order.push(cve.clone());
                CveEntry {
                    id: cve.clone(),
                    count: 0,
                    sources: Vec::new(),
                    items: Vec::new(),
                }
            });
            entry.count += 1;
            if !entry.sources.contains(&item.source) {
                entry.sources.push(item.source.clone());
            }
            entry.items.push(item_ref(item));
        }
    }

    let mut entries: Vec<CveEntry> = order
        .iter()
        .filter_map(|cve| rollups.remove(cve))
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// Malware and actors rolled up with counts, sorted like [`cve_entries`].
pub fn threat_entries(items: &[Arc<ThreatItem>]) -> Vec<ThreatEntry> {
    let mut order: Vec<String> = Vec::new();
    let mut rollups: HashMap<String, ThreatEntry> = HashMap::new();

    for item in items.iter().filter(|i| usable(i)) {
        let groups = [
            (&item.extracted.malware, ThreatKind::Malware),
            (&item.extracted.actors, ThreatKind::Actor),
        ];
        for (names, kind) in groups {
            for name in names.iter() {
                let entry = rollups.entry(name.clone()).or_insert_with(|| {
                    order.push(name.clone());
                    ThreatEntry {
                        name: name.clone(),
                        kind,
                        count: 0,
                        items: Vec::new(),
                    }
                });
                entry.count += 1;
                entry.items.push(item_ref(item));
            }
        }
    }

    let mut entries: Vec<ThreatEntry> = order
        .iter()
        .filter_map(|name| rollups.remove(name))
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// All IoCs grouped by kind; the first item mentioning a value owns the
/// back-reference.
pub fn ioc_collection(items: &[Arc<ThreatItem>]) -> IocCollection {
    let mut collection = IocCollection::default();
    let mut seen: HashSet<String> = HashSet::new();

    for item in items.iter().filter(|i| usable(i)) {
        let reference = item_ref(item);
        let extracted = &item.extracted;

        let groups = [
            (&extracted.ips, &mut collection.ips),
            (&extracted.domains, &mut collection.domains),
            (&extracted.urls, &mut collection.urls),
        ];
        for (values, sink) in groups {
            for value in values.iter() {
                if seen.insert(value.clone()) {
                    sink.push(IocEntry {
                        value: value.clone(),
                        hash_type: None,
                        source_item: reference.clone(),
                    });
                }
            }
        }

        for hash in &extracted.hashes {
            if seen.insert(hash.value.clone()) {
                collection.hashes.push(IocEntry {
                    value: hash.value.clone(),
                    hash_type: Some(hash.hash_type.clone()),
                    source_item: reference.clone(),
                });
            }
        }
    }

    collection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::EntityExtractor;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn item_with_text(title: &str, source: &str, text: &str) -> Arc<ThreatItem> {
        let extracted = EntityExtractor::new().extract(text);
        Arc::new(
            ThreatItem::new(
                title.to_string(),
                source.to_string(),
                Utc::now(),
                text.to_string(),
            )
            .with_extracted(extracted),
        )
    }

    #[test]
    fn test_stats_counts_unique_iocs() {
        let corpus = vec![
            item_with_text("A", "cisa", "C2 at 203.0.113.7 and evil-c2.net"),
            item_with_text("B", "gbhackers", "Same C2 203.0.113.7 plus fresh-c2.su"),
        ];

        let stats = stats(&corpus);
        assert_eq!(stats.total_items, 2);
        assert_eq!(stats.ioc_breakdown.ips, 1);
        assert_eq!(stats.ioc_breakdown.domains, 2);
    }

    #[test]
    fn test_top_cves_ranked_with_stable_ties() {
        let corpus = vec![
            item_with_text("A", "cisa", "CVE-2024-1111 and CVE-2024-2222"),
            item_with_text("B", "cisa", "CVE-2024-2222 again"),
            item_with_text("C", "cisa", "CVE-2024-3333"),
        ];

        let stats = stats(&corpus);
        assert_eq!(stats.top_cves[0], ("CVE-2024-2222".to_string(), 2));
        // Tie between 1111 and 3333 resolved by first-seen corpus order
        assert_eq!(stats.top_cves[1].0, "CVE-2024-1111");
        assert_eq!(stats.top_cves[2].0, "CVE-2024-3333");
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let corpus = vec![
            item_with_text("A", "cisa", "APT29 used CVE-2024-3400 ransomware"),
            item_with_text("B", "pdf", "Emotet dropper at 198.51.100.9"),
        ];

        assert_eq!(stats(&corpus), stats(&corpus));
    }

    #[test]
    fn test_malformed_items_are_skipped() {
        let good = item_with_text("Good", "cisa", "CVE-2024-3400");
        let mut bad = ThreatItem::new(String::new(), "cisa".to_string(), Utc::now(), String::new());
        bad.title = String::new();
        bad.id = String::new();

        let corpus = vec![good, Arc::new(bad)];
        let stats = stats(&corpus);

        assert_eq!(stats.total_items, 1);
        assert_eq!(stats.total_cves, 1);
    }

    #[test]
    fn test_cve_entries_dedupe_sources() {
        let corpus = vec![
            item_with_text("A", "cisa", "CVE-2024-3400"),
            item_with_text("B", "cisa", "CVE-2024-3400 still"),
        ];

        let entries = cve_entries(&corpus);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].count, 2);
        assert_eq!(entries[0].sources, vec!["cisa".to_string()]);
        assert_eq!(entries[0].items.len(), 2);
    }

    #[test]
    fn test_threat_entries_keep_kind() {
        let corpus = vec![item_with_text("A", "cisa", "APT29 deployed Emotet")];

        let entries = threat_entries(&corpus);
        let apt = entries.iter().find(|e| e.name == "APT29").unwrap();
        let emotet = entries.iter().find(|e| e.name == "Emotet").unwrap();

        assert_eq!(apt.kind, ThreatKind::Actor);
        assert_eq!(emotet.kind, ThreatKind::Malware);
    }

    #[test]
    fn test_ioc_collection_first_seen_wins() {
        let corpus = vec![
            item_with_text("First", "cisa", "IoC 203.0.113.7 here"),
            item_with_text("Second", "pdf", "IoC 203.0.113.7 repeated"),
        ];

        let iocs = ioc_collection(&corpus);
        assert_eq!(iocs.ips.len(), 1);
        assert_eq!(iocs.ips[0].source_item.title, "First");
    }
}
