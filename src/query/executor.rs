// file: src/query/executor.rs
// description: filter pipeline over a corpus snapshot plus answer summary
// reference: conjunctive filters, corpus order preserved

use crate::models::{EntityType, ParsedQuery, SearchResult, ThreatItem};
use chrono::Utc;
use std::sync::Arc;

/// Cap on full items returned in one search response.
const MAX_RESULTS: usize = 50;

/// Runs a parsed query against a corpus snapshot. Filters are conjunctive
/// and applied in a fixed order; items keep their corpus order throughout.
pub fn execute(parsed: &ParsedQuery, items: &[Arc<ThreatItem>]) -> SearchResult {
    let now = Utc::now();

    let matches: Vec<&Arc<ThreatItem>> = items
        .iter()
        .filter(|item| {
            if let Some(range) = parsed.time_range {
                if item.date < range.cutoff(now) {
                    return false;
                }
            }
            if let Some(source) = &parsed.source {
                if !item.source.eq_ignore_ascii_case(source) {
                    return false;
                }
            }
            if let Some(cve_id) = &parsed.cve_id {
                if !item.extracted.cves.iter().any(|c| c == cve_id) {
                    return false;
                }
            }
            if let Some(entity) = parsed.entity_type {
                if !has_entity(item, entity) {
                    return false;
                }
            }
            if !parsed.keywords.is_empty() && !matches_keywords(item, &parsed.keywords) {
                return false;
            }
            true
        })
        .collect();

    let answer_summary = summarize(parsed, &matches);
    let results: Vec<ThreatItem> = matches
        .iter()
        .take(MAX_RESULTS)
        .map(|item| item.as_ref().clone())
        .collect();

    SearchResult {
        query: parsed.raw_query.clone(),
        parsed_query: parsed.clone(),
        answer_summary,
        result_count: matches.len(),
        results,
    }
}

fn has_entity(item: &ThreatItem, entity: EntityType) -> bool {
    let extracted = &item.extracted;
    match entity {
        EntityType::Ip => !extracted.ips.is_empty(),
        EntityType::Domain => !extracted.domains.is_empty(),
        EntityType::Hash => !extracted.hashes.is_empty(),
        EntityType::Url => !extracted.urls.is_empty(),
        EntityType::Actor => !extracted.actors.is_empty(),
        EntityType::Malware => !extracted.malware.is_empty(),
    }
}

/// A keyword matches when it appears as a case-insensitive substring of the
/// item's text fields or any extracted string entity. Keywords combine with
/// OR: one hit is enough.
fn matches_keywords(item: &ThreatItem, keywords: &[String]) -> bool {
    let mut haystack = String::new();
    haystack.push_str(&item.title);
    haystack.push(' ');
    haystack.push_str(&item.description);
    if let Some(content) = &item.content {
        haystack.push(' ');
        haystack.push_str(content);
    }
    let extracted = &item.extracted;
    for group in [
        &extracted.cves,
        &extracted.ips,
        &extracted.domains,
        &extracted.urls,
        &extracted.threats,
        &extracted.malware,
        &extracted.actors,
        &extracted.tags,
        &extracted.products,
        &extracted.geography,
        &extracted.sectors,
    ] {
        for value in group {
            haystack.push(' ');
            haystack.push_str(value);
        }
    }
    for hash in &extracted.hashes {
        haystack.push(' ');
        haystack.push_str(&hash.value);
    }
    let haystack = haystack.to_lowercase();

    keywords
        .iter()
        .any(|kw| haystack.contains(&kw.to_lowercase()))
}

/// One-paragraph natural language answer for the result set.
fn summarize(parsed: &ParsedQuery, matches: &[&Arc<ThreatItem>]) -> String {
    if matches.is_empty() {
        return format!("No results found for '{}'.", parsed.raw_query);
    }

    let mut parts: Vec<String> = Vec::new();
    let noun = if matches.len() == 1 { "item" } else { "items" };
    let mut head = format!("Found {} {}", matches.len(), noun);
    if let Some(cve_id) = &parsed.cve_id {
        head.push_str(&format!(" mentioning {cve_id}"));
    }
    if let Some(source) = &parsed.source {
        head.push_str(&format!(" from {source}"));
    }
    if let Some(range) = parsed.time_range {
        head.push_str(&format!(" in the {}", range.describe()));
    }
    head.push('.');
    parts.push(head);

    let cves: usize = matches.iter().map(|i| i.extracted.cves.len()).sum();
    let iocs: usize = matches.iter().map(|i| i.extracted.ioc_count()).sum();
    let threats: usize = matches.iter().map(|i| i.extracted.threats.len()).sum();
    if cves + iocs + threats > 0 {
        parts.push(format!(
            "Contains {cves} CVEs, {iocs} IoCs, {threats} threats."
        ));
    }

    parts.join(" ")
}
