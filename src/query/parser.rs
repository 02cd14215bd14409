// file: src/query/parser.rs
// description: natural language query parsing into structured filters
// reference: independent detector pipeline over the token stream

use crate::extractor::patterns::CVE_ID;
use crate::models::{EntityType, ParsedQuery, QueryType, TimeRange};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref TIME_PATTERNS: Vec<(Regex, TimeRange)> = vec![
        (
            Regex::new(r"(?i)\b(today|last\s*24\s*h(ours?)?|past\s*24\s*h(ours?)?)\b")
                .expect("24h time regex is valid"),
            TimeRange::Last24h,
        ),
        (
            Regex::new(
                r"(?i)\b(last\s*(7|seven)\s*days?|past\s*(7|seven)\s*days?|this\s*week|last\s*week)\b"
            )
            .expect("7d time regex is valid"),
            TimeRange::SevenDays,
        ),
        (
            Regex::new(
                r"(?i)\b(last\s*(30|thirty)\s*days?|past\s*(30|thirty)\s*days?|this\s*month|last\s*month)\b"
            )
            .expect("30d time regex is valid"),
            TimeRange::ThirtyDays,
        ),
    ];

    static ref ENTITY_PATTERNS: Vec<(Regex, EntityType)> = vec![
        (
            Regex::new(r"(?i)\b(ip\s*address(es)?|ips?)\b").expect("ip entity regex is valid"),
            EntityType::Ip,
        ),
        (
            Regex::new(r"(?i)\bdomains?\b").expect("domain entity regex is valid"),
            EntityType::Domain,
        ),
        (
            Regex::new(r"(?i)\b(hash(es)?|md5|sha\d+)\b").expect("hash entity regex is valid"),
            EntityType::Hash,
        ),
        (
            Regex::new(r"(?i)\burls?\b").expect("url entity regex is valid"),
            EntityType::Url,
        ),
        (
            Regex::new(r"(?i)\bactors?\b").expect("actor entity regex is valid"),
            EntityType::Actor,
        ),
        (
            Regex::new(r"(?i)\bmalware\b").expect("malware entity regex is valid"),
            EntityType::Malware,
        ),
    ];

    /// Sources the parser recognizes by name. Each pattern maps the phrases
    /// that imply a source to its canonical id.
    static ref SOURCE_PATTERNS: Vec<(Regex, &'static str)> = vec![
        (
            Regex::new(r"(?i)\b(bleepingcomputer|bleeping\s+computer|bleeping)\b")
                .expect("bleepingcomputer source regex is valid"),
            "bleepingcomputer",
        ),
        (
            Regex::new(r"(?i)\b(gbhackers?|gb\s+hackers)\b")
                .expect("gbhackers source regex is valid"),
            "gbhackers",
        ),
        (
            Regex::new(r"(?i)\b(thehackernews|hacker\s+news|hackernews)\b")
                .expect("thehackernews source regex is valid"),
            "thehackernews",
        ),
        (
            Regex::new(r"(?i)\bcisa\b").expect("cisa source regex is valid"),
            "cisa",
        ),
        (
            Regex::new(r"(?i)\b(pdfs?|uploaded|upload|reports?)\b")
                .expect("pdf source regex is valid"),
            "pdf",
        ),
    ];

    static ref TOKEN: Regex = Regex::new(r"\b[a-zA-Z0-9_-]+\b").expect("token regex is valid");
}

/// Filler words dropped from the keyword pool.
const STOP_WORDS: &[&str] = &[
    "show", "find", "search", "list", "get", "display", "give", "me", "the", "all", "any", "from",
    "for", "with", "about", "related", "to", "in", "a", "an", "and", "or", "of", "are", "is",
    "was", "were", "been", "what", "which", "where", "when", "how", "can", "could", "would",
    "please", "thanks", "thank", "you", "i", "my", "we", "our", "items", "item",
];

/// Parses a free-text query into structured filters. Never fails: a query
/// with no recognizable signals degrades to a plain keyword search over the
/// whole input.
///
/// Detectors run independently, case-insensitively, over the raw input and
/// all of them may fire on the same query; each one removes the text spans
/// it claimed from the residue that finally becomes the keyword pool.
/// Spans and tokens share the raw input's byte coordinates, so lowercase
/// expansions of characters like 'İ' cannot shift a claim onto a neighbor.
pub fn parse(raw: &str) -> ParsedQuery {
    let mut parsed = ParsedQuery {
        raw_query: raw.to_string(),
        ..Default::default()
    };

    // Spans claimed by detectors, as byte ranges into `raw`
    let mut claimed: Vec<(usize, usize)> = Vec::new();

    if let Some(m) = CVE_ID.find(raw) {
        parsed.cve_id = Some(m.as_str().to_uppercase());
        claimed.push((m.start(), m.end()));
    }

    // First time phrase wins when several appear
    let mut time_match: Option<(usize, usize, TimeRange)> = None;
    for (pattern, range) in TIME_PATTERNS.iter() {
        if let Some(m) = pattern.find(raw) {
            let better = match time_match {
                Some((start, ..)) => m.start() < start,
                None => true,
            };
            if better {
                time_match = Some((m.start(), m.end(), *range));
            }
        }
    }
    if let Some((start, end, range)) = time_match {
        parsed.time_range = Some(range);
        claimed.push((start, end));
    }

    for (pattern, canonical) in SOURCE_PATTERNS.iter() {
        if let Some(m) = pattern.find(raw) {
            parsed.source = Some((*canonical).to_string());
            claimed.push((m.start(), m.end()));
            break;
        }
    }

    for (pattern, entity) in ENTITY_PATTERNS.iter() {
        if pattern.is_match(raw) {
            parsed.entity_type = Some(*entity);
            for m in pattern.find_iter(raw) {
                claimed.push((m.start(), m.end()));
            }
            break;
        }
    }

    parsed.query_type = classify(raw);
    parsed.keywords = residual_keywords(raw, &claimed);

    parsed
}

/// Leading-verb heuristic; anything without a recognized verb is a search.
fn classify(raw: &str) -> QueryType {
    match raw
        .split_whitespace()
        .next()
        .map(|w| w.to_lowercase())
        .as_deref()
    {
        Some("list") => QueryType::List,
        Some("show") | Some("display") => QueryType::Show,
        _ => QueryType::Search,
    }
}

/// Tokens left after removing claimed spans and stop words; order preserved,
/// duplicates removed, single characters dropped.
fn residual_keywords(raw: &str, claimed: &[(usize, usize)]) -> Vec<String> {
    let mut keywords = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for m in TOKEN.find_iter(raw) {
        let overlaps = claimed
            .iter()
            .any(|&(start, end)| m.start() < end && m.end() > start);
        if overlaps {
            continue;
        }

        let token = m.as_str();
        let token_lower = token.to_lowercase();
        if token.len() < 2 || STOP_WORDS.contains(&token_lower.as_str()) {
            continue;
        }
        if seen.insert(token_lower) {
            keywords.push(token.to_string());
        }
    }

    keywords
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cve_round_trip() {
        let parsed = parse("CVE-2024-3400 exploited in the wild");
        assert_eq!(parsed.cve_id, Some("CVE-2024-3400".to_string()));
        assert_eq!(parsed.keywords, vec!["exploited", "wild"]);
    }

    #[test]
    fn test_multi_signal_composition() {
        let parsed = parse("domains from last 24 hours");

        assert_eq!(parsed.entity_type, Some(EntityType::Domain));
        assert_eq!(parsed.time_range, Some(TimeRange::Last24h));
        assert!(parsed.keywords.is_empty());
    }

    #[test]
    fn test_plain_text_degrades_to_keywords() {
        let parsed = parse("completely unrelated free text");

        assert_eq!(parsed.query_type, QueryType::Search);
        assert_eq!(parsed.cve_id, None);
        assert_eq!(parsed.time_range, None);
        assert_eq!(parsed.source, None);
        assert_eq!(parsed.entity_type, None);
        assert_eq!(
            parsed.keywords,
            vec!["completely", "unrelated", "free", "text"]
        );
    }

    #[test]
    fn test_time_phrases() {
        assert_eq!(parse("today").time_range, Some(TimeRange::Last24h));
        assert_eq!(parse("past 24 hours").time_range, Some(TimeRange::Last24h));
        assert_eq!(parse("this week").time_range, Some(TimeRange::SevenDays));
        assert_eq!(parse("last seven days").time_range, Some(TimeRange::SevenDays));
        assert_eq!(parse("last month").time_range, Some(TimeRange::ThirtyDays));
        assert_eq!(parse("emotet").time_range, None);
    }

    #[test]
    fn test_first_time_phrase_wins() {
        let parsed = parse("today or maybe last month");
        assert_eq!(parsed.time_range, Some(TimeRange::Last24h));
    }

    #[test]
    fn test_source_detection() {
        assert_eq!(
            parse("ransomware from bleeping computer").source,
            Some("bleepingcomputer".to_string())
        );
        assert_eq!(parse("cisa advisories").source, Some("cisa".to_string()));
        assert_eq!(parse("emotet campaign").source, None);
    }

    #[test]
    fn test_query_type_verbs() {
        assert_eq!(parse("list all cves").query_type, QueryType::List);
        assert_eq!(parse("show me domains").query_type, QueryType::Show);
        assert_eq!(parse("find emotet").query_type, QueryType::Search);
        assert_eq!(parse("emotet").query_type, QueryType::Search);
    }

    #[test]
    fn test_entity_types() {
        assert_eq!(parse("ip addresses").entity_type, Some(EntityType::Ip));
        assert_eq!(parse("sha256 hashes").entity_type, Some(EntityType::Hash));
        assert_eq!(parse("malware seen").entity_type, Some(EntityType::Malware));
        assert_eq!(parse("threat actors").entity_type, Some(EntityType::Actor));
    }

    #[test]
    fn test_keywords_keep_original_case_and_dedupe() {
        let parsed = parse("search Emotet and emotet Emotet");
        assert_eq!(parsed.keywords, vec!["Emotet"]);
    }

    #[test]
    fn test_detector_tokens_removed_from_keywords() {
        let parsed = parse("show domains about ransomware from cisa last 7 days");

        assert_eq!(parsed.entity_type, Some(EntityType::Domain));
        assert_eq!(parsed.source, Some("cisa".to_string()));
        assert_eq!(parsed.time_range, Some(TimeRange::SevenDays));
        assert_eq!(parsed.keywords, vec!["ransomware"]);
    }

    #[test]
    fn test_multibyte_text_keeps_keywords_aligned() {
        // 'İ' grows by a byte under to_lowercase(); claimed spans must not
        // drift onto neighboring tokens when the input carries such text.
        let parsed = parse("İTÜ İTÜ domains emotet");

        assert_eq!(parsed.entity_type, Some(EntityType::Domain));
        assert_eq!(parsed.keywords, vec!["emotet"]);
    }

    #[test]
    fn test_mixed_case_detectors_still_fire() {
        let parsed = parse("Show DOMAINS from CISA Last 7 Days");

        assert_eq!(parsed.query_type, QueryType::Show);
        assert_eq!(parsed.entity_type, Some(EntityType::Domain));
        assert_eq!(parsed.source, Some("cisa".to_string()));
        assert_eq!(parsed.time_range, Some(TimeRange::SevenDays));
        assert!(parsed.keywords.is_empty());
    }
}
