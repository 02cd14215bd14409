// file: src/extractor/evidence.rs
// description: evidence snippet collection for extracted entities
// reference: provenance tracking for threat intelligence

use crate::models::{Evidence, EvidenceKind, ExtractedEntities};
use std::collections::HashSet;

const MAX_PER_KIND: usize = 3;

/// Binds extracted entities to the sentence they were found in. Pure
/// function of text and extraction output; at most one snippet per
/// distinct entity value.
pub struct EvidenceCollector {
    snippet_max_chars: usize,
    max_snippets: usize,
}

impl EvidenceCollector {
    pub fn new(snippet_max_chars: usize, max_snippets: usize) -> Self {
        Self {
            snippet_max_chars,
            max_snippets,
        }
    }

    pub fn collect(&self, text: &str, entities: &ExtractedEntities) -> Vec<Evidence> {
        let sentences = split_sentences(text);
        let mut snippets = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for cve in entities.cves.iter().take(MAX_PER_KIND) {
            self.push_snippet(&mut snippets, &mut seen, &sentences, cve, EvidenceKind::Cve);
        }

        for threat in entities.threats.iter().take(MAX_PER_KIND) {
            self.push_snippet(
                &mut snippets,
                &mut seen,
                &sentences,
                threat,
                EvidenceKind::Threat,
            );
        }

        // Fill remaining slots with network indicators
        for ioc in entities.ips.iter().chain(entities.domains.iter()) {
            if snippets.len() >= self.max_snippets {
                break;
            }
            self.push_snippet(&mut snippets, &mut seen, &sentences, ioc, EvidenceKind::Ioc);
        }

        snippets.truncate(self.max_snippets);
        snippets
    }

    fn push_snippet(
        &self,
        snippets: &mut Vec<Evidence>,
        seen: &mut HashSet<String>,
        sentences: &[&str],
        entity: &str,
        kind: EvidenceKind,
    ) {
        if !seen.insert(entity.to_lowercase()) {
            return;
        }

        let needle = entity.to_lowercase();
        if let Some(sentence) = sentences.iter().find(|s| s.to_lowercase().contains(&needle)) {
            snippets.push(Evidence {
                entity: entity.to_string(),
                snippet: truncate_chars(sentence.trim(), self.snippet_max_chars),
                kind,
            });
        }
    }
}

impl Default for EvidenceCollector {
    fn default() -> Self {
        Self::new(300, 5)
    }
}

/// Splits after `.`, `!` or `?` followed by whitespace. Keeps the
/// terminating punctuation with its sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev_was_terminator = false;

    for (idx, ch) in text.char_indices() {
        if prev_was_terminator && ch.is_whitespace() {
            let sentence = text[start..idx].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = idx;
        }
        prev_was_terminator = matches!(ch, '.' | '!' | '?');
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
}

/// Char-boundary-safe truncation; multi-byte text must never panic here.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::EntityExtractor;

    #[test]
    fn test_sentence_split() {
        let sentences = split_sentences("First one. Second one! Third? Tail without end");
        assert_eq!(
            sentences,
            vec!["First one.", "Second one!", "Third?", "Tail without end"]
        );
    }

    #[test]
    fn test_snippet_contains_entity_sentence() {
        let text = "Unrelated intro sentence. CVE-2024-3400 was exploited in the wild. More text.";
        let entities = EntityExtractor::new().extract(text);
        let evidence = EvidenceCollector::default().collect(text, &entities);

        let cve_evidence = evidence
            .iter()
            .find(|e| e.kind == EvidenceKind::Cve)
            .expect("cve evidence present");
        assert_eq!(cve_evidence.entity, "CVE-2024-3400");
        assert_eq!(cve_evidence.snippet, "CVE-2024-3400 was exploited in the wild.");
    }

    #[test]
    fn test_one_snippet_per_entity_value() {
        let text = "Emotet was seen. Emotet again here. Emotet a third time.";
        let entities = EntityExtractor::new().extract(text);
        let evidence = EvidenceCollector::default().collect(text, &entities);

        let emotet = evidence.iter().filter(|e| e.entity == "Emotet").count();
        assert_eq!(emotet, 1);
    }

    #[test]
    fn test_snippet_cap() {
        let text = "APT28 and APT29 and Lazarus used Emotet plus TrickBot and QakBot. \
                    CVE-2024-1111 CVE-2024-2222 CVE-2024-3333 CVE-2024-4444 all exploited.";
        let entities = EntityExtractor::new().extract(text);
        let evidence = EvidenceCollector::default().collect(text, &entities);

        assert!(evidence.len() <= 5);
    }

    #[test]
    fn test_multibyte_truncation_is_safe() {
        let long_tail = "🚨".repeat(400);
        let text = format!("Emotet observed {long_tail}");
        let entities = EntityExtractor::new().extract(&text);
        let evidence = EvidenceCollector::new(50, 5).collect(&text, &entities);

        assert!(!evidence.is_empty());
        assert!(evidence[0].snippet.ends_with("..."));
    }
}
