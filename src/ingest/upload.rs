// file: src/ingest/upload.rs
// description: uploaded report processing, pdf and plain text
// reference: text extraction then the shared entity pipeline

use crate::error::{EngineError, Result};
use crate::extractor::{EntityExtractor, EvidenceCollector};
use crate::models::ThreatItem;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

/// Summary shown to the caller for one processed upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub filename: String,
    pub id: String,
    pub char_count: usize,
    pub entities: EntitySummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntitySummary {
    pub cves: usize,
    pub iocs: usize,
    pub threats: usize,
    pub tags: Vec<String>,
}

/// Turns an uploaded file into a corpus item. PDF bytes go through text
/// extraction; plain text is taken as-is. Any other extension is rejected.
pub fn process_upload(
    extractor: &EntityExtractor,
    collector: &EvidenceCollector,
    filename: &str,
    bytes: &[u8],
) -> Result<ThreatItem> {
    let lower = filename.to_lowercase();
    let (text, source) = if lower.ends_with(".pdf") {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| EngineError::Ingest(format!("pdf text extraction failed: {e}")))?;
        (text, "pdf")
    } else if lower.ends_with(".txt") {
        (String::from_utf8_lossy(bytes).into_owned(), "upload")
    } else {
        return Err(EngineError::Validation(format!(
            "unsupported file type: {filename}"
        )));
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(EngineError::Ingest(format!(
            "no text extracted from {filename}"
        )));
    }

    let extracted = extractor.extract(&text);
    let evidence = collector.collect(&text, &extracted);
    info!(
        filename,
        chars = text.len(),
        cves = extracted.cves.len(),
        iocs = extracted.ioc_count(),
        "processed upload"
    );

    let mut item = ThreatItem::new(
        filename.to_string(),
        source.to_string(),
        Utc::now(),
        summary_of(&text),
    )
    .with_content(text)
    .with_extracted(extracted);
    if !evidence.is_empty() {
        item = item.with_evidence(evidence);
    }
    Ok(item)
}

pub fn outcome_for(filename: &str, item: &ThreatItem) -> UploadOutcome {
    UploadOutcome {
        filename: filename.to_string(),
        id: item.id.clone(),
        char_count: item.content.as_deref().map_or(0, str::len),
        entities: EntitySummary {
            cves: item.extracted.cves.len(),
            iocs: item.extracted.ioc_count(),
            threats: item.extracted.threats.len(),
            tags: item.extracted.tags.clone(),
        },
    }
}

/// First 500 characters, with an ellipsis when the text was longer.
fn summary_of(text: &str) -> String {
    let mut summary: String = text.chars().take(500).collect();
    if summary.len() < text.len() {
        summary = summary.trim_end().to_string();
        summary.push_str("...");
    }
    summary
}
