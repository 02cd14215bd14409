// file: src/ingest/sync.rs
// description: concurrent feed sync into the corpus store
// reference: one task per source, failures isolated per source

use crate::config::IngestConfig;
use crate::error::Result;
use crate::extractor::{EntityExtractor, EvidenceCollector};
use crate::ingest::feeds::{self, FeedArticle};
use crate::models::ThreatItem;
use crate::store::CorpusStore;
use futures::future::join_all;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// What one sync pass did. Per-source failures land in `errors` and never
/// abort the pass as a whole.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub articles_processed: usize,
    pub sources: Vec<String>,
    pub errors: Vec<SourceError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceError {
    pub source: String,
    pub error: String,
}

/// Syncs the requested sources into the store. `None` means every known
/// feed. Each source runs as its own task under the configured timeout.
pub async fn sync_sources(
    store: &CorpusStore,
    cfg: &IngestConfig,
    sources: Option<Vec<String>>,
) -> Result<SyncOutcome> {
    let requested: Vec<String> = match sources {
        Some(list) if !list.is_empty() => list,
        _ => feeds::known_sources().iter().map(|s| s.to_string()).collect(),
    };

    let client = reqwest::Client::new();
    let timeout = Duration::from_secs(cfg.fetch_timeout_secs);
    let limit = cfg.limit_per_source;

    let mut errors: Vec<SourceError> = Vec::new();
    let mut tasks = Vec::new();

    for source in &requested {
        let Some(url) = feeds::feed_url(source) else {
            errors.push(SourceError {
                source: source.clone(),
                error: "unknown source".to_string(),
            });
            continue;
        };

        let client = client.clone();
        let source = source.to_lowercase();
        let fetch_full = cfg.fetch_full_content;
        tasks.push(tokio::spawn(async move {
            let result = fetch_source(&client, url, timeout, limit, fetch_full).await;
            (source, result)
        }));
    }

    let extractor = EntityExtractor::new();
    let collector = EvidenceCollector::default();
    let mut processed = 0;

    for joined in join_all(tasks).await {
        let (source, result) = match joined {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "sync task panicked");
                continue;
            }
        };

        match result {
            Ok(articles) => {
                let count = articles.len();
                for article in articles {
                    store.append(build_item(&extractor, &collector, &source, article));
                    processed += 1;
                }
                info!(source = %source, count, "synced feed");
            }
            Err(e) => {
                warn!(source = %source, error = %e, "feed sync failed");
                errors.push(SourceError {
                    source,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(SyncOutcome {
        articles_processed: processed,
        sources: requested,
        errors,
    })
}

async fn fetch_source(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
    limit: usize,
    fetch_full_content: bool,
) -> Result<Vec<FeedArticle>> {
    let xml = feeds::fetch_feed(client, url, timeout).await?;
    let mut articles = feeds::parse_rss(&xml)?;
    articles.truncate(limit);

    if fetch_full_content {
        for article in &mut articles {
            if article.content.len() >= 200 || article.url.is_empty() {
                continue;
            }
            match feeds::fetch_page_text(client, &article.url, timeout).await {
                Ok(text) if !text.is_empty() => article.content = text,
                Ok(_) => {}
                Err(e) => warn!(url = %article.url, error = %e, "full content fetch failed"),
            }
        }
    }

    Ok(articles)
}

fn build_item(
    extractor: &EntityExtractor,
    collector: &EvidenceCollector,
    source: &str,
    article: FeedArticle,
) -> ThreatItem {
    let text = if article.content.is_empty() {
        article.description.clone()
    } else {
        article.content.clone()
    };
    let extracted = extractor.extract(&text);
    let evidence = collector.collect(&text, &extracted);

    let mut item = ThreatItem::new(
        article.title,
        source.to_string(),
        article.date,
        article.description,
    )
    .with_extracted(extracted);

    if !article.url.is_empty() {
        item = item.with_url(article.url);
    }
    if !article.content.is_empty() {
        item = item.with_content(article.content);
    }
    if !evidence.is_empty() {
        item = item.with_evidence(evidence);
    }
    item
}
