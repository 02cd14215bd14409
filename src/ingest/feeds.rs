// file: src/ingest/feeds.rs
// description: rss feed registry, fetching and parsing
// reference: rss 2.0 with cdata payloads and rfc 2822 dates

use crate::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::time::Duration;

/// Security news sources the engine knows how to sync. The canonical name
/// doubles as the item's `source` field.
pub const FEED_SOURCES: &[(&str, &str)] = &[
    ("bleepingcomputer", "https://www.bleepingcomputer.com/feed/"),
    ("gbhackers", "https://gbhackers.com/feed/"),
    ("thehackernews", "https://feeds.feedburner.com/TheHackersNews"),
    ("cisa", "https://www.cisa.gov/cybersecurity-advisories/all.xml"),
];

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]+>").expect("html tag regex is valid");
    static ref SCRIPT_BLOCK: Regex = Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>")
        .expect("script block regex is valid");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("whitespace regex is valid");
}

/// Cap on text pulled from one article page.
const MAX_PAGE_CHARS: usize = 10_000;

/// One article pulled out of a feed, before extraction runs on it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedArticle {
    pub title: String,
    pub url: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub content: String,
}

pub fn known_sources() -> Vec<&'static str> {
    FEED_SOURCES.iter().map(|(name, _)| *name).collect()
}

pub fn feed_url(source: &str) -> Option<&'static str> {
    FEED_SOURCES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(source))
        .map(|(_, url)| *url)
}

/// Fetches one feed document over HTTP.
pub async fn fetch_feed(client: &reqwest::Client, url: &str, timeout: Duration) -> Result<String> {
    let response = client
        .get(url)
        .timeout(timeout)
        .header("User-Agent", "threatlens/0.1 (threat intel research)")
        .send()
        .await?
        .error_for_status()?;
    Ok(response.text().await?)
}

/// Fetches an article page and reduces it to plain text. Best effort; used
/// when the feed entry carried no body worth extracting from.
pub async fn fetch_page_text(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<String> {
    let html = fetch_feed(client, url, timeout).await?;
    let no_scripts = SCRIPT_BLOCK.replace_all(&html, " ");
    Ok(truncate_chars(&strip_html(&no_scripts), MAX_PAGE_CHARS))
}

/// Parses an RSS 2.0 document into articles. Entries missing a title are
/// dropped; unparsable dates fall back to the current time so the item still
/// lands in the corpus.
pub fn parse_rss(xml: &str) -> Result<Vec<FeedArticle>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut articles = Vec::new();
    let mut in_item = false;
    let mut field: Option<ItemField> = None;
    let mut current = RawEntry::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                let name = name.as_ref();
                if name == b"item" || name == b"entry" {
                    in_item = true;
                    current = RawEntry::default();
                } else if in_item {
                    field = ItemField::from_tag(name);
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                let name = name.as_ref();
                if name == b"item" || name == b"entry" {
                    in_item = false;
                    if let Some(article) = current.finish() {
                        articles.push(article);
                    }
                    current = RawEntry::default();
                }
                field = None;
            }
            Ok(Event::Text(t)) => {
                if in_item {
                    if let Some(field) = field {
                        let text = t
                            .unescape()
                            .map_err(|e| EngineError::Ingest(format!("bad feed text: {e}")))?;
                        current.push(field, &text);
                    }
                }
            }
            Ok(Event::CData(t)) => {
                if in_item {
                    if let Some(field) = field {
                        let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                        current.push(field, &text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(EngineError::Ingest(format!("malformed feed xml: {e}")));
            }
        }
    }

    Ok(articles)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ItemField {
    Title,
    Link,
    Date,
    Description,
    Content,
}

impl ItemField {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"title" => Some(Self::Title),
            b"link" => Some(Self::Link),
            b"pubDate" | b"dc:date" | b"published" | b"updated" => Some(Self::Date),
            b"description" | b"summary" => Some(Self::Description),
            b"content:encoded" | b"content" => Some(Self::Content),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct RawEntry {
    title: String,
    link: String,
    date: String,
    description: String,
    content: String,
}

impl RawEntry {
    fn push(&mut self, field: ItemField, text: &str) {
        let slot = match field {
            ItemField::Title => &mut self.title,
            ItemField::Link => &mut self.link,
            ItemField::Date => &mut self.date,
            ItemField::Description => &mut self.description,
            ItemField::Content => &mut self.content,
        };
        if !slot.is_empty() {
            slot.push(' ');
        }
        slot.push_str(text.trim());
    }

    fn finish(&self) -> Option<FeedArticle> {
        let title = strip_html(&self.title);
        if title.is_empty() {
            return None;
        }

        let description = truncate_chars(&strip_html(&self.description), 500);
        let content = match strip_html(&self.content) {
            c if c.is_empty() => description.clone(),
            c => c,
        };

        Some(FeedArticle {
            title,
            url: self.link.trim().to_string(),
            date: parse_feed_date(&self.date),
            description,
            content,
        })
    }
}

fn parse_feed_date(raw: &str) -> DateTime<Utc> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc2822(raw) {
        return date.with_timezone(&Utc);
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return date.with_timezone(&Utc);
    }
    Utc::now()
}

fn strip_html(text: &str) -> String {
    let no_tags = HTML_TAG.replace_all(text, " ");
    WHITESPACE.replace_all(no_tags.trim(), " ").into_owned()
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>Security News</title>
    <item>
      <title>New Emotet campaign observed</title>
      <link>https://example.com/emotet</link>
      <pubDate>Mon, 05 Aug 2024 10:30:00 GMT</pubDate>
      <description><![CDATA[<p>Emotet is <b>back</b> with fresh C2s.</p>]]></description>
    </item>
    <item>
      <title>CVE-2024-3400 actively exploited</title>
      <link>https://example.com/cve</link>
      <pubDate>not a date</pubDate>
      <description>Patch now.</description>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_rss_items() {
        let articles = parse_rss(SAMPLE_RSS).unwrap();
        assert_eq!(articles.len(), 2);

        assert_eq!(articles[0].title, "New Emotet campaign observed");
        assert_eq!(articles[0].url, "https://example.com/emotet");
        assert_eq!(articles[0].description, "Emotet is back with fresh C2s.");
    }

    #[test]
    fn test_rfc2822_date_parsed() {
        let articles = parse_rss(SAMPLE_RSS).unwrap();
        assert_eq!(articles[0].date.to_rfc3339(), "2024-08-05T10:30:00+00:00");
    }

    #[test]
    fn test_bad_date_falls_back_to_now() {
        let articles = parse_rss(SAMPLE_RSS).unwrap();
        let age = Utc::now() - articles[1].date;
        assert!(age.num_seconds() < 60);
    }

    #[test]
    fn test_titleless_entries_dropped() {
        let xml = r#"<rss><channel><item><link>https://x.com</link></item></channel></rss>"#;
        assert!(parse_rss(xml).unwrap().is_empty());
    }

    #[test]
    fn test_content_falls_back_to_description() {
        let articles = parse_rss(SAMPLE_RSS).unwrap();
        assert_eq!(articles[1].content, "Patch now.");
    }

    #[test]
    fn test_feed_url_lookup() {
        assert!(feed_url("cisa").is_some());
        assert!(feed_url("CISA").is_some());
        assert!(feed_url("unknown").is_none());
    }
}
