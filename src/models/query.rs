// file: src/models/query.rs
// description: parsed query and search result models
// reference: natural language search contracts

use crate::models::ThreatItem;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    List,
    #[default]
    Search,
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "24h")]
    Last24h,
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
}

impl TimeRange {
    /// Oldest date still inside the window, relative to `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeRange::Last24h => now - Duration::hours(24),
            TimeRange::SevenDays => now - Duration::days(7),
            TimeRange::ThirtyDays => now - Duration::days(30),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            TimeRange::Last24h => "last 24 hours",
            TimeRange::SevenDays => "last 7 days",
            TimeRange::ThirtyDays => "last 30 days",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Ip,
    Domain,
    Hash,
    Url,
    Actor,
    Malware,
}

/// Structured form of a free-text query. Pure value, no side effects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub query_type: QueryType,
    pub keywords: Vec<String>,
    pub cve_id: Option<String>,
    pub time_range: Option<TimeRange>,
    pub source: Option<String>,
    pub entity_type: Option<EntityType>,
    pub raw_query: String,
}

/// Full answer to one search call; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub parsed_query: ParsedQuery,
    pub answer_summary: String,
    pub result_count: usize,
    pub results: Vec<ThreatItem>,
}
