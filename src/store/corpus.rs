// file: src/store/corpus.rs
// description: in-memory append-only corpus with snapshot reads
// reference: arena plus id index, copy-on-write snapshot swap

use crate::models::ThreatItem;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// One immutable view of the corpus. Readers clone the `Arc` and can walk
/// the items without holding any lock while writers swap in a successor.
#[derive(Debug, Default)]
pub struct CorpusSnapshot {
    items: Vec<Arc<ThreatItem>>,
    id_index: HashMap<String, usize>,
    dedup_index: HashMap<String, String>,
}

impl CorpusSnapshot {
    pub fn items(&self) -> &[Arc<ThreatItem>] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<Arc<ThreatItem>> {
        self.id_index.get(id).map(|&idx| Arc::clone(&self.items[idx]))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items sorted newest-first by publication date.
    pub fn items_by_date_desc(&self) -> Vec<Arc<ThreatItem>> {
        let mut sorted: Vec<Arc<ThreatItem>> = self.items.to_vec();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    pub fn items_for_source(&self, source: &str) -> Vec<Arc<ThreatItem>> {
        self.items
            .iter()
            .filter(|i| i.source.eq_ignore_ascii_case(source))
            .cloned()
            .collect()
    }
}

/// The only shared mutable resource in the engine. Writes are serialized
/// behind the lock and replace the snapshot pointer wholesale, so a reader
/// in flight sees either the old corpus or the new one, never a torn state.
#[derive(Debug)]
pub struct CorpusStore {
    inner: RwLock<Arc<CorpusSnapshot>>,
}

impl CorpusStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Arc::new(CorpusSnapshot::default())),
        }
    }

    pub fn snapshot(&self) -> Arc<CorpusSnapshot> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Appends an item unless its dedup key is already present; returns the
    /// id of the stored item either way.
    pub fn append(&self, item: ThreatItem) -> String {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());

        let key = item.dedup_key();
        if let Some(existing_id) = guard.dedup_index.get(&key) {
            debug!(id = %existing_id, "duplicate item skipped on append");
            return existing_id.clone();
        }

        let id = item.id.clone();
        let mut next = CorpusSnapshot {
            items: guard.items.clone(),
            id_index: guard.id_index.clone(),
            dedup_index: guard.dedup_index.clone(),
        };
        next.id_index.insert(id.clone(), next.items.len());
        next.dedup_index.insert(key, id.clone());
        next.items.push(Arc::new(item));

        *guard = Arc::new(next);
        id
    }

    pub fn append_many(&self, items: Vec<ThreatItem>) -> Vec<String> {
        items.into_iter().map(|item| self.append(item)).collect()
    }

    /// Atomic replace-with-empty; concurrent readers keep their snapshot.
    pub fn clear(&self) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(CorpusSnapshot::default());
    }
}

impl Default for CorpusStore {
    fn default() -> Self {
        Self::new()
    }
}
