//! Word flag state and corpus views

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;

use crate::flush::{start_save_scheduler, SaveScheduler};
use crate::storage::{keys, KeyValueStorage};

use super::catalog::WordCatalog;
use super::models::{decode_position, PositionCache, WordId, WordRecord, WordView};

/// Words handed out per paging request
pub const WORD_BATCH_SIZE: usize = 50;

/// Quiet window before flag and position changes reach storage
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(2000);

/// Owns the user's per-word flags and the paging position into the corpus.
///
/// Flags live in two id sets; every view joins corpus entries with set
/// membership at call time, so the sets are the only source of truth.
/// Mutations update the sets synchronously and stage a debounced write of
/// the changed set.
pub struct WordStateManager {
    catalog: Arc<WordCatalog>,
    storage: Arc<dyn KeyValueStorage>,
    mastered_ids: HashSet<WordId>,
    important_ids: HashSet<WordId>,
    loaded: usize,
    ready: bool,
    mastered_saves: SaveScheduler,
    important_saves: SaveScheduler,
    position_saves: SaveScheduler,
}

impl WordStateManager {
    pub fn new(catalog: Arc<WordCatalog>, storage: Arc<dyn KeyValueStorage>) -> Self {
        let mastered_saves = start_save_scheduler(
            Arc::clone(&storage),
            keys::MASTERED_WORDS,
            SAVE_DEBOUNCE,
            None,
        );
        let important_saves = start_save_scheduler(
            Arc::clone(&storage),
            keys::IMPORTANT_WORDS,
            SAVE_DEBOUNCE,
            None,
        );
        let position_saves =
            start_save_scheduler(Arc::clone(&storage), keys::WORD_CACHE, SAVE_DEBOUNCE, None);

        Self {
            catalog,
            storage,
            mastered_ids: HashSet::new(),
            important_ids: HashSet::new(),
            loaded: 0,
            ready: false,
            mastered_saves,
            important_saves,
            position_saves,
        }
    }

    /// Load persisted flags and the paging position. Any unreadable value
    /// falls back to an empty default; a second call is a no-op.
    pub async fn init(&mut self) {
        if self.ready {
            return;
        }

        self.mastered_ids = self.load_id_set(keys::MASTERED_WORDS).await;
        self.important_ids = self.load_id_set(keys::IMPORTANT_WORDS).await;
        self.load_position().await;
        self.ready = true;

        log::info!(
            "word state ready: {} words, {} mastered, {} important, position {}",
            self.catalog.len(),
            self.mastered_ids.len(),
            self.important_ids.len(),
            self.loaded,
        );
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    async fn load_id_set(&self, key: &'static str) -> HashSet<WordId> {
        let raw = match self.storage.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return HashSet::new(),
            Err(e) => {
                log::warn!("failed to read '{}': {} — starting empty", key, e);
                return HashSet::new();
            }
        };

        match serde_json::from_str::<Vec<WordId>>(&raw) {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                log::warn!("discarding malformed id set under '{}': {}", key, e);
                HashSet::new()
            }
        }
    }

    async fn load_position(&mut self) {
        let first_batch = WORD_BATCH_SIZE.min(self.catalog.len());

        let raw = match self.storage.get(keys::WORD_CACHE).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.loaded = first_batch;
                self.schedule_position_save();
                return;
            }
            Err(e) => {
                log::warn!(
                    "failed to read '{}': {} — starting at the first batch",
                    keys::WORD_CACHE,
                    e,
                );
                self.loaded = first_batch;
                return;
            }
        };

        match decode_position(&raw) {
            Some(position) => self.loaded = position.min(self.catalog.len()),
            None => {
                log::warn!("discarding malformed position cache");
                self.loaded = first_batch;
                self.schedule_position_save();
            }
        }
    }

    // ===== Views =====

    fn view(&self, record: &WordRecord) -> WordView {
        WordView::new(
            record,
            self.mastered_ids.contains(&record.id),
            self.important_ids.contains(&record.id),
        )
    }

    pub fn all_words(&self) -> Vec<WordView> {
        self.catalog.records().iter().map(|r| self.view(r)).collect()
    }

    /// Page of at most `limit` words starting at `offset`.
    pub fn words(&self, offset: usize, limit: usize) -> Vec<WordView> {
        let records = self.catalog.records();
        let end = offset.saturating_add(limit).min(records.len());
        if offset >= end {
            return Vec::new();
        }
        records[offset..end].iter().map(|r| self.view(r)).collect()
    }

    /// Words in `[start, end)`, clamped to the corpus bounds.
    pub fn word_subset(&self, start: usize, end: usize) -> Vec<WordView> {
        let records = self.catalog.records();
        let end = end.min(records.len());
        if start >= end {
            return Vec::new();
        }
        records[start..end].iter().map(|r| self.view(r)).collect()
    }

    pub fn word_by_id(&self, id: &WordId) -> Option<WordView> {
        self.catalog.get(id).map(|r| self.view(r))
    }

    pub fn mastered_words(&self) -> Vec<WordView> {
        self.catalog
            .records()
            .iter()
            .filter(|r| self.mastered_ids.contains(&r.id))
            .map(|r| self.view(r))
            .collect()
    }

    pub fn important_words(&self) -> Vec<WordView> {
        self.catalog
            .records()
            .iter()
            .filter(|r| self.important_ids.contains(&r.id))
            .map(|r| self.view(r))
            .collect()
    }

    /// The review queue: words flagged important that are not yet mastered.
    pub fn important_unmastered_words(&self) -> Vec<WordView> {
        self.catalog
            .records()
            .iter()
            .filter(|r| {
                self.important_ids.contains(&r.id) && !self.mastered_ids.contains(&r.id)
            })
            .map(|r| self.view(r))
            .collect()
    }

    /// Uniformly shuffled copy of the whole corpus. Corpus order is untouched.
    pub fn shuffled_words(&self) -> Vec<WordView> {
        let mut views = self.all_words();
        views.shuffle(&mut rand::thread_rng());
        views
    }

    // ===== Flags =====

    pub fn is_mastered(&self, id: &WordId) -> bool {
        self.mastered_ids.contains(id)
    }

    pub fn is_important(&self, id: &WordId) -> bool {
        self.important_ids.contains(id)
    }

    /// Flip the mastered flag for `id` and stage a save of the set.
    /// Returns the new flag value, or `None` for an id not in the corpus.
    pub fn toggle_mastered(&mut self, id: &WordId) -> Option<bool> {
        if !self.catalog.contains(id) {
            log::debug!("ignoring mastered toggle for unknown word id {}", id);
            return None;
        }

        let now_mastered = if self.mastered_ids.remove(id) {
            false
        } else {
            self.mastered_ids.insert(id.clone());
            true
        };

        schedule_id_set_save(&self.mastered_saves, keys::MASTERED_WORDS, &self.mastered_ids);
        Some(now_mastered)
    }

    /// Flip the important flag for `id` and stage a save of the set.
    /// Returns the new flag value, or `None` for an id not in the corpus.
    pub fn toggle_important(&mut self, id: &WordId) -> Option<bool> {
        if !self.catalog.contains(id) {
            log::debug!("ignoring important toggle for unknown word id {}", id);
            return None;
        }

        let now_important = if self.important_ids.remove(id) {
            false
        } else {
            self.important_ids.insert(id.clone());
            true
        };

        schedule_id_set_save(
            &self.important_saves,
            keys::IMPORTANT_WORDS,
            &self.important_ids,
        );
        Some(now_important)
    }

    // ===== Counts and paging =====

    pub fn total_word_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn mastered_word_count(&self) -> usize {
        self.mastered_ids.len()
    }

    /// How far into the corpus the user has paged.
    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    /// Hand out the next page starting at `start` and advance the persisted
    /// position if it grew.
    pub fn load_more_words(&mut self, start: usize) -> Vec<WordView> {
        let batch = self.words(start, WORD_BATCH_SIZE);
        if batch.is_empty() {
            return batch;
        }

        let end = start + batch.len();
        if end > self.loaded {
            self.loaded = end;
            self.schedule_position_save();
        }
        batch
    }

    fn schedule_position_save(&self) {
        match serde_json::to_string(&PositionCache { loaded: self.loaded }) {
            Ok(payload) => self.position_saves.schedule(payload),
            Err(e) => log::error!("failed to serialize position cache: {}", e),
        }
    }

    /// Flush staged writes and stop the flush tasks.
    pub async fn shutdown(&mut self) {
        self.mastered_saves.shutdown().await;
        self.important_saves.shutdown().await;
        self.position_saves.shutdown().await;
    }
}

fn schedule_id_set_save(scheduler: &SaveScheduler, key: &str, ids: &HashSet<WordId>) {
    // Sorted so identical sets always serialize identically.
    let mut sorted: Vec<&str> = ids.iter().map(WordId::as_str).collect();
    sorted.sort_unstable();
    match serde_json::to_string(&sorted) {
        Ok(payload) => scheduler.schedule(payload),
        Err(e) => log::error!("failed to serialize id set for '{}': {}", key, e),
    }
}
