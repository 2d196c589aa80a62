//! Bookmark collection lifecycle and mutation

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::flush::{start_save_scheduler, SaveScheduler};
use crate::storage::{keys, KeyValueStorage};
use crate::words::WordId;

use super::decode::{self, PayloadShape};
use super::models::{BookmarkEntry, LoadState};

/// Quiet window before bookmark changes reach storage
const SAVE_DEBOUNCE: Duration = Duration::from_millis(2000);

/// Owns the bookmark list and its load lifecycle.
///
/// The entry vector preserves bookmark order; a parallel id set answers
/// membership in O(1). The two are only ever updated together.
pub struct BookmarkManager {
    storage: Arc<dyn KeyValueStorage>,
    entries: Vec<BookmarkEntry>,
    index: HashSet<WordId>,
    state: LoadState,
    saves: SaveScheduler,
}

impl BookmarkManager {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let saves = start_save_scheduler(Arc::clone(&storage), keys::BOOKMARKS, SAVE_DEBOUNCE, None);
        Self {
            storage,
            entries: Vec::new(),
            index: HashSet::new(),
            state: LoadState::Loading,
            saves,
        }
    }

    /// Read bookmarks from storage, repairing or clearing bad data along
    /// the way. Ends in `Ready` or `Error`; callable again to retry.
    pub async fn load(&mut self) {
        self.state = LoadState::Loading;

        // Repair pass: a value that is obviously not JSON is deleted up
        // front so the read below starts clean.
        match self.storage.get(keys::BOOKMARKS).await {
            Ok(Some(raw)) if !decode::looks_like_json(&raw) => {
                log::warn!("corrupted bookmark data detected, clearing it");
                if let Err(e) = self.storage.remove(keys::BOOKMARKS).await {
                    log::warn!("failed to clear corrupted bookmark data: {}", e);
                }
            }
            Ok(_) => {}
            Err(e) => log::warn!("bookmark integrity check failed: {}", e),
        }

        let raw = match self.storage.get(keys::BOOKMARKS).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.install(Vec::new(), 0);
                return;
            }
            Err(e) => {
                self.fail(format!("failed to read bookmarks: {e}"));
                return;
            }
        };

        match decode::decode_payload(&raw) {
            Ok(decoded) => {
                if decoded.shape != PayloadShape::BareArray {
                    log::info!("bookmarks decoded via legacy shape: {}", decoded.shape);
                }
                self.install(decoded.entries, decoded.dropped);
            }
            Err(e) => {
                // Delete the bad payload so the next launch starts clean.
                if let Err(remove_err) = self.storage.remove(keys::BOOKMARKS).await {
                    log::warn!("failed to clear undecodable bookmark data: {}", remove_err);
                }
                self.fail(e.to_string());
            }
        }
    }

    /// Re-run `load` after a failure.
    pub async fn retry_loading(&mut self) {
        self.load().await;
    }

    fn install(&mut self, entries: Vec<BookmarkEntry>, dropped: usize) {
        self.entries.clear();
        self.index.clear();

        let mut duplicates = 0;
        for entry in entries {
            if self.index.insert(entry.id.clone()) {
                self.entries.push(entry);
            } else {
                duplicates += 1;
            }
        }
        if dropped > 0 || duplicates > 0 {
            log::warn!(
                "dropped {} invalid and {} duplicate bookmark entries",
                dropped,
                duplicates,
            );
        }

        self.state = LoadState::Ready;
        log::debug!("bookmarks ready: {} entries", self.entries.len());
    }

    fn fail(&mut self, message: String) {
        log::error!("failed to load bookmarks: {}", message);
        self.entries.clear();
        self.index.clear();
        self.state = LoadState::Error(message);
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn bookmarks(&self) -> &[BookmarkEntry] {
        &self.entries
    }

    pub fn is_bookmarked(&self, id: &WordId) -> bool {
        self.index.contains(id)
    }

    /// Append a bookmark unless one with the same id already exists.
    /// Returns whether the entry was added.
    pub fn add(&mut self, entry: BookmarkEntry) -> bool {
        if !self.index.insert(entry.id.clone()) {
            return false;
        }
        self.entries.push(entry);
        self.schedule_save();
        true
    }

    /// Remove the bookmark with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &WordId) -> bool {
        if !self.index.remove(id) {
            return false;
        }
        self.entries.retain(|entry| entry.id != *id);
        self.schedule_save();
        true
    }

    /// Delete every bookmark, in memory and in storage. If the storage
    /// delete fails nothing changes in memory.
    pub async fn clear_all(&mut self) {
        // Drop any staged write first so it cannot resurrect the old list.
        self.saves.cancel();

        if let Err(e) = self.storage.remove(keys::BOOKMARKS).await {
            log::error!("failed to clear bookmarks: {}", e);
            return;
        }
        self.entries.clear();
        self.index.clear();
        self.state = LoadState::Ready;
    }

    fn schedule_save(&self) {
        match serde_json::to_string(&self.entries) {
            Ok(payload) => self.saves.schedule(payload),
            Err(e) => log::error!("failed to serialize bookmarks: {}", e),
        }
    }

    /// Flush any staged write and stop the flush task.
    pub async fn shutdown(&mut self) {
        self.saves.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn entry(id: u64, word: &str) -> BookmarkEntry {
        BookmarkEntry {
            id: WordId::from(id),
            word: word.to_string(),
            meaning: format!("meaning of {word}"),
        }
    }

    fn make_test_manager() -> (BookmarkManager, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let manager = BookmarkManager::new(Arc::clone(&storage) as Arc<dyn KeyValueStorage>);
        (manager, storage)
    }

    #[tokio::test]
    async fn test_starts_loading_and_loads_empty_when_absent() {
        let (mut manager, _storage) = make_test_manager();
        assert_eq!(*manager.state(), LoadState::Loading);

        manager.load().await;
        assert_eq!(*manager.state(), LoadState::Ready);
        assert!(manager.bookmarks().is_empty());
    }

    #[tokio::test]
    async fn test_add_remove_and_membership() {
        let (mut manager, _storage) = make_test_manager();
        manager.load().await;

        assert!(manager.add(entry(1, "abate")));
        assert!(manager.is_bookmarked(&WordId::from(1)));

        // Same id again is a no-op.
        assert!(!manager.add(entry(1, "abate")));
        assert_eq!(manager.bookmarks().len(), 1);

        assert!(manager.remove(&WordId::from(1)));
        assert!(!manager.is_bookmarked(&WordId::from(1)));
        assert!(!manager.remove(&WordId::from(1)));
        assert!(manager.bookmarks().is_empty());
    }

    #[tokio::test]
    async fn test_membership_uses_canonical_ids() {
        let (mut manager, _storage) = make_test_manager();
        manager.load().await;

        assert!(manager.add(BookmarkEntry {
            id: WordId::from("7"),
            word: "w".to_string(),
            meaning: "m".to_string(),
        }));
        // Numeric 7 names the same word.
        assert!(!manager.add(entry(7, "w")));
        assert!(manager.is_bookmarked(&WordId::from(7)));
    }

    #[tokio::test]
    async fn test_load_accepts_all_three_persisted_shapes() {
        let raw_entry = "{\"id\":1,\"word\":\"abate\",\"meaning\":\"lessen\"}";
        let shapes = [
            format!("[{raw_entry}]"),
            format!("{{\"bookmarks\":[{raw_entry}]}}"),
            format!("{{\"state\":{{\"bookmarks\":[{raw_entry}]}},\"version\":0}}"),
        ];

        for raw in shapes {
            let (mut manager, storage) = make_test_manager();
            storage.seed(keys::BOOKMARKS, &raw);
            manager.load().await;

            assert_eq!(*manager.state(), LoadState::Ready, "shape: {raw}");
            assert_eq!(manager.bookmarks().len(), 1);
            assert_eq!(manager.bookmarks()[0].word, "abate");
        }
    }

    #[tokio::test]
    async fn test_load_drops_invalid_and_duplicate_entries() {
        let (mut manager, storage) = make_test_manager();
        storage.seed(
            keys::BOOKMARKS,
            "[{\"id\":1,\"word\":\"a\",\"meaning\":\"m\"}, null, \
             {\"id\":\"1\",\"word\":\"a\",\"meaning\":\"m\"}, \
             {\"id\":2,\"word\":3,\"meaning\":\"m\"}]",
        );
        manager.load().await;

        assert_eq!(*manager.state(), LoadState::Ready);
        assert_eq!(manager.bookmarks().len(), 1);
        assert!(manager.is_bookmarked(&WordId::from(1)));
    }

    #[tokio::test]
    async fn test_corrupted_value_is_repaired_to_empty() {
        let (mut manager, storage) = make_test_manager();
        storage.seed(keys::BOOKMARKS, "undefined");
        manager.load().await;

        assert!(manager.state().is_ready());
        assert!(manager.bookmarks().is_empty());
        // The bad value is gone from storage.
        assert_eq!(storage.get(keys::BOOKMARKS).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_shape_sets_error_and_clears_storage() {
        let (mut manager, storage) = make_test_manager();
        storage.seed(keys::BOOKMARKS, "{\"favorites\":[]}");
        manager.load().await;

        assert!(matches!(manager.state(), LoadState::Error(_)));
        assert!(manager.bookmarks().is_empty());
        assert_eq!(storage.get(keys::BOOKMARKS).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_undecodable_json_sets_error_and_clears_storage() {
        let (mut manager, storage) = make_test_manager();
        storage.seed(keys::BOOKMARKS, "[{\"id\":1,");
        manager.load().await;

        assert!(matches!(manager.state(), LoadState::Error(_)));
        assert_eq!(storage.get(keys::BOOKMARKS).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_failure_sets_error_and_retry_recovers() {
        let (mut manager, storage) = make_test_manager();
        storage.seed(keys::BOOKMARKS, "[{\"id\":1,\"word\":\"a\",\"meaning\":\"m\"}]");

        storage.set_fail_reads(true);
        manager.load().await;
        assert!(matches!(manager.state(), LoadState::Error(_)));
        assert!(manager.bookmarks().is_empty());

        // The data itself was never deleted, so a retry can succeed.
        storage.set_fail_reads(false);
        manager.retry_loading().await;
        assert!(manager.state().is_ready());
        assert_eq!(manager.bookmarks().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_writes_are_debounced_and_coalesced() {
        let (mut manager, storage) = make_test_manager();
        manager.load().await;

        manager.add(entry(1, "a"));
        manager.add(entry(2, "b"));
        manager.remove(&WordId::from(1));
        tokio::time::sleep(SAVE_DEBOUNCE + Duration::from_millis(100)).await;

        assert_eq!(storage.write_count(keys::BOOKMARKS), 1);
        let raw = storage.get(keys::BOOKMARKS).await.unwrap().unwrap();
        let stored: Vec<BookmarkEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, vec![entry(2, "b")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_failure_keeps_memory_state() {
        let (mut manager, storage) = make_test_manager();
        manager.load().await;

        storage.set_fail_writes(true);
        manager.add(entry(1, "a"));
        tokio::time::sleep(SAVE_DEBOUNCE + Duration::from_millis(100)).await;

        assert_eq!(*manager.state(), LoadState::Ready);
        assert_eq!(manager.bookmarks().len(), 1);
        assert_eq!(storage.write_count(keys::BOOKMARKS), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_all_cancels_staged_writes() {
        let (mut manager, storage) = make_test_manager();
        manager.load().await;

        manager.add(entry(1, "a"));
        manager.clear_all().await;
        tokio::time::sleep(SAVE_DEBOUNCE * 2).await;

        assert!(manager.bookmarks().is_empty());
        assert_eq!(*manager.state(), LoadState::Ready);
        // Neither the staged write nor the old value survives.
        assert_eq!(storage.get(keys::BOOKMARKS).await.unwrap(), None);
        assert_eq!(storage.write_count(keys::BOOKMARKS), 0);
    }

    #[tokio::test]
    async fn test_shutdown_flushes_staged_write() {
        let (mut manager, storage) = make_test_manager();
        manager.load().await;

        manager.add(entry(1, "abate"));
        manager.shutdown().await;

        let raw = storage.get(keys::BOOKMARKS).await.unwrap().unwrap();
        let stored: Vec<BookmarkEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, WordId::from(1));
    }
}
