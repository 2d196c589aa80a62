//! Local word-state core for a vocabulary learning app.
//!
//! Four managers own the user's study state: word flags and corpus paging
//! (`words`), the bookmark list (`bookmarks`), per-day mastery counters
//! (`stats`), and preference flags (`settings`). All of them persist through
//! one injected [`storage::KeyValueStorage`] backend, with writes staged on
//! per-key flush tasks (`flush`).

pub mod bookmarks;
pub mod flush;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod words;

use std::sync::Arc;

use storage::KeyValueStorage;
use words::WordCatalog;

/// All managers wired to one storage backend.
///
/// Construction spawns the flush tasks, `init` loads persisted state, and
/// `shutdown` flushes staged writes before the tasks stop. The managers are
/// plain fields so callers borrow exactly the one they need.
pub struct AppServices {
    pub words: words::WordStateManager,
    pub bookmarks: bookmarks::BookmarkManager,
    pub stats: stats::StatsTracker,
    pub settings: settings::SettingsStore,
}

impl AppServices {
    pub fn new(catalog: Arc<WordCatalog>, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            words: words::WordStateManager::new(catalog, Arc::clone(&storage)),
            bookmarks: bookmarks::BookmarkManager::new(Arc::clone(&storage)),
            stats: stats::StatsTracker::new(Arc::clone(&storage)),
            settings: settings::SettingsStore::new(storage),
        }
    }

    /// Load every manager's persisted state. Each manager degrades to its
    /// empty default on its own, so one bad key never blocks the others.
    pub async fn init(&mut self) {
        self.words.init().await;
        self.bookmarks.load().await;
        self.stats.init().await;
        self.settings.init().await;
    }

    /// Flush staged writes and stop all flush tasks.
    pub async fn shutdown(&mut self) {
        self.words.shutdown().await;
        self.bookmarks.shutdown().await;
        self.stats.shutdown().await;
        self.settings.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookmarks::BookmarkEntry;
    use storage::{keys, MemoryStorage};
    use words::WordId;

    fn make_services(storage: &Arc<MemoryStorage>) -> AppServices {
        AppServices::new(
            Arc::new(WordCatalog::bundled()),
            Arc::clone(storage) as Arc<dyn KeyValueStorage>,
        )
    }

    #[tokio::test]
    async fn test_fresh_install_study_session_persists_everything() {
        let storage = Arc::new(MemoryStorage::new());
        let mut services = make_services(&storage);
        services.init().await;

        assert!(services.words.is_ready());
        assert!(services.bookmarks.state().is_ready());

        // Master a word the way the UI does: flip the flag, then feed the
        // outcome to the stats tracker.
        let id = WordId::from(1);
        assert_eq!(services.words.toggle_mastered(&id), Some(true));
        services.stats.record_mastered();

        let view = services.words.word_by_id(&id).unwrap();
        services.bookmarks.add(BookmarkEntry::from(&view));

        services.shutdown().await;

        assert_eq!(
            storage.get(keys::MASTERED_WORDS).await.unwrap(),
            Some("[\"1\"]".to_string())
        );
        let bookmarks_raw = storage.get(keys::BOOKMARKS).await.unwrap().unwrap();
        let stored: Vec<BookmarkEntry> = serde_json::from_str(&bookmarks_raw).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);

        let stats_raw = storage.get(keys::DAILY_STATS).await.unwrap().unwrap();
        assert!(stats_raw.contains("\"masteredCount\":1"));

        // The whole bundled corpus fits in the first batch.
        assert_eq!(
            storage.get(keys::WORD_CACHE).await.unwrap(),
            Some(format!(
                "{{\"loaded\":{}}}",
                services.words.total_word_count()
            ))
        );
    }

    #[tokio::test]
    async fn test_second_launch_restores_state() {
        let storage = Arc::new(MemoryStorage::new());

        let mut first = make_services(&storage);
        first.init().await;
        let id = WordId::from(2);
        first.words.toggle_mastered(&id);
        first.words.toggle_important(&id);
        let view = first.words.word_by_id(&id).unwrap();
        first.bookmarks.add(BookmarkEntry::from(&view));
        first.stats.record_mastered();
        first.settings.toggle_haptics();
        first.shutdown().await;

        let mut second = make_services(&storage);
        second.init().await;

        assert!(second.words.is_mastered(&id));
        assert!(second.words.is_important(&id));
        assert!(second.bookmarks.is_bookmarked(&id));
        assert_eq!(second.stats.today_stats().mastered_count, 1);
        assert!(!second.settings.haptics_enabled());
    }

    #[tokio::test]
    async fn test_one_corrupt_key_does_not_block_the_others() {
        let storage = Arc::new(MemoryStorage::new());
        storage.seed(keys::BOOKMARKS, "undefined");
        storage.seed(keys::MASTERED_WORDS, "[\"3\"]");
        storage.seed(keys::DAILY_STATS, "garbage");

        let mut services = make_services(&storage);
        services.init().await;

        assert!(services.bookmarks.state().is_ready());
        assert!(services.bookmarks.bookmarks().is_empty());
        assert!(services.words.is_mastered(&WordId::from(3)));
        assert_eq!(services.stats.today_stats().mastered_count, 0);
        assert!(services.settings.haptics_enabled());
    }

    #[tokio::test]
    async fn test_unmastering_reverses_the_daily_counter() {
        let storage = Arc::new(MemoryStorage::new());
        let mut services = make_services(&storage);
        services.init().await;

        let id = WordId::from(4);
        assert_eq!(services.words.toggle_mastered(&id), Some(true));
        services.stats.record_mastered();
        assert_eq!(services.words.toggle_mastered(&id), Some(false));
        services.stats.record_unmastered();

        assert_eq!(services.stats.today_stats().mastered_count, 0);
        assert!(!services.words.is_mastered(&id));
    }
}
