//! Storage keys shared with earlier releases of the app.
//!
//! The exact spellings are load-bearing: data written by previous versions
//! lives under these keys, so renaming one silently orphans user data.

/// JSON array of canonical word ids the user has mastered.
pub const MASTERED_WORDS: &str = "mastered_words";

/// JSON array of canonical word ids the user has flagged as important.
pub const IMPORTANT_WORDS: &str = "important_words";

/// Paging position into the bundled corpus, `{"loaded": n}`. Early versions
/// stored the loaded words themselves as an array under the same key.
pub const WORD_CACHE: &str = "word_cache";

/// Bookmarked words. Note the camelCase spelling; this key predates the
/// snake_case convention used by the others.
pub const BOOKMARKS: &str = "wordBookmarks";

/// Per-day mastery counters, a JSON array of `{date, masteredCount}`.
pub const DAILY_STATS: &str = "word_stats";

/// User preference flags. Older versions wrapped the value in a
/// `{"state": ..., "version": 0}` envelope.
pub const SETTINGS: &str = "settings-storage";
