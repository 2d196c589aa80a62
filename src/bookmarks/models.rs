//! Bookmark data models

use serde::{Deserialize, Serialize};

use crate::words::{WordId, WordView};

/// A bookmarked word, denormalized from the corpus at bookmark time so the
/// bookmark list renders without a corpus lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkEntry {
    pub id: WordId,
    pub word: String,
    pub meaning: String,
}

impl From<&WordView> for BookmarkEntry {
    fn from(view: &WordView) -> Self {
        Self {
            id: view.id.clone(),
            word: view.word.clone(),
            meaning: view.meaning.clone(),
        }
    }
}

/// Load lifecycle of the bookmark collection
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// Initial state, and re-entered on every retry
    Loading,
    /// Entries are authoritative (possibly empty)
    Ready,
    /// Load failed; entries are empty until a retry succeeds
    Error(String),
}

impl LoadState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready)
    }
}
