//! Word corpus data models

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Canonical word identifier.
///
/// The bundled corpus and data persisted by earlier releases mix integer and
/// string ids for the same words. Every id is normalized to its decimal
/// string form when it enters the system, so `1` and `"1"` always name the
/// same word, and all lookups compare the canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WordId(String);

impl WordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for WordId {
    fn from(id: u64) -> Self {
        Self::new(id.to_string())
    }
}

impl<'de> Deserialize<'de> for WordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(WordIdVisitor)
    }
}

struct WordIdVisitor;

impl<'de> Visitor<'de> for WordIdVisitor {
    type Value = WordId;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string or integer word id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<WordId, E> {
        Ok(WordId::new(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<WordId, E> {
        Ok(WordId::new(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<WordId, E> {
        Ok(WordId::new(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<WordId, E> {
        Ok(WordId::new(v.to_string()))
    }
}

/// One corpus entry as shipped in the bundled word list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordRecord {
    pub id: WordId,
    pub word: String,
    pub meaning: String,
}

/// A corpus entry joined with the user's per-word flags
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordView {
    pub id: WordId,
    pub word: String,
    pub meaning: String,
    pub mastered: bool,
    pub important: bool,
}

impl WordView {
    pub fn new(record: &WordRecord, mastered: bool, important: bool) -> Self {
        Self {
            id: record.id.clone(),
            word: record.word.clone(),
            meaning: record.meaning.clone(),
            mastered,
            important,
        }
    }
}

/// Persisted paging position, current shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionCache {
    pub loaded: usize,
}

/// Decode a persisted paging position.
///
/// Early releases cached the loaded words themselves as a JSON array under
/// the same key; for those the array length is the position. Anything else
/// is treated as absent.
pub fn decode_position(raw: &str) -> Option<usize> {
    if let Ok(cache) = serde_json::from_str::<PositionCache>(raw) {
        return Some(cache.loaded);
    }
    if let Ok(words) = serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        log::info!("position cache loaded via legacy word-array shape");
        return Some(words.len());
    }
    None
}
