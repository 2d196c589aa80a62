//! Persisted bookmark payload decoding.
//!
//! The on-disk shape changed twice across app releases. Payloads are decoded
//! against the known shapes in order, newest first, and every accepted entry
//! is validated individually so one bad entry never takes down the list.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::words::WordId;

use super::models::BookmarkEntry;

/// Cheap corruption sniff run before parsing: a value that starts with
/// neither `[` nor `{` cannot be any known payload and is repaired by
/// deleting it rather than surfacing a decode error.
pub fn looks_like_json(raw: &str) -> bool {
    raw.starts_with('[') || raw.starts_with('{')
}

/// Which historical schema a payload decoded through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Current shape: a bare JSON array of entries
    BareArray,
    /// Legacy `{"bookmarks": [...]}` wrapper
    Wrapped,
    /// Legacy persist-middleware envelope `{"state": {"bookmarks": [...]}}`
    Envelope,
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PayloadShape::BareArray => "bare array",
            PayloadShape::Wrapped => "wrapped object",
            PayloadShape::Envelope => "state envelope",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("bookmark data is unreadable: {0}")]
    Parse(String),

    #[error("bookmark data is not in a known format")]
    UnknownShape,
}

pub struct DecodedBookmarks {
    pub entries: Vec<BookmarkEntry>,
    pub shape: PayloadShape,
    /// Entries that failed validation and were dropped
    pub dropped: usize,
}

pub fn decode_payload(raw: &str) -> Result<DecodedBookmarks, DecodeError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| DecodeError::Parse(e.to_string()))?;

    let (raw_entries, shape) = if let Some(entries) = value.as_array() {
        (entries, PayloadShape::BareArray)
    } else if let Some(entries) = value.get("bookmarks").and_then(Value::as_array) {
        (entries, PayloadShape::Wrapped)
    } else if let Some(entries) = value
        .get("state")
        .and_then(|state| state.get("bookmarks"))
        .and_then(Value::as_array)
    {
        (entries, PayloadShape::Envelope)
    } else {
        return Err(DecodeError::UnknownShape);
    };

    let mut entries = Vec::with_capacity(raw_entries.len());
    let mut dropped = 0;
    for item in raw_entries {
        match validate_entry(item) {
            Some(entry) => entries.push(entry),
            None => dropped += 1,
        }
    }

    Ok(DecodedBookmarks {
        entries,
        shape,
        dropped,
    })
}

/// An entry must carry an id plus string `word` and `meaning` fields.
fn validate_entry(value: &Value) -> Option<BookmarkEntry> {
    let obj = value.as_object()?;
    let id: WordId = serde_json::from_value(obj.get("id")?.clone()).ok()?;
    let word = obj.get("word")?.as_str()?.to_string();
    let meaning = obj.get("meaning")?.as_str()?.to_string();
    Some(BookmarkEntry { id, word, meaning })
}
