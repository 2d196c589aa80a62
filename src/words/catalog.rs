//! Bundled word corpus

use std::collections::HashMap;

use super::models::{WordId, WordRecord};

const BUNDLED_WORDS: &str = include_str!("../../assets/words.json");

/// Immutable, ordered word corpus with an id lookup index.
pub struct WordCatalog {
    records: Vec<WordRecord>,
    index: HashMap<WordId, usize>,
}

impl WordCatalog {
    pub fn new(records: Vec<WordRecord>) -> Self {
        let mut deduped: Vec<WordRecord> = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());

        for record in records {
            if index.contains_key(&record.id) {
                log::warn!("duplicate word id {} in corpus, keeping first entry", record.id);
                continue;
            }
            index.insert(record.id.clone(), deduped.len());
            deduped.push(record);
        }

        Self { records: deduped, index }
    }

    /// Load the corpus shipped with the app.
    pub fn bundled() -> Self {
        let records: Vec<WordRecord> = serde_json::from_str(BUNDLED_WORDS).unwrap_or_else(|e| {
            log::error!("bundled word corpus is unreadable: {}", e);
            Vec::new()
        });
        Self::new(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[WordRecord] {
        &self.records
    }

    pub fn get(&self, id: &WordId) -> Option<&WordRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn contains(&self, id: &WordId) -> bool {
        self.index.contains_key(id)
    }
}
