use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use lexis::storage::{FileStorage, KeyValueStorage};
use lexis::words::{WordCatalog, WordId, WordView};
use lexis::AppServices;

/// Shared application state for CLI commands
pub struct App {
    pub services: AppServices,
}

impl App {
    /// Wire the bundled catalog to file-backed storage and load all state.
    pub async fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match data_dir {
            Some(dir) => dir,
            None => FileStorage::default_data_dir().context("Failed to find data directory")?,
        };

        let storage = FileStorage::new(dir).context("Failed to prepare data directory")?;
        let storage: Arc<dyn KeyValueStorage> = Arc::new(storage);

        let mut services = AppServices::new(Arc::new(WordCatalog::bundled()), storage);
        services.init().await;

        Ok(Self { services })
    }

    /// Look up a word by id, with a readable error for unknown ids.
    pub fn find_word(&self, id: &str) -> Result<WordView> {
        let word_id = WordId::from(id);
        match self.services.words.word_by_id(&word_id) {
            Some(view) => Ok(view),
            None => bail!(
                "No word with id '{}' (ids run 1..={})",
                id,
                self.services.words.total_word_count()
            ),
        }
    }
}
