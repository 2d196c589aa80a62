use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::kv::{KeyValueStorage, Result, StorageError};

/// File-backed store: one JSON file per key under a base directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("lexis"))
            .ok_or(StorageError::DataDirNotFound)
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.key_path(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        // Write to a temp file and rename so a crash mid-write never leaves
        // a truncated value under the real key.
        let path = self.key_path(key);
        let tmp_path = path.with_extension("json.tmp");

        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(value.as_bytes()).await?;
        file.sync_all().await?;

        tokio::fs::rename(&tmp_path, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.key_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_test_storage() -> (TempDir, FileStorage) {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn test_get_missing_key_returns_none() {
        let (_dir, storage) = make_test_storage();
        assert_eq!(storage.get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get_round_trip() {
        let (_dir, storage) = make_test_storage();
        storage.set("mastered_words", "[\"1\",\"2\"]").await.unwrap();
        assert_eq!(
            storage.get("mastered_words").await.unwrap(),
            Some("[\"1\",\"2\"]".to_string())
        );
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_value() {
        let (_dir, storage) = make_test_storage();
        storage.set("word_cache", "{\"loaded\":50}").await.unwrap();
        storage.set("word_cache", "{\"loaded\":100}").await.unwrap();
        assert_eq!(
            storage.get("word_cache").await.unwrap(),
            Some("{\"loaded\":100}".to_string())
        );
    }

    #[tokio::test]
    async fn test_remove_deletes_and_tolerates_absence() {
        let (_dir, storage) = make_test_storage();
        storage.set("wordBookmarks", "[]").await.unwrap();
        storage.remove("wordBookmarks").await.unwrap();
        assert_eq!(storage.get("wordBookmarks").await.unwrap(), None);

        // Removing again is not an error.
        storage.remove("wordBookmarks").await.unwrap();
    }

    #[tokio::test]
    async fn test_set_leaves_no_temp_files() {
        let (dir, storage) = make_test_storage();
        storage.set("word_stats", "[]").await.unwrap();

        let tmp_files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty());
    }
}
