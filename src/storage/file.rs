//! JSON-file store.
//!
//! Each key lives in `<data_dir>/<namespace>.<key>.json`. Writes go through a
//! temp file and a rename so a crash never leaves a half-written document.

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::{validate_key, KeyValueStore};

/// Persists each key as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    namespace: String,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            namespace: namespace.into(),
        }
    }

    /// Directory holding the files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.{key}.json", self.namespace)))
    }

    fn owns(&self, file_name: &str) -> bool {
        file_name
            .strip_prefix(&self.namespace)
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|rest| rest.ends_with(".json") || rest.ends_with(".json.tmp"))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key)?;
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {}", path.display()))
            }
        };

        let value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON in {}", path.display()))?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", self.dir.display()))?;

        let content =
            serde_json::to_string_pretty(&value).context("Failed to serialize value to JSON")?;
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, content)
            .await
            .with_context(|| format!("Failed to write temp file {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .await
            .with_context(|| format!("Failed to rename temp file to {}", path.display()))?;

        debug!(key, path = %path.display(), "Stored value");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).with_context(|| format!("Failed to delete {}", path.display())),
        }
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to list {}", self.dir.display()))
            }
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("Failed to list {}", self.dir.display()))?
        {
            let name = entry.file_name();
            if self.owns(&name.to_string_lossy()) {
                let path = entry.path();
                fs::remove_file(&path)
                    .await
                    .with_context(|| format!("Failed to delete {}", path.display()))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("data"), "test");
        assert_eq!(store.get("palettes").await.unwrap(), None);
        assert!(!store.delete("palettes").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_writes_named_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path(), "palettekit");
        store.set("colors", json!(["#FF6B35"])).await.unwrap();

        let path = temp_dir.path().join("palettekit.colors.json");
        assert!(path.exists());
        assert!(!temp_dir.path().join("palettekit.colors.json.tmp").exists());
        let reopened = FileStore::new(temp_dir.path(), "palettekit");
        assert_eq!(reopened.get("colors").await.unwrap(), Some(json!(["#FF6B35"])));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("test.palettes.json"), "{not json").unwrap();
        let store = FileStore::new(temp_dir.path(), "test");
        let err = store.get("palettes").await.unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse JSON"));
    }

    #[tokio::test]
    async fn test_clear_only_touches_own_namespace() {
        let temp_dir = TempDir::new().unwrap();
        let ours = FileStore::new(temp_dir.path(), "ours");
        let theirs = FileStore::new(temp_dir.path(), "theirs");
        ours.set("a", json!(1)).await.unwrap();
        ours.set("b", json!(2)).await.unwrap();
        theirs.set("a", json!(3)).await.unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "keep").unwrap();

        ours.clear().await.unwrap();

        assert_eq!(ours.get("a").await.unwrap(), None);
        assert_eq!(ours.get("b").await.unwrap(), None);
        assert_eq!(theirs.get("a").await.unwrap(), Some(json!(3)));
        assert!(temp_dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_clear_removes_leftover_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path(), "ours");
        store.set("a", json!(1)).await.unwrap();
        // Left behind by a write interrupted before the rename
        let leftover = temp_dir.path().join("ours.b.json.tmp");
        std::fs::write(&leftover, "{").unwrap();
        let foreign = temp_dir.path().join("theirs.b.json.tmp");
        std::fs::write(&foreign, "{").unwrap();

        store.clear().await.unwrap();

        assert!(!leftover.exists());
        assert!(!temp_dir.path().join("ours.a.json").exists());
        assert!(foreign.exists());
    }

    #[test]
    fn test_owns_matches_namespace_files() {
        let store = FileStore::new("/tmp", "ours");
        assert!(store.owns("ours.palettes.json"));
        assert!(store.owns("ours.palettes.json.tmp"));
        assert!(!store.owns("theirs.palettes.json"));
        assert!(!store.owns("oursx.palettes.json"));
        assert!(!store.owns("ours.palettes.txt"));
    }

    #[tokio::test]
    async fn test_clear_missing_dir_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("absent"), "test");
        store.clear().await.unwrap();
    }
}
