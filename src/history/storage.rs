//! Key/value storage backends for persisted state
//!
//! One string value per key, overwritten wholesale on every write.
//! - [`FileStorage`]: `<dir>/<key>.json`, atomic temp-file + rename writes
//! - [`MemoryStorage`]: process-local, for tests and ephemeral sessions

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::utils::paths::write_atomic;

pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys become file names, so anything that could escape `dir` is rejected
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            bail!("Invalid storage key: {:?}", key);
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        write_atomic(&path, value.as_bytes())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_file_storage_set_get_remove() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp.path().join("data"));

        assert_eq!(storage.get("github-search-history").unwrap(), None);

        storage.set("github-search-history", "[1,2]").unwrap();
        assert_eq!(storage.get("github-search-history").unwrap().as_deref(), Some("[1,2]"));
        assert!(temp.path().join("data/github-search-history.json").exists());

        storage.remove("github-search-history").unwrap();
        assert_eq!(storage.get("github-search-history").unwrap(), None);
    }

    #[test]
    fn test_file_storage_remove_missing_key_is_ok() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp.path());
        assert!(storage.remove("never-written").is_ok());
    }

    #[test]
    fn test_file_storage_rejects_traversal_keys() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp.path());

        assert!(storage.set("../escape", "x").is_err());
        assert!(storage.get("a/b").is_err());
        assert!(storage.remove("").is_err());
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
    }
}
