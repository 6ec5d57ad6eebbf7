use crate::error::LabError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// String key-value storage with browser `localStorage` semantics.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// A store backed by one JSON file. Changes stay in memory until [`FileStore::save`].
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the file, starting empty if it does not exist yet.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LabError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    pub fn save(&self) -> Result<(), LabError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, text)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        store.set("a", "1");
        store.set("a", "2");
        assert_eq!(store.get("a").as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
        store.remove("a");
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn file_store_persists_only_on_save() {
        let path = std::env::temp_dir().join(format!("marketing-lab-store-{}.json", uuid::Uuid::new_v4()));

        let mut store = FileStore::load(&path).unwrap();
        store.set("marketinglab_paid", "true");
        assert!(FileStore::load(&path).unwrap().get("marketinglab_paid").is_none());

        store.save().unwrap();
        let reopened = FileStore::load(&path).unwrap();
        assert_eq!(reopened.get("marketinglab_paid").as_deref(), Some("true"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn file_store_rejects_corrupt_file() {
        let path = std::env::temp_dir().join(format!("marketing-lab-corrupt-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, "not json").unwrap();
        assert!(matches!(FileStore::load(&path), Err(LabError::JsonError(_))));
        let _ = fs::remove_file(&path);
    }
}
