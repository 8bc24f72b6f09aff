//! String key-value stores backing the leaderboard

use std::collections::BTreeMap;

use crate::error::StoreError;

/// Minimal LocalStorage-shaped interface
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store (tests, or when nothing should outlive the process)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// All items in one JSON object file, rewritten on every set
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => serde_json::from_str(&json).map_err(StoreError::Parse),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = match self.read_all() {
            Ok(items) => items,
            Err(StoreError::Parse(e)) => {
                log::warn!("Overwriting corrupt store {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        items.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&items)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct BrowserStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl BrowserStore {
    /// The window's LocalStorage, if the browser allows it
    pub fn local() -> Result<Self, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .map(|storage| Self { storage })
            .ok_or_else(|| StoreError::Unavailable("LocalStorage is not accessible".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for BrowserStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "brick_breaker_{}_{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_item("k").unwrap(), None);
        store.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = temp_path("round_trip");
        let _ = std::fs::remove_file(&path);

        let mut store = FileStore::new(&path);
        assert_eq!(store.get_item("playerName").unwrap(), None);
        store.set_item("playerName", "linus").unwrap();
        store.set_item("highScores", "[]").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get_item("playerName").unwrap().as_deref(), Some("linus"));
        assert_eq!(reopened.get_item("highScores").unwrap().as_deref(), Some("[]"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_corrupt_is_error() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "garbage").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.get_item("playerName"),
            Err(StoreError::Parse(_))
        ));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_write_repairs_corrupt_file() {
        let path = temp_path("repair");
        std::fs::write(&path, "garbage").unwrap();

        let mut store = FileStore::new(&path);
        store.set_item("playerName", "ada").unwrap();
        assert_eq!(store.get_item("playerName").unwrap().as_deref(), Some("ada"));

        // Later writes keep earlier keys
        store.set_item("highScores", "[]").unwrap();
        assert_eq!(store.get_item("playerName").unwrap().as_deref(), Some("ada"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_parse_error_message() {
        let path = temp_path("message");
        std::fs::write(&path, "garbage").unwrap();

        let err = FileStore::new(&path).get_item("k").unwrap_err();
        assert!(err.to_string().starts_with("invalid stored JSON"));

        let _ = std::fs::remove_file(&path);
    }
}
