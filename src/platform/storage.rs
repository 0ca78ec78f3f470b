//! Key/value persistence
//!
//! A string-keyed store shaped like the browser's LocalStorage. Settings and
//! the best score go through this trait so they are testable off the web.

use std::collections::BTreeMap;

use anyhow::Result;

/// String key/value store
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// In-memory store (tests, or when no persistent storage exists)
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// All keys kept in a single JSON object on disk (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: std::path::PathBuf,
    items: BTreeMap<String, String>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStorage {
    /// Open the store, starting empty when the file does not exist yet
    pub fn open(path: impl Into<std::path::PathBuf>) -> Result<Self> {
        use anyhow::Context;

        let path = path.into();
        let items = if path.exists() {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, items })
    }

    fn flush(&self) -> Result<()> {
        use anyhow::Context;

        let json = serde_json::to_string_pretty(&self.items)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.items.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// `None` when the page has no storage (private mode, sandboxed iframe)
    pub fn open() -> Option<Self> {
        let inner = web_sys::window()?.local_storage().ok()??;
        Some(Self { inner })
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.inner
            .get_item(key)
            .map_err(|e| anyhow::anyhow!("LocalStorage get {key}: {e:?}"))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.inner
            .set_item(key, value)
            .map_err(|e| anyhow::anyhow!("LocalStorage set {key}: {e:?}"))
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.inner
            .remove_item(key)
            .map_err(|e| anyhow::anyhow!("LocalStorage remove {key}: {e:?}"))
    }
}
