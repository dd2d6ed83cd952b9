//! String-keyed configuration stores
//!
//! The host owns configuration persistence; the marker store only needs
//! `get` / `set` / `unset` by `(group, key)`. [`MemoryConfigStore`] backs tests
//! and embedding, [`FileConfigStore`] keeps the same map in a JSON file for
//! the replay tool.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MarkerError, Result};

/// The host's key-value configuration store.
pub trait ConfigStore {
    fn get(&self, group: &str, key: &str) -> Option<String>;
    fn set(&mut self, group: &str, key: &str, value: String);
    fn unset(&mut self, group: &str, key: &str);
}

/// In-memory store: group -> key -> value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryConfigStore {
    groups: BTreeMap<String, BTreeMap<String, String>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, group: &str, key: &str) -> bool {
        self.groups.get(group).is_some_and(|g| g.contains_key(key))
    }

    /// Keys currently set in `group`, in sorted order.
    pub fn keys<'a>(&'a self, group: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.groups
            .get(group)
            .into_iter()
            .flat_map(|g| g.keys().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, group: &str, key: &str) -> Option<String> {
        self.groups.get(group)?.get(key).cloned()
    }

    fn set(&mut self, group: &str, key: &str, value: String) {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    fn unset(&mut self, group: &str, key: &str) {
        if let Some(entries) = self.groups.get_mut(group) {
            entries.remove(key);
            if entries.is_empty() {
                self.groups.remove(group);
            }
        }
    }
}

/// A [`MemoryConfigStore`] mirrored to a JSON file.
///
/// Writes stay in memory until [`FileConfigStore::save_to_disk`].
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
    inner: MemoryConfigStore,
    dirty: bool,
}

impl FileConfigStore {
    /// Load the store at `path`. A missing file is an empty store; a file that
    /// exists but does not parse is an error.
    pub fn load_from_disk(path: &Path) -> Result<Self> {
        let inner = match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => MemoryConfigStore::new(),
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| MarkerError::MalformedStore {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config store on disk, starting empty");
                MemoryConfigStore::new()
            }
            Err(source) => {
                return Err(MarkerError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            inner,
            dirty: false,
        })
    }

    /// Write the store back if anything changed since load or the last save.
    pub fn save_to_disk(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let io_err = |source| MarkerError::Io {
            path: self.path.clone(),
            source,
        };

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content =
            serde_json::to_string_pretty(&self.inner).map_err(|source| MarkerError::MalformedStore {
                path: self.path.clone(),
                source,
            })?;
        fs::write(&self.path, content).map_err(io_err)?;

        self.dirty = false;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn memory(&self) -> &MemoryConfigStore {
        &self.inner
    }
}

impl ConfigStore for FileConfigStore {
    fn get(&self, group: &str, key: &str) -> Option<String> {
        self.inner.get(group, key)
    }

    fn set(&mut self, group: &str, key: &str, value: String) {
        self.inner.set(group, key, value);
        self.dirty = true;
    }

    fn unset(&mut self, group: &str, key: &str) {
        if self.inner.contains(group, key) {
            self.inner.unset(group, key);
            self.dirty = true;
        }
    }
}

/// Default location of the replay tool's store.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("spawn-marker").join("store.json"))
}
