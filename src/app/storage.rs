// SPDX-License-Identifier: MPL-2.0
//! Durable key/value preference storage.
//!
//! The locale preference is a single string entry under a fixed key. The
//! resolver only sees the [`PreferenceStore`] trait, so tests can swap the
//! file-backed store for an in-memory one, including one that refuses writes.

use super::paths;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the key/value store inside the app data directory.
const STORAGE_FILE: &str = "storage.toml";

/// Key/value storage that survives restarts.
pub trait PreferenceStore {
    /// Returns the stored value for `key`, or `None` when absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage rejects the write.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// TOML-file backed store: one flat `key = "value"` table.
///
/// Entries that are not strings are never returned but are kept on write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: Option<PathBuf>,
}

impl FileStore {
    /// Store located in the default data directory (see [`paths::get_app_data_dir`]).
    pub fn open() -> Self {
        Self::open_in(None)
    }

    /// Store located in `base_dir`, falling back to default path resolution.
    pub fn open_in(base_dir: Option<PathBuf>) -> Self {
        let path = paths::get_app_data_dir_with_override(base_dir).map(|mut path| {
            path.push(STORAGE_FILE);
            path
        });
        Self { path }
    }

    /// Store backed by an explicit file.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn read_table(path: &Path) -> toml::Table {
        let Ok(content) = fs::read_to_string(path) else {
            return toml::Table::new();
        };
        match content.parse::<toml::Table>() {
            Ok(table) => table,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable preference store");
                toml::Table::new()
            }
        }
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path.as_deref()?;
        match Self::read_table(path).remove(key)? {
            toml::Value::String(value) => Some(value),
            other => {
                tracing::debug!(key, kind = other.type_str(), "ignoring non-string preference");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Err(Error::Storage(
                "no data directory available for preferences".to_string(),
            ));
        };

        let mut table = Self::read_table(path);
        table.insert(key.to_string(), toml::Value::String(value.to_string()));

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&table)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    deny_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, like a browser with storage disabled.
    pub fn write_denied() -> Self {
        Self {
            entries: HashMap::new(),
            deny_writes: true,
        }
    }

    /// Pre-populates an entry, bypassing the write guard.
    #[must_use]
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.deny_writes {
            return Err(Error::Storage("storage write denied".to_string()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
