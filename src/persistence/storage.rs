use super::files::{atomic_write, read_file};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Flat string key/value store backed by one JSON file
///
/// Every mutation is written through to disk atomically, so a crash never
/// leaves a half-written file behind. In-memory entries only change once
/// the write has succeeded.
#[derive(Debug)]
pub struct Storage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl Storage {
    /// Open the store at `path`; a missing or unreadable file starts empty
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = read_file(&path)?;
        let entries = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "storage file is corrupt, starting empty");
                    BTreeMap::new()
                }
            }
        };
        Ok(Self { path, entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.apply_batch([(key, Some(value))])
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        self.apply_batch([(key, None)])
    }

    /// Apply inserts (`Some`) and removals (`None`) with a single write
    ///
    /// Nothing changes, in memory or on disk, if the write fails.
    pub fn apply_batch<'a, I>(&mut self, changes: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, Option<String>)>,
    {
        let mut entries = self.entries.clone();
        for (key, value) in changes {
            match value {
                Some(value) => {
                    entries.insert(key.to_string(), value);
                }
                None => {
                    entries.remove(key);
                }
            }
        }
        self.commit(entries)
    }

    /// Swap in a whole new set of entries with a single write
    pub fn replace_all(&mut self, entries: BTreeMap<String, String>) -> Result<()> {
        self.commit(entries)
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn commit(&mut self, entries: BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(&entries)
            .context("Failed to serialize storage")?;
        atomic_write(&self.path, &json)?;
        self.entries = entries;
        Ok(())
    }
}
