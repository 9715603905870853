use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::warn;

use crate::ports::ScoreStore;

/// Scores kept for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    values: HashMap<String, u32>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_value(key: &str, value: u32) -> Self {
        let mut store = Self::new();
        store.set(key, value);
        store
    }
}

impl ScoreStore for MemoryScoreStore {
    fn get(&self, key: &str) -> u32 {
        self.values.get(key).copied().unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_string(), value);
    }
}

/// Scores persisted as a YAML map of keys to numbers.
pub struct FileScoreStore {
    path: PathBuf,
    values: BTreeMap<String, u32>,
}

impl FileScoreStore {
    /// Opens the store, starting empty when the file is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(err) => {
                warn!("Ignoring score file {}: {:#}", path.display(), err);
                BTreeMap::new()
            }
        };

        Self { path, values }
    }

    fn read(path: &Path) -> Result<BTreeMap<String, u32>> {
        match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => serde_yaml_ng::from_str(&content).context("Failed to parse scores"),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err).context("Failed to read scores"),
        }
    }

    fn write(&self) -> Result<()> {
        let content = serde_yaml_ng::to_string(&self.values).context("Failed to serialize scores")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

impl ScoreStore for FileScoreStore {
    fn get(&self, key: &str) -> u32 {
        self.values.get(key).copied().unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_string(), value);
        if let Err(err) = self.write() {
            warn!("Could not persist {}: {:#}", key, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("hidden_snake_{}_{}.yaml", name, std::process::id()));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_memory_store_defaults_to_zero() {
        let mut store = MemoryScoreStore::new();
        assert_eq!(store.get("snake-highscore"), 0);

        store.set("snake-highscore", 70);
        assert_eq!(store.get("snake-highscore"), 70);
        assert_eq!(store.get("other"), 0);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = scratch_file("reopen");

        let mut store = FileScoreStore::open(&path);
        assert_eq!(store.get("snake-highscore"), 0);
        store.set("snake-highscore", 120);

        let reopened = FileScoreStore::open(&path);
        assert_eq!(reopened.get("snake-highscore"), 120);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_garbage_file_reads_as_zero() {
        let path = scratch_file("garbage");
        fs::write(&path, "snake-highscore: [not, a, number]").unwrap();

        let store = FileScoreStore::open(&path);
        assert_eq!(store.get("snake-highscore"), 0);

        let _ = fs::remove_file(&path);
    }
}
