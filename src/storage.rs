//! Local preferences: a small JSON key/value file.
//!
//! Written whenever a value changes, read once at startup. A missing or
//! unreadable file starts an empty store.

use crate::error::SdkError;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    values: Map<String, Value>,
}

impl Preferences {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str::<Map<String, Value>>(&text).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed preferences");
                Map::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Map::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read preferences");
                Map::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` if absent or stored under a different shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?.clone();
        serde_json::from_value(value)
            .map_err(|e| tracing::debug!(key, error = %e, "preference has unexpected shape"))
            .ok()
    }

    /// Store `value`; the file is only rewritten if it changed.
    ///
    /// On a failed write the in-memory values are left as they were.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<bool, SdkError> {
        let value = serde_json::to_value(value)?;
        if self.values.get(key) == Some(&value) {
            return Ok(false);
        }
        let mut next = self.values.clone();
        next.insert(key.to_string(), value);
        self.commit(next)?;
        Ok(true)
    }

    pub fn remove(&mut self, key: &str) -> Result<bool, SdkError> {
        if !self.values.contains_key(key) {
            return Ok(false);
        }
        let mut next = self.values.clone();
        next.remove(key);
        self.commit(next)?;
        Ok(true)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn commit(&mut self, next: Map<String, Value>) -> Result<(), SdkError> {
        if let Err(e) = self.persist(&next) {
            tracing::warn!(path = %self.path.display(), error = %e, "could not write preferences");
            return Err(e);
        }
        self.values = next;
        Ok(())
    }

    fn persist(&self, values: &Map<String, Value>) -> Result<(), SdkError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(values)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let prefs = Preferences::load(dir.path().join("none.json"));
        assert!(!prefs.contains("theme"));
        assert_eq!(prefs.get::<String>("theme"), None);
    }

    #[test]
    fn test_set_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.json");
        let mut prefs = Preferences::load(&path);
        assert!(prefs.set("theme", &"dark").unwrap());
        assert!(prefs.set("banner_dismissed", &true).unwrap());

        let reloaded = Preferences::load(&path);
        assert_eq!(reloaded.get::<String>("theme").as_deref(), Some("dark"));
        assert_eq!(reloaded.get::<bool>("banner_dismissed"), Some(true));
        assert_eq!(reloaded.get::<u32>("theme"), None);
    }

    #[test]
    fn test_unchanged_value_skips_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        let mut prefs = Preferences::load(&path);
        assert!(prefs.set("theme", &"light").unwrap());
        fs::remove_file(&path).unwrap();
        assert!(!prefs.set("theme", &"light").unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_write_keeps_memory_in_sync() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("config");
        fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("prefs.json");

        let mut prefs = Preferences::load(&path);
        assert!(matches!(prefs.set("theme", &"dark"), Err(SdkError::Storage(_))));
        assert!(!prefs.contains("theme"));

        fs::remove_file(&blocker).unwrap();
        assert!(prefs.set("theme", &"dark").unwrap());
        assert!(path.exists());
        assert_eq!(Preferences::load(&path).get::<String>("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_failed_remove_keeps_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        let mut prefs = Preferences::load(&path);
        prefs.set("theme", &"dark").unwrap();

        // A directory where the temp file goes makes the write fail.
        fs::create_dir(path.with_extension("tmp")).unwrap();
        assert!(prefs.remove("theme").is_err());
        assert!(prefs.contains("theme"));

        fs::remove_dir(path.with_extension("tmp")).unwrap();
        assert!(prefs.remove("theme").unwrap());
        assert!(!Preferences::load(&path).contains("theme"));
    }

    #[test]
    fn test_malformed_file_tolerated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{not json").unwrap();
        let mut prefs = Preferences::load(&path);
        assert!(!prefs.contains("theme"));
        prefs.set("theme", &"dark").unwrap();
        assert_eq!(Preferences::load(&path).get::<String>("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        let mut prefs = Preferences::load(&path);
        prefs.set("theme", &"dark").unwrap();
        assert!(prefs.remove("theme").unwrap());
        assert!(!prefs.remove("theme").unwrap());
        assert!(!Preferences::load(&path).contains("theme"));
    }
}
