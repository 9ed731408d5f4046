//! Alarm type to priority mapping
//!
//! Read-mostly configuration loaded from a YAML file of
//! `type: priority` string pairs. The snapshot core never mutates the
//! mapping; `reload` re-reads the source so operators can change
//! priorities without a restart.

use crate::error::{AlarmError, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug)]
pub struct PriorityMap {
    source: Option<PathBuf>,
    map: RwLock<HashMap<String, String>>,
}

impl PriorityMap {
    /// Empty mapping with no backing file
    pub fn empty() -> Self {
        Self {
            source: None,
            map: RwLock::new(HashMap::new()),
        }
    }

    /// Fixed mapping with no backing file (tests, embedded defaults)
    pub fn from_map(map: HashMap<String, String>) -> Self {
        Self {
            source: None,
            map: RwLock::new(map),
        }
    }

    /// Load the mapping from a YAML file of string pairs
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let map = Self::read(&path)?;
        info!(path = %path.display(), entries = map.len(), "loaded priority map");
        Ok(Self {
            source: Some(path),
            map: RwLock::new(map),
        })
    }

    /// Current mapping, cloned so callers never hold the lock
    pub fn get(&self) -> HashMap<String, String> {
        self.map.read().clone()
    }

    pub fn priority_of(&self, alarm_type: &str) -> Option<String> {
        self.map.read().get(alarm_type).cloned()
    }

    /// Re-read the backing file; a no-op for file-less maps
    pub fn reload(&self) -> Result<()> {
        if let Some(path) = &self.source {
            let fresh = Self::read(path)?;
            info!(path = %path.display(), entries = fresh.len(), "reloaded priority map");
            *self.map.write() = fresh;
        }
        Ok(())
    }

    fn read(path: &Path) -> Result<HashMap<String, String>> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AlarmError::Config(format!("cannot read priority map {}: {e}", path.display()))
        })?;
        serde_yaml::from_str(&raw).map_err(|e| {
            AlarmError::Config(format!("invalid priority map {}: {e}", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_map() {
        let map = PriorityMap::empty();
        assert!(map.get().is_empty());
        assert!(map.priority_of("CHECKSUM").is_none());
    }

    #[test]
    fn test_from_file_and_reload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "CHECKSUM: critical\nDISK: high").unwrap();

        let map = PriorityMap::from_file(file.path()).unwrap();
        assert_eq!(map.priority_of("CHECKSUM").as_deref(), Some("critical"));
        assert_eq!(map.get().len(), 2);

        writeln!(file, "JVM: low").unwrap();
        file.flush().unwrap();
        map.reload().unwrap();
        assert_eq!(map.priority_of("JVM").as_deref(), Some("low"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = PriorityMap::from_file("/nonexistent/priorities.yaml").unwrap_err();
        assert!(matches!(err, AlarmError::Config(_)));
    }
}
