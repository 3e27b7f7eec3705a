use super::models::Scope;
use crate::config::Config;
use crate::error::GateResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Remembers whether a permission request was ever made for a scope
pub trait RequestHistory: Send + Sync {
    fn get_requested(&self, scope: Scope) -> bool;

    /// Record that a request was made; flags are never cleared
    fn set_requested(&self, scope: Scope) -> GateResult<()>;
}

/// Process-local history, forgotten on restart
#[derive(Debug, Default)]
pub struct MemoryRequestHistory {
    read_only: AtomicBool,
    read_write: AtomicBool,
}

impl MemoryRequestHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&self, scope: Scope) -> &AtomicBool {
        match scope {
            Scope::ReadOnly => &self.read_only,
            Scope::ReadWrite => &self.read_write,
        }
    }
}

impl RequestHistory for MemoryRequestHistory {
    fn get_requested(&self, scope: Scope) -> bool {
        self.flag(scope).load(Ordering::SeqCst)
    }

    fn set_requested(&self, scope: Scope) -> GateResult<()> {
        self.flag(scope).store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// On-disk layout of the history file
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
struct HistoryFlags {
    #[serde(rename = "permissionRequested", default)]
    read_write: bool,
    #[serde(rename = "permissionRequestedRead", default)]
    read_only: bool,
}

impl HistoryFlags {
    fn get(&self, scope: Scope) -> bool {
        match scope {
            Scope::ReadOnly => self.read_only,
            Scope::ReadWrite => self.read_write,
        }
    }

    fn set(&mut self, scope: Scope) {
        match scope {
            Scope::ReadOnly => self.read_only = true,
            Scope::ReadWrite => self.read_write = true,
        }
    }
}

/// History persisted as a small TOML file
#[derive(Debug)]
pub struct FileRequestHistory {
    path: PathBuf,
    flags: Mutex<HistoryFlags>,
}

impl FileRequestHistory {
    /// Open the history at `path`; a missing file means nothing was requested
    pub fn open(path: impl AsRef<Path>) -> GateResult<Self> {
        let path = path.as_ref().to_path_buf();

        let flags = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            HistoryFlags::default()
        };

        Ok(Self {
            path,
            flags: Mutex::new(flags),
        })
    }

    /// Open the history at the configured `history_path`
    pub fn from_config(config: &Config) -> GateResult<Self> {
        Self::open(&config.history_path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, flags: &HistoryFlags) -> GateResult<()> {
        // Create the parent directory if it doesn't exist
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let toml_str = toml::to_string(flags)?;
        fs::write(&self.path, toml_str)?;
        debug!("Saved permission history to {}", self.path.display());

        Ok(())
    }
}

impl RequestHistory for FileRequestHistory {
    fn get_requested(&self, scope: Scope) -> bool {
        self.flags
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(scope)
    }

    fn set_requested(&self, scope: Scope) -> GateResult<()> {
        let mut flags = self.flags.lock().unwrap_or_else(PoisonError::into_inner);
        if flags.get(scope) {
            return Ok(());
        }
        flags.set(scope);
        self.save(&flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_history_is_per_scope() {
        let history = MemoryRequestHistory::new();
        history.set_requested(Scope::ReadOnly).unwrap();

        assert!(history.get_requested(Scope::ReadOnly));
        assert!(!history.get_requested(Scope::ReadWrite));
    }

    #[test]
    fn test_file_history_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.toml");

        let history = FileRequestHistory::open(&path).unwrap();
        assert!(!history.get_requested(Scope::ReadWrite));
        history.set_requested(Scope::ReadWrite).unwrap();

        let reopened = FileRequestHistory::open(&path).unwrap();
        assert!(reopened.get_requested(Scope::ReadWrite));
        assert!(!reopened.get_requested(Scope::ReadOnly));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("permissionRequested = true"));
    }

    #[test]
    fn test_file_history_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            history_path: dir.path().join("history.toml"),
            ..Config::default()
        };

        let history = FileRequestHistory::from_config(&config).unwrap();
        history.set_requested(Scope::ReadOnly).unwrap();

        assert_eq!(history.path(), config.history_path.as_path());
        assert!(config.history_path.exists());
    }

    #[test]
    fn test_file_history_reads_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.toml");
        fs::write(&path, "permissionRequestedRead = true\n").unwrap();

        let history = FileRequestHistory::open(&path).unwrap();
        assert!(history.get_requested(Scope::ReadOnly));
        assert!(!history.get_requested(Scope::ReadWrite));
    }
}
