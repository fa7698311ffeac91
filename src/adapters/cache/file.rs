use crate::domain::ports::CacheBackend;
use crate::utils::error::{LookupError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

type Entries = HashMap<String, String>;

/// Whole cache kept in one JSON object file.
///
/// Every call goes to disk. `set` re-reads the file, merges the entry and
/// replaces the file through a temporary sibling, so a failed write leaves the
/// previous contents in place. Handles on the same path inside one process
/// share a lock; separate processes are not coordinated.
#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileCache {
    /// Opens the cache at `path`. A missing file is an empty cache; an
    /// unreadable or corrupt one is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = read_entries(&path)?;

        tracing::debug!(
            "Opened file cache {} with {} entries",
            path.display(),
            entries.len()
        );

        Ok(Self {
            lock: path_lock(&path),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CacheBackend for FileCache {
    async fn exists(&self, key: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        Ok(read_entries(&self.path)?.contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<String> {
        let _guard = self.lock.lock().await;
        read_entries(&self.path)?
            .remove(key)
            .ok_or_else(|| LookupError::CacheKeyNotFound {
                key: key.to_string(),
            })
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = read_entries(&self.path)?;
        entries.insert(key.to_string(), value);
        write_entries(&self.path, &entries)
    }
}

fn read_entries(path: &Path) -> Result<Entries> {
    if !path.exists() {
        return Ok(Entries::new());
    }

    let data = fs::read(path).map_err(|e| cache_error(path, "read", e))?;

    if data.is_empty() {
        return Ok(Entries::new());
    }
    serde_json::from_slice(&data).map_err(|e| cache_error(path, "parse", e))
}

fn write_entries(path: &Path, entries: &Entries) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| cache_error(path, "create directory for", e))?;

    let data = serde_json::to_vec(entries).map_err(|e| cache_error(path, "encode", e))?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| cache_error(path, "write", e))?;
    tmp.write_all(&data)
        .map_err(|e| cache_error(path, "write", e))?;
    tmp.persist(path)
        .map_err(|e| cache_error(path, "replace", e.error))?;
    Ok(())
}

fn cache_error(path: &Path, action: &str, e: impl std::fmt::Display) -> LookupError {
    LookupError::CacheError {
        message: format!("cannot {} {}: {}", action, path.display(), e),
    }
}

/// One lock per cache file for the whole process.
fn path_lock(path: &Path) -> Arc<Mutex<()>> {
    static LOCKS: OnceLock<std::sync::Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

    let id = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut locks = LOCKS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    locks.entry(id).or_default().clone()
}
