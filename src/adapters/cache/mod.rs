//! Cache backends and the registry that picks one from configuration.

pub mod file;
pub mod memory;
pub mod table;

pub use file::FileCache;
pub use memory::MemoryCache;
pub use table::TableCache;

use crate::domain::ports::CacheBackend;
use crate::utils::error::{LookupError, Result};
use crate::utils::validation::require_file_path;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    File,
    Table,
    Memory,
}

impl CacheKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::File => "file",
            CacheKind::Table => "table",
            CacheKind::Memory => "memory",
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheKind {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(CacheKind::File),
            "table" => Ok(CacheKind::Table),
            "memory" => Ok(CacheKind::Memory),
            other => Err(LookupError::config(format!(
                "Unknown cache backend '{}'. Known backends: file, table, memory",
                other
            ))),
        }
    }
}

/// Builds the backend registered under `selector` from its options.
pub fn build_cache(
    selector: &str,
    options: &HashMap<String, String>,
) -> Result<Arc<dyn CacheBackend>> {
    let kind: CacheKind = selector.parse()?;

    let backend: Arc<dyn CacheBackend> = match kind {
        CacheKind::File => {
            let path = required_option(kind, options, "path")?;
            require_file_path("cache_options.path", path)?;
            Arc::new(FileCache::open(path)?)
        }
        CacheKind::Table => {
            let dsn = required_option(kind, options, "dsn")?;
            let table = options
                .get("table")
                .map(String::as_str)
                .unwrap_or(table::DEFAULT_TABLE);
            if options.contains_key("user") || options.contains_key("password") {
                tracing::debug!("SQLite table cache ignores user/password options");
            }
            Arc::new(TableCache::open(dsn, table)?)
        }
        CacheKind::Memory => Arc::new(MemoryCache::new()),
    };

    tracing::info!("Using {} cache backend", kind);
    Ok(backend)
}

fn required_option<'a>(
    kind: CacheKind,
    options: &'a HashMap<String, String>,
    name: &str,
) -> Result<&'a str> {
    options
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            LookupError::config(format!(
                "cache_options.{} is required for the {} cache backend",
                name, kind
            ))
        })
}
