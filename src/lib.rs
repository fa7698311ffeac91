pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{
    build_cache, CacheKind, FileCache, MemoryCache, SoapLookupClient, TableCache,
};
pub use crate::config::LookupConfig;
pub use crate::core::{LookupService, POINT_NOT_FOUND};
pub use crate::domain::{CacheBackend, City, Point, Region, RemoteLookup};
pub use crate::utils::error::{ErrorCategory, LookupError, Result};
