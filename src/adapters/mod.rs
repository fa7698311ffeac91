// Adapters layer: concrete implementations of the domain ports.

pub mod cache;
pub mod soap;

pub use cache::{build_cache, CacheKind, FileCache, MemoryCache, TableCache};
pub use soap::SoapLookupClient;
