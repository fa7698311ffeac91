pub mod cache_key;
pub mod service;

pub use cache_key::CacheKey;
pub use service::{LookupService, POINT_NOT_FOUND};
