use crate::domain::model::{City, Point, Region};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Key/value store sitting in front of the remote service.
///
/// Values are opaque serialized strings. `get` on a missing key fails with
/// `CacheKeyNotFound`, so callers check `exists` first. Backend failures are
/// errors, never misses.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool>;
    async fn get(&self, key: &str) -> Result<String>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
}

/// One remote round trip per call, no caching.
#[async_trait]
pub trait RemoteLookup: Send + Sync {
    async fn fetch_regions(&self, country: &str) -> Result<Vec<Region>>;

    async fn fetch_cities(&self, country: &str, region_id: i64) -> Result<Vec<City>>;

    /// Fails with `NotFound` unless the service returns exactly one point.
    async fn fetch_point_detail(&self, gpid: &str) -> Result<Point>;

    async fn search(
        &self,
        zip: Option<&str>,
        city: Option<&str>,
        gpid: Option<&str>,
    ) -> Result<Vec<Point>>;
}
