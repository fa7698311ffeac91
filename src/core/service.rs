use crate::adapters::cache::build_cache;
use crate::adapters::soap::SoapLookupClient;
use crate::config::LookupConfig;
use crate::core::cache_key::CacheKey;
use crate::domain::model::{City, Point, Region};
use crate::domain::ports::{CacheBackend, RemoteLookup};
use crate::utils::error::{LookupError, Result};
use crate::utils::validation::Validate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, Mutex};

pub const POINT_NOT_FOUND: &str = "GeisPoint details was not found.";

/// Public entry point: remote lookups with cache-aside for reference data.
///
/// Regions, cities and point details are cached when a backend is configured.
/// Searches always go to the remote service.
pub struct LookupService<R: RemoteLookup = SoapLookupClient> {
    config: LookupConfig,
    remote: R,
    cache: Option<Arc<dyn CacheBackend>>,
    last_error: Mutex<Option<String>>,
}

impl LookupService<SoapLookupClient> {
    /// Validates `config`, builds the SOAP client and resolves the cache backend.
    pub fn new(config: LookupConfig) -> Result<Self> {
        config.validate()?;

        let remote = SoapLookupClient::new(&config)?;
        let cache = if config.use_cache {
            let selector = config
                .used_cache
                .as_deref()
                .ok_or_else(|| LookupError::config("used_cache is required when use_cache is set"))?;
            Some(build_cache(selector, &config.cache_options)?)
        } else {
            None
        };

        tracing::info!(
            "GeisPoint lookup service for {} (cache: {})",
            config.endpoint,
            config.used_cache.as_deref().filter(|_| config.use_cache).unwrap_or("off")
        );

        Ok(Self::with_parts(config, remote, cache))
    }
}

impl<R: RemoteLookup> LookupService<R> {
    /// Assembles a service from ready collaborators. Caching is on exactly when
    /// `cache` is `Some`.
    pub fn with_parts(
        config: LookupConfig,
        remote: R,
        cache: Option<Arc<dyn CacheBackend>>,
    ) -> Self {
        Self {
            config,
            remote,
            cache,
            last_error: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn is_caching(&self) -> bool {
        self.cache.is_some()
    }

    pub async fn get_regions(&self, country: Option<&str>) -> Result<Vec<Region>> {
        let country = non_empty(country).unwrap_or(self.config.default_country.as_str());

        let result = self
            .cached(CacheKey::Regions { country }, move || {
                self.remote.fetch_regions(country)
            })
            .await;
        self.record(result)
    }

    /// Cities of a region. The country is sent to the service but is not part of
    /// the cache key, so a cached region answers for every country.
    pub async fn get_cities(
        &self,
        country: Option<&str>,
        region_id: Option<i64>,
    ) -> Result<Vec<City>> {
        let country = non_empty(country).unwrap_or(self.config.default_country.as_str());
        let region_id = region_id
            .filter(|id| *id != 0)
            .unwrap_or(self.config.default_region);

        let result = self
            .cached(CacheKey::Cities { region_id }, move || {
                self.remote.fetch_cities(country, region_id)
            })
            .await;
        self.record(result)
    }

    pub async fn get_point_detail(&self, gpid: &str) -> Result<Point> {
        if gpid.trim().is_empty() {
            return self.record(Err(LookupError::ValidationError {
                message: "point id must be a non-empty string".to_string(),
            }));
        }

        let result = self
            .cached(CacheKey::Point { gpid }, move || async move {
                self.remote
                    .fetch_point_detail(gpid)
                    .await
                    .map_err(|e| match e {
                        LookupError::NotFound { .. } => LookupError::NotFound {
                            message: POINT_NOT_FOUND.to_string(),
                        },
                        other => other,
                    })
            })
            .await;
        self.record(result)
    }

    /// Never cached: every call is a remote round trip.
    pub async fn search_points(
        &self,
        zip: Option<&str>,
        city: Option<&str>,
        gpid: Option<&str>,
    ) -> Result<Vec<Point>> {
        let result = self
            .remote
            .search(non_empty(zip), non_empty(city), non_empty(gpid))
            .await;
        self.record(result)
    }

    /// Message of the most recent failed operation, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|slot| slot.clone())
    }

    async fn cached<T, F, Fut>(&self, key: CacheKey<'_>, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let Some(cache) = self.cache.as_ref() else {
            return fetch().await;
        };

        let key = key.to_string();
        if cache.exists(&key).await? {
            tracing::debug!("Cache hit for {}", key);
            let raw = cache.get(&key).await?;
            return serde_json::from_str(&raw).map_err(|e| LookupError::CacheError {
                message: format!("unreadable cached value for {}: {}", key, e),
            });
        }

        tracing::debug!("Cache miss for {}", key);
        let value = fetch().await?;
        let raw = serde_json::to_string(&value).map_err(|e| LookupError::CacheError {
            message: format!("cannot encode value for {}: {}", key, e),
        })?;
        cache.set(&key, raw).await?;
        Ok(value)
    }

    fn record<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            tracing::debug!("Lookup failed: {}", e);
            if let Ok(mut slot) = self.last_error.lock() {
                *slot = Some(e.to_string());
            }
        }
        result
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::MemoryCache;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct StubRemote {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RemoteLookup for StubRemote {
        async fn fetch_regions(&self, country: &str) -> Result<Vec<Region>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Region {
                id: 1,
                name: country.to_string(),
            }])
        }

        async fn fetch_cities(&self, _country: &str, region_id: i64) -> Result<Vec<City>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![City {
                name: "Praha".to_string(),
                region_id,
            }])
        }

        async fn fetch_point_detail(&self, gpid: &str) -> Result<Point> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(LookupError::NotFound {
                message: format!("no point {}", gpid),
            })
        }

        async fn search(
            &self,
            _zip: Option<&str>,
            _city: Option<&str>,
            _gpid: Option<&str>,
        ) -> Result<Vec<Point>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    fn service(cache: bool) -> LookupService<StubRemote> {
        let cache: Option<Arc<dyn CacheBackend>> = if cache {
            Some(Arc::new(MemoryCache::new()))
        } else {
            None
        };
        LookupService::with_parts(
            LookupConfig::new("http://localhost/soap"),
            StubRemote::default(),
            cache,
        )
    }

    #[tokio::test]
    async fn test_defaults_fill_missing_arguments() {
        let service = service(false);

        let regions = service.get_regions(Some("")).await.unwrap();
        assert_eq!(regions[0].name, "CZ");

        let cities = service.get_cities(None, None).await.unwrap();
        assert_eq!(cities[0].region_id, 19);
    }

    #[tokio::test]
    async fn test_not_found_message_is_rewritten() {
        let service = service(true);

        let err = service.get_point_detail("CZ1").await.unwrap_err();

        assert!(matches!(err, LookupError::NotFound { .. }));
        assert_eq!(err.to_string(), POINT_NOT_FOUND);
        assert_eq!(service.last_error().as_deref(), Some(POINT_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_last_error_starts_empty() {
        let service = service(false);
        assert!(service.last_error().is_none());

        service.get_regions(None).await.unwrap();
        assert!(service.last_error().is_none());
    }

    #[tokio::test]
    async fn test_blank_gpid_is_rejected_without_remote_call() {
        let service = service(true);

        let err = service.get_point_detail("   ").await.unwrap_err();

        assert!(matches!(err, LookupError::ValidationError { .. }));
        assert_eq!(service.remote.calls.load(Ordering::SeqCst), 0);
        assert!(service.last_error().is_some());
    }
}
