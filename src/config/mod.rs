#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{LookupError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_COUNTRY: &str = "CZ";
pub const DEFAULT_REGION: i64 = 19;
pub const DEFAULT_NAMESPACE: &str = "urn:GPWebService";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Service configuration. Built once and never changed while a service uses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupConfig {
    pub endpoint: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_country")]
    pub default_country: String,
    #[serde(default = "default_region")]
    pub default_region: i64,
    #[serde(default)]
    pub use_cache: bool,
    #[serde(default)]
    pub used_cache: Option<String>,
    #[serde(default)]
    pub cache_options: HashMap<String, String>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

fn default_region() -> i64 {
    DEFAULT_REGION
}

impl LookupConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            namespace: default_namespace(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            default_country: default_country(),
            default_region: DEFAULT_REGION,
            use_cache: false,
            used_cache: None,
            cache_options: HashMap::new(),
        }
    }

    /// Enables caching through the backend registered under `backend`.
    pub fn with_cache(
        mut self,
        backend: impl Into<String>,
        options: HashMap<String, String>,
    ) -> Self {
        self.use_cache = true;
        self.used_cache = Some(backend.into());
        self.cache_options = options;
        self
    }

    pub fn with_defaults(mut self, country: impl Into<String>, region: i64) -> Self {
        self.default_country = country.into();
        self.default_region = region;
        self
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            LookupError::config(format!(
                "cannot read configuration {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after substituting `${VAR}` references from the environment.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| LookupError::config(format!("TOML parsing error: {}", e)))
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LookupError::config(e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for LookupConfig {
    fn validate(&self) -> Result<()> {
        validation::require_http_url("endpoint", &self.endpoint)?;
        validation::require_text("namespace", &self.namespace)?;
        validation::require_at_least("timeout_seconds", self.timeout_seconds, 1)?;
        validation::require_text("default_country", &self.default_country)?;

        if self.use_cache {
            match self.used_cache.as_deref() {
                Some(name) if !name.trim().is_empty() => {}
                _ => {
                    return Err(LookupError::config(
                        "use_cache is enabled but used_cache names no backend",
                    ))
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_from_minimal_toml() {
        let config = LookupConfig::from_toml_str(r#"endpoint = "https://gp.example.com/soap""#).unwrap();

        assert_eq!(config.default_country, "CZ");
        assert_eq!(config.default_region, 19);
        assert!(!config.use_cache);
        assert!(config.used_cache.is_none());
        assert!(config.cache_options.is_empty());
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_cache_section() {
        let toml_content = r#"
endpoint = "https://gp.example.com/soap"
default_country = "SK"
default_region = 5
use_cache = true
used_cache = "file"

[cache_options]
path = "/tmp/geispoint.json"
"#;

        let config = LookupConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.default_country, "SK");
        assert_eq!(config.default_region, 5);
        assert_eq!(config.used_cache.as_deref(), Some("file"));
        assert_eq!(config.cache_options.get("path").unwrap(), "/tmp/geispoint.json");
    }

    #[test]
    fn test_cache_options_must_be_a_table() {
        let toml_content = r#"
endpoint = "https://gp.example.com/soap"
cache_options = "path=/tmp/x"
"#;

        let err = LookupConfig::from_toml_str(toml_content).unwrap_err();
        assert!(matches!(err, LookupError::ConfigError { .. }));
    }

    #[test]
    fn test_use_cache_without_backend_is_invalid() {
        let mut config = LookupConfig::new("https://gp.example.com/soap");
        config.use_cache = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(LookupConfig::new("not a url").validate().is_err());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GEISPOINT_TEST_ENDPOINT", "https://env.example.com/soap");

        let config = LookupConfig::from_toml_str(r#"endpoint = "${GEISPOINT_TEST_ENDPOINT}""#).unwrap();
        assert_eq!(config.endpoint, "https://env.example.com/soap");

        std::env::remove_var("GEISPOINT_TEST_ENDPOINT");
    }

    #[test]
    fn test_missing_config_file_is_a_configuration_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();

        let err = LookupConfig::from_file(temp_dir.path().join("absent.toml")).unwrap_err();

        assert!(matches!(err, LookupError::ConfigError { .. }));
        assert_eq!(err.category(), crate::utils::error::ErrorCategory::Configuration);
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"endpoint = \"https://gp.example.com/soap\"\nuse_cache = true\nused_cache = \"memory\"\n")
            .unwrap();

        let config = LookupConfig::from_file(temp_file.path()).unwrap();
        assert!(config.use_cache);
        assert!(config.validate().is_ok());
    }
}
