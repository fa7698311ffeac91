//! Field checks shared by configuration and the cache registry. Each failure
//! names the offending field so the message points at the TOML key.

use crate::utils::error::{LookupError, Result};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> LookupError {
    LookupError::InvalidConfigValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// The SOAP endpoint is posted to directly, so only http(s) makes sense.
pub fn require_http_url(field: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value).map_err(|e| invalid(field, value, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(field, value, format!("expected http or https, got {}", other))),
    }
}

pub fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "must not be blank"));
    }
    Ok(())
}

pub fn require_at_least(field: &str, value: u64, min: u64) -> Result<()> {
    if value < min {
        return Err(invalid(field, value, format!("must be at least {}", min)));
    }
    Ok(())
}

pub fn require_file_path(field: &str, value: &str) -> Result<()> {
    require_text(field, value)?;
    if value.contains('\0') {
        return Err(invalid(field, value.escape_default(), "contains a NUL byte"));
    }
    Ok(())
}

/// Table names end up inside SQL text, so only plain identifiers pass.
pub fn require_sql_identifier(field: &str, value: &str) -> Result<()> {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    let re = IDENTIFIER
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("static regex"));

    if !re.is_match(value) {
        return Err(invalid(field, value, "letters, digits and underscores only"));
    }
    Ok(())
}
