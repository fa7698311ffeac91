use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decodes a JSON array payload, keeping only entries that are objects and
/// deserialize into `T`. Everything else is dropped.
pub fn decode_items<T: DeserializeOwned>(payload: &str) -> Result<Vec<T>> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let items = match serde_json::from_str::<Value>(trimmed)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            tracing::debug!("Expected a JSON array payload, got {}", kind_of(&other));
            return Ok(Vec::new());
        }
    };

    let total = items.len();
    let mut decoded = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            tracing::debug!("Skipping entry {}: {}", index, kind_of(&item));
            continue;
        }
        match serde_json::from_value::<T>(item) {
            Ok(value) => decoded.push(value),
            Err(e) => tracing::debug!("Skipping malformed entry {}: {}", index, e),
        }
    }

    if decoded.len() < total {
        tracing::debug!("Decoded {} of {} entries", decoded.len(), total);
    }

    Ok(decoded)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Region;
    use crate::utils::error::LookupError;

    #[test]
    fn test_only_object_entries_survive() {
        let payload = r#"[{"id_region": 1, "name": "Praha"}, null, 42, {"id_region": "2", "name": "Brno"}]"#;

        let regions: Vec<Region> = decode_items(payload).unwrap();

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].name, "Praha");
        assert_eq!(regions[1].id, 2);
    }

    #[test]
    fn test_malformed_object_is_skipped() {
        let payload = r#"[{"name": "no id"}, {"id_region": 3, "name": "Ostrava"}]"#;
        let regions: Vec<Region> = decode_items(payload).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].id, 3);
    }

    #[test]
    fn test_empty_and_null_payloads() {
        assert!(decode_items::<Region>("").unwrap().is_empty());
        assert!(decode_items::<Region>("null").unwrap().is_empty());
        assert!(decode_items::<Region>(r#""nothing""#).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = decode_items::<Region>("[{").unwrap_err();
        assert!(matches!(err, LookupError::SerializationError(_)));
    }
}
