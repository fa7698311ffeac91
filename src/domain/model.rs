use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Administrative region as returned by `getRegions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "id_region", deserialize_with = "lenient_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
}

/// City within a region as returned by `getCities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(rename = "city", deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "id_region", default, deserialize_with = "lenient_i64")]
    pub region_id: i64,
}

/// A single pickup point. `gpid` is the identity and is never empty once decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(rename = "id_gp", deserialize_with = "lenient_string")]
    pub gpid: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub zipcode: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub city: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub street: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub opening_hours: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub holiday: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub note: String,
    #[serde(rename = "gpsn", default, deserialize_with = "lenient_f64")]
    pub gps_lat: Option<f64>,
    #[serde(rename = "gpse", default, deserialize_with = "lenient_f64")]
    pub gps_lng: Option<f64>,
    #[serde(rename = "photo", default, deserialize_with = "lenient_string")]
    pub photo_url: String,
    #[serde(rename = "map", default, deserialize_with = "lenient_string")]
    pub map_url: String,
}

impl Point {
    pub fn has_identity(&self) -> bool {
        !self.gpid.trim().is_empty()
    }
}

// The service mixes JSON numbers and numeric strings for the same field.

fn lenient_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom(format!("not an integer: {}", n))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("not an integer: {:?}", s))),
        other => Err(serde::de::Error::custom(format!(
            "expected integer, got {}",
            other
        ))),
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .replace(',', ".")
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("not a coordinate: {:?}", s))),
        Value::Null => Ok(None),
        other => Err(serde::de::Error::custom(format!(
            "expected number, got {}",
            other
        ))),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_region_accepts_numeric_string_id() {
        let region: Region = serde_json::from_value(json!({"id_region": "19", "name": "Praha"})).unwrap();
        assert_eq!(region, Region { id: 19, name: "Praha".to_string() });
    }

    #[test]
    fn test_city_fields() {
        let city: City = serde_json::from_value(json!({"city": "Brno", "id_region": 5})).unwrap();
        assert_eq!(city.name, "Brno");
        assert_eq!(city.region_id, 5);
    }

    #[test]
    fn test_point_defaults_and_coordinates() {
        let point: Point = serde_json::from_value(json!({
            "id_gp": 1234,
            "name": "GP Praha",
            "gpsn": "50,0755",
            "gpse": 14.4378,
            "phone": null
        }))
        .unwrap();

        assert_eq!(point.gpid, "1234");
        assert!(point.has_identity());
        assert_eq!(point.gps_lat, Some(50.0755));
        assert_eq!(point.gps_lng, Some(14.4378));
        assert_eq!(point.phone, "");
        assert_eq!(point.street, "");
    }

    #[test]
    fn test_point_cache_form_reads_back() {
        let point: Point = serde_json::from_value(json!({"id_gp": "CZ100", "zipcode": "11000"})).unwrap();
        let cached = serde_json::to_string(&point).unwrap();
        let restored: Point = serde_json::from_str(&cached).unwrap();
        assert_eq!(restored, point);
    }

    #[test]
    fn test_region_without_id_is_rejected() {
        let result: std::result::Result<Region, _> = serde_json::from_value(json!({"name": "x"}));
        assert!(result.is_err());
    }
}
