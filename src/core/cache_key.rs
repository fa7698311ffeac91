use std::fmt;

/// Cache keys, namespaced per query kind so different lookups never collide.
///
/// City keys carry only the region id. Two countries asking for the same
/// region id share one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheKey<'a> {
    Regions { country: &'a str },
    Cities { region_id: i64 },
    Point { gpid: &'a str },
}

impl fmt::Display for CacheKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Regions { country } => write!(f, "region|{}", country),
            CacheKey::Cities { region_id } => write!(f, "city|{}", region_id),
            CacheKey::Point { gpid } => write!(f, "point|{}", gpid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(CacheKey::Regions { country: "cz" }.to_string(), "region|cz");
        assert_eq!(CacheKey::Cities { region_id: 5 }.to_string(), "city|5");
        assert_eq!(CacheKey::Point { gpid: "CZ123" }.to_string(), "point|CZ123");
    }
}
