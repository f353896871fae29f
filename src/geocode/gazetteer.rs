use super::{Geocoder, Position};
use crate::error::GeocodeError;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Offline geocoder over a fixed name table
pub struct GazetteerGeocoder {
    places: BTreeMap<String, Position>,
}

impl GazetteerGeocoder {
    pub fn new(places: BTreeMap<String, Position>) -> Self {
        Self { places }
    }

    fn lookup(&self, query: &str, scope_hint: &str) -> Option<Position> {
        if let Some(position) = self.places.get(query) {
            return Some(*position);
        }
        // Tables are usually keyed by bare names, not scoped queries
        if scope_hint.is_empty() {
            return None;
        }
        query
            .strip_prefix(scope_hint)
            .filter(|bare| !bare.is_empty())
            .and_then(|bare| self.places.get(bare))
            .copied()
    }
}

#[async_trait]
impl Geocoder for GazetteerGeocoder {
    fn name(&self) -> &'static str {
        "gazetteer"
    }

    async fn geocode(&self, query: &str, scope_hint: &str) -> Result<Position, GeocodeError> {
        self.lookup(query, scope_hint)
            .ok_or_else(|| GeocodeError::NotFound(query.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gazetteer() -> GazetteerGeocoder {
        let mut places = BTreeMap::new();
        places.insert("故宫".to_string(), Position::new(39.9163, 116.3972));
        places.insert("北京".to_string(), Position::new(39.9042, 116.4074));
        GazetteerGeocoder::new(places)
    }

    #[tokio::test]
    async fn test_exact_and_scoped_lookup() {
        let g = gazetteer();
        assert_eq!(
            g.geocode("故宫", "").await.unwrap(),
            Position::new(39.9163, 116.3972)
        );
        assert_eq!(
            g.geocode("北京故宫", "北京").await.unwrap(),
            Position::new(39.9163, 116.3972)
        );
    }

    #[tokio::test]
    async fn test_unknown_place() {
        let g = gazetteer();
        assert!(matches!(
            g.geocode("北京长城", "北京").await,
            Err(GeocodeError::NotFound(q)) if q == "北京长城"
        ));
    }
}
