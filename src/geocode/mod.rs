mod baidu;
mod gazetteer;
#[cfg(test)]
pub mod testing;

pub use baidu::BaiduGeocoder;
pub use gazetteer::GazetteerGeocoder;

use crate::config::{Config, GeocoderProvider};
use crate::error::{ConfigError, GeocodeError};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Latitude/longitude in the provider's coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// Resolves place names to coordinates.
///
/// Each call yields exactly one position or one failure; providers never retry.
#[async_trait]
pub trait Geocoder: Send + Sync {
    fn name(&self) -> &'static str;

    async fn geocode(&self, query: &str, scope_hint: &str) -> Result<Position, GeocodeError>;
}

/// Search scope for a destination: every administrative suffix removed
pub fn scope_for(destination: &str, suffixes: &[String]) -> String {
    let mut scope = destination.trim().to_string();
    for suffix in suffixes.iter().filter(|s| !s.is_empty()) {
        scope = scope.replace(suffix.as_str(), "");
    }
    scope
}

/// Full lookup query for an attraction within a scope
pub fn scoped_query(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}{}", scope, name)
    }
}

/// Create the geocoder selected by the config
pub fn create_geocoder(config: &Config) -> Result<Arc<dyn Geocoder>, ConfigError> {
    match config.geocoder.provider {
        GeocoderProvider::Baidu => {
            let api_key = config
                .geocoder
                .baidu
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .ok_or(ConfigError::MissingApiKey)?;
            Ok(Arc::new(BaiduGeocoder::new(
                config.geocoder.baidu.endpoint.clone(),
                api_key,
                config.pipeline.lookup_timeout(),
            )?))
        }
        GeocoderProvider::Gazetteer => Ok(Arc::new(GazetteerGeocoder::new(
            config.geocoder.gazetteer.places.clone(),
        ))),
    }
}
