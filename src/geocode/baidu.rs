use super::{Geocoder, Position};
use crate::error::{ConfigError, GeocodeError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Baidu Maps geocoding v3 over HTTPS
pub struct BaiduGeocoder {
    http: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Deserialize)]
struct BaiduResponse {
    status: i64,

    #[serde(default)]
    result: Option<BaiduResult>,

    #[serde(default, alias = "message")]
    msg: Option<String>,
}

#[derive(Deserialize)]
struct BaiduResult {
    location: BaiduLocation,
}

#[derive(Deserialize)]
struct BaiduLocation {
    lng: f64,
    lat: f64,
}

impl BaiduGeocoder {
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl Geocoder for BaiduGeocoder {
    fn name(&self) -> &'static str {
        "baidu"
    }

    async fn geocode(&self, query: &str, scope_hint: &str) -> Result<Position, GeocodeError> {
        let mut params = vec![
            ("address", query),
            ("output", "json"),
            ("ak", self.api_key.as_str()),
        ];
        if !scope_hint.is_empty() {
            params.push(("city", scope_hint));
        }

        let response = self
            .http
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;

        let body: BaiduResponse = response.json().await?;
        debug!("Baidu status {} for {}", body.status, query);
        parse_response(query, body)
    }
}

fn parse_response(query: &str, body: BaiduResponse) -> Result<Position, GeocodeError> {
    if body.status != 0 {
        return Err(GeocodeError::Provider {
            status: body.status,
            message: body.msg.unwrap_or_default(),
        });
    }

    match body.result {
        Some(result) => Ok(Position::new(result.location.lat, result.location.lng)),
        None => Err(GeocodeError::NotFound(query.to_string())),
    }
}
