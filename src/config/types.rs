use crate::geocode::Position;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub geocoder: GeocoderConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct GeocoderConfig {
    #[serde(default)]
    pub provider: GeocoderProvider,

    #[serde(default)]
    pub baidu: BaiduConfig,

    #[serde(default)]
    pub gazetteer: GazetteerConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GeocoderProvider {
    Baidu,
    #[default]
    Gazetteer,
}

impl std::fmt::Display for GeocoderProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeocoderProvider::Baidu => write!(f, "baidu"),
            GeocoderProvider::Gazetteer => write!(f, "gazetteer"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct BaiduConfig {
    /// Usually supplied through BAIDU_MAP_KEY / --api-key instead
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_baidu_endpoint")]
    pub endpoint: String,
}

impl Default for BaiduConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_baidu_endpoint(),
        }
    }
}

/// Offline name -> coordinate table
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct GazetteerConfig {
    #[serde(default)]
    pub places: BTreeMap<String, Position>,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct PipelineConfig {
    /// Upper bound on attractions geocoded per run
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    #[serde(default = "default_min_name_chars")]
    pub min_name_chars: usize,

    #[serde(default = "default_max_name_chars")]
    pub max_name_chars: usize,

    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,

    #[serde(default = "default_batch_deadline_ms")]
    pub batch_deadline_ms: u64,

    /// Administrative suffixes removed from the destination to form the search scope
    #[serde(default = "default_scope_suffixes")]
    pub scope_suffixes: Vec<String>,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_candidates: default_max_candidates(),
            min_name_chars: default_min_name_chars(),
            max_name_chars: default_max_name_chars(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
            batch_deadline_ms: default_batch_deadline_ms(),
            scope_suffixes: default_scope_suffixes(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl PipelineConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    pub fn batch_deadline(&self) -> Duration {
        Duration::from_millis(self.batch_deadline_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}
