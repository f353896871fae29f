mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::path::Path;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            geocoder: GeocoderConfig::default(),
            pipeline: PipelineConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config if the file exists, otherwise fall back to defaults.
    /// An explicitly requested file must exist.
    pub fn load_or_default(path: &Path, explicit: bool) -> Result<Self, ConfigError> {
        if explicit || path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pipeline = &self.pipeline;

        if pipeline.max_candidates == 0 {
            return Err(ConfigError::Invalid(
                "pipeline.max_candidates must be at least 1".to_string(),
            ));
        }
        if pipeline.lookup_timeout_ms == 0 || pipeline.batch_deadline_ms == 0 {
            return Err(ConfigError::Invalid(
                "pipeline timeouts must be greater than zero".to_string(),
            ));
        }
        if pipeline.min_name_chars > pipeline.max_name_chars {
            return Err(ConfigError::Invalid(format!(
                "pipeline.min_name_chars ({}) exceeds pipeline.max_name_chars ({})",
                pipeline.min_name_chars, pipeline.max_name_chars
            )));
        }

        if self.geocoder.provider == GeocoderProvider::Baidu
            && self
                .geocoder
                .baidu
                .api_key
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .is_empty()
        {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(())
    }
}
