use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Everything a command can fail with
#[derive(Error, Debug)]
pub enum TripmapError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    #[error("Extract error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Geocode error: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Baidu geocoder selected but no API key configured (set BAIDU_MAP_KEY or --api-key)")]
    MissingApiKey,

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Failed to read plan file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read text file '{path}': {source}")]
    ReadText {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse plan JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid pattern for extraction rule '{rule}': {source}")]
    Pattern {
        rule: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Failure of a single geocode lookup
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("Lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {status}: {message}")]
    Provider { status: i64, message: String },

    #[error("No location found for '{0}'")]
    NotFound(String),

    #[error("Lookup aborted: {0}")]
    Aborted(String),
}

/// Pipeline outcomes that deviate from a clean render.
///
/// Only `SurfaceUnavailable` is ever returned as an error; the others are
/// absorbed and kept as run diagnostics.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No usable attraction names found in plan")]
    ExtractionEmpty,

    #[error("Failed to geocode '{name}': {source}")]
    GeocodeFailure {
        name: String,
        #[source]
        source: GeocodeError,
    },

    #[error("Every lookup in the batch failed")]
    AllGeocodeFailed,

    #[error("Run was superseded by a newer run")]
    StaleEpoch,

    #[error("Map surface is not initialized")]
    SurfaceUnavailable,

    #[error("Batch deadline expired with {completed} of {expected} lookups complete")]
    BatchTimeout { completed: usize, expected: usize },
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to write report: {0}")]
    WriteReport(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
