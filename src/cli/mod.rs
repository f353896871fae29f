pub mod follow;
pub mod locate;
pub mod run;
pub mod schema;

use crate::config::Config;
use crate::error::ConfigError;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_CONFIG: &str = "tripmap.yaml";

#[derive(Parser)]
#[command(name = "tripmap")]
#[command(
    author,
    version,
    about = "Geolocate the attractions of a generated travel itinerary and draw them as a route"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract, geolocate and draw the route of an itinerary plan
    Route(RouteArgs),

    /// Show a single destination on the map
    Locate(LocateArgs),

    /// Follow destination edits on stdin and show each settled one
    Follow(FollowArgs),

    /// Print JSON Schema for config validation
    Schema,
}

/// Options shared by every command that talks to a geocoder
#[derive(Args, Clone)]
pub struct ConfigArgs {
    /// Path to config file (defaults apply when tripmap.yaml is absent)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Baidu Maps API key (overrides the config file)
    #[arg(long, env = "BAIDU_MAP_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

impl ConfigArgs {
    /// Load, apply overrides and validate
    pub fn load(&self) -> Result<Config, ConfigError> {
        let (path, explicit) = match &self.config {
            Some(path) => (path.as_path(), true),
            None => (Path::new(DEFAULT_CONFIG), false),
        };
        info!("Loading config from {:?}", path);
        let mut config = Config::load_or_default(path, explicit)?;

        if let Some(key) = &self.api_key {
            config.geocoder.baidu.api_key = Some(key.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Parser, Clone)]
pub struct RouteArgs {
    /// Itinerary plan JSON file
    #[arg(short, long)]
    pub plan: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Override the plan's destination
    #[arg(long)]
    pub destination: Option<String>,

    /// File whose contents replace the plan's free-form text
    #[arg(long, value_name = "FILE")]
    pub text: Option<PathBuf>,

    /// Override output directory
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Show extracted candidates and queries without geocoding
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Clone)]
pub struct LocateArgs {
    /// Destination to show (e.g., 北京市)
    pub destination: String,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Override output directory
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Clone)]
pub struct FollowArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Override the quiet period in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,
}
