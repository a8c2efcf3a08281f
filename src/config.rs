use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use validator::{Validate, ValidationErrors};
use crate::models::{HeatmapParams, MatchingWeights};

/// Errors that can occur while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    #[validate(nested)]
    pub matching: MatchingSettings,
    #[serde(default)]
    #[validate(nested)]
    pub heatmap: HeatmapSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MatchingSettings {
    #[serde(default)]
    #[validate(nested)]
    pub weights: WeightsConfig,
}

/// Weights of the overall match score; need not sum to 1
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WeightsConfig {
    #[serde(default = "default_urgency_weight")]
    #[validate(range(min = 0.0))]
    pub urgency: f64,
    #[serde(default = "default_distance_weight")]
    #[validate(range(min = 0.0))]
    pub distance: f64,
    #[serde(default = "default_reachability_weight")]
    #[validate(range(min = 0.0))]
    pub reachability: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            urgency: default_urgency_weight(),
            distance: default_distance_weight(),
            reachability: default_reachability_weight(),
        }
    }
}

impl From<&WeightsConfig> for MatchingWeights {
    fn from(value: &WeightsConfig) -> Self {
        Self {
            urgency: value.urgency,
            distance: value.distance,
            reachability: value.reachability,
        }
    }
}

fn default_urgency_weight() -> f64 { 0.5 }
fn default_distance_weight() -> f64 { 0.3 }
fn default_reachability_weight() -> f64 { 0.2 }

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HeatmapSettings {
    #[serde(default = "default_radius_km")]
    #[validate(range(exclusive_min = 0.0))]
    pub radius_km: f64,
    #[serde(default = "default_resolution_km")]
    #[validate(range(exclusive_min = 0.0))]
    pub resolution_km: f64,
    #[serde(default = "default_min_grid_steps")]
    #[validate(range(min = 1))]
    pub min_grid_steps: usize,
    #[serde(default = "default_opacity")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub opacity: f64,
}

impl Default for HeatmapSettings {
    fn default() -> Self {
        Self {
            radius_km: default_radius_km(),
            resolution_km: default_resolution_km(),
            min_grid_steps: default_min_grid_steps(),
            opacity: default_opacity(),
        }
    }
}

impl From<&HeatmapSettings> for HeatmapParams {
    fn from(value: &HeatmapSettings) -> Self {
        Self {
            radius_km: value.radius_km,
            resolution_km: value.resolution_km,
            min_grid_steps: value.min_grid_steps,
            opacity: value.opacity,
        }
    }
}

fn default_radius_km() -> f64 { 50.0 }
fn default_resolution_km() -> f64 { 1.0 }
fn default_min_grid_steps() -> usize { 2 }
fn default_opacity() -> f64 { 0.6 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with AIDMATCH_)
    pub fn load() -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., AIDMATCH__HEATMAP__RADIUS_KM -> heatmap.radius_km
            .add_source(env_source())
            .build()?;

        Self::finish(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        Self::finish(settings)
    }

    fn finish(settings: Config) -> Result<Self, SettingsError> {
        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn matching_weights(&self) -> MatchingWeights {
        MatchingWeights::from(&self.matching.weights)
    }

    pub fn heatmap_params(&self) -> HeatmapParams {
        HeatmapParams::from(&self.heatmap)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("AIDMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
