//! # Configuration System
//!
//! YAML configuration for pattern processing:
//!
//! - Field loading (component basis, request name, frequency pick)
//! - Display defaults (projection, components, complex representation)
//! - Named display views
//! - Logging
//!
//! ## Configuration Search Path
//!
//! The first existing file wins:
//! 1. Path specified via `ANTPAT_CONFIG` environment variable
//! 2. `./antpat.yaml` (current directory)
//! 3. `~/.config/antpat/config.yaml` (user config)
//! 4. `/etc/antpat/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! field:
//!   basis: polar
//!   request: FarField1
//!   frequency: 1.5e8
//!
//! display:
//!   projection: orthographic
//!   components: Ludwig3
//!   complex_repr: AbsAng
//!
//! logging:
//!   level: debug
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::display::{ComplexRepr, DisplayOptions, Projection, VectorComponents};
use crate::field::BasisType;
use crate::observe::LogConfig;

/// Failure to locate, read, parse or validate a configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file or named entry not found
    NotFound(String),
    /// Failed to read or write a configuration file
    ReadError(String),
    /// YAML syntax or schema error
    ParseError(String),
    /// A value outside its allowed range
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(msg) => write!(f, "configuration not found: {}", msg),
            ConfigError::ReadError(msg) => write!(f, "cannot access configuration: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "malformed configuration: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// How fields are loaded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Basis of component arrays given explicitly
    pub basis: BasisType,
    /// Far-field request to load; required when a file holds several
    pub request: Option<String>,
    /// Frequency in Hz; the nearest stored one is used, the first if unset
    pub frequency: Option<f64>,
}

/// Complete antpat configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntpatConfig {
    /// Configuration version
    pub version: String,
    pub field: FieldConfig,
    pub display: DisplayOptions,
    pub logging: LogConfig,
    /// Named display presets (name -> options)
    pub views: HashMap<String, DisplayOptions>,
}

impl Default for AntpatConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            field: FieldConfig::default(),
            display: DisplayOptions::default(),
            logging: LogConfig::default(),
            views: HashMap::new(),
        }
    }
}

impl AntpatConfig {
    /// Load from the first file on the search path.
    ///
    /// Returns the default configuration if no file is found.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var("ANTPAT_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::load_from(&path);
            }
            tracing::debug!(path = %path.display(), "ANTPAT_CONFIG points to a missing file");
        }

        match Self::config_search_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Read and parse one file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "Loading configuration");
        Self::parse(&content)
    }

    /// Parse a YAML document; missing keys take their defaults.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Write this configuration as YAML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
    }

    /// Copy of this configuration with a named view as display options.
    pub fn with_view(&self, name: &str) -> Result<Self, ConfigError> {
        let view = self
            .views
            .get(name)
            .ok_or_else(|| ConfigError::NotFound(format!("view '{}' not found", name)))?;
        let mut config = self.clone();
        config.display = *view;
        Ok(config)
    }

    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./antpat.yaml")];
        if let Some(dirs) = directories::ProjectDirs::from("", "", "antpat") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }
        paths.push(PathBuf::from("/etc/antpat/config.yaml"));
        paths
    }

    /// Check values serde cannot check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(f) = self.field.frequency {
            if !(f.is_finite() && f > 0.0) {
                return Err(ConfigError::ValidationError(
                    "field.frequency must be positive".to_string(),
                ));
            }
        }
        if let Some(name) = &self.field.request {
            if name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "field.request must not be empty".to_string(),
                ));
            }
        }
        if let Some(filter) = &self.logging.filter {
            tracing_subscriber::EnvFilter::try_new(filter)
                .map_err(|e| ConfigError::ValidationError(format!("logging.filter: {}", e)))?;
        }
        Ok(())
    }

    /// Annotated starting point for a new config file.
    pub fn example_yaml() -> String {
        let mut views = HashMap::new();
        views.insert(
            "sky".to_string(),
            DisplayOptions {
                projection: Projection::AzimuthalEquidistant,
                components: VectorComponents::Circular,
                complex_repr: ComplexRepr::AbsAng,
                hemisphere_only: true,
            },
        );
        views.insert(
            "map".to_string(),
            DisplayOptions {
                projection: Projection::Equirectangular,
                complex_repr: ComplexRepr::ReIm,
                ..Default::default()
            },
        );
        let config = Self {
            field: FieldConfig {
                request: Some("FarField1".to_string()),
                ..Default::default()
            },
            display: DisplayOptions {
                components: VectorComponents::Ludwig3,
                ..Default::default()
            },
            views,
            ..Default::default()
        };
        serde_yaml::to_string(&config).unwrap_or_default()
    }
}
