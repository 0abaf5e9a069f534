//! Configuration for the stencil CLI using figment
//!
//! Sources in precedence order (later sources override earlier ones):
//! 1. Default values
//! 2. `stencil.toml` in the working directory, or the file given with `--config`
//! 3. `STENCIL_` environment variables, `__` separating nested keys
//! 4. Command line flags

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stencil::SiteData;
use thiserror::Error;
use tracing::{debug, trace};

/// Configuration file read from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "stencil.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "STENCIL_";

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Configuration file format not supported
    #[error("Unsupported configuration file format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Configuration parsing failed
    #[error("Failed to parse configuration: {source}")]
    ParseError {
        #[source]
        source: Box<figment::Error>,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::ParseError {
            source: Box::new(error),
        }
    }
}

/// Resolved CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StencilConfig {
    /// Template tree root containing `layouts/`
    pub root: PathBuf,
    /// Layout rendered when none is named; empty selects the defaults layout
    pub layout: String,
    /// Site values passed to every render as `site`
    pub site: SiteData,
}

impl Default for StencilConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            layout: String::new(),
            site: SiteData::default(),
        }
    }
}

/// Values given on the command line, which override every other source.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
}

impl StencilConfig {
    /// Load configuration from every source.
    ///
    /// `config_file` replaces the default `stencil.toml` lookup and must exist.
    pub fn load(
        config_file: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let config: StencilConfig = Self::figment(config_file, overrides)?.extract()?;
        debug!(
            "loaded configuration: root={}, layout='{}'",
            config.root.display(),
            config.layout
        );
        Ok(config)
    }

    fn figment(
        config_file: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(StencilConfig::default()));

        match config_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::FileNotFound {
                        path: path.to_path_buf(),
                    });
                }
                figment = figment.merge(load_config_file(path)?);
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        trace!("merging {} environment variables", ENV_PREFIX);
        Ok(figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Serialized::defaults(overrides)))
    }
}

/// Load a single configuration file based on its extension
fn load_config_file(path: &Path) -> Result<Figment, ConfigError> {
    trace!("loading config file: {}", path.display());
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("toml") => Ok(Figment::from(Toml::file(path))),
        Some("yaml") | Some("yml") => Ok(Figment::from(Yaml::file(path))),
        Some("json") => Ok(Figment::from(Json::file(path))),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}
