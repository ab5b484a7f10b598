//! Settings from `glance.toml`, the environment and the command line
//!
//! Later layers win: file < `GLANCE_ENDPOINT` < flags. Choosing a source in a
//! later layer discards the source chosen by an earlier one.

use crate::error::{GlanceError, Result};
use crate::source::{DirectorySource, HttpSource, LineScoreSource};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "glance.toml";
pub const ENDPOINT_ENV: &str = "GLANCE_ENDPOINT";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_REPORT_DIR: &str = "glance-reports";

/// `glance.toml` as written on disk. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub payload_dir: Option<PathBuf>,
    pub port: Option<u16>,
    pub open_browser: Option<bool>,
    pub report_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlanceConfig {
    pub endpoint: Option<String>,
    pub payload_dir: Option<PathBuf>,
    pub port: u16,
    pub open_browser: bool,
    pub report_dir: PathBuf,
}

impl Default for GlanceConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            payload_dir: None,
            port: DEFAULT_PORT,
            open_browser: true,
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
        }
    }
}

impl GlanceConfig {
    pub fn resolve(file: FileConfig, env_endpoint: Option<String>) -> Self {
        let defaults = Self::default();
        let config = Self {
            endpoint: file.endpoint,
            payload_dir: file.payload_dir,
            port: file.port.unwrap_or(defaults.port),
            open_browser: file.open_browser.unwrap_or(defaults.open_browser),
            report_dir: file.report_dir.unwrap_or(defaults.report_dir),
        };
        match env_endpoint {
            Some(endpoint) => config.with_endpoint(endpoint),
            None => config,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self.payload_dir = None;
        self
    }

    pub fn with_payload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.payload_dir = Some(dir.into());
        self.endpoint = None;
        self
    }

    /// Build the configured source.
    pub fn source(&self) -> Result<Box<dyn LineScoreSource>> {
        match (&self.endpoint, &self.payload_dir) {
            (Some(_), Some(_)) => Err(GlanceError::ConflictingSources),
            (Some(endpoint), None) => Ok(Box::new(HttpSource::new(endpoint.clone()))),
            (None, Some(dir)) => Ok(Box::new(DirectorySource::new(dir.clone()))),
            (None, None) => Err(GlanceError::NoSource),
        }
    }
}

/// Load config from `explicit`, or from `./glance.toml` if present.
pub fn load_config(explicit: Option<&Path>) -> Result<GlanceConfig> {
    let env_endpoint = std::env::var(ENDPOINT_ENV).ok().filter(|v| !v.is_empty());
    load_config_with_env(explicit, Path::new(DEFAULT_CONFIG_FILE), env_endpoint)
}

pub(crate) fn load_config_with_env(
    explicit: Option<&Path>,
    default_path: &Path,
    env_endpoint: Option<String>,
) -> Result<GlanceConfig> {
    let file = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(GlanceError::ConfigNotFound(path.display().to_string()));
            }
            read_file_config(path)?
        }
        None if default_path.exists() => read_file_config(default_path)?,
        None => FileConfig::default(),
    };
    Ok(GlanceConfig::resolve(file, env_endpoint))
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| GlanceError::ConfigParse(format!("{}: {}", path.display(), e)))
}
