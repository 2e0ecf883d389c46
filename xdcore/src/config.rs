//! Process-wide configuration of the decorators.
use std::path::{Path, PathBuf};

use log::debug;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use xdobject::utils::error::{XdError, XdResult};

use crate::magic::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, ENV_CONFIG_PATH};

/// What to do when an advisor is registered while no class statement is being evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutsideScopePolicy {
    /// Fail with [`XdError::NoClassScope`].
    #[default]
    Error,
    /// Log a warning and drop the advisor.
    Ignore,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XdConfig {
    pub outside_scope: OutsideScopePolicy,

    /// Emit a trace record for every method-level dispatch.
    pub trace_dispatch: bool,
}

static ACTIVE: Lazy<RwLock<XdConfig>> = Lazy::new(|| RwLock::new(XdConfig::default()));

impl XdConfig {
    /// Get the default path to the configuration file.
    pub fn default_path() -> PathBuf {
        // Check if the environment variable is set
        if let Ok(config_path) = std::env::var(ENV_CONFIG_PATH) {
            return config_path.into();
        }

        let mut path = PathBuf::new();

        #[cfg(target_os = "windows")]
        {
            if let Ok(appdata) = std::env::var("APPDATA") {
                path.push(appdata);
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
                path.push(xdg_config_home);
            } else if let Ok(home) = std::env::var("HOME") {
                path.push(home);
                path.push(".config");
            } else {
                // Fallback to current directory if HOME is not set
            }
        }

        path.push(CONFIG_DIR_NAME);
        path.push(CONFIG_FILE_NAME);
        path
    }

    /// Load a configuration from a TOML file.
    pub fn load_from_toml(path: &Path) -> XdResult<Self> {
        let toml_str = std::fs::read_to_string(path)?;

        toml::from_str(&toml_str).map_err(|e| XdError::ConfigParse {
            file: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save the configuration to a TOML file.
    pub fn save_to_toml(&self, path: &Path) -> XdResult<()> {
        let toml_str = toml::to_string(self).map_err(|e| {
            XdError::Unknown(format!(
                "Failed during serialization of TOML to path `{}`: {}",
                path.display(),
                e
            ))
        })?;

        // Attempt to create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, toml_str)?;
        Ok(())
    }
}

/// The active configuration.
pub fn current() -> XdConfig {
    *ACTIVE.read()
}

/// Replace the active configuration, returning the previous one.
pub fn install(config: XdConfig) -> XdConfig {
    debug!("Installing configuration {:?}", config);
    std::mem::replace(&mut *ACTIVE.write(), config)
}

/// Load and install the file at [`XdConfig::default_path`] if it exists. The active
/// configuration is left untouched otherwise.
pub fn init_from_default_path() -> XdResult<XdConfig> {
    let path = XdConfig::default_path();
    if !path.exists() {
        debug!(
            "No configuration file at '{}', keeping {:?}",
            path.display(),
            current()
        );
        return Ok(current());
    }

    let config = XdConfig::load_from_toml(&path)?;
    install(config);
    Ok(config)
}
