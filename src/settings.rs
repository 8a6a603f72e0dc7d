//! Serve settings, resolved once at startup.
//!
//! Precedence is command line, then the TOML settings file, then built-in
//! defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::cli::ServeArgs;

pub const DEFAULT_BIND: &str = ":8080";
pub const DEFAULT_CONTEXT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("bind address must not be empty")]
    EmptyBind,
}

/// Contents of the optional settings file
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub bind: Option<String>,
    pub kubeconfig: Option<PathBuf>,
    pub title: Option<String>,
    pub context_timeout_secs: Option<u64>,
}

impl SettingsFile {
    /// Load settings from `path`
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the explicit file, or the default one when it exists
    pub fn discover(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_settings_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// Everything `serve` needs, built once and passed down
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeSettings {
    /// Listen address in `host:port` or `:port` form
    pub bind: String,
    pub kubeconfig: Option<PathBuf>,
    pub title: String,
    pub context_timeout: Option<Duration>,
}

impl ServeSettings {
    pub fn resolve(args: &ServeArgs, file: SettingsFile) -> Result<Self, SettingsError> {
        let bind = args
            .bind
            .clone()
            .or(file.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let kubeconfig = args
            .kubeconfig
            .clone()
            .or(file.kubeconfig)
            .or_else(default_kubeconfig);

        let title = args
            .title
            .clone()
            .or(file.title)
            .unwrap_or_else(|| kubeglance_web::DEFAULT_TITLE.to_string());

        let timeout_secs = args
            .context_timeout
            .or(file.context_timeout_secs)
            .unwrap_or(DEFAULT_CONTEXT_TIMEOUT_SECS);

        let bind = bind.trim();
        if bind.is_empty() {
            return Err(SettingsError::EmptyBind);
        }

        Ok(Self {
            bind: bind.to_string(),
            kubeconfig,
            title,
            context_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        })
    }

    /// Addresses to try binding, in order
    pub fn bind_candidates(&self) -> Vec<String> {
        bind_candidates(&self.bind)
    }
}

/// A bare `:port` means every interface. The IPv6 wildcard comes first and
/// is dual-stack on most hosts; the IPv4 wildcard covers hosts without IPv6.
pub fn bind_candidates(addr: &str) -> Vec<String> {
    if addr.starts_with(':') {
        vec![format!("[::]{}", addr), format!("0.0.0.0{}", addr)]
    } else {
        vec![addr.to_string()]
    }
}

/// `~/.kube/config`, when a home directory is known
pub fn default_kubeconfig() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".kube").join("config"))
}

pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kubeglance").join("config.toml"))
}
