//! TOML-based configuration for the server.
//!
//! Reads [`ServerConfig`] from an explicit path or from the platform config
//! file:
//! - Windows:  `%APPDATA%\pwgen\server.toml`
//! - Linux:    `~/.config/pwgen/server.toml`
//! - macOS:    `~/Library/Application Support/pwgen/server.toml`
//!
//! ```toml
//! [server]
//! bind_address = "127.0.0.1"
//! port = 8080
//! backlog = 5
//! concurrent = false
//! log_level = "info"
//!
//! [passwords]
//! min_length = 6
//! max_length = 32
//! ```
//!
//! Every field has a serde default, so a missing file, a missing section, or a
//! partial section all load.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use pwgen_core::domain::validation::BoundsError;
use pwgen_core::protocol::messages::{
    DEFAULT_ADDRESS, DEFAULT_BACKLOG, DEFAULT_PORT, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
use pwgen_core::LengthBounds;
use serde::Deserialize;
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// `bind_address` is not an IP address.
    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),

    /// The listen backlog must be at least 1.
    #[error("listen backlog must be greater than zero")]
    ZeroBacklog,

    /// The password length bounds are unusable.
    #[error("invalid password length bounds: {0}")]
    InvalidBounds(#[from] BoundsError),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ListenerConfig,
    #[serde(default)]
    pub passwords: PasswordPolicyConfig,
}

/// Where and how the server listens.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ListenerConfig {
    /// IP address to bind.  `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Pending-connection queue length passed to `listen`.
    #[serde(default = "default_backlog")]
    pub backlog: u32,
    /// Serve each connection on its own task instead of one at a time.
    #[serde(default)]
    pub concurrent: bool,
    /// `tracing` level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Accepted password lengths, inclusive.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PasswordPolicyConfig {
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_bind_address() -> String {
    DEFAULT_ADDRESS.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_backlog() -> u32 {
    DEFAULT_BACKLOG
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_min_length() -> usize {
    MIN_PASSWORD_LENGTH
}
fn default_max_length() -> usize {
    MAX_PASSWORD_LENGTH
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            backlog: default_backlog(),
            concurrent: false,
            log_level: default_log_level(),
        }
    }
}

impl Default for PasswordPolicyConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_length: default_max_length(),
        }
    }
}

impl ServerConfig {
    /// Checks every field that can be wrong after parsing.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: unparsable bind address, zero
    /// backlog, or invalid length bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;
        if self.server.backlog == 0 {
            return Err(ConfigError::ZeroBacklog);
        }
        self.length_bounds()?;
        Ok(())
    }

    /// The address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddress`] if `bind_address` is not an IP.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .server
            .bind_address
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.server.bind_address.clone()))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// The configured password length bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBounds`] when `min_length`/`max_length`
    /// do not form valid bounds.
    pub fn length_bounds(&self) -> Result<LengthBounds, ConfigError> {
        Ok(LengthBounds::new(
            self.passwords.min_length,
            self.passwords.max_length,
        )?)
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("server.toml"))
}

/// Loads the config from the platform config file, or defaults if it is absent.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<ServerConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `ServerConfig` from `path`, returning `ServerConfig::default()` if
/// the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<ServerConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ServerConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Resolves the platform config base directory joined with `pwgen`.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("pwgen"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("pwgen"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("pwgen"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
