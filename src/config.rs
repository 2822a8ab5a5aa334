//! Server configuration, read from an optional TOML file.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NoteboxError, Result};

/// Environment variable naming a config file when `--config` is not given
pub const CONFIG_ENV_VAR: &str = "NOTEBOX_CONFIG";

/// Configuration for the web server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Address the HTTP server binds to
    pub listen: String,
    /// SQLite database file
    pub database: PathBuf,
    /// Name of the session cookie
    pub session_cookie: String,
    /// Lifetime of a login session
    pub session_ttl_days: i64,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8000".to_string(),
            database: PathBuf::from("notebox.db"),
            session_cookie: "notebox_session".to_string(),
            session_ttl_days: 14,
            log_filter: "notebox=info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// Reads `path` if given, else the file named by `NOTEBOX_CONFIG`, else
    /// falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let resolved = match path {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
        };

        let config = match resolved {
            Some(path) => {
                let content = fs::read_to_string(&path).map_err(|e| {
                    NoteboxError::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::from_toml(&content)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if self.session_cookie.is_empty()
            || !self
                .session_cookie
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(NoteboxError::Config(format!(
                "invalid session_cookie name: {:?}",
                self.session_cookie
            )));
        }
        if self.session_ttl_days <= 0 {
            return Err(NoteboxError::Config(
                "session_ttl_days must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The parsed listen address
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| NoteboxError::Config(format!("invalid listen address {:?}: {}", self.listen, e)))
    }
}
