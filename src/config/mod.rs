//! Startup configuration: the Scopus credential resolution chain.
//!
//! The API key is resolved exactly once, before the protocol loop starts,
//! and passed into the search adapter's constructor. Resolution order:
//!
//! 1. the `SCOPUS_API_KEY` environment variable,
//! 2. `./abstract-search.toml`,
//! 3. `<user config dir>/abstract-search/config.toml`,
//! 4. `/etc/abstract-search/config.toml`.
//!
//! The first hit wins. If no source yields a key the process must not enter
//! the protocol loop.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable consulted before any configuration file.
pub const API_KEY_ENV: &str = "SCOPUS_API_KEY";

/// Process-wide configuration, read-only after startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Scopus API key handed to the search adapter
    pub scopus_api_key: String,
}

/// On-disk configuration file shape
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    scopus_api_key: Option<String>,
}

/// Errors raised during credential resolution
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no Scopus API key found in the environment or any configuration file")]
    MissingApiKey,
}

impl Config {
    /// Resolves the credential chain. An explicit `override_path` is
    /// consulted before the default file locations; the environment always
    /// wins.
    pub fn resolve(override_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            let key = key.trim();
            if !key.is_empty() {
                tracing::debug!("api key resolved from environment");
                return Ok(Self {
                    scopus_api_key: key.to_string(),
                });
            }
        }

        let mut paths = candidate_paths();
        if let Some(path) = override_path {
            paths.insert(0, path.to_path_buf());
        }

        for path in paths {
            if let Some(key) = read_key_from(&path) {
                tracing::debug!(path = %path.display(), "api key resolved from configuration file");
                return Ok(Self {
                    scopus_api_key: key,
                });
            }
        }

        Err(ConfigError::MissingApiKey)
    }
}

/// Ordered file locations consulted after the environment.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("abstract-search.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("abstract-search").join("config.toml"));
    }
    paths.push(PathBuf::from("/etc/abstract-search/config.toml"));
    paths
}

fn read_key_from(path: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    let file: ConfigFile = match toml::from_str(&contents) {
        Ok(file) => file,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "skipping unreadable configuration file");
            return None;
        }
    };

    file.scopus_api_key
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

/// Operator-facing instructions printed when no credential can be found.
pub fn missing_key_instructions() -> String {
    let paths = candidate_paths()
        .into_iter()
        .map(|path| format!("  - {}", path.display()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Set the {} environment variable, or add to one of:\n{}\n\n\
         File format:\n\n  scopus_api_key = \"<your key>\"\n",
        API_KEY_ENV, paths
    )
}
