//! Configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars.
//! Build settings live under the `summarizer` table; paths may use `~` and
//! `${VAR}` and are resolved with [`expand_path`].
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::from_dir(Path::new("."), &env_name)
    }

    /// Loads `config.toml` and `config.<env>.toml` from `dir`, then `APP_*` env vars.
    pub fn from_dir(dir: &Path, env_name: &str) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{key}': {e}")))
    }

    /// The `summarizer` table, with defaults for anything unset.
    pub fn settings(&self) -> Result<SummarizerSettings> {
        if self.figment.contains("summarizer") { self.get("summarizer") } else { Ok(SummarizerSettings::default()) }
    }
}

/// Settings for building a layer stack with the built-in strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerSettings {
    /// Documents per block for the fixed-size partitioner.
    pub block_size: usize,
    /// Total layers to build, layer 0 included; unset builds until convergence.
    pub max_layers: Option<usize>,
    pub max_summary_chars: usize,
    /// External command used to summarize blocks instead of the extractive summarizer.
    pub command: Option<Vec<String>>,
    /// Directory for persisted layer indexes; unset keeps them in memory.
    pub index_dir: Option<String>,
    /// Approximate token limit for a single ingested chunk.
    pub max_tokens: usize,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self { block_size: 5, max_layers: None, max_summary_chars: 600, command: None, index_dir: None, max_tokens: 500 }
    }
}

impl SummarizerSettings {
    pub fn validate(&self) -> Result<()> {
        if self.block_size < 2 {
            return Err(Error::InvalidConfig(format!("summarizer.block_size must be at least 2, got {}", self.block_size)));
        }
        if self.max_layers == Some(0) {
            return Err(Error::InvalidConfig("summarizer.max_layers must be at least 1".into()));
        }
        if self.max_summary_chars == 0 || self.max_tokens == 0 {
            return Err(Error::InvalidConfig("summarizer.max_summary_chars and summarizer.max_tokens must be positive".into()));
        }
        if self.command.as_ref().is_some_and(Vec::is_empty) {
            return Err(Error::InvalidConfig("summarizer.command must name a program".into()));
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
