use std::path::Path;

use crate::config::schema::Config;
use crate::error::{Error, Result};

pub const ENV_TIMEOUT_MS: &str = "OEMBED_TIMEOUT_MS";
pub const ENV_USER_AGENT: &str = "OEMBED_USER_AGENT";
pub const ENV_CACHE: &str = "OEMBED_CACHE";

pub fn load_from_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        Error::Config(format!("failed to read config '{}': {err}", path.display()))
    })?;

    parse(&content).map_err(|err| {
        Error::Config(format!(
            "failed to parse config '{}': {err}",
            path.display()
        ))
    })
}

pub fn parse(content: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(content)
}

pub fn load_from_env(config: Config) -> Result<Config> {
    apply_overrides(config, |name| std::env::var(name).ok())
}

/// Loads `path` when given (defaults otherwise), then applies environment overrides.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => load_from_file(path)?,
        None => Config::default(),
    };
    load_from_env(config)
}

fn apply_overrides(
    mut config: Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Config> {
    if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
        config.http.timeout_ms = raw.trim().parse().map_err(|err| {
            Error::Config(format!("{ENV_TIMEOUT_MS} must be an integer, got '{raw}': {err}"))
        })?;
    }

    if let Some(user_agent) = lookup(ENV_USER_AGENT) {
        config.http.user_agent = user_agent;
    }

    if let Some(raw) = lookup(ENV_CACHE) {
        config.cache.enabled = match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => {
                return Err(Error::Config(format!(
                    "{ENV_CACHE} must be a boolean, got '{other}'"
                )))
            }
        };
    }

    Ok(config)
}
