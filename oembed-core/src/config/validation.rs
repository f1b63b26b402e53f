use std::collections::HashSet;

use crate::config::schema::Config;
use crate::error::{Error, Result};
use crate::providers::pattern::Pattern;

pub fn validate_config(config: &Config) -> Result<()> {
    if config.http.user_agent.trim().is_empty() {
        return Err(Error::Validation(
            "http.user_agent cannot be empty".to_owned(),
        ));
    }

    let mut schema_kinds = HashSet::new();
    for source in &config.bootstrap.schemas {
        if !schema_kinds.insert(source.kind) {
            return Err(Error::Validation(format!(
                "duplicate bootstrap schema '{:?}'",
                source.kind
            )));
        }
    }

    for provider in &config.providers {
        let endpoint = provider.endpoint.trim();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(Error::Validation(format!(
                "provider endpoint '{endpoint}' must be an http(s) URL"
            )));
        }

        if provider.patterns.is_empty() {
            return Err(Error::Validation(format!(
                "provider '{endpoint}' must declare at least one pattern"
            )));
        }

        for pattern in &provider.patterns {
            Pattern::new(pattern.as_str()).map_err(|err| {
                Error::Validation(format!("provider '{endpoint}': {err}"))
            })?;
        }
    }

    Ok(())
}
