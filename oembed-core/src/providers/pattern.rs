use regex::Regex;

use crate::error::{Error, Result};

/// A URL pattern that only matches from the first character of the candidate.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{source})")).map_err(|err| Error::InvalidPattern {
            pattern: source.clone(),
            reason: err.to_string(),
        })?;
        Ok(Self { source, regex })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }
}
