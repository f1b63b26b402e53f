use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::providers::types::{EmbedResult, Params};

/// Key/value store consulted by the registry before resolving a URL.
///
/// Retention is entirely up to the implementation. Failures are treated as a
/// miss on `get` and ignored on `set`, so a broken cache never fails a request.
pub trait EmbedCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<EmbedResult>>;
    fn set(&self, key: &str, value: EmbedResult) -> Result<()>;
}

/// SHA-256 over the canonical JSON form `[url, {sorted params}]`.
pub fn cache_key(url: &str, params: &Params) -> String {
    let sorted: BTreeMap<&str, &str> = params
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    let canonical = serde_json::json!([url, sorted]).to_string();

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, EmbedResult>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        // insert and clear never leave the map half-written
        match self.entries.read() {
            Ok(entries) => entries.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) -> Result<()> {
        self.entries
            .write()
            .map_err(|_| Error::Cache("memory cache lock poisoned".to_owned()))?
            .clear();
        Ok(())
    }
}

impl EmbedCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<EmbedResult>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| Error::Cache("memory cache lock poisoned".to_owned()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: EmbedResult) -> Result<()> {
        self.entries
            .write()
            .map_err(|_| Error::Cache("memory cache lock poisoned".to_owned()))?
            .insert(key.to_owned(), value);
        Ok(())
    }
}
