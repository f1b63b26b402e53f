use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::providers::http_client::{normalize_timeout_ms, DEFAULT_TIMEOUT_MS};
use crate::providers::provider::DEFAULT_USER_AGENT;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub cache: CacheConfig,
    pub bootstrap: BootstrapConfig,
    pub providers: Vec<ProviderConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(normalize_timeout_ms(self.timeout_ms))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Register the built-in table of well-known endpoints.
    pub basic: bool,
    /// Remote provider schemas, registered in order after the built-in table.
    pub schemas: Vec<SchemaSourceConfig>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            basic: true,
            schemas: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    Embedly,
    Noembed,
    Oembedio,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaSourceConfig {
    pub kind: SchemaKind,
    /// Base params for every provider built from this schema, e.g. an API key.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub endpoint: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}
