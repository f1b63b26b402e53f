use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Extra request parameters supplied by the caller of `request`.
pub type Params = HashMap<String, String>;

/// Decoded oEmbed payload. Every value built through [`EmbedResult::normalize`]
/// carries both a `url` and a `title` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbedResult(Map<String, Value>);

impl EmbedResult {
    pub fn normalize(mut fields: Map<String, Value>, original_url: &str) -> Self {
        if !fields.contains_key("url") {
            fields.insert("url".to_owned(), Value::String(original_url.to_owned()));
        }
        if !fields.contains_key("title") {
            let url = fields.get("url").cloned().unwrap_or(Value::Null);
            fields.insert("title".to_owned(), url);
        }
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn url(&self) -> Option<&str> {
        self.0.get("url").and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    pub fn embed_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    pub fn html(&self) -> Option<&str> {
        self.0.get("html").and_then(Value::as_str)
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.0.get("thumbnail_url").and_then(Value::as_str)
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.0.get("provider_name").and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<EmbedResult> for Value {
    fn from(result: EmbedResult) -> Self {
        Value::Object(result.0)
    }
}
