use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::config::schema::SchemaKind;
use crate::error::{Error, Result};
use crate::providers::http_client::decode_body;
use crate::providers::provider::ProviderSettings;
use crate::providers::registry::ProviderRegistry;

impl SchemaKind {
    /// Aggregator endpoint that answers for every pattern in the schema.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Embedly => "http://api.embed.ly/1/oembed",
            Self::Noembed => "http://noembed.com/embed",
            Self::Oembedio => "http://oembed.io/api",
        }
    }

    pub fn schema_url(self) -> &'static str {
        match self {
            Self::Embedly => "http://api.embed.ly/1/services/python",
            Self::Noembed => "http://noembed.com/providers",
            Self::Oembedio => "http://oembed.io/providers",
        }
    }

    /// Extracts URL patterns from a decoded schema document. Entries without
    /// the expected field are skipped.
    pub fn patterns_from_schema(self, schema: &Value) -> Result<Vec<String>> {
        let entries = schema.as_array().ok_or_else(|| {
            Error::InvalidResponse(format!(
                "provider schema from '{}' is not a JSON array",
                self.schema_url()
            ))
        })?;

        let mut patterns = Vec::new();
        for entry in entries {
            match self {
                Self::Embedly => patterns.extend(string_list(entry, "regex")),
                Self::Noembed => patterns.extend(string_list(entry, "patterns")),
                Self::Oembedio => {
                    let Some(scheme) = entry.get("s").and_then(Value::as_str) else {
                        tracing::debug!(?entry, "skipping oembed.io schema entry without 's'");
                        continue;
                    };
                    if scheme.starts_with("http") {
                        patterns.push(scheme.to_owned());
                    } else {
                        patterns.push(format!(r"https?://(?:www\.)?{scheme}"));
                    }
                }
            }
        }
        Ok(patterns)
    }
}

fn string_list(entry: &Value, field: &str) -> Vec<String> {
    match entry.get(field).and_then(Value::as_array) {
        Some(values) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        None => {
            tracing::debug!(field, ?entry, "skipping schema entry without pattern list");
            Vec::new()
        }
    }
}

/// Fetches the remote schema for `kind` and registers its aggregator endpoint
/// for every listed pattern. Patterns the regex engine rejects are skipped.
/// Returns the number of patterns registered.
pub async fn bootstrap_schema(
    registry: &mut ProviderRegistry,
    kind: SchemaKind,
    settings: &ProviderSettings,
    params: &BTreeMap<String, String>,
) -> Result<usize> {
    let schema_url = kind.schema_url();
    let headers = [("User-Agent".to_owned(), settings.user_agent.clone())];
    let body = settings
        .fetcher
        .fetch(schema_url, &headers, settings.timeout)
        .await
        .and_then(|response| decode_body(&response))
        .map_err(|failure| {
            tracing::warn!(url = schema_url, error = %failure, "provider schema fetch failed");
            Error::Provider(schema_url.to_owned())
        })?;

    let schema: Value =
        serde_json::from_str(&body).map_err(|err| Error::InvalidResponse(err.to_string()))?;
    let patterns = kind.patterns_from_schema(&schema)?;

    let provider = Arc::new(
        settings
            .build(kind.endpoint())
            .with_params(params.iter().map(|(key, value)| (key.clone(), value.clone()))),
    );

    let mut registered = 0;
    for pattern in patterns {
        match registry.register(pattern, provider.clone()) {
            Ok(()) => registered += 1,
            Err(err) => tracing::warn!(schema = ?kind, error = %err, "skipping schema pattern"),
        }
    }

    tracing::info!(schema = ?kind, patterns = registered, "registered schema providers");
    Ok(registered)
}
