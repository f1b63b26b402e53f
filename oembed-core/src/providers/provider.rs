use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

use crate::config::schema::HttpConfig;
use crate::error::{Error, Result};
use crate::providers::http_client::{decode_body, Fetcher, DEFAULT_TIMEOUT_MS};
use crate::providers::types::{EmbedResult, Params};

pub const DEFAULT_USER_AGENT: &str = "oembed-rs";

// Unreserved characters stay literal; spaces become '+' as in form encoding.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode_component(value: &str) -> String {
    value
        .split(' ')
        .map(|part| utf8_percent_encode(part, QUERY_COMPONENT).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// A single oEmbed endpoint. Configuration is fixed once the provider is shared.
#[derive(Clone)]
pub struct Provider {
    endpoint: String,
    timeout: Duration,
    user_agent: String,
    base_params: BTreeMap<String, String>,
    fetcher: Arc<dyn Fetcher>,
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("base_params", &self.base_params)
            .finish_non_exhaustive()
    }
}

impl Provider {
    pub fn new(endpoint: impl Into<String>, fetcher: Arc<dyn Fetcher>) -> Self {
        let mut base_params = BTreeMap::new();
        base_params.insert("format".to_owned(), "json".to_owned());

        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            base_params,
            fetcher,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.base_params.insert(key.into(), value.into());
        self
    }

    pub fn with_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.base_params
            .extend(params.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn base_params(&self) -> &BTreeMap<String, String> {
        &self.base_params
    }

    /// Builds the query string: base params, then `extra_params`, then `url`, sorted by key.
    pub fn encode_params(&self, url: &str, extra_params: &Params) -> String {
        let mut params = self.base_params.clone();
        params.extend(
            extra_params
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        params.insert("url".to_owned(), url.to_owned());

        params
            .iter()
            .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn build_request_url(&self, encoded_params: &str) -> String {
        if self.endpoint.contains('?') {
            format!(
                "{}&{encoded_params}",
                self.endpoint.trim_end_matches('&')
            )
        } else {
            format!("{}?{encoded_params}", self.endpoint)
        }
    }

    /// Returns the decoded body, or `None` for any transport or status failure.
    pub async fn fetch(&self, request_url: &str) -> Option<String> {
        let headers = [("User-Agent".to_owned(), self.user_agent.clone())];
        let outcome = self
            .fetcher
            .fetch(request_url, &headers, self.timeout)
            .await
            .and_then(|response| decode_body(&response));

        match outcome {
            Ok(body) => Some(body),
            Err(failure) => {
                tracing::warn!(url = request_url, error = %failure, "oembed endpoint fetch failed");
                None
            }
        }
    }

    pub async fn request(&self, url: &str, extra_params: &Params) -> Result<EmbedResult> {
        let encoded_params = self.encode_params(url, extra_params);
        let request_url = self.build_request_url(&encoded_params);
        tracing::debug!(url, request_url = %request_url, "requesting oembed data");

        match self.fetch(&request_url).await {
            Some(body) => self.handle_response(&body, url),
            None => Err(Error::Provider(request_url)),
        }
    }

    pub fn handle_response(&self, raw_body: &str, original_url: &str) -> Result<EmbedResult> {
        let value: Value = serde_json::from_str(raw_body)
            .map_err(|err| Error::InvalidResponse(err.to_string()))?;

        match value {
            Value::Object(fields) => Ok(EmbedResult::normalize(fields, original_url)),
            other => Err(Error::InvalidResponse(format!(
                "expected a JSON object from '{}', got {}",
                self.endpoint,
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Shared construction settings for every provider a bootstrap source creates.
#[derive(Clone)]
pub struct ProviderSettings {
    pub timeout: Duration,
    pub user_agent: String,
    pub fetcher: Arc<dyn Fetcher>,
}

impl ProviderSettings {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            fetcher,
        }
    }

    pub fn from_http_config(http: &HttpConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            timeout: http.timeout(),
            user_agent: http.user_agent.clone(),
            fetcher,
        }
    }

    pub fn build(&self, endpoint: impl Into<String>) -> Provider {
        Provider::new(endpoint, self.fetcher.clone())
            .with_timeout(self.timeout)
            .with_user_agent(self.user_agent.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::{json, Value};

    use super::Provider;
    use crate::error::Error;
    use crate::providers::testing::ScriptedFetcher;
    use crate::providers::types::Params;

    fn provider(endpoint: &str, fetcher: Arc<ScriptedFetcher>) -> Provider {
        Provider::new(endpoint, fetcher)
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[test]
    fn encodes_sorted_params_with_url() {
        let provider = provider("http://e/oembed", Arc::new(ScriptedFetcher::json("{}")));

        let encoded = provider.encode_params(
            "http://www.youtube.com/watch?v=1 2",
            &params(&[("maxwidth", "300"), ("a", "b&c")]),
        );

        assert_eq!(
            encoded,
            "a=b%26c&format=json&maxwidth=300&url=http%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3D1+2"
        );
    }

    #[test]
    fn encoding_is_independent_of_param_order() {
        let provider = provider("http://e/oembed", Arc::new(ScriptedFetcher::json("{}")));
        let mut forward = Params::new();
        let mut backward = Params::new();
        let keys = ["zeta", "alpha", "mid", "beta", "omega", "kappa"];
        for key in keys {
            forward.insert(key.to_owned(), key.to_uppercase());
        }
        for key in keys.iter().rev() {
            backward.insert((*key).to_owned(), key.to_uppercase());
        }

        assert_eq!(
            provider.encode_params("http://x", &forward),
            provider.encode_params("http://x", &backward)
        );
    }

    #[test]
    fn extra_params_override_base_params() {
        let provider = provider("http://e/oembed", Arc::new(ScriptedFetcher::json("{}")))
            .with_param("maxwidth", "100")
            .with_param("key", "secret");

        let encoded = provider.encode_params(
            "http://x",
            &params(&[("maxwidth", "640"), ("url", "ignored")]),
        );

        assert_eq!(
            encoded,
            "format=json&key=secret&maxwidth=640&url=http%3A%2F%2Fx"
        );
    }

    #[test]
    fn builds_request_url_for_plain_and_query_endpoints() {
        let fetcher = Arc::new(ScriptedFetcher::json("{}"));

        let plain = provider("http://www.youtube.com/oembed", fetcher.clone());
        assert_eq!(
            plain.build_request_url("format=json"),
            "http://www.youtube.com/oembed?format=json"
        );

        let scheme = provider("http://www.youtube.com/oembed?scheme=https&", fetcher.clone());
        assert_eq!(
            scheme.build_request_url("format=json"),
            "http://www.youtube.com/oembed?scheme=https&format=json"
        );

        let query = provider("http://e/oembed?a=1", fetcher);
        assert_eq!(
            query.build_request_url("format=json"),
            "http://e/oembed?a=1&format=json"
        );
    }

    #[tokio::test]
    async fn request_sends_user_agent_and_timeout() {
        let fetcher = Arc::new(ScriptedFetcher::json(r#"{"type": "photo"}"#));
        let provider = provider("http://e/oembed", fetcher.clone())
            .with_user_agent("test-agent/1.0")
            .with_timeout(Duration::from_millis(1_500));

        let result = provider
            .request("http://x/1", &Params::new())
            .await
            .expect("request should succeed");

        assert_eq!(result.embed_type(), Some("photo"));
        let requests = fetcher.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "http://e/oembed?format=json&url=http%3A%2F%2Fx%2F1"
        );
        assert_eq!(
            requests[0].headers,
            vec![("User-Agent".to_owned(), "test-agent/1.0".to_owned())]
        );
        assert_eq!(requests[0].timeout, Duration::from_millis(1_500));
    }

    #[tokio::test]
    async fn non_success_status_reports_request_url() {
        let fetcher = Arc::new(ScriptedFetcher::status(404, "not found"));
        let provider = provider("http://e/oembed", fetcher);

        let error = provider
            .request("http://x", &Params::new())
            .await
            .expect_err("404 should fail");

        match error {
            Error::Provider(url) => {
                assert_eq!(url, "http://e/oembed?format=json&url=http%3A%2F%2Fx");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_becomes_provider_error() {
        let fetcher = Arc::new(ScriptedFetcher::failing("connection refused"));
        let provider = provider("http://e/oembed", fetcher);

        assert!(provider.fetch("http://e/oembed?url=x").await.is_none());
        let error = provider
            .request("http://x", &Params::new())
            .await
            .expect_err("transport failure should fail");
        assert!(matches!(error, Error::Provider(_)));
        assert!(error.to_string().contains("http://e/oembed?format=json"));
    }

    #[test]
    fn malformed_json_is_invalid_response() {
        let provider = provider("http://e/oembed", Arc::new(ScriptedFetcher::json("{}")));

        let error = provider
            .handle_response("not json", "http://x")
            .expect_err("should fail");
        assert!(matches!(error, Error::InvalidResponse(_)));
    }

    #[test]
    fn non_object_json_is_invalid_response() {
        let provider = provider("http://e/oembed", Arc::new(ScriptedFetcher::json("{}")));

        let error = provider
            .handle_response("[1, 2]", "http://x")
            .expect_err("should fail");
        assert!(error.to_string().contains("an array"));
    }

    #[test]
    fn handle_response_normalizes_defaults() {
        let provider = provider("http://e/oembed", Arc::new(ScriptedFetcher::json("{}")));

        let result = provider
            .handle_response(r#"{"type": "video"}"#, "http://x")
            .expect("should parse");

        assert_eq!(
            Value::from(result),
            json!({"type": "video", "url": "http://x", "title": "http://x"})
        );
    }
}
