use std::time::Duration;

use async_trait::async_trait;
use encoding_rs::Encoding;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use crate::error::{Error, Result};

pub const DEFAULT_TIMEOUT_MS: u64 = 3_000;

/// HTTP leaves the charset unspecified by default, which RFC 2616 resolves to ISO-8859-1.
pub const DEFAULT_CHARSET: &str = "iso-8859-1";

pub fn normalize_timeout_ms(timeout_ms: u64) -> u64 {
    if timeout_ms == 0 {
        DEFAULT_TIMEOUT_MS
    } else {
        timeout_ms
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub charset: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Every way a fetch can fail collapses into this one value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportFailure(pub String);

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> std::result::Result<FetchResponse, TransportFailure>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| Error::Config(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client })
    }
}

fn header_map(headers: &[(String, String)]) -> std::result::Result<HeaderMap, TransportFailure> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| TransportFailure(format!("invalid header name '{name}': {err}")))?;
        let header_value = HeaderValue::from_str(value).map_err(|err| {
            TransportFailure(format!("invalid header value for '{name}': {err}"))
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else if err.is_request() {
        "request failed"
    } else if err.is_body() || err.is_decode() {
        "malformed response"
    } else {
        "transport error"
    };
    format!("{kind}: {err}")
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> std::result::Result<FetchResponse, TransportFailure> {
        let response = self
            .client
            .get(url)
            .headers(header_map(headers)?)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| TransportFailure(describe_transport_error(&err)))?;

        let status = response.status().as_u16();
        let charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_from_content_type);
        let body = response
            .bytes()
            .await
            .map_err(|err| TransportFailure(describe_transport_error(&err)))?;

        Ok(FetchResponse {
            status,
            charset,
            body: body.to_vec(),
        })
    }
}

pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches('"').trim();
        (!value.is_empty()).then(|| value.to_ascii_lowercase())
    })
}

/// Rejects non-2xx responses and decodes the body with the declared charset.
pub fn decode_body(response: &FetchResponse) -> std::result::Result<String, TransportFailure> {
    if !response.is_success() {
        return Err(TransportFailure(format!(
            "unexpected HTTP status {}",
            response.status
        )));
    }

    let charset = response.charset.as_deref().unwrap_or(DEFAULT_CHARSET);
    decode_with_charset(&response.body, charset)
}

fn decode_with_charset(
    body: &[u8],
    charset: &str,
) -> std::result::Result<String, TransportFailure> {
    let label = charset.trim().to_ascii_lowercase();

    // encoding_rs maps these labels to windows-1252; ISO-8859-1 is a direct byte to code point mapping.
    if matches!(
        label.as_str(),
        "iso-8859-1" | "iso8859-1" | "iso_8859-1" | "latin1" | "latin-1" | "l1"
    ) {
        return Ok(body.iter().copied().map(char::from).collect());
    }

    let encoding = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| TransportFailure(format!("unsupported charset '{charset}'")))?;
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or_else(|| TransportFailure(format!("body is not valid {}", encoding.name())))
}
