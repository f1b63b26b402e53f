use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::providers::http_client::{FetchResponse, Fetcher, TransportFailure};

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

/// In-process fetcher that answers from canned responses and records every call.
pub(crate) struct ScriptedFetcher {
    routes: Vec<(String, FetchResponse)>,
    fallback: std::result::Result<FetchResponse, TransportFailure>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedFetcher {
    pub fn json(body: &str) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self::with_fallback(Ok(FetchResponse {
            status,
            charset: Some("utf-8".to_owned()),
            body: body.as_bytes().to_vec(),
        }))
    }

    pub fn failing(reason: &str) -> Self {
        Self::with_fallback(Err(TransportFailure(reason.to_owned())))
    }

    fn with_fallback(fallback: std::result::Result<FetchResponse, TransportFailure>) -> Self {
        Self {
            routes: Vec::new(),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers requests whose URL starts with `prefix` with a 200 JSON body.
    pub fn route(mut self, prefix: &str, body: &str) -> Self {
        self.routes.push((
            prefix.to_owned(),
            FetchResponse {
                status: 200,
                charset: Some("utf-8".to_owned()),
                body: body.as_bytes().to_vec(),
            },
        ));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> std::result::Result<FetchResponse, TransportFailure> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(RecordedRequest {
                url: url.to_owned(),
                headers: headers.to_vec(),
                timeout,
            });

        self.routes
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, response)| Ok(response.clone()))
            .unwrap_or_else(|| self.fallback.clone())
    }
}
