//! Debug logging of HTTP exchanges

use super::error::TransportError;
use super::sender::{Request, RequestSender};
use crate::config::mask_secret;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Response, Url};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Headers whose values never reach the log unmasked
const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "x-auth-token",
    "x-security-token",
    "x-subject-token",
];

/// Sender that logs every request and its outcome, then returns it unchanged
#[derive(Debug)]
pub struct LoggingTransport {
    delegate: Arc<dyn RequestSender>,
}

impl LoggingTransport {
    pub fn new(delegate: Arc<dyn RequestSender>) -> Self {
        Self { delegate }
    }

    /// The sender requests are forwarded to
    pub fn delegate(&self) -> &Arc<dyn RequestSender> {
        &self.delegate
    }
}

#[async_trait]
impl RequestSender for LoggingTransport {
    async fn round_trip(&self, request: Request) -> Result<Response, TransportError> {
        let method = request.method().clone();
        let url = redacted_url(request.url());
        debug!(
            %method,
            %url,
            headers = ?masked_headers(request.inner().headers()),
            "Sending request"
        );

        let start = Instant::now();
        let result = self.delegate.round_trip(request).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => debug!(
                %method,
                %url,
                status = %response.status(),
                elapsed_ms,
                headers = ?masked_headers(response.headers()),
                "Received response"
            ),
            Err(err) => warn!(%method, %url, elapsed_ms, "Request failed: {}", err),
        }

        result
    }
}

/// URL with the query replaced by a placeholder and the fragment dropped
///
/// Presigned URLs carry signatures and access keys in the query.
pub(crate) fn redacted_url(url: &Url) -> String {
    let mut url = url.clone();
    if url.query().is_some() {
        url.set_query(Some("redacted"));
    }
    url.set_fragment(None);
    url.to_string()
}

/// Header name/value pairs with credentials masked
pub(crate) fn masked_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = value.to_str().unwrap_or("<binary>");
            let value = if SENSITIVE_HEADERS.contains(&name.as_str()) {
                mask_secret(value)
            } else {
                value.to_string()
            };
            (name.as_str().to_string(), value)
        })
        .collect()
}
