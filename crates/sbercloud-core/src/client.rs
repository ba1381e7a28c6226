//! HTTP client over a pluggable request sender

use crate::context::RequestContext;
use crate::transport::redacted_url;
use crate::transport::{RateLimitedTransport, Request, RequestSender, TransportError};
use reqwest::{Method, Response, Url};
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// HTTP client whose transport is any [`RequestSender`]
///
/// Cloning is cheap and shares the sender, so clones share one rate limit.
///
/// # Examples
///
/// ```no_run
/// use sbercloud_core::HttpClient;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::with_rate_limit(10).with_timeout(Duration::from_secs(30));
/// let response = client.get("https://iam.ru-moscow-1.hc.sbercloud.ru/v3").await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    sender: Arc<dyn RequestSender>,
    timeout: Option<Duration>,
}

impl HttpClient {
    /// Create a client that sends every request through `sender`
    pub fn new(sender: Arc<dyn RequestSender>) -> Self {
        Self {
            sender,
            timeout: None,
        }
    }

    /// Client over the default sender, limited to `rate_limit` requests per
    /// second (0 = unlimited)
    pub fn with_rate_limit(rate_limit: u32) -> Self {
        Self::new(Arc::new(RateLimitedTransport::new(rate_limit, None)))
    }

    /// Bound every request by `timeout`, including time spent waiting for
    /// admission
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn sender(&self) -> &Arc<dyn RequestSender> {
        &self.sender
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Build a request without sending it
    pub fn request(&self, method: Method, url: &str) -> Result<reqwest::Request, TransportError> {
        let parsed =
            Url::parse(url).map_err(|e| TransportError::invalid_url(url, e.to_string()))?;
        Ok(reqwest::Request::new(method, parsed))
    }

    /// Send a request with no caller-supplied context
    pub async fn execute(&self, request: reqwest::Request) -> Result<Response, TransportError> {
        self.execute_with_context(request, RequestContext::background())
            .await
    }

    /// Send a request bounded by `context` (and the client timeout, if set)
    pub async fn execute_with_context(
        &self,
        request: reqwest::Request,
        context: RequestContext,
    ) -> Result<Response, TransportError> {
        let context = match self.timeout {
            Some(timeout) => context.child_with_timeout(timeout),
            None => context,
        };
        trace!(
            method = %request.method(),
            url = %redacted_url(request.url()),
            "Executing request"
        );

        self.sender
            .round_trip(Request::new(request).with_context(context))
            .await
    }

    /// Send a GET request to `url`
    pub async fn get(&self, url: &str) -> Result<Response, TransportError> {
        let request = self.request(Method::GET, url)?;
        self.execute(request).await
    }
}
