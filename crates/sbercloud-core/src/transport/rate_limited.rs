//! Token-bucket admission control in front of another sender

use super::error::TransportError;
use super::logging::redacted_url;
use super::sender::{Request, RequestSender, default_sender};
use crate::rate_limiter::RateLimiter;
use async_trait::async_trait;
use reqwest::Response;
use std::sync::Arc;
use tracing::debug;

/// Sender that admits requests through a token bucket before delegating
///
/// With a positive rate limit `R` the bucket refills at `R` tokens per second
/// and holds at most `R`, so one second's worth of requests may fire at once
/// and the rest are paced at `R` per second. A zero rate limit means no
/// bucket at all: requests go straight to the delegate.
///
/// The transport is immutable once built and is shared between tasks behind
/// an `Arc`.
///
/// # Examples
///
/// ```no_run
/// use sbercloud_core::transport::{RateLimitedTransport, RequestSender};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = Arc::new(RateLimitedTransport::new(5, None));
/// let request = reqwest::Request::new(
///     reqwest::Method::GET,
///     "https://ecs.ru-moscow-1.hc.sbercloud.ru/".parse()?,
/// );
/// let response = transport.round_trip(request.into()).await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RateLimitedTransport {
    delegate: Arc<dyn RequestSender>,
    limiter: Option<RateLimiter>,
}

impl RateLimitedTransport {
    /// Create a transport allowing `rate_limit` requests per second
    ///
    /// `base` defaults to [`default_sender`]. A supplied delegate is kept
    /// as-is, not copied or wrapped.
    pub fn new(rate_limit: u32, base: Option<Arc<dyn RequestSender>>) -> Self {
        let delegate = base.unwrap_or_else(default_sender);
        let limiter = (rate_limit > 0).then(|| RateLimiter::per_second(rate_limit));

        Self { delegate, limiter }
    }

    /// The sender requests are forwarded to
    pub fn delegate(&self) -> &Arc<dyn RequestSender> {
        &self.delegate
    }

    /// The token bucket, absent in unlimited mode
    pub fn limiter(&self) -> Option<&RateLimiter> {
        self.limiter.as_ref()
    }

    pub fn is_unlimited(&self) -> bool {
        self.limiter.is_none()
    }
}

#[async_trait]
impl RequestSender for RateLimitedTransport {
    async fn round_trip(&self, request: Request) -> Result<Response, TransportError> {
        if let Some(limiter) = &self.limiter {
            let context = request.context().clone();
            if let Err(err) = limiter.wait(&context).await {
                debug!(
                    method = %request.method(),
                    url = %redacted_url(request.url()),
                    "Request not admitted: {}",
                    err
                );
                return Err(err.into());
            }
        }

        self.delegate.round_trip(request).await
    }
}
