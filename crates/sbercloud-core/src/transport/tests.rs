//! Tests for request senders

use super::logging::{masked_headers, redacted_url};
use super::*;
use crate::context::{ContextError, RequestContext};
use async_trait::async_trait;
use mockall::mock;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, Response, Url};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep};

mock! {
    pub Sender {}

    #[async_trait]
    impl RequestSender for Sender {
        async fn round_trip(&self, request: Request) -> Result<Response, TransportError>;
    }
}

impl std::fmt::Debug for MockSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MockSender")
    }
}

fn get_request(ctx: RequestContext) -> Request {
    let url = Url::parse("http://127.0.0.1:9/v1/servers").unwrap();
    Request::new(reqwest::Request::new(Method::GET, url)).with_context(ctx)
}

fn same_sender(a: &Arc<dyn RequestSender>, b: &Arc<dyn RequestSender>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

#[test]
fn test_default_sender_is_shared() {
    assert!(same_sender(&default_sender(), &default_sender()));
}

#[test]
fn test_nil_delegate_uses_default_sender() {
    let transport = RateLimitedTransport::new(5, None);
    assert!(same_sender(transport.delegate(), &default_sender()));
    assert!(transport.limiter().is_some());
}

#[test]
fn test_zero_rate_without_delegate() {
    let transport = RateLimitedTransport::new(0, None);
    assert!(transport.is_unlimited());
    assert!(transport.limiter().is_none());
    assert!(same_sender(transport.delegate(), &default_sender()));
}

#[test]
fn test_explicit_delegate_is_preserved() {
    let custom: Arc<dyn RequestSender> = Arc::new(MockSender::new());
    let transport = RateLimitedTransport::new(3, Some(Arc::clone(&custom)));

    assert!(same_sender(transport.delegate(), &custom));
    assert!(!same_sender(transport.delegate(), &default_sender()));
}

#[test]
fn test_transport_debug_names_delegate() {
    let transport = RateLimitedTransport::new(3, Some(Arc::new(MockSender::new())));
    let debug = format!("{:?}", transport);

    assert!(debug.contains("RateLimitedTransport"));
    assert!(debug.contains("MockSender"));
}

#[test]
fn test_limiter_burst_equals_rate() {
    let transport = RateLimitedTransport::new(7, Some(Arc::new(MockSender::new())));
    let limiter = transport.limiter().unwrap();

    assert_eq!(limiter.config().burst_size, 7);
    assert!((limiter.config().requests_per_second - 7.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_deadline_before_next_token_is_not_forwarded() {
    let mut sender = MockSender::new();
    sender.expect_round_trip().never();

    let transport = RateLimitedTransport::new(1, Some(Arc::new(sender)));
    assert!(transport.limiter().unwrap().try_acquire());

    let start = Instant::now();
    let result = transport
        .round_trip(get_request(RequestContext::with_timeout(Duration::from_millis(50))))
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.context_error(), Some(ContextError::DeadlineExceeded));
    assert_eq!(err.to_string(), "context deadline exceeded");
    assert!(err.is_timeout());
    assert!(start.elapsed() < Duration::from_millis(40));
}

#[tokio::test]
async fn test_cancel_during_admission_is_not_forwarded() {
    let mut sender = MockSender::new();
    sender.expect_round_trip().never();

    let transport = Arc::new(RateLimitedTransport::new(1, Some(Arc::new(sender))));
    assert!(transport.limiter().unwrap().try_acquire());

    let ctx = RequestContext::background();
    let pending = {
        let transport = Arc::clone(&transport);
        let ctx = ctx.clone();
        tokio::spawn(async move { transport.round_trip(get_request(ctx)).await })
    };

    sleep(Duration::from_millis(50)).await;
    ctx.cancel();

    let err = pending.await.unwrap().unwrap_err();
    assert_eq!(err.context_error(), Some(ContextError::Canceled));
    assert_eq!(err.to_string(), "context canceled");
}

#[tokio::test]
async fn test_delegate_error_is_returned_verbatim() {
    let mut sender = MockSender::new();
    sender
        .expect_round_trip()
        .times(1)
        .returning(|_| Err(TransportError::sender("connection refused")));

    let transport = RateLimitedTransport::new(2, Some(Arc::new(sender)));
    let err = transport
        .round_trip(get_request(RequestContext::background()))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Sender(ref msg) if msg == "connection refused"));
    // Exactly one token was spent
    let tokens = transport.limiter().unwrap().available_tokens();
    assert!((tokens - 1.0).abs() < 0.1);
}

#[tokio::test]
async fn test_unlimited_forwards_every_request() {
    let mut sender = MockSender::new();
    sender
        .expect_round_trip()
        .times(50)
        .returning(|_| Err(TransportError::sender("unreachable")));

    let transport = RateLimitedTransport::new(0, Some(Arc::new(sender)));
    let start = Instant::now();
    for _ in 0..50 {
        let _ = transport
            .round_trip(get_request(RequestContext::background()))
            .await;
    }
    assert!(start.elapsed() < Duration::from_millis(100));
}

#[tokio::test]
async fn test_reqwest_sender_honors_canceled_context() {
    let sender = ReqwestSender::default();
    let ctx = RequestContext::background();
    ctx.cancel();

    let err = sender.round_trip(get_request(ctx)).await.unwrap_err();
    assert_eq!(err.context_error(), Some(ContextError::Canceled));
}

#[tokio::test]
async fn test_logging_transport_passes_errors_through() {
    let mut sender = MockSender::new();
    sender
        .expect_round_trip()
        .withf(|request| request.url().path() == "/v1/servers")
        .times(1)
        .returning(|_| Err(TransportError::sender("tls handshake failed")));

    let transport = LoggingTransport::new(Arc::new(sender));
    let err = transport
        .round_trip(get_request(RequestContext::background()))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "request sender error: tls handshake failed");
}

#[test]
fn test_masked_headers_hide_tokens() {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-auth-token",
        HeaderValue::from_static("MIIZ-very-long-keystone-token-value"),
    );
    headers.insert("content-type", HeaderValue::from_static("application/json"));

    let masked = masked_headers(&headers);
    let token = masked
        .iter()
        .find(|(name, _)| name == "x-auth-token")
        .map(|(_, value)| value.as_str())
        .unwrap();
    let content_type = masked
        .iter()
        .find(|(name, _)| name == "content-type")
        .map(|(_, value)| value.as_str())
        .unwrap();

    assert!(!token.contains("keystone"));
    assert_eq!(content_type, "application/json");
}

#[test]
fn test_request_parts() {
    let ctx = RequestContext::with_timeout(Duration::from_secs(5));
    let deadline = ctx.deadline();
    let request = get_request(ctx);

    assert_eq!(request.method(), &Method::GET);
    assert_eq!(request.url().port(), Some(9));

    let (inner, ctx) = request.into_parts();
    assert_eq!(inner.url().path(), "/v1/servers");
    assert_eq!(ctx.deadline(), deadline);
}

#[test]
fn test_redacted_url_hides_query() {
    let url = Url::parse(
        "https://obs.ru-moscow-1.hc.sbercloud.ru/bucket/key?AccessKeyId=AKIDEXAMPLE&Signature=c2lnbg#part",
    )
    .unwrap();
    let logged = redacted_url(&url);

    assert_eq!(logged, "https://obs.ru-moscow-1.hc.sbercloud.ru/bucket/key?redacted");
    assert!(!logged.contains("AKIDEXAMPLE"));

    let plain = Url::parse("https://ecs.ru-moscow-1.hc.sbercloud.ru/v1/servers").unwrap();
    assert_eq!(redacted_url(&plain), plain.as_str());
}
