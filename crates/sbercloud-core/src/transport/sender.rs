//! The request sender abstraction and its `reqwest` implementation

use super::error::TransportError;
use crate::context::RequestContext;
use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// An outbound HTTP request together with the context that bounds it
#[derive(Debug)]
pub struct Request {
    inner: reqwest::Request,
    context: RequestContext,
}

impl Request {
    /// Wrap a request with a background context
    pub fn new(inner: reqwest::Request) -> Self {
        Self {
            inner,
            context: RequestContext::background(),
        }
    }

    /// Replace the request's context
    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    /// The context bounding this request
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// The wrapped `reqwest` request
    pub fn inner(&self) -> &reqwest::Request {
        &self.inner
    }

    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    pub fn url(&self) -> &Url {
        self.inner.url()
    }

    /// Split into the `reqwest` request and its context
    pub fn into_parts(self) -> (reqwest::Request, RequestContext) {
        (self.inner, self.context)
    }
}

impl From<reqwest::Request> for Request {
    fn from(inner: reqwest::Request) -> Self {
        Self::new(inner)
    }
}

/// Send an HTTP request, get back a response or an error
///
/// Implementations must be safe to call from many tasks at once.
#[async_trait]
pub trait RequestSender: Send + Sync + fmt::Debug {
    async fn round_trip(&self, request: Request) -> Result<Response, TransportError>;
}

/// Sender that performs the network I/O with a `reqwest::Client`
///
/// The in-flight call is dropped as soon as the request's context is done.
#[derive(Debug, Clone, Default)]
pub struct ReqwestSender {
    client: Client,
}

impl ReqwestSender {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// The underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl RequestSender for ReqwestSender {
    async fn round_trip(&self, request: Request) -> Result<Response, TransportError> {
        let (inner, context) = request.into_parts();
        if let Some(err) = context.err() {
            return Err(err.into());
        }

        tokio::select! {
            result = self.client.execute(inner) => result.map_err(TransportError::from),
            err = context.done() => Err(err.into()),
        }
    }
}

static DEFAULT_SENDER: OnceLock<Arc<ReqwestSender>> = OnceLock::new();

/// The process-wide default sender
///
/// Created on first use; every call returns a handle to the same instance.
pub fn default_sender() -> Arc<dyn RequestSender> {
    DEFAULT_SENDER
        .get_or_init(|| Arc::new(ReqwestSender::default()))
        .clone()
}
