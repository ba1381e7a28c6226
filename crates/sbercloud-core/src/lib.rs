//! SberCloud Core Library
//!
//! This crate provides the HTTP layer used by the SberCloud provider to talk
//! to the cloud APIs: request senders, token-bucket admission control,
//! the rate-limited transport, and the client configuration that wires
//! them together.

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod rate_limiter;
pub mod transport;

// Re-export commonly used types
pub use client::HttpClient;
pub use config::{ClientConfig, Credentials};
pub use context::{ContextError, RequestContext};
pub use error::{SbercloudError, SbercloudResult};
pub use rate_limiter::{RateLimitConfig, RateLimiter};
pub use transport::{
    LoggingTransport, RateLimitedTransport, Request, RequestSender, ReqwestSender,
    TransportError, default_sender,
};
