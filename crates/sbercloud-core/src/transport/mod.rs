//! Request senders and transport decorators
//!
//! A [`RequestSender`] takes a [`Request`] and produces a response or an
//! error. The concrete senders here compose by wrapping one another:
//!
//! - [`ReqwestSender`]: performs the network I/O; [`default_sender`] is the
//!   process-wide instance used when nothing else is supplied
//! - [`LoggingTransport`]: logs each exchange
//! - [`RateLimitedTransport`]: token-bucket admission control in front of a
//!   delegate

mod error;
mod logging;
mod rate_limited;
mod sender;

#[cfg(test)]
mod tests;

pub use error::TransportError;
pub(crate) use logging::redacted_url;
pub use logging::LoggingTransport;
pub use rate_limited::RateLimitedTransport;
pub use sender::{Request, RequestSender, ReqwestSender, default_sender};
