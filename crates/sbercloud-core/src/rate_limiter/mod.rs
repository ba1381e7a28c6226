//! Token bucket admission control
//!
//! This module provides the token bucket used to pace outbound requests.
//! Its only blocking entry point is [`RateLimiter::wait`], which honors the
//! caller's [`RequestContext`](crate::context::RequestContext).

mod limiter;
mod types;


pub use limiter::RateLimiter;
pub use types::RateLimitConfig;
