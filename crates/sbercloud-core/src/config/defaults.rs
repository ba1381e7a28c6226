//! Default values for client configuration

use std::time::Duration;

/// IAM endpoint used when none is configured
pub const AUTH_URL: &str = "https://iam.ru-moscow-1.hc.sbercloud.ru/v3";

/// Domain under which regional service endpoints live
pub const CLOUD_DOMAIN: &str = "hc.sbercloud.ru";

/// TCP connect timeout for the underlying HTTP client (30 seconds)
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Get connect timeout as Duration
pub fn connect_timeout() -> Duration {
    Duration::from_secs(CONNECT_TIMEOUT_SECS)
}
