//! Main client configuration

use super::auth::Credentials;
use super::defaults;
use crate::client::HttpClient;
use crate::error::{SbercloudError, SbercloudResult};
use crate::transport::{LoggingTransport, RateLimitedTransport, RequestSender, ReqwestSender};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Settings for one SberCloud client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Region name, e.g. `ru-moscow-1`
    #[serde(default)]
    pub region: Option<String>,

    /// Project name; defaults to the region's project
    #[serde(default)]
    pub project_name: Option<String>,

    /// IAM endpoint
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Static credentials
    #[serde(default)]
    pub credentials: Option<Credentials>,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: bool,

    /// Log every HTTP exchange at debug level
    #[serde(default)]
    pub debug: bool,

    /// Requests per second across this client (0 = unlimited)
    #[serde(default)]
    pub rate_limit: u32,

    /// Upper bound on each request, admission wait included
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
}

fn default_auth_url() -> String {
    defaults::AUTH_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: None,
            project_name: None,
            auth_url: default_auth_url(),
            credentials: None,
            insecure: false,
            debug: false,
            rate_limit: 0,
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Create a config for `region` with default settings
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: Some(region.into()),
            ..Default::default()
        }
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set project name
    pub fn with_project_name(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = Some(project_name.into());
        self
    }

    /// Set IAM endpoint
    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self
    }

    /// Set requests per second (0 = unlimited)
    pub fn with_rate_limit(mut self, rate_limit: u32) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Set per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Enable or disable TLS certificate verification skipping
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Enable or disable HTTP debug logging
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> SbercloudResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check that the config can be used to build a client
    pub fn validate(&self) -> SbercloudResult<()> {
        match self.region.as_deref() {
            Some(region) if !region.trim().is_empty() => {}
            _ => return Err(SbercloudError::config("region is required")),
        }

        match &self.credentials {
            Some(credentials) => credentials.validate()?,
            None => {
                return Err(SbercloudError::config(
                    "credentials are required: set an access/secret key pair or a user name and password",
                ));
            }
        }

        let auth_url = Url::parse(&self.auth_url).map_err(|e| {
            SbercloudError::config(format!("invalid auth_url '{}': {}", self.auth_url, e))
        })?;
        if !matches!(auth_url.scheme(), "http" | "https") {
            return Err(SbercloudError::config(format!(
                "auth_url must be http or https, got '{}'",
                auth_url.scheme()
            )));
        }

        Ok(())
    }

    /// Base URL of a regional service, e.g. `ecs` in `ru-moscow-1` gives
    /// `https://ecs.ru-moscow-1.hc.sbercloud.ru/`
    pub fn service_endpoint(&self, service: &str) -> SbercloudResult<Url> {
        let region = self
            .region
            .as_deref()
            .filter(|region| !region.trim().is_empty())
            .ok_or_else(|| SbercloudError::config("region is required"))?;

        let raw = format!("https://{}.{}.{}/", service, region, defaults::CLOUD_DOMAIN);
        Url::parse(&raw).map_err(|e| {
            SbercloudError::config(format!("invalid endpoint for service '{}': {}", service, e))
        })
    }

    /// Build the sender stack: network I/O, optional debug logging, then
    /// rate limiting on the outside
    pub fn build_transport(&self) -> SbercloudResult<Arc<dyn RequestSender>> {
        self.validate()?;

        let mut builder = reqwest::Client::builder().connect_timeout(defaults::connect_timeout());
        if self.insecure {
            warn!("TLS certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder.build()?;

        let mut sender: Arc<dyn RequestSender> = Arc::new(ReqwestSender::new(client));
        if self.debug {
            sender = Arc::new(LoggingTransport::new(sender));
        }

        Ok(Arc::new(RateLimitedTransport::new(
            self.rate_limit,
            Some(sender),
        )))
    }

    /// Build an [`HttpClient`] over [`build_transport`](Self::build_transport)
    pub fn build_http_client(&self) -> SbercloudResult<HttpClient> {
        let transport = self.build_transport()?;
        let mut client = HttpClient::new(transport);
        if let Some(timeout) = self.request_timeout {
            client = client.with_timeout(timeout);
        }

        info!(
            region = self.region.as_deref().unwrap_or_default(),
            auth = self.credentials.as_ref().map(Credentials::kind).unwrap_or_default(),
            rate_limit = self.rate_limit,
            "Built SberCloud HTTP client"
        );

        Ok(client)
    }
}
