//! Environment variable-based configuration loading

use super::auth::Credentials;
use super::client_config::ClientConfig;
use crate::error::{SbercloudError, SbercloudResult};
use humantime_serde::re::humantime;
use std::env;
use tracing::debug;

/// Load configuration from `SBC_*` environment variables
pub fn load_from_env() -> SbercloudResult<ClientConfig> {
    load_from_lookup(|key| env::var(key).ok())
}

/// Load configuration from an arbitrary variable source
pub fn load_from_lookup<F>(lookup: F) -> SbercloudResult<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ClientConfig::default();
    apply_env(&mut config, lookup)?;
    Ok(config)
}

/// Override `config` with whatever variables `lookup` provides
///
/// An access/secret key pair takes precedence over user name and password
/// when both are present. A half-specified pair is an error.
pub fn apply_env<F>(config: &mut ClientConfig, lookup: F) -> SbercloudResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(region) = get("SBC_REGION_NAME") {
        config.region = Some(region);
    }
    if let Some(project) = get("SBC_PROJECT_NAME") {
        config.project_name = Some(project);
    }
    if let Some(auth_url) = get("SBC_AUTH_URL") {
        config.auth_url = auth_url;
    }

    match (get("SBC_ACCESS_KEY"), get("SBC_SECRET_KEY")) {
        (Some(access_key), Some(secret_key)) => {
            config.credentials = Some(Credentials::access_key(access_key, secret_key));
        }
        (Some(_), None) => {
            return Err(SbercloudError::config(
                "SBC_ACCESS_KEY is set but SBC_SECRET_KEY is missing",
            ));
        }
        (None, Some(_)) => {
            return Err(SbercloudError::config(
                "SBC_SECRET_KEY is set but SBC_ACCESS_KEY is missing",
            ));
        }
        (None, None) => {
            if let (Some(user_name), Some(password)) = (get("SBC_USERNAME"), get("SBC_PASSWORD")) {
                let domain_name = get("SBC_DOMAIN_NAME").ok_or_else(|| {
                    SbercloudError::config(
                        "SBC_DOMAIN_NAME is required with SBC_USERNAME and SBC_PASSWORD",
                    )
                })?;
                config.credentials = Some(Credentials::password(user_name, password, domain_name));
            }
        }
    }

    if let Some(value) = get("SBC_INSECURE") {
        config.insecure = parse_bool("SBC_INSECURE", &value)?;
    }
    if let Some(value) = get("SBC_DEBUG") {
        config.debug = parse_bool("SBC_DEBUG", &value)?;
    }
    if let Some(value) = get("SBC_RATE_LIMIT") {
        config.rate_limit = value.trim().parse().map_err(|_| {
            SbercloudError::config(format!(
                "Invalid SBC_RATE_LIMIT value '{}': expected a non-negative integer",
                value
            ))
        })?;
    }
    if let Some(value) = get("SBC_REQUEST_TIMEOUT") {
        let timeout = humantime::parse_duration(value.trim()).map_err(|e| {
            SbercloudError::config(format!("Invalid SBC_REQUEST_TIMEOUT value '{}': {}", value, e))
        })?;
        config.request_timeout = Some(timeout);
    }

    debug!(
        region = config.region.as_deref().unwrap_or_default(),
        rate_limit = config.rate_limit,
        "Applied environment configuration"
    );
    Ok(())
}

fn parse_bool(key: &str, value: &str) -> SbercloudResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SbercloudError::config(format!(
            "Invalid {} value '{}': expected true or false",
            key, value
        ))),
    }
}
