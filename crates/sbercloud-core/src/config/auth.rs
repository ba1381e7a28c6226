//! Static credentials

use crate::error::{SbercloudError, SbercloudResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Static credentials used to authenticate against IAM
///
/// Exactly one form is configured per client. Serialized with a `type` tag:
///
/// ```toml
/// [credentials]
/// type = "access_key"
/// access_key = "AK..."
/// secret_key = "..."
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credentials {
    /// IAM user name and password within an account (domain)
    Password {
        user_name: String,
        password: String,
        domain_name: String,
    },
    /// Access key / secret key pair
    AccessKey {
        access_key: String,
        secret_key: String,
    },
}

impl Credentials {
    /// Password credentials
    pub fn password(
        user_name: impl Into<String>,
        password: impl Into<String>,
        domain_name: impl Into<String>,
    ) -> Self {
        Self::Password {
            user_name: user_name.into(),
            password: password.into(),
            domain_name: domain_name.into(),
        }
    }

    /// Access/secret key credentials
    pub fn access_key(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self::AccessKey {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Short name of the credential form, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Password { .. } => "password",
            Self::AccessKey { .. } => "access_key",
        }
    }

    /// Every field of the chosen form must be set
    pub fn validate(&self) -> SbercloudResult<()> {
        let missing = match self {
            Self::Password {
                user_name,
                password,
                domain_name,
            } => [
                ("user_name", user_name),
                ("password", password),
                ("domain_name", domain_name),
            ]
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field),
            Self::AccessKey {
                access_key,
                secret_key,
            } => [("access_key", access_key), ("secret_key", secret_key)]
                .into_iter()
                .find(|(_, value)| value.trim().is_empty())
                .map(|(field, _)| field),
        };

        match missing {
            Some(field) => Err(SbercloudError::config(format!(
                "{} credentials are missing '{}'",
                self.kind(),
                field
            ))),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password {
                user_name,
                password,
                domain_name,
            } => f
                .debug_struct("Password")
                .field("user_name", user_name)
                .field("password", &mask_secret(password))
                .field("domain_name", domain_name)
                .finish(),
            Self::AccessKey {
                access_key,
                secret_key,
            } => f
                .debug_struct("AccessKey")
                .field("access_key", &mask_secret(access_key))
                .field("secret_key", &mask_secret(secret_key))
                .finish(),
        }
    }
}

/// Mask a secret for display
///
/// Short values are fully masked; longer ones keep four characters at
/// each end.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let len = chars.len();
    if len <= 12 {
        return "*".repeat(len);
    }

    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[len - 4..].iter().collect();
    format!("{}{}...{}", prefix, "*".repeat((len - 8).min(8)), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("short"), "*****");
        assert_eq!(mask_secret("AKIAEXAMPLEKEY1234"), "AKIA********...1234");
    }

    #[test]
    fn test_mask_secret_multibyte() {
        let masked = mask_secret("пароль-очень-длинный");
        assert!(masked.starts_with("паро"));
        assert!(masked.ends_with("нный"));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let creds = Credentials::access_key("AKIAEXAMPLEKEY1234", "super-secret-key-value");
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("super-secret-key-value"));
        assert!(rendered.contains("AccessKey"));

        let creds = Credentials::password("admin", "hunter2", "my-account");
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("my-account"));
    }

    #[test]
    fn test_validate_reports_missing_field() {
        assert!(Credentials::access_key("ak", "sk").validate().is_ok());

        let err = Credentials::password("admin", " ", "account")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("'password'"));

        let err = Credentials::access_key("", "sk").validate().unwrap_err();
        assert!(err.to_string().contains("'access_key'"));
    }

    #[test]
    fn test_toml_tagged_form() {
        let creds: Credentials = toml::from_str(
            r#"
            type = "password"
            user_name = "admin"
            password = "secret"
            domain_name = "account"
            "#,
        )
        .unwrap();
        assert_eq!(creds, Credentials::password("admin", "secret", "account"));
        assert_eq!(creds.kind(), "password");
    }
}
