//! Partner API credentials.
//!
//! Credentials are read once at process start and passed by reference into
//! [`PartnerClient`](crate::client::PartnerClient). Empty key or secret does
//! not prevent construction: authenticated calls fail fast with
//! `ClientError::NotConfigured` while the health check keeps working.

use url::Url;

/// Environment variable holding the partner base URL.
pub const API_URL_ENV: &str = "SAME_DAY_SOLUTIONS_API_URL";
/// Environment variable holding the partner API key.
pub const API_KEY_ENV: &str = "SAME_DAY_SOLUTIONS_API_KEY";
/// Environment variable holding the partner API secret.
pub const API_SECRET_ENV: &str = "SAME_DAY_SOLUTIONS_API_SECRET";

/// Production host used when no base URL is configured.
pub const DEFAULT_API_BASE_URL: &str = "https://api.samedaysolution.in";

/// Errors produced while building credentials.
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("invalid partner base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

#[derive(Clone)]
pub struct PartnerCredentials {
    pub api_base_url: Url,
    pub api_key: String,
    pub api_secret: String,
}

impl PartnerCredentials {
    pub fn new(api_base_url: Url, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_base_url,
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Read credentials from the `SAME_DAY_SOLUTIONS_*` environment variables.
    ///
    /// Unset or empty URL falls back to [`DEFAULT_API_BASE_URL`]; unset key
    /// and secret become empty strings.
    pub fn from_env() -> Result<Self, CredentialsError> {
        Self::from_values(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(API_SECRET_ENV).ok(),
        )
    }

    /// Build credentials from optional raw values, applying the same
    /// defaults as [`from_env`](Self::from_env).
    pub fn from_values(
        api_base_url: Option<String>,
        api_key: Option<String>,
        api_secret: Option<String>,
    ) -> Result<Self, CredentialsError> {
        let base = api_base_url
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        Ok(Self {
            api_base_url: Url::parse(&base)?,
            api_key: api_key.unwrap_or_default(),
            api_secret: api_secret.unwrap_or_default(),
        })
    }

    /// Whether both key and secret are present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }

    /// First ten characters of the API key, for diagnostics.
    pub fn key_prefix(&self) -> Option<String> {
        if self.api_key.is_empty() {
            return None;
        }
        Some(format!("{}...", self.api_key.chars().take(10).collect::<String>()))
    }
}

impl std::fmt::Debug for PartnerCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartnerCredentials")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("api_key", &self.key_prefix())
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let creds = PartnerCredentials::from_values(None, None, None).unwrap();
        assert_eq!(creds.api_base_url.as_str(), "https://api.samedaysolution.in/");
        assert!(!creds.is_configured());
        assert_eq!(creds.key_prefix(), None);
    }

    #[test]
    fn test_blank_url_falls_back_to_default() {
        let creds =
            PartnerCredentials::from_values(Some("  ".into()), Some("k".into()), Some("s".into()))
                .unwrap();
        assert_eq!(creds.api_base_url.host_str(), Some("api.samedaysolution.in"));
        assert!(creds.is_configured());
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let creds = PartnerCredentials::from_values(
            Some("https://partner.example.com".into()),
            Some("pk_live_1234567890abcdef".into()),
            Some("sk_live_topsecret".into()),
        )
        .unwrap();
        let debug = format!("{creds:?}");
        assert!(!debug.contains("topsecret"));
        assert!(debug.contains("pk_live_12..."));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(PartnerCredentials::from_values(Some("not a url".into()), None, None).is_err());
    }
}
