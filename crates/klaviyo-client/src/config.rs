//! Client configuration.

use klaviyo_core::{Credentials, KlaviyoError, Result, DEFAULT_BASE_URL, DEFAULT_REVISION};

/// Configuration for a [`crate::KlaviyoClient`].
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Private API key.
    pub api_key: String,

    /// API host (default: `https://a.klaviyo.com`).
    pub base_url: String,

    /// API revision (default: `2024-02-15`).
    pub revision: String,

    /// Transport timeout in seconds. `None` leaves requests unbounded.
    pub timeout_seconds: Option<u64>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("revision", &self.revision)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl ClientConfig {
    /// Configuration with default host and revision.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            revision: DEFAULT_REVISION.to_string(),
            timeout_seconds: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `KLAVIYO_API_KEY` (required)
    /// - `KLAVIYO_BASE_URL`
    /// - `KLAVIYO_REVISION`
    /// - `KLAVIYO_TIMEOUT_SECONDS`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key is missing or the timeout
    /// is not a whole number of seconds.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("KLAVIYO_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| KlaviyoError::configuration("KLAVIYO_API_KEY is not set"))?;

        let mut config = Self::new(api_key);
        if let Some(url) = lookup("KLAVIYO_BASE_URL").filter(|url| !url.is_empty()) {
            config.base_url = url;
        }
        if let Some(revision) = lookup("KLAVIYO_REVISION").filter(|rev| !rev.is_empty()) {
            config.revision = revision;
        }
        if let Some(raw) = lookup("KLAVIYO_TIMEOUT_SECONDS") {
            let seconds = raw.parse::<u64>().map_err(|_| {
                KlaviyoError::configuration(format!("invalid KLAVIYO_TIMEOUT_SECONDS: {raw}"))
            })?;
            config.timeout_seconds = Some(seconds);
        }

        Ok(config)
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the revision.
    #[must_use]
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    /// Set the transport timeout.
    #[must_use]
    pub const fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Credentials derived from this configuration.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.api_key.clone(), self.base_url.clone())
            .with_revision(self.revision.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::new("pk_test");
        assert_eq!(config.base_url, "https://a.klaviyo.com");
        assert_eq!(config.revision, "2024-02-15");
        assert_eq!(config.timeout_seconds, None);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::new("pk_test")
            .with_base_url("http://localhost:9000/")
            .with_revision("2023-10-15")
            .with_timeout_seconds(5);

        let credentials = config.credentials();
        assert_eq!(credentials.base_url(), "http://localhost:9000");
        assert_eq!(credentials.revision(), "2023-10-15");
        assert_eq!(config.timeout_seconds, Some(5));
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("KLAVIYO_API_KEY", "pk_env"),
            ("KLAVIYO_BASE_URL", "http://localhost:9000"),
            ("KLAVIYO_TIMEOUT_SECONDS", "10"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "pk_env");
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.revision, "2024-02-15");
        assert_eq!(config.timeout_seconds, Some(10));
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("KLAVIYO_API_KEY", "pk_env"),
            ("KLAVIYO_BASE_URL", ""),
            ("KLAVIYO_REVISION", ""),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://a.klaviyo.com");
        assert_eq!(config.revision, "2024-02-15");
    }

    #[test]
    fn test_missing_api_key() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, KlaviyoError::Configuration { .. }));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[
            ("KLAVIYO_API_KEY", "pk_env"),
            ("KLAVIYO_TIMEOUT_SECONDS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, KlaviyoError::Configuration { .. }));
    }

    #[test]
    fn test_debug_redacts_key() {
        assert!(!format!("{:?}", ClientConfig::new("pk_secret")).contains("pk_secret"));
    }
}
