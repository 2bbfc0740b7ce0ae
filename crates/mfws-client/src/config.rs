//! Client configuration.

use crate::client::ClientError;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

/// M-Files Web Service client configuration.
#[derive(Clone)]
pub struct MfwsClientConfig {
    /// Base URL of the web service (e.g., <https://vault.example.com>)
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Value of the `Accept-Language` header, if any
    pub accept_language: Option<String>,
    /// Value of the `X-PresharedKey` header, if any
    pub preshared_key: Option<String>,
    /// Service extensions to request via `X-Extensions`
    pub extensions: Vec<String>,
    /// Vault selected through the `X-Vault` header
    pub vault_guid: Option<Uuid>,
    /// Whether to follow HTTP redirects
    pub follow_redirects: bool,
}

impl Default for MfwsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            timeout: Duration::from_secs(30),
            accept_language: None,
            preshared_key: None,
            extensions: Vec::new(),
            vault_guid: None,
            follow_redirects: true,
        }
    }
}

impl std::fmt::Debug for MfwsClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MfwsClientConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("accept_language", &self.accept_language)
            .field("preshared_key", &self.preshared_key.as_ref().map(|_| "***"))
            .field("extensions", &self.extensions)
            .field("vault_guid", &self.vault_guid)
            .field("follow_redirects", &self.follow_redirects)
            .finish()
    }
}

impl MfwsClientConfig {
    /// Configuration for a server, with defaults for everything else.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MFWS_BASE_URL`: Base URL of the web service
    /// - `MFWS_TIMEOUT_SECS`: Request timeout in seconds
    /// - `MFWS_ACCEPT_LANGUAGE`: `Accept-Language` header value
    /// - `MFWS_PRESHARED_KEY`: `X-PresharedKey` header value
    /// - `MFWS_VAULT_GUID`: Vault GUID for the `X-Vault` header
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ClientError> {
        let mut config = Self::default();

        if let Some(url) = lookup("MFWS_BASE_URL") {
            config.base_url = url;
        }

        if let Some(secs) = lookup("MFWS_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| ClientError::Config(format!("invalid MFWS_TIMEOUT_SECS: {e}")))?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(language) = lookup("MFWS_ACCEPT_LANGUAGE") {
            config.accept_language = Some(language);
        }

        if let Some(key) = lookup("MFWS_PRESHARED_KEY").filter(|k| !k.trim().is_empty()) {
            config.preshared_key = Some(key);
        }

        if let Some(guid) = lookup("MFWS_VAULT_GUID") {
            config.vault_guid = Some(
                Uuid::parse_str(guid.trim())
                    .map_err(|e| ClientError::Config(format!("invalid MFWS_VAULT_GUID: {e}")))?,
            );
        }

        config.validated_base_url()?;
        Ok(config)
    }

    /// Parse and check the base URL.
    pub(crate) fn validated_base_url(&self) -> Result<Url, ClientError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL {}: {e}", self.base_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ClientError::Config(format!(
                "unsupported URL scheme {other}"
            ))),
        }
    }
}
