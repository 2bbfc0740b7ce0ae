//! Authentication requests, vault listings and plugin configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Credentials posted to obtain an authentication token.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Authentication {
    /// User name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Windows domain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Whether to log in as a Windows user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows_user: Option<bool>,
    /// Client computer name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computer_name: Option<String>,
    /// Vault to authenticate to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_guid: Option<Uuid>,
    /// When the token should expire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<DateTime<Utc>>,
    /// Session id to reuse
    #[serde(rename = "SessionID", default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl Authentication {
    /// Username and password for a vault.
    #[must_use]
    pub fn credentials(
        vault_guid: Option<Uuid>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            vault_guid,
            ..Self::default()
        }
    }

    /// Set the token expiry.
    #[must_use]
    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Set the session id.
    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

impl std::fmt::Debug for Authentication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authentication")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("domain", &self.domain)
            .field("vault_guid", &self.vault_guid)
            .field("expiration", &self.expiration)
            .finish_non_exhaustive()
    }
}

/// A vault on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Vault {
    /// Vault name
    pub name: String,
    /// Vault GUID in braced form
    #[serde(rename = "GUID")]
    pub guid: String,
    /// Authentication token scoped to this vault, if any
    pub authentication: Option<String>,
}

/// An authentication plugin as reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PluginInfoConfiguration {
    /// Plugin name
    pub name: String,
    /// Assembly implementing the plugin
    pub assembly_name: Option<String>,
    /// Bridge class within the assembly
    pub bridge_class_name: Option<String>,
    /// Plugin settings
    pub configuration: HashMap<String, String>,
    /// Whether this is the default plugin
    pub is_default: bool,
    /// Vault the configuration applies to
    pub vault_guid: Option<String>,
    /// Protocol name, e.g. "OAuth 2.0"
    pub protocol: Option<String>,
}

impl PluginInfoConfiguration {
    /// Whether the plugin speaks OAuth 2.0.
    #[must_use]
    pub fn is_oauth2(&self) -> bool {
        let protocol = self
            .protocol
            .as_deref()
            .or_else(|| self.configuration.get("Protocol").map(String::as_str));
        protocol.is_some_and(|p| p.eq_ignore_ascii_case("OAuth 2.0"))
    }
}

/// Tokens returned by an OAuth 2.0 token endpoint.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuth2TokenResponse {
    /// Token type, normally "Bearer"
    pub token_type: Option<String>,
    /// Granted scopes
    pub scope: Option<String>,
    /// Seconds the access token is valid for
    #[serde(deserialize_with = "lenient_i64")]
    pub expires_in: i64,
    /// Expiry as a unix timestamp
    #[serde(deserialize_with = "lenient_i64")]
    pub expires_on: i64,
    /// Start of validity as a unix timestamp
    #[serde(deserialize_with = "lenient_i64")]
    pub not_before: i64,
    /// Resource the token is for
    pub resource: Option<String>,
    /// Access token
    pub access_token: Option<String>,
    /// Refresh token
    pub refresh_token: Option<String>,
    /// OpenID Connect id token
    pub id_token: Option<String>,
}

impl std::fmt::Debug for OAuth2TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2TokenResponse")
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("expires_in", &self.expires_in)
            .field("expires_on", &self.expires_on)
            .field("resource", &self.resource)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

// Some identity providers send numeric fields as strings.
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        String(String),
        Null,
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        NumberOrString::Null => Ok(0),
    }
}
