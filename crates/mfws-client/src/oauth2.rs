//! OAuth 2.0 authentication through a vault's authentication plugin.
//!
//! The flow is: read the plugin list, build an [`OAuth2Configuration`],
//! send the user to [`OAuth2Configuration::generate_authorization_uri`],
//! exchange the returned code for tokens and finally attach them with
//! [`MfwsClient::with_oauth2_tokens`].

use crate::client::{decode, ClientError, MfwsClient};
use crate::transport::{Method, RequestBody, RestRequest};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use mfws_model::{OAuth2TokenResponse, PluginInfoConfiguration};
use rand::RngCore;
use sha2::{Digest, Sha256};
use url::Url;
use uuid::Uuid;

/// Redirect URI used when the plugin configures none.
pub const FALLBACK_REDIRECT_URI: &str = "http://localhost";

const PKCE_VERIFIER_BYTES: usize = 32;

/// OAuth 2.0 settings read from an authentication plugin.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuth2Configuration {
    /// Authorization endpoint
    pub authorization_endpoint: Option<String>,
    /// Token endpoint
    pub token_endpoint: Option<String>,
    /// Client id
    pub client_id: Option<String>,
    /// Client secret, for confidential clients
    pub client_secret: Option<String>,
    /// Protocol name
    pub protocol: Option<String>,
    /// Redirect URI for web use
    pub redirect_uri_for_web: Option<String>,
    /// Redirect URI for native apps
    pub redirect_uri_for_native: Option<String>,
    /// Redirect URI for mobile apps
    pub redirect_uri_for_mobile: Option<String>,
    /// Redirect URI for WOPI clients
    pub redirect_uri_for_wopi: Option<String>,
    /// General redirect URI
    pub redirect_uri: String,
    /// Resource to request a token for
    pub resource: Option<String>,
    /// Scope to request
    pub scope: Option<String>,
    /// Site realm
    pub site_realm: Option<String>,
    /// Server version reported by the plugin
    pub server_version: Option<String>,
    /// Vault the plugin belongs to
    pub vault_guid: Option<String>,
    /// Grant type used for the code exchange
    pub grant_type: String,
    /// Force the login prompt even with an existing session
    pub force_login: bool,
    /// Send the id token instead of the access token
    pub use_id_token_as_access_token: bool,
    /// Use PKCE with the authorization code grant
    pub use_pkce: bool,
    /// `state` value sent with the authorization request
    pub state: Option<String>,
}

impl Default for OAuth2Configuration {
    fn default() -> Self {
        Self {
            authorization_endpoint: None,
            token_endpoint: None,
            client_id: None,
            client_secret: None,
            protocol: Some("OAuth 2.0".to_string()),
            redirect_uri_for_web: None,
            redirect_uri_for_native: None,
            redirect_uri_for_mobile: None,
            redirect_uri_for_wopi: None,
            redirect_uri: FALLBACK_REDIRECT_URI.to_string(),
            resource: None,
            scope: None,
            site_realm: None,
            server_version: None,
            vault_guid: None,
            grant_type: "authorization_code".to_string(),
            force_login: false,
            use_id_token_as_access_token: false,
            use_pkce: false,
            state: Some(Uuid::new_v4().braced().to_string()),
        }
    }
}

impl std::fmt::Debug for OAuth2Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2Configuration")
            .field("authorization_endpoint", &self.authorization_endpoint)
            .field("token_endpoint", &self.token_endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("redirect_uri", &self.redirect_uri)
            .field("resource", &self.resource)
            .field("scope", &self.scope)
            .field("vault_guid", &self.vault_guid)
            .field("use_pkce", &self.use_pkce)
            .finish_non_exhaustive()
    }
}

impl OAuth2Configuration {
    /// Read settings from a plugin's configuration dictionary.
    #[must_use]
    pub fn from_plugin(plugin: &PluginInfoConfiguration) -> Self {
        let settings = &plugin.configuration;
        let get = |key: &str| settings.get(key).cloned();
        let flag = |key: &str| {
            settings
                .get(key)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
        };

        Self {
            authorization_endpoint: get("AuthorizationEndpoint"),
            token_endpoint: get("TokenEndpoint"),
            client_id: get("ClientID"),
            client_secret: get("ClientSecret"),
            protocol: get("Protocol"),
            redirect_uri_for_web: get("RedirectURIForWeb"),
            redirect_uri_for_native: get("RedirectURIForNative"),
            redirect_uri_for_mobile: get("RedirectURIForMobile"),
            redirect_uri_for_wopi: get("RedirectURIForWOPI"),
            redirect_uri: get("RedirectURI").unwrap_or_else(|| FALLBACK_REDIRECT_URI.to_string()),
            resource: get("Resource"),
            scope: get("Scope"),
            site_realm: get("SiteRealm"),
            server_version: get("MFServerVersion"),
            vault_guid: plugin.vault_guid.clone(),
            force_login: settings.get("PromptLoginParameter").map(String::as_str) == Some("login"),
            use_id_token_as_access_token: flag("UseIdTokenAsAccessToken"),
            use_pkce: flag("UsePkceWithAuthorizationCode"),
            ..Self::default()
        }
    }

    /// The redirect URI to use: native, then general, then the fallback.
    #[must_use]
    pub fn appropriate_redirect_uri(&self) -> &str {
        [self.redirect_uri_for_native.as_deref(), Some(self.redirect_uri.as_str())]
            .into_iter()
            .flatten()
            .find(|uri| !uri.trim().is_empty())
            .unwrap_or(FALLBACK_REDIRECT_URI)
    }

    /// Value of the `prompt` parameter.
    #[must_use]
    pub fn prompt(&self) -> Option<&'static str> {
        self.force_login.then_some("login")
    }

    /// Build the URI the user visits to authorize.
    ///
    /// With PKCE enabled a fresh verifier is generated and returned
    /// alongside the URI; keep it for the code exchange.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the authorization endpoint is
    /// missing or not a valid URL.
    pub fn generate_authorization_uri(
        &self,
        redirect_uri: Option<&str>,
    ) -> Result<AuthorizationRequest, ClientError> {
        let redirect_uri = redirect_uri
            .filter(|uri| !uri.trim().is_empty())
            .unwrap_or_else(|| self.appropriate_redirect_uri());

        let endpoint = self
            .authorization_endpoint
            .as_deref()
            .ok_or_else(|| ClientError::Config("no authorization endpoint".to_string()))?;
        let mut uri = Url::parse(endpoint)
            .map_err(|e| ClientError::Config(format!("invalid authorization endpoint: {e}")))?;

        let code_verifier = self.use_pkce.then(create_code_verifier);
        {
            let mut query = uri.query_pairs_mut();
            query
                .append_pair("client_id", self.client_id.as_deref().unwrap_or_default())
                .append_pair("redirect_uri", redirect_uri)
                .append_pair("response_type", "code");

            let optional = [
                ("scope", self.scope.as_deref()),
                ("state", self.state.as_deref()),
                ("prompt", self.prompt()),
                ("resource", self.resource.as_deref()),
            ];
            for (name, value) in optional {
                if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                    query.append_pair(name, value);
                }
            }

            if let Some(verifier) = &code_verifier {
                query
                    .append_pair("code_challenge", &create_code_challenge(verifier))
                    .append_pair("code_challenge_method", "S256");
            }
        }

        Ok(AuthorizationRequest {
            uri,
            redirect_uri: redirect_uri.to_string(),
            code_verifier,
        })
    }

    fn token_endpoint(&self) -> Result<&str, ClientError> {
        self.token_endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| ClientError::Config("no token endpoint".to_string()))
    }

    fn common_token_fields(&self, fields: &mut Vec<(String, String)>) {
        let optional = [
            ("client_id", self.client_id.as_deref()),
            ("client_secret", self.client_secret.as_deref()),
            ("resource", self.resource.as_deref()),
            ("scope", self.scope.as_deref()),
        ];
        for (name, value) in optional {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                fields.push((name.to_string(), value.to_string()));
            }
        }
    }
}

/// A generated authorization URI and the data needed to redeem its code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    /// URI to open in a browser
    pub uri: Url,
    /// Redirect URI embedded in `uri`
    pub redirect_uri: String,
    /// PKCE verifier, when PKCE is in use
    pub code_verifier: Option<String>,
}

fn create_code_verifier() -> String {
    let mut bytes = [0u8; PKCE_VERIFIER_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn create_code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

impl MfwsClient {
    /// Redeem an authorization code at the plugin's token endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if the token endpoint is not configured, or on network
    /// or API errors.
    pub async fn exchange_authorization_code(
        &self,
        configuration: &OAuth2Configuration,
        authorization: &AuthorizationRequest,
        code: &str,
    ) -> Result<OAuth2TokenResponse, ClientError> {
        let mut fields = vec![
            ("grant_type".to_string(), configuration.grant_type.clone()),
            ("code".to_string(), code.to_string()),
            (
                "redirect_uri".to_string(),
                authorization.redirect_uri.clone(),
            ),
        ];
        configuration.common_token_fields(&mut fields);
        if let Some(verifier) = &authorization.code_verifier {
            fields.push(("code_verifier".to_string(), verifier.clone()));
        }

        self.request_tokens(configuration, fields).await
    }

    /// Obtain fresh tokens using a refresh token.
    ///
    /// # Errors
    ///
    /// Returns error if the token endpoint is not configured, or on network
    /// or API errors.
    pub async fn refresh_oauth2_token(
        &self,
        configuration: &OAuth2Configuration,
        refresh_token: &str,
    ) -> Result<OAuth2TokenResponse, ClientError> {
        let mut fields = vec![
            ("grant_type".to_string(), "refresh_token".to_string()),
            ("refresh_token".to_string(), refresh_token.to_string()),
        ];
        configuration.common_token_fields(&mut fields);

        self.request_tokens(configuration, fields).await
    }

    async fn request_tokens(
        &self,
        configuration: &OAuth2Configuration,
        fields: Vec<(String, String)>,
    ) -> Result<OAuth2TokenResponse, ClientError> {
        let mut request = RestRequest::new(Method::Post, configuration.token_endpoint()?);
        request.body = Some(RequestBody::Form(fields));

        let response = self.send(request).await?;
        let tokens: Option<OAuth2TokenResponse> = decode(&response)?;
        tokens.ok_or_else(|| ClientError::Parse("empty token response".to_string()))
    }

    /// A client that authenticates with the given tokens.
    ///
    /// Sends `Authorization: Bearer` with the access token (or the id token
    /// when the plugin asks for it) and selects the plugin's vault.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] if the needed token is
    /// missing, or [`ClientError::Config`] if the plugin's vault GUID is
    /// malformed.
    pub fn with_oauth2_tokens(
        &self,
        configuration: &OAuth2Configuration,
        tokens: &OAuth2TokenResponse,
    ) -> Result<MfwsClient, ClientError> {
        let token = if configuration.use_id_token_as_access_token {
            tokens.id_token.as_deref()
        } else {
            tokens.access_token.as_deref()
        }
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ClientError::InvalidArgument("token response has no usable token".to_string()))?;

        let mut context = self
            .context()
            .clone()
            .without_authentication()
            .with_bearer_token(token);
        if let Some(guid) = configuration.vault_guid.as_deref().filter(|g| !g.is_empty()) {
            let guid = Uuid::parse_str(guid)
                .map_err(|e| ClientError::Config(format!("invalid vault GUID {guid}: {e}")))?;
            context = context.with_vault(guid);
        }

        tracing::debug!(vault = ?context.vault_guid(), "Using OAuth 2.0 tokens");

        Ok(self.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn plugin(settings: &[(&str, &str)]) -> PluginInfoConfiguration {
        PluginInfoConfiguration {
            name: "SSO".to_string(),
            configuration: settings
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect::<HashMap<_, _>>(),
            vault_guid: Some("{C4FC7A5C-5E8B-4A54-A98A-9B0E2F6E7D10}".to_string()),
            ..Default::default()
        }
    }

    fn query(uri: &Url) -> HashMap<String, String> {
        uri.query_pairs().into_owned().collect()
    }

    #[test]
    fn parses_plugin_settings() {
        let config = OAuth2Configuration::from_plugin(&plugin(&[
            ("AuthorizationEndpoint", "https://login.example.com/authorize"),
            ("TokenEndpoint", "https://login.example.com/token"),
            ("ClientID", "client"),
            ("Resource", "urn:mfiles"),
            ("UseIdTokenAsAccessToken", "TRUE"),
            ("UsePkceWithAuthorizationCode", "false"),
            ("PromptLoginParameter", "login"),
        ]));
        assert_eq!(config.client_id.as_deref(), Some("client"));
        assert!(config.use_id_token_as_access_token);
        assert!(!config.use_pkce);
        assert!(config.force_login);
        assert_eq!(config.redirect_uri, FALLBACK_REDIRECT_URI);
        assert!(config.vault_guid.is_some());
    }

    #[test]
    fn redirect_uri_precedence() {
        let mut config = OAuth2Configuration::default();
        assert_eq!(config.appropriate_redirect_uri(), FALLBACK_REDIRECT_URI);

        config.redirect_uri = "https://app.example.com/cb".to_string();
        assert_eq!(config.appropriate_redirect_uri(), "https://app.example.com/cb");

        config.redirect_uri_for_native = Some("myapp://cb".to_string());
        assert_eq!(config.appropriate_redirect_uri(), "myapp://cb");

        config.redirect_uri_for_native = Some("  ".to_string());
        config.redirect_uri = String::new();
        assert_eq!(config.appropriate_redirect_uri(), FALLBACK_REDIRECT_URI);
    }

    #[test]
    fn authorization_uri_parameters() {
        let config = OAuth2Configuration::from_plugin(&plugin(&[
            ("AuthorizationEndpoint", "https://login.example.com/authorize"),
            ("ClientID", "client id"),
            ("Resource", "urn:mfiles"),
            ("PromptLoginParameter", "login"),
        ]));
        let request = config.generate_authorization_uri(None).unwrap();
        let params = query(&request.uri);

        assert_eq!(params["client_id"], "client id");
        assert_eq!(params["redirect_uri"], FALLBACK_REDIRECT_URI);
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["prompt"], "login");
        assert_eq!(params["resource"], "urn:mfiles");
        assert!(params["state"].starts_with('{'));
        assert!(!params.contains_key("scope"));
        assert!(!params.contains_key("code_challenge"));
        assert!(request.code_verifier.is_none());
    }

    #[test]
    fn explicit_redirect_uri_wins() {
        let config = OAuth2Configuration {
            authorization_endpoint: Some("https://login.example.com/authorize".to_string()),
            ..Default::default()
        };
        let request = config
            .generate_authorization_uri(Some("https://mine.example.com"))
            .unwrap();
        assert_eq!(query(&request.uri)["redirect_uri"], "https://mine.example.com");
        assert_eq!(request.redirect_uri, "https://mine.example.com");
    }

    #[test]
    fn pkce_challenge_matches_verifier() {
        let config = OAuth2Configuration {
            authorization_endpoint: Some("https://login.example.com/authorize".to_string()),
            use_pkce: true,
            ..Default::default()
        };
        let request = config.generate_authorization_uri(None).unwrap();
        let verifier = request.code_verifier.unwrap();
        let params = query(&request.uri);

        assert_eq!(verifier.len(), 43);
        assert!(!verifier.contains(['+', '/', '=']));
        assert_eq!(params["code_challenge_method"], "S256");
        assert_eq!(params["code_challenge"], create_code_challenge(&verifier));
    }

    #[test]
    fn rfc7636_challenge_vector() {
        assert_eq!(
            create_code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn missing_endpoint_is_config_error() {
        let config = OAuth2Configuration::default();
        assert!(matches!(
            config.generate_authorization_uri(None),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(config.token_endpoint(), Err(ClientError::Config(_))));
    }
}
