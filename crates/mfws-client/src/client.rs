//! The web service client and its request context.
//!
//! [`MfwsClient`] is cheap to clone and never mutated after construction.
//! Session state (authentication token, vault, language, cookies) lives in
//! a [`RequestContext`]; operations that change it return a new client.

use crate::class_groups::ClassGroupOperations;
use crate::config::MfwsClientConfig;
use crate::objects::ObjectOperations;
use crate::properties::ObjectPropertyOperations;
use crate::property_defs::PropertyDefOperations;
use crate::search::ObjectSearchOperations;
use crate::transport::{Method, ReqwestTransport, RequestBody, RestRequest, RestResponse, Transport};
use crate::value_lists::ValueListItemOperations;
use crate::workflows::WorkflowOperations;
use mfws_core::EncodingError;
use mfws_model::{VaultStructureAliasRequest, VaultStructureAliasResponse, WebServiceError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Header carrying the authentication token.
pub const AUTHENTICATION_HEADER: &str = "X-Authentication";
/// Header selecting the vault.
pub const VAULT_HEADER: &str = "X-Vault";
/// Header carrying preferred languages.
pub const ACCEPT_LANGUAGE_HEADER: &str = "Accept-Language";
/// Header carrying the pre-shared key.
pub const PRESHARED_KEY_HEADER: &str = "X-PresharedKey";
/// Header requesting service extensions.
pub const EXTENSIONS_HEADER: &str = "X-Extensions";
/// Header carrying OAuth 2.0 bearer tokens.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Per-session request state, applied to every request as headers.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    authentication_token: Option<String>,
    bearer_token: Option<String>,
    vault_guid: Option<Uuid>,
    accept_language: Option<String>,
    preshared_key: Option<String>,
    extensions: Vec<String>,
    cookies: Vec<(String, String)>,
}

impl RequestContext {
    /// Context seeded from configuration.
    #[must_use]
    pub fn from_config(config: &MfwsClientConfig) -> Self {
        let mut context = Self {
            vault_guid: config.vault_guid,
            extensions: config.extensions.clone(),
            ..Self::default()
        };
        if let Some(language) = &config.accept_language {
            context = context.with_accept_language([language.as_str()]);
        }
        if let Some(key) = &config.preshared_key {
            context = context.with_preshared_key(key.as_str());
        }
        context
    }

    /// Set the `X-Authentication` token.
    #[must_use]
    pub fn with_authentication_token(mut self, token: impl Into<String>) -> Self {
        self.authentication_token = Some(token.into());
        self
    }

    /// The `X-Authentication` token, if authenticated.
    #[must_use]
    pub fn authentication_token(&self) -> Option<&str> {
        self.authentication_token.as_deref()
    }

    /// Set an OAuth 2.0 bearer token.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// The OAuth 2.0 bearer token, if any.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    /// Select a vault via `X-Vault`.
    #[must_use]
    pub fn with_vault(mut self, vault_guid: Uuid) -> Self {
        self.vault_guid = Some(vault_guid);
        self
    }

    /// Stop sending `X-Vault`.
    #[must_use]
    pub fn without_vault(mut self) -> Self {
        self.vault_guid = None;
        self
    }

    /// The selected vault.
    #[must_use]
    pub fn vault_guid(&self) -> Option<Uuid> {
        self.vault_guid
    }

    /// Set preferred languages; an empty list removes the header.
    #[must_use]
    pub fn with_accept_language<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = languages
            .into_iter()
            .map(|l| l.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.accept_language = Some(joined).filter(|l| !l.is_empty());
        self
    }

    /// The `Accept-Language` value.
    #[must_use]
    pub fn accept_language(&self) -> Option<&str> {
        self.accept_language.as_deref()
    }

    /// Set the pre-shared key; a blank key removes the header.
    #[must_use]
    pub fn with_preshared_key(mut self, key: impl Into<String>) -> Self {
        self.preshared_key = Some(key.into()).filter(|k| !k.trim().is_empty());
        self
    }

    /// Request service extensions on every call.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Session cookies, as name/value pairs.
    #[must_use]
    pub fn cookies(&self) -> &[(String, String)] {
        &self.cookies
    }

    /// Replace the session cookies with those set by a response.
    #[must_use]
    pub fn with_response_cookies(mut self, set_cookies: &[String]) -> Self {
        self.cookies = set_cookies
            .iter()
            .filter_map(|header| parse_set_cookie(header))
            .collect();
        self
    }

    /// Drop the token, bearer token and cookies. The vault is kept.
    #[must_use]
    pub fn without_authentication(mut self) -> Self {
        self.authentication_token = None;
        self.bearer_token = None;
        self.cookies.clear();
        self
    }

    /// Render the headers for one request.
    ///
    /// `extra_extensions` are merged into `X-Extensions` for this request only.
    #[must_use]
    pub fn headers(&self, extra_extensions: &[&str]) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        if let Some(token) = &self.authentication_token {
            headers.push((AUTHENTICATION_HEADER.to_string(), token.clone()));
        }
        if let Some(token) = &self.bearer_token {
            headers.push((AUTHORIZATION_HEADER.to_string(), format!("Bearer {token}")));
        }
        if let Some(vault) = self.vault_guid {
            headers.push((VAULT_HEADER.to_string(), vault.braced().to_string()));
        }
        if let Some(language) = &self.accept_language {
            headers.push((ACCEPT_LANGUAGE_HEADER.to_string(), language.clone()));
        }
        if let Some(key) = &self.preshared_key {
            headers.push((PRESHARED_KEY_HEADER.to_string(), key.clone()));
        }

        let mut extensions: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        for extension in extra_extensions {
            if !extensions.contains(extension) {
                extensions.push(*extension);
            }
        }
        if !extensions.is_empty() {
            headers.push((EXTENSIONS_HEADER.to_string(), extensions.join(",")));
        }

        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            headers.push(("Cookie".to_string(), cookie));
        }
        headers
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("authenticated", &self.authentication_token.is_some())
            .field("bearer", &self.bearer_token.is_some())
            .field("vault_guid", &self.vault_guid)
            .field("accept_language", &self.accept_language)
            .field("preshared_key", &self.preshared_key.is_some())
            .field("extensions", &self.extensions)
            .field("cookies", &self.cookies.len())
            .finish()
    }
}

fn parse_set_cookie(header: &str) -> Option<(String, String)> {
    let pair = header.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}

/// Client for the M-Files Web Service REST API.
#[derive(Clone)]
pub struct MfwsClient {
    transport: Arc<dyn Transport>,
    context: RequestContext,
}

impl fmt::Debug for MfwsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MfwsClient")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl MfwsClient {
    /// Create a client using the `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: MfwsClientConfig) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(Arc::new(transport), &config))
    }

    /// Create a client over a custom transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>, config: &MfwsClientConfig) -> Self {
        Self {
            transport,
            context: RequestContext::from_config(config),
        }
    }

    /// The current request context.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// A client sharing this transport with a different context.
    #[must_use]
    pub fn with_context(&self, context: RequestContext) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            context,
        }
    }

    /// A client that selects the given vault via `X-Vault`.
    #[must_use]
    pub fn with_vault(&self, vault_guid: Uuid) -> Self {
        self.with_context(self.context.clone().with_vault(vault_guid))
    }

    /// A client that sends no `X-Vault` header.
    #[must_use]
    pub fn without_vault(&self) -> Self {
        self.with_context(self.context.clone().without_vault())
    }

    /// A client that sends the given `Accept-Language` preferences.
    #[must_use]
    pub fn with_accept_language<I, S>(&self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.with_context(self.context.clone().with_accept_language(languages))
    }

    /// A client that sends the given pre-shared key.
    #[must_use]
    pub fn with_preshared_key(&self, key: impl Into<String>) -> Self {
        self.with_context(self.context.clone().with_preshared_key(key))
    }

    /// A client using a token obtained elsewhere.
    #[must_use]
    pub fn with_authentication_token(&self, token: impl Into<String>) -> Self {
        self.with_context(self.context.clone().with_authentication_token(token))
    }

    /// Object search operations.
    #[must_use]
    pub fn search(&self) -> ObjectSearchOperations<'_> {
        ObjectSearchOperations::new(self)
    }

    /// Object operations.
    #[must_use]
    pub fn objects(&self) -> ObjectOperations<'_> {
        ObjectOperations::new(self)
    }

    /// Object property operations.
    #[must_use]
    pub fn properties(&self) -> ObjectPropertyOperations<'_> {
        ObjectPropertyOperations::new(self)
    }

    /// Value list item operations.
    #[must_use]
    pub fn value_list_items(&self) -> ValueListItemOperations<'_> {
        ValueListItemOperations::new(self)
    }

    /// Workflow operations.
    #[must_use]
    pub fn workflows(&self) -> WorkflowOperations<'_> {
        WorkflowOperations::new(self)
    }

    /// Class group operations.
    #[must_use]
    pub fn class_groups(&self) -> ClassGroupOperations<'_> {
        ClassGroupOperations::new(self)
    }

    /// Property definition operations.
    #[must_use]
    pub fn property_defs(&self) -> PropertyDefOperations<'_> {
        PropertyDefOperations::new(self)
    }

    /// Resolve vault structure aliases to ids in one request.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_metadata_structure_ids_by_aliases(
        &self,
        request: &VaultStructureAliasRequest,
    ) -> Result<VaultStructureAliasResponse, ClientError> {
        self.post(
            "/REST/structure/metadatastructure/itemidbyalias.aspx",
            request,
        )
        .await
    }

    /// Send a request with the context headers applied.
    pub(crate) async fn dispatch(
        &self,
        method: Method,
        resource: &str,
        body: Option<RequestBody>,
        extra_extensions: &[&str],
    ) -> Result<RestResponse, ClientError> {
        let request = RestRequest {
            method,
            resource: resource.to_string(),
            headers: self.context.headers(extra_extensions),
            body,
        };
        self.send(request).await
    }

    /// Send a request as-is, without context headers.
    pub(crate) async fn send(&self, request: RestRequest) -> Result<RestResponse, ClientError> {
        tracing::debug!(method = %request.method, resource = %request.resource, "MFWS request");

        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            return Err(api_error(&response));
        }
        Ok(response)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, resource: &str) -> Result<T, ClientError> {
        let response = self.dispatch(Method::Get, resource, None, &[]).await?;
        decode(&response)
    }

    pub(crate) async fn post<B, T>(&self, resource: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.with_body(Method::Post, resource, body, &[]).await
    }

    pub(crate) async fn put<B, T>(&self, resource: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.with_body(Method::Put, resource, body, &[]).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, resource: &str) -> Result<T, ClientError> {
        let response = self.dispatch(Method::Delete, resource, None, &[]).await?;
        decode(&response)
    }

    pub(crate) async fn with_body<B, T>(
        &self,
        method: Method,
        resource: &str,
        body: &B,
        extra_extensions: &[&str],
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)
            .map_err(|e| ClientError::Parse(format!("failed to serialize request body: {e}")))?;
        let response = self
            .dispatch(method, resource, Some(RequestBody::Json(body)), extra_extensions)
            .await?;
        decode(&response)
    }
}

/// Parse a JSON response body. An empty body reads as `null`.
pub(crate) fn decode<T: DeserializeOwned>(response: &RestResponse) -> Result<T, ClientError> {
    let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &response.body
    };
    serde_json::from_slice(body).map_err(|e| ClientError::Parse(e.to_string()))
}

fn api_error(response: &RestResponse) -> ClientError {
    let message = serde_json::from_slice::<WebServiceError>(&response.body)
        .ok()
        .and_then(|error| {
            if error.message.is_empty() {
                error.exception.map(|e| e.message).filter(|m| !m.is_empty())
            } else {
                Some(error.message)
            }
        })
        .unwrap_or_else(|| response.text());

    tracing::debug!(status = response.status, error = %message, "MFWS request failed");

    ClientError::ApiError {
        status: response.status,
        message,
    }
}

/// Errors that can occur with the web service client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// Client initialization failed
    #[error("client init error: {0}")]
    Init(String),
    /// Configuration is invalid
    #[error("config error: {0}")]
    Config(String),
    /// HTTP request failed
    #[error("request error: {0}")]
    Request(String),
    /// API returned an error status
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },
    /// Response parsing failed
    #[error("parse error: {0}")]
    Parse(String),
    /// A path or query could not be encoded
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    /// An argument was rejected before sending
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn empty_context_sends_no_headers() {
        assert!(RequestContext::default().headers(&[]).is_empty());
    }

    #[test]
    fn vault_header_is_braced() {
        let guid = Uuid::parse_str("c4fc7a5c-5e8b-4a54-a98a-9b0e2f6e7d10").unwrap();
        let headers = RequestContext::default().with_vault(guid).headers(&[]);
        assert_eq!(
            header(&headers, VAULT_HEADER),
            Some("{c4fc7a5c-5e8b-4a54-a98a-9b0e2f6e7d10}")
        );
    }

    #[test]
    fn accept_language_joins_and_clears() {
        let context = RequestContext::default().with_accept_language(["en-GB", "fi"]);
        assert_eq!(context.accept_language(), Some("en-GB,fi"));
        let cleared = context.with_accept_language(Vec::<String>::new());
        assert_eq!(cleared.accept_language(), None);
    }

    #[test]
    fn blank_preshared_key_clears_header() {
        let context = RequestContext::default()
            .with_preshared_key("abc")
            .with_preshared_key(" ");
        assert!(header(&context.headers(&[]), PRESHARED_KEY_HEADER).is_none());
    }

    #[test]
    fn extra_extensions_merge_without_duplicates() {
        let context = RequestContext::default().with_extensions(["mfwa"]);
        let headers = context.headers(&["mfwa", "iml"]);
        assert_eq!(header(&headers, EXTENSIONS_HEADER), Some("mfwa,iml"));
    }

    #[test]
    fn response_cookies_replace_existing() {
        let context = RequestContext::default()
            .with_response_cookies(&["old=1".to_string()])
            .with_response_cookies(&[
                "ASP.NET_SessionId=abc; path=/; HttpOnly".to_string(),
                "garbage".to_string(),
                "lb=node2".to_string(),
            ]);
        assert_eq!(
            header(&context.headers(&[]), "Cookie"),
            Some("ASP.NET_SessionId=abc; lb=node2")
        );
    }

    #[test]
    fn sign_out_keeps_vault() {
        let guid = Uuid::new_v4();
        let context = RequestContext::default()
            .with_vault(guid)
            .with_authentication_token("token")
            .with_bearer_token("bearer")
            .with_response_cookies(&["a=b".to_string()])
            .without_authentication();
        assert_eq!(context.vault_guid(), Some(guid));
        assert!(context.authentication_token().is_none());
        assert!(context.bearer_token().is_none());
        assert!(context.cookies().is_empty());
    }

    #[test]
    fn debug_hides_secrets() {
        let context = RequestContext::default()
            .with_authentication_token("s3cret")
            .with_preshared_key("k3y");
        let rendered = format!("{context:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("k3y"));
    }

    #[test]
    fn decode_treats_empty_body_as_null() {
        let response = RestResponse {
            status: 204,
            ..Default::default()
        };
        let value: Option<Vec<i32>> = decode(&response).unwrap();
        assert!(value.is_none());
        decode::<()>(&response).unwrap();
    }

    struct FixedTransport(RestResponse);

    #[async_trait::async_trait]
    impl Transport for FixedTransport {
        async fn execute(&self, _request: RestRequest) -> Result<RestResponse, ClientError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn failed_status_surfaces_as_api_error() {
        let transport = FixedTransport(RestResponse {
            status: 500,
            body: br#"{"Message":"","Exception":{"Name":"COMException","Message":"Vault offline"}}"#
                .to_vec(),
            set_cookies: Vec::new(),
        });
        let client = MfwsClient::with_transport(Arc::new(transport), &MfwsClientConfig::default());

        let result = tokio_test::block_on(client.get::<serde_json::Value>("/REST/server/vaults"));
        assert!(matches!(
            result,
            Err(ClientError::ApiError { status: 500, message }) if message == "Vault offline"
        ));
    }

    #[test]
    fn api_error_prefers_service_message() {
        let response = RestResponse {
            status: 404,
            body: br#"{"Status":404,"Message":"Not found.","Exception":{"Name":"X","Message":"inner"}}"#
                .to_vec(),
            set_cookies: Vec::new(),
        };
        match api_error(&response) {
            ClientError::ApiError { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not found.");
            }
            other => panic!("unexpected error {other:?}"),
        }

        let plain = RestResponse {
            status: 500,
            body: b"boom".to_vec(),
            set_cookies: Vec::new(),
        };
        assert!(matches!(
            api_error(&plain),
            ClientError::ApiError { message, .. } if message == "boom"
        ));
    }
}
