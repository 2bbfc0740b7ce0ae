//! HTTP transport.
//!
//! Operations describe each call as a [`RestRequest`] and hand it to a
//! [`Transport`]. The default transport is backed by `reqwest`; tests and
//! embedders can supply their own.

use crate::client::ClientError;
use crate::config::MfwsClientConfig;
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::fmt;

/// HTTP methods used by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
        }
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON document
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` fields
    Form(Vec<(String, String)>),
}

/// A single request to the service.
#[derive(Debug, Clone, PartialEq)]
pub struct RestRequest {
    /// HTTP method
    pub method: Method,
    /// Path and query relative to the base URL, or an absolute URL
    pub resource: String,
    /// Headers, in the order they are sent
    pub headers: Vec<(String, String)>,
    /// Optional body
    pub body: Option<RequestBody>,
}

impl RestRequest {
    /// Request with no headers or body.
    #[must_use]
    pub fn new(method: Method, resource: impl Into<String>) -> Self {
        Self {
            method,
            resource: resource.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Value of the first header with this name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The service's reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw body
    pub body: Vec<u8>,
    /// `Set-Cookie` header values
    pub set_cookies: Vec<String>,
}

impl RestResponse {
    /// Successful response with a JSON body.
    #[must_use]
    pub fn json(value: &serde_json::Value) -> Self {
        Self {
            status: 200,
            body: value.to_string().into_bytes(),
            set_cookies: Vec::new(),
        }
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends requests to the service.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request.
    ///
    /// Non-2xx statuses are returned as responses, not errors.
    async fn execute(&self, request: RestRequest) -> Result<RestResponse, ClientError>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a transport for the configured server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the base URL is invalid, or
    /// [`ClientError::Init`] if the HTTP client cannot be created.
    pub fn new(config: &MfwsClientConfig) -> Result<Self, ClientError> {
        let base_url = config.validated_base_url()?;

        let redirects = if config.follow_redirects {
            Policy::limited(10)
        } else {
            Policy::none()
        };

        let mut builder = Client::builder()
            .timeout(config.timeout)
            .redirect(redirects);
        if base_url.scheme() == "https" {
            builder = builder.use_rustls_tls();
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, resource: &str) -> String {
        if resource.starts_with("http://") || resource.starts_with("https://") {
            resource.to_string()
        } else {
            format!("{}{}", self.base_url, resource)
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: RestRequest) -> Result<RestResponse, ClientError> {
        let url = self.url_for(&request.resource);

        let mut builder = self.client.request(request.method.into(), &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Form(fields)) => builder.form(&fields),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let set_cookies = response
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?
            .to_vec();

        tracing::trace!(status, bytes = body.len(), "MFWS response");

        Ok(RestResponse {
            status,
            body,
            set_cookies,
        })
    }
}
