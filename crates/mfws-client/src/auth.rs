//! Authentication and session management.
//!
//! Each call that changes session state returns a new [`MfwsClient`]
//! carrying the updated [`RequestContext`](crate::RequestContext); the
//! original client is left untouched.

use crate::client::{decode, ClientError, MfwsClient};
use crate::transport::{Method, RequestBody};
use mfws_model::{Authentication, PluginInfoConfiguration, PrimitiveType, Vault};
use uuid::Uuid;

impl MfwsClient {
    /// Exchange credentials for an authentication token.
    ///
    /// Any existing token, bearer token and cookies are dropped before the
    /// request is sent.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors, or if the server does not
    /// return a token.
    pub async fn authenticate_using_credentials(
        &self,
        authentication: &Authentication,
    ) -> Result<MfwsClient, ClientError> {
        let anonymous = self.with_context(self.context().clone().without_authentication());

        let body = serde_json::to_value(authentication)
            .map_err(|e| ClientError::Parse(format!("failed to serialize credentials: {e}")))?;
        let response = anonymous
            .dispatch(
                Method::Post,
                "/REST/server/authenticationtokens",
                Some(RequestBody::Json(body)),
                &[],
            )
            .await?;

        let token: Option<PrimitiveType<Option<String>>> = decode(&response)?;
        let token = token
            .and_then(|t| t.value)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ClientError::Parse("authentication response did not contain a token".to_string())
            })?;

        tracing::info!(
            vault = ?authentication.vault_guid,
            cookies = response.set_cookies.len(),
            "Authenticated using credentials"
        );

        Ok(anonymous.with_context(
            anonymous
                .context()
                .clone()
                .with_authentication_token(token)
                .with_response_cookies(&response.set_cookies),
        ))
    }

    /// Authenticate through Windows single sign-on.
    ///
    /// The server answers with session cookies, which the returned client
    /// sends on subsequent requests.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn authenticate_using_single_sign_on(
        &self,
        vault_guid: Uuid,
    ) -> Result<MfwsClient, ClientError> {
        let anonymous = self.with_context(self.context().clone().without_authentication());

        let resource = format!(
            "/WebServiceSSO.aspx?popup=1&vault={}",
            vault_guid.hyphenated().to_string().to_uppercase()
        );
        let response = anonymous.dispatch(Method::Get, &resource, None, &[]).await?;

        tracing::info!(
            vault = %vault_guid,
            cookies = response.set_cookies.len(),
            "Authenticated using single sign-on"
        );

        Ok(anonymous.with_context(
            anonymous
                .context()
                .clone()
                .with_response_cookies(&response.set_cookies),
        ))
    }

    /// End the current session.
    ///
    /// Returns a client without token or cookies. A selected vault is kept.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn log_out(&self) -> Result<MfwsClient, ClientError> {
        self.dispatch(Method::Delete, "/REST/session.aspx", None, &[])
            .await?;

        tracing::debug!("Logged out");

        Ok(self.with_context(self.context().clone().without_authentication()))
    }

    /// List the vaults that are online and visible to the current user.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_online_vaults(&self) -> Result<Vec<Vault>, ClientError> {
        let vaults: Option<Vec<Vault>> = self.get("/REST/server/vaults?online=true").await?;
        Ok(vaults.unwrap_or_default())
    }

    /// List the configured authentication plugins.
    ///
    /// Pass a vault to include vault-specific plugins. The returned client
    /// carries the cookies set by the server, which some multi-server
    /// deployments need on the follow-up authentication request.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_authentication_plugins(
        &self,
        vault_guid: Option<Uuid>,
    ) -> Result<(MfwsClient, Vec<PluginInfoConfiguration>), ClientError> {
        let resource = match vault_guid {
            Some(guid) => format!("/REST/server/authenticationprotocols?vault={}", guid.braced()),
            None => "/REST/server/authenticationprotocols".to_string(),
        };

        let response = self.dispatch(Method::Get, &resource, None, &[]).await?;
        let plugins: Option<Vec<PluginInfoConfiguration>> = decode(&response)?;
        let client = self.with_context(
            self.context()
                .clone()
                .with_response_cookies(&response.set_cookies),
        );

        Ok((client, plugins.unwrap_or_default()))
    }
}
