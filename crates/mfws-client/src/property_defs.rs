//! Property definitions.

use crate::client::{ClientError, MfwsClient};
use crate::workflows::{resolve_aliases, single};
use mfws_model::PropertyDef;

/// Property definition operations, obtained from [`MfwsClient::property_defs`].
#[derive(Debug, Clone, Copy)]
pub struct PropertyDefOperations<'a> {
    client: &'a MfwsClient,
}

impl<'a> PropertyDefOperations<'a> {
    pub(crate) fn new(client: &'a MfwsClient) -> Self {
        Self { client }
    }

    /// All property definitions in the vault.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_property_definitions(&self) -> Result<Vec<PropertyDef>, ClientError> {
        let defs: Option<Vec<PropertyDef>> = self.client.get("/REST/structure/properties").await?;
        Ok(defs.unwrap_or_default())
    }

    /// One property definition.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for a negative id, or error
    /// on network or API errors.
    pub async fn get_property_definition(&self, id: i32) -> Result<PropertyDef, ClientError> {
        if id < 0 {
            return Err(ClientError::InvalidArgument(format!(
                "the property definition {id} is invalid"
            )));
        }
        self.client
            .get(&format!("/REST/structure/properties/{id}"))
            .await
    }

    /// Property definition ids for the given aliases, in input order.
    /// Unknown aliases map to [`UNRESOLVED_ALIAS`](crate::UNRESOLVED_ALIAS).
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_property_definition_ids_by_aliases(
        &self,
        aliases: &[&str],
    ) -> Result<Vec<i32>, ClientError> {
        resolve_aliases(self.client, "properties", aliases).await
    }

    /// Property definition id for one alias.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_property_definition_id_by_alias(
        &self,
        alias: &str,
    ) -> Result<i32, ClientError> {
        single(self.get_property_definition_ids_by_aliases(&[alias]).await?)
    }
}
