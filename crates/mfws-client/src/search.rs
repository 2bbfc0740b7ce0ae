//! Object searches.

use crate::client::{ClientError, MfwsClient};
use mfws_core::{build_search_query, SearchCondition, SearchLimit, SearchQuery};
use mfws_model::{ObjectVersion, Results};

const OBJECTS_RESOURCE: &str = "/REST/objects";

/// Search operations, obtained from [`MfwsClient::search`].
#[derive(Debug, Clone, Copy)]
pub struct ObjectSearchOperations<'a> {
    client: &'a MfwsClient,
}

impl<'a> ObjectSearchOperations<'a> {
    pub(crate) fn new(client: &'a MfwsClient) -> Self {
        Self { client }
    }

    /// Quick search for a term, optionally restricted to one object type.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn search_for_objects_by_string(
        &self,
        term: &str,
        object_type: Option<i32>,
        limit: impl Into<SearchLimit>,
    ) -> Result<Vec<ObjectVersion>, ClientError> {
        let mut conditions = vec![SearchCondition::quick_search(term)];
        if let Some(object_type) = object_type {
            conditions.push(SearchCondition::object_type(object_type));
        }
        self.search_for_objects_by_conditions(&conditions, limit)
            .await
    }

    /// Search with an ordered list of conditions.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Encoding`] if a condition cannot be encoded
    /// (nothing is sent in that case), or error on network or API errors.
    pub async fn search_for_objects_by_conditions(
        &self,
        conditions: &[SearchCondition],
        limit: impl Into<SearchLimit>,
    ) -> Result<Vec<ObjectVersion>, ClientError> {
        let resource = format!(
            "{OBJECTS_RESOURCE}{}",
            build_search_query(conditions, limit.into())?
        );
        let results: Option<Results<ObjectVersion>> = self.client.get(&resource).await?;
        Ok(results.map(|r| r.items).unwrap_or_default())
    }

    /// Run a prepared [`SearchQuery`].
    ///
    /// # Errors
    ///
    /// See [`Self::search_for_objects_by_conditions`].
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<ObjectVersion>, ClientError> {
        let resource = format!("{OBJECTS_RESOURCE}{}", query.build()?);
        let results: Option<Results<ObjectVersion>> = self.client.get(&resource).await?;
        Ok(results.map(|r| r.items).unwrap_or_default())
    }
}
