//! Class groups.

use crate::client::{ClientError, MfwsClient};
use mfws_model::ClassGroup;

/// Class group operations, obtained from [`MfwsClient::class_groups`].
#[derive(Debug, Clone, Copy)]
pub struct ClassGroupOperations<'a> {
    client: &'a MfwsClient,
}

impl<'a> ClassGroupOperations<'a> {
    pub(crate) fn new(client: &'a MfwsClient) -> Self {
        Self { client }
    }

    /// Classes of an object type, grouped by class group.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_class_groups(&self, object_type: i32) -> Result<Vec<ClassGroup>, ClientError> {
        let groups: Option<Vec<ClassGroup>> = self
            .client
            .get(&format!(
                "/REST/structure/classes.aspx?objtype={object_type}&bygroup=true"
            ))
            .await?;
        Ok(groups.unwrap_or_default())
    }
}
