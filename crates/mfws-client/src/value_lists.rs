//! Value list items.

use crate::client::{ClientError, MfwsClient};
use mfws_core::url_encode;
use mfws_model::{Results, ValueListItem};

/// Value list item operations, obtained from [`MfwsClient::value_list_items`].
#[derive(Debug, Clone, Copy)]
pub struct ValueListItemOperations<'a> {
    client: &'a MfwsClient,
}

impl<'a> ValueListItemOperations<'a> {
    pub(crate) fn new(client: &'a MfwsClient) -> Self {
        Self { client }
    }

    /// Items in a value list, with the server's truncation flag.
    ///
    /// A blank `name_filter` is ignored. `limit` is only sent when positive,
    /// so zero or less leaves the server default in place.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_value_list_items(
        &self,
        value_list: i32,
        name_filter: Option<&str>,
        limit: i32,
    ) -> Result<Results<ValueListItem>, ClientError> {
        let resource = items_resource(value_list, name_filter, limit);
        let results: Option<Results<ValueListItem>> = self.client.get(&resource).await?;
        Ok(results.unwrap_or_default())
    }

    /// Add an item to a value list.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn add_value_list_item(
        &self,
        value_list: i32,
        name: &str,
    ) -> Result<ValueListItem, ClientError> {
        let item = ValueListItem::new(value_list, name);
        self.client
            .post(&format!("/REST/valuelists/{value_list}/items"), &item)
            .await
    }
}

fn items_resource(value_list: i32, name_filter: Option<&str>, limit: i32) -> String {
    let mut resource = format!("/REST/valuelists/{value_list}/items");
    let mut separator = '?';
    if let Some(filter) = name_filter.filter(|f| !f.trim().is_empty()) {
        resource.push(separator);
        resource.push_str("filter=");
        resource.push_str(&url_encode(filter));
        separator = '&';
    }
    if limit > 0 {
        resource.push(separator);
        resource.push_str(&format!("limit={limit}"));
    }
    resource
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_resource_without_filter_or_limit() {
        assert_eq!(items_resource(12, None, 0), "/REST/valuelists/12/items");
        assert_eq!(items_resource(12, Some("  "), -1), "/REST/valuelists/12/items");
    }

    #[test]
    fn filter_is_form_encoded() {
        assert_eq!(
            items_resource(12, Some("North & South"), 0),
            "/REST/valuelists/12/items?filter=North+%26+South"
        );
    }

    #[test]
    fn limit_follows_filter() {
        assert_eq!(items_resource(3, None, 50), "/REST/valuelists/3/items?limit=50");
        assert_eq!(
            items_resource(3, Some("a"), 50),
            "/REST/valuelists/3/items?filter=a&limit=50"
        );
    }
}
