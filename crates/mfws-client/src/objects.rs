//! Object operations: creation, titles, check-out, deletion, history and
//! favorites.

use crate::client::{ClientError, MfwsClient};
use mfws_core::{build_object_path, ObjectIdentifier, PathTemplate};
use mfws_model::{
    CheckOutStatus, ExtendedObjectVersion, ObjId, ObjectCreationInfo, ObjectVersion,
    PrimitiveType,
};

/// Object operations, obtained from [`MfwsClient::objects`].
#[derive(Debug, Clone, Copy)]
pub struct ObjectOperations<'a> {
    client: &'a MfwsClient,
}

impl<'a> ObjectOperations<'a> {
    pub(crate) fn new(client: &'a MfwsClient) -> Self {
        Self { client }
    }

    /// Latest version of an object together with its properties.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier is invalid, or on network or API
    /// errors.
    pub async fn get_latest_object_version_and_properties(
        &self,
        object: &ObjectIdentifier,
    ) -> Result<ExtendedObjectVersion, ClientError> {
        let resource = build_object_path(
            object,
            &PathTemplate::OBJECT_LATEST.with_suffix(".aspx?include=properties"),
        )?;
        self.client.get(&resource).await
    }

    /// Create an object of the given type.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for a negative object type,
    /// or error on network or API errors.
    pub async fn create_new_object(
        &self,
        object_type: i32,
        creation_info: &ObjectCreationInfo,
    ) -> Result<ObjectVersion, ClientError> {
        if object_type < 0 {
            return Err(ClientError::InvalidArgument(
                "the object type id cannot be less than zero".to_string(),
            ));
        }
        self.client
            .post(&format!("/REST/objects/{object_type}"), creation_info)
            .await
    }

    /// Change the title of an object version.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier is invalid, or on network or API
    /// errors.
    pub async fn set_title(
        &self,
        object: &ObjectIdentifier,
        title: &str,
    ) -> Result<ObjectVersion, ClientError> {
        let resource =
            build_object_path(object, &PathTemplate::OBJECT_VERSION.with_suffix("/title"))?;
        self.client
            .put(&resource, &PrimitiveType::new(title))
            .await
    }

    /// Check-out state of an object version.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier is invalid, or on network or API
    /// errors.
    pub async fn get_checkout_status(
        &self,
        object: &ObjectIdentifier,
    ) -> Result<CheckOutStatus, ClientError> {
        let resource = build_object_path(
            object,
            &PathTemplate::OBJECT_VERSION.with_suffix("/checkedout"),
        )?;
        let status: PrimitiveType<CheckOutStatus> = self.client.get(&resource).await?;
        Ok(status.value)
    }

    /// Check an object out or in.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier is invalid, or on network or API
    /// errors.
    pub async fn set_checkout_status(
        &self,
        object: &ObjectIdentifier,
        status: CheckOutStatus,
    ) -> Result<ObjectVersion, ClientError> {
        let resource = build_object_path(
            object,
            &PathTemplate::OBJECT_VERSION.with_suffix("/checkedout"),
        )?;
        self.client
            .put(&resource, &PrimitiveType::new(status))
            .await
    }

    /// Discard a check-out made by the current user.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier is invalid, or on network or API
    /// errors.
    pub async fn undo_checkout(
        &self,
        object: &ObjectIdentifier,
    ) -> Result<ObjectVersion, ClientError> {
        self.delete_checkout(object, false).await
    }

    /// Discard a check-out made by any user.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier is invalid, or on network or API
    /// errors.
    pub async fn force_undo_checkout(
        &self,
        object: &ObjectIdentifier,
    ) -> Result<ObjectVersion, ClientError> {
        self.delete_checkout(object, true).await
    }

    async fn delete_checkout(
        &self,
        object: &ObjectIdentifier,
        force: bool,
    ) -> Result<ObjectVersion, ClientError> {
        let resource = build_object_path(
            object,
            &PathTemplate::OBJECT_VERSION.with_suffix(format!("?force={force}")),
        )?;
        self.client.delete(&resource).await
    }

    /// Mark an object as deleted.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier is invalid, or on network or API
    /// errors.
    pub async fn delete_object(
        &self,
        object: &ObjectIdentifier,
    ) -> Result<ObjectVersion, ClientError> {
        self.set_deleted(object, true).await
    }

    /// Restore a deleted object.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier is invalid, or on network or API
    /// errors.
    pub async fn undelete_object(
        &self,
        object: &ObjectIdentifier,
    ) -> Result<ObjectVersion, ClientError> {
        self.set_deleted(object, false).await
    }

    async fn set_deleted(
        &self,
        object: &ObjectIdentifier,
        deleted: bool,
    ) -> Result<ObjectVersion, ClientError> {
        let resource = build_object_path(object, &PathTemplate::OBJECT.with_suffix("/deleted"))?;
        self.client
            .put(&resource, &PrimitiveType::new(deleted))
            .await
    }

    /// Permanently destroy an object, or one version of it.
    ///
    /// With `all_versions` the identifier's version is ignored.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier is invalid, or on network or API
    /// errors.
    pub async fn destroy_object(
        &self,
        object: &ObjectIdentifier,
        all_versions: bool,
    ) -> Result<ObjectVersion, ClientError> {
        let target = if all_versions {
            object.clone().latest()
        } else {
            object.clone()
        };
        let resource = build_object_path(
            &target,
            &PathTemplate::OBJECT_VERSION.with_suffix(format!("?allVersions={all_versions}")),
        )?;
        self.client.delete(&resource).await
    }

    /// All versions of an object, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier is invalid, or on network or API
    /// errors.
    pub async fn get_history(
        &self,
        object: &ObjectIdentifier,
    ) -> Result<Vec<ObjectVersion>, ClientError> {
        let resource = build_object_path(object, &PathTemplate::OBJECT.with_suffix("/history"))?;
        let history: Option<Vec<ObjectVersion>> = self.client.get(&resource).await?;
        Ok(history.unwrap_or_default())
    }

    /// Add an object to the current user's favorites.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier is invalid, or on network or API
    /// errors.
    pub async fn add_to_favorites(
        &self,
        object: &ObjectIdentifier,
    ) -> Result<ExtendedObjectVersion, ClientError> {
        object.validate()?;
        self.client
            .post("/REST/favorites", &ObjId::from(object))
            .await
    }

    /// Remove an object from the current user's favorites.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier is invalid, or on network or API
    /// errors.
    pub async fn remove_from_favorites(
        &self,
        object: &ObjectIdentifier,
    ) -> Result<ExtendedObjectVersion, ClientError> {
        let resource = build_object_path(object, &PathTemplate::FAVORITE)?;
        self.client.delete(&resource).await
    }
}
