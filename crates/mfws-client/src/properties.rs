//! Object property operations, assignments and workflow state changes.

use crate::client::{ClientError, MfwsClient};
use crate::transport::Method;
use mfws_core::{build_object_path, ObjectIdentifier, PathTemplate};
use mfws_model::{
    AssignmentState, ExtendedObjectVersion, ObjVer, ObjectVersion,
    ObjectVersionUpdateInformation, ObjectWorkflowState, ObjectsUpdateInfo, PrimitiveType,
    PropertyValue, ASSIGNMENT_OBJECT_TYPE,
};

/// Extension needed by the server to reject assignments.
const REJECT_EXTENSION: &str = "mfwa";

/// Property operations, obtained from [`MfwsClient::properties`].
#[derive(Debug, Clone, Copy)]
pub struct ObjectPropertyOperations<'a> {
    client: &'a MfwsClient,
}

impl<'a> ObjectPropertyOperations<'a> {
    pub(crate) fn new(client: &'a MfwsClient) -> Self {
        Self { client }
    }

    /// All property values on an object version.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier is invalid, or on network or API
    /// errors.
    pub async fn get_properties(
        &self,
        object: &ObjectIdentifier,
    ) -> Result<Vec<PropertyValue>, ClientError> {
        let resource = build_object_path(
            object,
            &PathTemplate::OBJECT_VERSION.with_suffix("/properties.aspx"),
        )?;
        let properties: Option<Vec<PropertyValue>> = self.client.get(&resource).await?;
        Ok(properties.unwrap_or_default())
    }

    /// Property values of several object versions in one request.
    ///
    /// Results are in the same order as `versions`. An empty input returns
    /// an empty result without contacting the server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] if any version is below 1,
    /// or error on network or API errors.
    pub async fn get_properties_of_multiple_objects(
        &self,
        versions: &[ObjVer],
    ) -> Result<Vec<Vec<PropertyValue>>, ClientError> {
        if versions.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(invalid) = versions.iter().find(|v| v.version < 1) {
            return Err(ClientError::InvalidArgument(format!(
                "the object version must be greater than zero (object {}-{} has version {})",
                invalid.object_type, invalid.id, invalid.version
            )));
        }

        let properties: Option<Vec<Vec<PropertyValue>>> = self
            .client
            .post("/REST/objects/properties.aspx", versions)
            .await?;
        Ok(properties.unwrap_or_default())
    }

    /// One property value on an object version.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier or property definition is invalid,
    /// or on network or API errors.
    pub async fn get_property(
        &self,
        object: &ObjectIdentifier,
        property_def: i32,
    ) -> Result<PropertyValue, ClientError> {
        check_property_def(property_def)?;
        let resource = build_object_path(
            object,
            &PathTemplate::OBJECT_VERSION.with_suffix(format!("/properties/{property_def}")),
        )?;
        self.client.get(&resource).await
    }

    /// Set one property value.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier or property definition is invalid,
    /// or on network or API errors.
    pub async fn set_property(
        &self,
        object: &ObjectIdentifier,
        value: &PropertyValue,
    ) -> Result<ExtendedObjectVersion, ClientError> {
        check_property_def(value.property_def)?;
        let resource = build_object_path(
            object,
            &PathTemplate::OBJECT_VERSION
                .with_suffix(format!("/properties/{}", value.property_def)),
        )?;
        self.client.put(&resource, value).await
    }

    /// Set several property values.
    ///
    /// With `replace_all` the given values replace every property on the
    /// object (PUT); otherwise they are merged into the existing ones (POST).
    ///
    /// # Errors
    ///
    /// Returns error if the identifier is invalid, or on network or API
    /// errors.
    pub async fn set_properties(
        &self,
        object: &ObjectIdentifier,
        values: &[PropertyValue],
        replace_all: bool,
    ) -> Result<ExtendedObjectVersion, ClientError> {
        let resource = build_object_path(
            object,
            &PathTemplate::OBJECT_VERSION.with_suffix("/properties"),
        )?;
        let method = if replace_all { Method::Put } else { Method::Post };
        self.client
            .with_body(method, &resource, values, &[])
            .await
    }

    /// Update properties on several objects in one request.
    ///
    /// An empty input returns an empty result without contacting the server.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn set_properties_of_multiple_objects(
        &self,
        updates: &[ObjectVersionUpdateInformation],
    ) -> Result<Vec<ExtendedObjectVersion>, ClientError> {
        if updates.is_empty() {
            return Ok(Vec::new());
        }

        let body = ObjectsUpdateInfo {
            multiple_object_info: updates.to_vec(),
        };
        let versions: Option<Vec<ExtendedObjectVersion>> = self
            .client
            .put("/REST/objects/setmultipleobjproperties", &body)
            .await?;
        Ok(versions.unwrap_or_default())
    }

    /// Remove a property from an object version.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier or property definition is invalid,
    /// or on network or API errors.
    pub async fn remove_property(
        &self,
        object: &ObjectIdentifier,
        property_def: i32,
    ) -> Result<ExtendedObjectVersion, ClientError> {
        check_property_def(property_def)?;
        let resource = build_object_path(
            object,
            &PathTemplate::OBJECT_VERSION.with_suffix(format!("/properties/{property_def}.aspx")),
        )?;
        self.client.delete(&resource).await
    }

    /// Whether the current user can complete an assignment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] if the object is not an
    /// assignment, or error on network or API errors.
    pub async fn can_complete_assignment(
        &self,
        assignment: &ObjectIdentifier,
    ) -> Result<bool, ClientError> {
        check_assignment(assignment.object_type())?;
        let resource = build_object_path(
            assignment,
            &PathTemplate::ASSIGNMENT.with_suffix("/canCompleteAssignment.aspx"),
        )?;
        let result: PrimitiveType<bool> = self.client.get(&resource).await?;
        Ok(result.value)
    }

    /// Approve (complete) or reject an assignment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] if the object is not an
    /// assignment, or error on network or API errors.
    pub async fn approve_or_reject_assignment(
        &self,
        assignment: &ObjectIdentifier,
        approve: bool,
        comment: Option<&str>,
    ) -> Result<ObjectVersion, ClientError> {
        check_assignment(assignment.object_type())?;

        let suffix = if approve { "/complete.aspx" } else { "/reject.aspx" };
        let resource =
            build_object_path(assignment, &PathTemplate::OBJECT_VERSION.with_suffix(suffix))?;
        let extensions: &[&str] = if approve { &[] } else { &[REJECT_EXTENSION] };

        let body = AssignmentState {
            comment: comment.map(str::to_string),
        };
        self.client
            .with_body(Method::Put, &resource, &body, extensions)
            .await
    }

    /// Approve (complete) an assignment.
    ///
    /// # Errors
    ///
    /// See [`Self::approve_or_reject_assignment`].
    pub async fn approve_assignment(
        &self,
        assignment: &ObjectIdentifier,
        comment: Option<&str>,
    ) -> Result<ObjectVersion, ClientError> {
        self.approve_or_reject_assignment(assignment, true, comment)
            .await
    }

    /// Reject an assignment.
    ///
    /// # Errors
    ///
    /// See [`Self::approve_or_reject_assignment`].
    pub async fn reject_assignment(
        &self,
        assignment: &ObjectIdentifier,
        comment: Option<&str>,
    ) -> Result<ObjectVersion, ClientError> {
        self.approve_or_reject_assignment(assignment, false, comment)
            .await
    }

    /// Move an object version to another workflow state.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier is invalid, or on network or API
    /// errors.
    pub async fn set_workflow_state(
        &self,
        object: &ObjectIdentifier,
        state_id: i32,
    ) -> Result<ObjectVersion, ClientError> {
        let resource = build_object_path(
            object,
            &PathTemplate::OBJECT_VERSION.with_suffix("/workflowstate"),
        )?;
        let body = ObjectWorkflowState {
            state_id,
            version_comment: None,
        };
        self.client.put(&resource, &body).await
    }
}

fn check_property_def(property_def: i32) -> Result<(), ClientError> {
    if property_def < 0 {
        return Err(ClientError::InvalidArgument(format!(
            "the property definition {property_def} is invalid"
        )));
    }
    Ok(())
}

fn check_assignment(object_type: i32) -> Result<(), ClientError> {
    if object_type != ASSIGNMENT_OBJECT_TYPE {
        return Err(ClientError::InvalidArgument(format!(
            "object type {object_type} is not an assignment"
        )));
    }
    Ok(())
}
