//! Object identity, versions and common envelopes.

use crate::properties::PropertyValue;
use mfws_core::ObjectIdentifier;
use serde::{Deserialize, Serialize};

/// Built-in object type id of assignments.
pub const ASSIGNMENT_OBJECT_TYPE: i32 = 10;

/// Identifies an object regardless of version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjId {
    /// Object type id
    #[serde(rename = "Type")]
    pub object_type: i32,
    /// Object id
    #[serde(rename = "ID")]
    pub id: i32,
    /// External repository name, for unmanaged objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_repository_name: Option<String>,
    /// External object id, for unmanaged objects
    #[serde(
        default,
        rename = "ExternalRepositoryObjectID",
        skip_serializing_if = "Option::is_none"
    )]
    pub external_repository_object_id: Option<String>,
}

impl ObjId {
    /// Managed object id.
    #[must_use]
    pub fn new(object_type: i32, id: i32) -> Self {
        Self {
            object_type,
            id,
            ..Self::default()
        }
    }

    /// The identifier of the latest version of this object.
    #[must_use]
    pub fn identifier(&self) -> ObjectIdentifier {
        match external_parts(
            self.external_repository_name.as_deref(),
            self.external_repository_object_id.as_deref(),
        ) {
            Some((repository, object_id)) => {
                ObjectIdentifier::external(self.object_type, repository, object_id)
            }
            None => ObjectIdentifier::managed(self.object_type, self.id),
        }
    }
}

impl From<&ObjectIdentifier> for ObjId {
    fn from(identifier: &ObjectIdentifier) -> Self {
        match identifier {
            ObjectIdentifier::Managed {
                object_type, id, ..
            } => Self::new(*object_type, *id),
            ObjectIdentifier::External {
                object_type,
                repository,
                object_id,
                ..
            } => Self {
                object_type: *object_type,
                id: 0,
                external_repository_name: Some(repository.clone()),
                external_repository_object_id: Some(object_id.clone()),
            },
        }
    }
}

/// Identifies one version of an object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjVer {
    /// Object type id
    #[serde(rename = "Type")]
    pub object_type: i32,
    /// Object id
    #[serde(rename = "ID")]
    pub id: i32,
    /// Version; -1 means latest
    pub version: i32,
    /// External repository name, for unmanaged objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_repository_name: Option<String>,
    /// External object id, for unmanaged objects
    #[serde(
        default,
        rename = "ExternalRepositoryObjectID",
        skip_serializing_if = "Option::is_none"
    )]
    pub external_repository_object_id: Option<String>,
    /// External version id, for unmanaged objects
    #[serde(
        default,
        rename = "ExternalRepositoryObjectVersionID",
        skip_serializing_if = "Option::is_none"
    )]
    pub external_repository_object_version_id: Option<String>,
}

impl ObjVer {
    /// Managed object version.
    #[must_use]
    pub fn new(object_type: i32, id: i32, version: i32) -> Self {
        Self {
            object_type,
            id,
            version,
            ..Self::default()
        }
    }

    /// Latest version of an external object.
    #[must_use]
    pub fn external(
        object_type: i32,
        repository: impl Into<String>,
        object_id: impl Into<String>,
    ) -> Self {
        Self {
            object_type,
            version: -1,
            external_repository_name: Some(repository.into()),
            external_repository_object_id: Some(object_id.into()),
            ..Self::default()
        }
    }

    /// Set the external version id.
    #[must_use]
    pub fn with_external_version(mut self, version_id: impl Into<String>) -> Self {
        self.external_repository_object_version_id = Some(version_id.into());
        self
    }

    /// The object part of this version.
    #[must_use]
    pub fn obj_id(&self) -> ObjId {
        ObjId {
            object_type: self.object_type,
            id: self.id,
            external_repository_name: self.external_repository_name.clone(),
            external_repository_object_id: self.external_repository_object_id.clone(),
        }
    }

    /// The identifier used to build resource paths.
    ///
    /// Objects with external repository data are addressed by their external
    /// ids; everything else by type, id and version.
    #[must_use]
    pub fn identifier(&self) -> ObjectIdentifier {
        match external_parts(
            self.external_repository_name.as_deref(),
            self.external_repository_object_id.as_deref(),
        ) {
            Some((repository, object_id)) => ObjectIdentifier::External {
                object_type: self.object_type,
                repository: repository.to_string(),
                object_id: object_id.to_string(),
                version_id: self
                    .external_repository_object_version_id
                    .clone()
                    .filter(|v| !v.is_empty()),
            },
            None => ObjectIdentifier::Managed {
                object_type: self.object_type,
                id: self.id,
                version: Some(self.version),
            },
        }
    }
}

fn external_parts<'a>(
    repository: Option<&'a str>,
    object_id: Option<&'a str>,
) -> Option<(&'a str, &'a str)> {
    match (repository, object_id) {
        (Some(repository), Some(object_id)) if !repository.is_empty() => {
            Some((repository, object_id))
        }
        _ => None,
    }
}

/// Check-out state of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum CheckOutStatus {
    /// Checked in
    CheckedIn,
    /// Checked out to another user
    CheckedOut,
    /// Checked out to the current user
    CheckedOutToMe,
    /// Value not known to this client
    Other(i32),
}

impl From<i32> for CheckOutStatus {
    fn from(value: i32) -> Self {
        match value {
            0 => Self::CheckedIn,
            1 => Self::CheckedOut,
            2 => Self::CheckedOutToMe,
            other => Self::Other(other),
        }
    }
}

impl From<CheckOutStatus> for i32 {
    fn from(value: CheckOutStatus) -> Self {
        match value {
            CheckOutStatus::CheckedIn => 0,
            CheckOutStatus::CheckedOut => 1,
            CheckOutStatus::CheckedOutToMe => 2,
            CheckOutStatus::Other(other) => other,
        }
    }
}

/// An object version as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ObjectVersion {
    /// Identity of this version
    pub obj_ver: ObjVer,
    /// Object title
    pub title: String,
    /// Display id
    #[serde(rename = "DisplayID")]
    pub display_id: String,
    /// Class id
    pub class: i32,
    /// Whether the object is checked out
    pub object_checked_out: bool,
    /// User id the object is checked out to
    pub checked_out_to: i32,
    /// Name of the user the object is checked out to
    pub checked_out_to_user_name: String,
    /// Whether the object is deleted
    pub deleted: bool,
    /// Creation time (UTC, as sent by the server)
    pub created_utc: Option<String>,
    /// Last modification time (UTC, as sent by the server)
    pub last_modified_utc: Option<String>,
}

/// An object version together with its properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExtendedObjectVersion {
    /// Version data
    #[serde(flatten)]
    pub version: ObjectVersion,
    /// Property values on this version
    pub properties: Vec<PropertyValue>,
}

/// Body for creating a new object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectCreationInfo {
    /// Initial property values, including class
    pub property_values: Vec<PropertyValue>,
}

/// Envelope for a single primitive value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrimitiveType<T> {
    /// The wrapped value
    pub value: T,
}

impl<T> PrimitiveType<T> {
    /// Wrap a value.
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

/// Envelope for list results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Results<T> {
    /// The returned items
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Whether the server truncated the result set
    #[serde(default)]
    pub more_results: bool,
}

impl<T> Default for Results<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            more_results: false,
        }
    }
}

/// Properties to write to one object version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectVersionUpdateInformation {
    /// Target version
    pub obj_ver: ObjVer,
    /// Property values to set
    pub properties: Vec<PropertyValue>,
}

/// Body for updating many objects at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectsUpdateInfo {
    /// Per-object updates
    pub multiple_object_info: Vec<ObjectVersionUpdateInformation>,
}

/// Body for approving or rejecting an assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssignmentState {
    /// Optional comment
    pub comment: Option<String>,
}

/// Body for moving an object to a workflow state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectWorkflowState {
    /// Target state id
    #[serde(rename = "StateID")]
    pub state_id: i32,
    /// Optional version comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_comment: Option<String>,
}

/// Error body returned by the service on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WebServiceError {
    /// HTTP status
    pub status: i32,
    /// Requested URL
    #[serde(rename = "URL")]
    pub url: String,
    /// HTTP method
    pub method: String,
    /// Human-readable message
    pub message: String,
    /// Server-side exception
    pub exception: Option<ExceptionInfo>,
}

/// Server-side exception details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExceptionInfo {
    /// Exception type name
    pub name: String,
    /// Exception message
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn objver_wire_names() {
        let value = serde_json::to_value(ObjVer::new(1, 2, 4)).unwrap();
        assert_eq!(value, json!({ "Type": 1, "ID": 2, "Version": 4 }));
    }

    #[test]
    fn external_objver_wire_names() {
        let objver = ObjVer::external(0, "repo", "obj").with_external_version("v1");
        let value = serde_json::to_value(objver).unwrap();
        assert_eq!(value["ExternalRepositoryName"], "repo");
        assert_eq!(value["ExternalRepositoryObjectID"], "obj");
        assert_eq!(value["ExternalRepositoryObjectVersionID"], "v1");
    }

    #[test]
    fn objver_identifier_prefers_external() {
        let managed = ObjVer::new(0, 5, 3).identifier();
        assert_eq!(managed, ObjectIdentifier::managed_version(0, 5, 3));

        let external = ObjVer::external(0, "r", "o").identifier();
        assert_eq!(external, ObjectIdentifier::external(0, "r", "o"));

        let versioned = ObjVer::external(0, "r", "o")
            .with_external_version("v")
            .identifier();
        assert_eq!(
            versioned,
            ObjectIdentifier::external_version(0, "r", "o", "v")
        );
    }

    #[test]
    fn empty_repository_is_managed() {
        let mut objver = ObjVer::new(0, 7, 1);
        objver.external_repository_name = Some(String::new());
        objver.external_repository_object_id = Some("x".to_string());
        assert_eq!(objver.identifier(), ObjectIdentifier::managed_version(0, 7, 1));
    }

    #[test]
    fn objid_from_identifier() {
        let managed = ObjId::from(&ObjectIdentifier::managed_version(0, 1, 3));
        assert_eq!(managed, ObjId::new(0, 1));

        let external = ObjId::from(&ObjectIdentifier::external(0, "r", "o"));
        assert_eq!(external.identifier(), ObjectIdentifier::external(0, "r", "o"));
    }

    #[test]
    fn checkout_status_as_integer() {
        assert_eq!(serde_json::to_string(&CheckOutStatus::CheckedOutToMe).unwrap(), "2");
        let status: CheckOutStatus = serde_json::from_str("7").unwrap();
        assert_eq!(status, CheckOutStatus::Other(7));
    }

    #[test]
    fn results_tolerate_missing_fields() {
        let results: Results<ObjectVersion> = serde_json::from_value(json!({})).unwrap();
        assert!(results.items.is_empty());
        assert!(!results.more_results);
    }

    #[test]
    fn extended_version_flattens() {
        let value = json!({
            "ObjVer": { "Type": 0, "ID": 1, "Version": 2 },
            "Title": "Invoice",
            "Properties": [
                { "PropertyDef": 0, "TypedValue": { "DataType": 1, "Value": "Invoice", "HasValue": true } }
            ]
        });
        let version: ExtendedObjectVersion = serde_json::from_value(value).unwrap();
        assert_eq!(version.version.title, "Invoice");
        assert_eq!(version.version.obj_ver.id, 1);
        assert_eq!(version.properties.len(), 1);
    }
}
