//! Vault structure: value lists, workflows, classes and aliases.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An item in a value list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ValueListItem {
    /// Item id
    #[serde(rename = "ID")]
    pub id: i32,
    /// Display name
    pub name: String,
    /// Owning value list
    #[serde(rename = "ValueListID")]
    pub value_list_id: i32,
    /// External id, if any
    #[serde(rename = "DisplayID", skip_serializing_if = "Option::is_none")]
    pub display_id: Option<String>,
    /// Whether the item has an owner
    pub has_owner: bool,
    /// Owner item id
    #[serde(rename = "OwnerID")]
    pub owner_id: i32,
}

impl ValueListItem {
    /// A new, unsaved item.
    #[must_use]
    pub fn new(value_list_id: i32, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_list_id,
            ..Self::default()
        }
    }
}

/// A state within a workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WorkflowState {
    /// State id
    #[serde(rename = "ID")]
    pub id: i32,
    /// Display name
    pub name: Option<String>,
    /// Whether the state may be selected
    pub selectable: bool,
}

/// A class within a class group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ObjectClass {
    /// Class id
    #[serde(rename = "ID")]
    pub id: i32,
    /// Display name
    pub name: String,
    /// Object type the class belongs to
    #[serde(rename = "ObjType")]
    pub object_type: i32,
    /// Workflow automatically assigned to new objects
    pub workflow: i32,
    /// Property used to name objects of this class
    pub name_property_def: i32,
}

/// A named group of classes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ClassGroup {
    /// Group id
    #[serde(rename = "ID")]
    pub id: i32,
    /// Display name
    pub name: String,
    /// Object type of the classes
    #[serde(rename = "ObjectType")]
    pub object_type: i32,
    /// Classes in this group
    pub classes: Vec<ObjectClass>,
}

/// Aliases to resolve in one request, grouped by structure element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VaultStructureAliasRequest {
    /// Object type aliases
    #[serde(default)]
    pub object_types: Vec<String>,
    /// Class aliases
    #[serde(default)]
    pub classes: Vec<String>,
    /// Property definition aliases
    #[serde(default)]
    pub properties: Vec<String>,
    /// Value list aliases
    #[serde(default)]
    pub value_lists: Vec<String>,
    /// Workflow aliases
    #[serde(default)]
    pub workflows: Vec<String>,
    /// Workflow state aliases
    #[serde(default)]
    pub workflow_states: Vec<String>,
    /// State transition aliases
    #[serde(default)]
    pub state_transitions: Vec<String>,
}

/// Ids resolved from a [`VaultStructureAliasRequest`], keyed by alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VaultStructureAliasResponse {
    /// Object type ids
    pub object_types: HashMap<String, i32>,
    /// Class ids
    pub classes: HashMap<String, i32>,
    /// Property definition ids
    pub properties: HashMap<String, i32>,
    /// Value list ids
    pub value_lists: HashMap<String, i32>,
    /// Workflow ids
    pub workflows: HashMap<String, i32>,
    /// Workflow state ids
    pub workflow_states: HashMap<String, i32>,
    /// State transition ids
    pub state_transitions: HashMap<String, i32>,
}
