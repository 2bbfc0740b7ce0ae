//! # MFWS Model
//!
//! Wire-format data types exchanged with the M-Files Web Service.
//!
//! Field names follow the service's JSON (`PascalCase`, with `ID`/`GUID`
//! spelled in capitals). Only the fields the client reads or writes are
//! modelled; unknown fields are ignored on input.
//!
//! ## Groups
//!
//! - `objects`: object identity, versions, check-out state, search results
//! - `properties`: property values, typed values, lookups, definitions
//! - `structure`: value lists, workflows, classes, alias resolution
//! - `auth`: authentication requests, vaults, plugins, OAuth 2.0 tokens

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod objects;
pub mod properties;
pub mod structure;

pub use auth::{Authentication, OAuth2TokenResponse, PluginInfoConfiguration, Vault};
pub use objects::{
    AssignmentState, CheckOutStatus, ExceptionInfo, ExtendedObjectVersion, ObjId, ObjVer,
    ObjectCreationInfo, ObjectVersion, ObjectVersionUpdateInformation, ObjectWorkflowState,
    ObjectsUpdateInfo, PrimitiveType, Results, WebServiceError, ASSIGNMENT_OBJECT_TYPE,
};
pub use properties::{DataType, Lookup, PropertyDef, PropertyValue, TypedValue};
pub use structure::{
    ClassGroup, ObjectClass, ValueListItem, VaultStructureAliasRequest,
    VaultStructureAliasResponse, WorkflowState,
};
