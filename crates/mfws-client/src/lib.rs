//! # MFWS Client
//!
//! Typed async client for the M-Files Web Service REST API.
//!
//! The client is immutable: selecting a vault, authenticating or logging out
//! returns a new [`MfwsClient`] that shares the underlying transport.
//! Operations are grouped by area and borrowed from the client:
//!
//! ```no_run
//! use mfws_client::{MfwsClient, MfwsClientConfig};
//! use mfws_client::mfws_core::{SearchCondition, SearchLimit};
//! use mfws_client::mfws_model::Authentication;
//! use uuid::Uuid;
//!
//! # async fn run(vault: Uuid) -> Result<(), mfws_client::ClientError> {
//! let client = MfwsClient::new(MfwsClientConfig::new("https://vault.example.com"))?
//!     .authenticate_using_credentials(&Authentication::credentials(Some(vault), "alice", "pw"))
//!     .await?;
//!
//! let documents = client
//!     .search()
//!     .search_for_objects_by_conditions(
//!         &[SearchCondition::quick_search("invoice"), SearchCondition::object_type(0)],
//!         SearchLimit::SERVER_DEFAULT,
//!     )
//!     .await?;
//! # let _ = documents;
//! # Ok(())
//! # }
//! ```
//!
//! Requests go through the [`Transport`] trait. [`ReqwestTransport`] is the
//! default; tests substitute their own.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod auth;
pub mod class_groups;
pub mod client;
pub mod config;
pub mod oauth2;
pub mod objects;
pub mod properties;
pub mod property_defs;
pub mod search;
pub mod transport;
pub mod value_lists;
pub mod workflows;

pub use class_groups::ClassGroupOperations;
pub use client::{ClientError, MfwsClient, RequestContext};
pub use config::MfwsClientConfig;
pub use oauth2::{AuthorizationRequest, OAuth2Configuration};
pub use objects::ObjectOperations;
pub use properties::ObjectPropertyOperations;
pub use property_defs::PropertyDefOperations;
pub use search::ObjectSearchOperations;
pub use transport::{Method, RequestBody, ReqwestTransport, RestRequest, RestResponse, Transport};
pub use value_lists::ValueListItemOperations;
pub use workflows::{WorkflowOperations, UNRESOLVED_ALIAS};

pub use mfws_core;
pub use mfws_model;
