//! # MFWS Core
//!
//! Search-condition encoding and object path construction for the
//! M-Files Web Service REST API.
//!
//! This crate provides:
//! - Form-style value encoding and the double encoding used for
//!   externally-mastered object identifiers
//! - Search operators and their query-string tokens
//! - Typed search conditions and the search query builder
//! - Object identifiers and resource path templates
//!
//! Everything here is pure: no I/O, no shared state. The output strings are
//! handed to the HTTP layer as request targets.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod condition;
pub mod encoding;
pub mod error;
pub mod operator;
pub mod query;

pub use address::{
    build_object_path, encode_object_segments, ObjectIdentifier, ObjectSegments, PathTemplate,
    Segment, LATEST_VERSION,
};
pub use condition::{SearchCondition, ValueListItemRef};
pub use encoding::{decode_external_segment, escape_path_segment, url_encode};
pub use error::EncodingError;
pub use operator::{encode_operator, Operator};
pub use query::{build_search_query, SearchLimit, SearchQuery};
