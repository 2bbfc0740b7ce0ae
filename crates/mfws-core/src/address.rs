//! Object identifiers and resource paths.
//!
//! Resource paths for object operations have the shape
//! `{prefix}/{type}/{id}/{version}{suffix}`. Which segments appear, and the
//! prefix and suffix, are chosen by the calling operation through a
//! [`PathTemplate`]. This module guarantees that the segments themselves are
//! rendered and escaped correctly for managed and external objects.

use crate::encoding::{external_id_segment, external_version_segment};
use crate::error::EncodingError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Version segment used when no specific version is requested.
pub const LATEST_VERSION: &str = "latest";

/// Identifies an object, or one version of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectIdentifier {
    /// Object owned by the vault
    Managed {
        /// Object type id
        object_type: i32,
        /// Object id
        id: i32,
        /// Version; `None` or `<= 0` means latest
        version: Option<i32>,
    },
    /// Object mastered in an external repository
    External {
        /// Object type id
        object_type: i32,
        /// External repository name
        repository: String,
        /// Object id within the repository
        object_id: String,
        /// Version id within the repository; `None` means latest
        version_id: Option<String>,
    },
}

impl ObjectIdentifier {
    /// Latest version of a managed object.
    #[must_use]
    pub fn managed(object_type: i32, id: i32) -> Self {
        Self::Managed {
            object_type,
            id,
            version: None,
        }
    }

    /// Specific version of a managed object.
    #[must_use]
    pub fn managed_version(object_type: i32, id: i32, version: i32) -> Self {
        Self::Managed {
            object_type,
            id,
            version: Some(version),
        }
    }

    /// Latest version of an external object.
    #[must_use]
    pub fn external(
        object_type: i32,
        repository: impl Into<String>,
        object_id: impl Into<String>,
    ) -> Self {
        Self::External {
            object_type,
            repository: repository.into(),
            object_id: object_id.into(),
            version_id: None,
        }
    }

    /// Specific version of an external object.
    #[must_use]
    pub fn external_version(
        object_type: i32,
        repository: impl Into<String>,
        object_id: impl Into<String>,
        version_id: impl Into<String>,
    ) -> Self {
        Self::External {
            object_type,
            repository: repository.into(),
            object_id: object_id.into(),
            version_id: Some(version_id.into()),
        }
    }

    /// The object type id.
    #[must_use]
    pub fn object_type(&self) -> i32 {
        match self {
            Self::Managed { object_type, .. } | Self::External { object_type, .. } => *object_type,
        }
    }

    /// Drop any version, addressing the latest version instead.
    #[must_use]
    pub fn latest(self) -> Self {
        match self {
            Self::Managed {
                object_type, id, ..
            } => Self::Managed {
                object_type,
                id,
                version: None,
            },
            Self::External {
                object_type,
                repository,
                object_id,
                ..
            } => Self::External {
                object_type,
                repository,
                object_id,
                version_id: None,
            },
        }
    }

    /// Whether a specific version is addressed.
    #[must_use]
    pub fn has_version(&self) -> bool {
        match self {
            Self::Managed { version, .. } => version.is_some_and(|v| v > 0),
            Self::External { version_id, .. } => version_id.is_some(),
        }
    }

    /// Check the identifier fields.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::InvalidArgument`] for a negative object type,
    /// a managed id below 1, or an external object missing its repository
    /// name or object id.
    pub fn validate(&self) -> Result<(), EncodingError> {
        if self.object_type() < 0 {
            return Err(EncodingError::InvalidArgument(
                "the object type id cannot be less than zero".to_string(),
            ));
        }
        match self {
            Self::Managed { id, .. } if *id < 1 => Err(EncodingError::InvalidArgument(
                "the object id cannot be less than or equal to zero".to_string(),
            )),
            Self::External { repository, .. } if repository.is_empty() => {
                Err(EncodingError::InvalidArgument(
                    "the external repository name is required".to_string(),
                ))
            }
            Self::External { object_id, .. } if object_id.is_empty() => {
                Err(EncodingError::InvalidArgument(
                    "the external object id is required".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }
}

/// The escaped type, id and version segments of an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSegments {
    /// Object type segment
    pub object_type: String,
    /// Id segment (`123` or `u{repository}:{object}`, escaped)
    pub id: String,
    /// Version segment (`4`, `latest` or `u{version}`, escaped)
    pub version: String,
}

/// Render an identifier into its three path segments.
///
/// # Errors
///
/// Returns [`EncodingError::InvalidArgument`] if the identifier is invalid
/// (see [`ObjectIdentifier::validate`]).
///
/// # Examples
///
/// ```
/// use mfws_core::{encode_object_segments, ObjectIdentifier};
///
/// let segments = encode_object_segments(&ObjectIdentifier::external(0, "hello world", "123%123")).unwrap();
/// assert_eq!(segments.id, "uhello%2Bworld%3A123%2525123");
/// assert_eq!(segments.version, "latest");
/// ```
pub fn encode_object_segments(
    identifier: &ObjectIdentifier,
) -> Result<ObjectSegments, EncodingError> {
    identifier.validate()?;

    let segments = match identifier {
        ObjectIdentifier::Managed {
            object_type,
            id,
            version,
        } => ObjectSegments {
            object_type: object_type.to_string(),
            id: id.to_string(),
            version: match version {
                Some(v) if *v > 0 => v.to_string(),
                _ => LATEST_VERSION.to_string(),
            },
        },
        ObjectIdentifier::External {
            object_type,
            repository,
            object_id,
            version_id,
        } => ObjectSegments {
            object_type: object_type.to_string(),
            id: external_id_segment(repository, object_id),
            version: version_id
                .as_deref()
                .map_or_else(|| LATEST_VERSION.to_string(), external_version_segment),
        },
    };

    Ok(segments)
}

/// One path segment slot in a [`PathTemplate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// The object type id
    Type,
    /// The object id segment
    Id,
    /// The version segment
    Version,
    /// A fixed literal segment
    Literal(&'static str),
}

/// Declarative shape of an object resource path.
///
/// Renders as `{prefix}/{segment}/{segment}...{suffix}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    prefix: &'static str,
    segments: &'static [Segment],
    suffix: Cow<'static, str>,
}

impl PathTemplate {
    /// `/REST/objects/{type}/{id}/{version}`
    pub const OBJECT_VERSION: PathTemplate = PathTemplate::new(
        "/REST/objects",
        &[Segment::Type, Segment::Id, Segment::Version],
    );

    /// `/REST/objects/{type}/{id}`
    pub const OBJECT: PathTemplate =
        PathTemplate::new("/REST/objects", &[Segment::Type, Segment::Id]);

    /// `/REST/objects/{type}/{id}/latest`
    pub const OBJECT_LATEST: PathTemplate = PathTemplate::new(
        "/REST/objects",
        &[Segment::Type, Segment::Id, Segment::Literal(LATEST_VERSION)],
    );

    /// `/REST/objects/{id}/{version}` (assignments)
    pub const ASSIGNMENT: PathTemplate =
        PathTemplate::new("/REST/objects", &[Segment::Id, Segment::Version]);

    /// `/REST/favorites/{type}/{id}`
    pub const FAVORITE: PathTemplate =
        PathTemplate::new("/REST/favorites", &[Segment::Type, Segment::Id]);

    /// Create a template with no suffix.
    #[must_use]
    pub const fn new(prefix: &'static str, segments: &'static [Segment]) -> Self {
        Self {
            prefix,
            segments,
            suffix: Cow::Borrowed(""),
        }
    }

    /// Append a suffix after the last segment (e.g. `/title`, `.aspx?include=properties`).
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<Cow<'static, str>>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Render the template for the given segments.
    #[must_use]
    pub fn render(&self, segments: &ObjectSegments) -> String {
        let mut path = String::from(self.prefix);
        for segment in self.segments {
            path.push('/');
            path.push_str(match segment {
                Segment::Type => segments.object_type.as_str(),
                Segment::Id => segments.id.as_str(),
                Segment::Version => segments.version.as_str(),
                Segment::Literal(literal) => *literal,
            });
        }
        path.push_str(&self.suffix);
        path
    }
}

/// Build the full resource path for an object.
///
/// # Errors
///
/// Returns [`EncodingError::InvalidArgument`] if the identifier is invalid.
///
/// # Examples
///
/// ```
/// use mfws_core::{build_object_path, ObjectIdentifier, PathTemplate};
///
/// let path = build_object_path(
///     &ObjectIdentifier::managed(1, 2),
///     &PathTemplate::OBJECT_VERSION.with_suffix("/properties.aspx"),
/// ).unwrap();
/// assert_eq!(path, "/REST/objects/1/2/latest/properties.aspx");
/// ```
pub fn build_object_path(
    identifier: &ObjectIdentifier,
    template: &PathTemplate,
) -> Result<String, EncodingError> {
    let segments = encode_object_segments(identifier)?;
    Ok(template.render(&segments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::decode_external_segment;

    #[test]
    fn managed_latest() {
        let path = build_object_path(
            &ObjectIdentifier::managed(1, 2),
            &PathTemplate::OBJECT_VERSION.with_suffix("/properties.aspx"),
        )
        .unwrap();
        assert_eq!(path, "/REST/objects/1/2/latest/properties.aspx");
    }

    #[test]
    fn managed_version() {
        let path = build_object_path(
            &ObjectIdentifier::managed_version(1, 2, 4),
            &PathTemplate::OBJECT_VERSION.with_suffix("/properties.aspx"),
        )
        .unwrap();
        assert_eq!(path, "/REST/objects/1/2/4/properties.aspx");
    }

    #[test]
    fn non_positive_version_is_latest() {
        for version in [0, -1] {
            let segments =
                encode_object_segments(&ObjectIdentifier::managed_version(0, 1, version)).unwrap();
            assert_eq!(segments.version, LATEST_VERSION);
        }
    }

    #[test]
    fn external_latest_properties() {
        let path = build_object_path(
            &ObjectIdentifier::external(0, "hello world", "123%123"),
            &PathTemplate::OBJECT_LATEST.with_suffix(".aspx?include=properties"),
        )
        .unwrap();
        assert_eq!(
            path,
            "/REST/objects/0/uhello%2Bworld%3A123%2525123/latest.aspx?include=properties"
        );
    }

    #[test]
    fn external_with_version() {
        let path = build_object_path(
            &ObjectIdentifier::external_version(0, "myrepository", "12 3456", "abc:123"),
            &PathTemplate::OBJECT_VERSION.with_suffix("/properties.aspx"),
        )
        .unwrap();
        assert_eq!(
            path,
            "/REST/objects/0/umyrepository%3A12%2B3456/uabc%253A123/properties.aspx"
        );
    }

    #[test]
    fn external_title() {
        let path = build_object_path(
            &ObjectIdentifier::external_version(0, "hello", "world", "again"),
            &PathTemplate::OBJECT_VERSION.with_suffix("/title"),
        )
        .unwrap();
        assert_eq!(path, "/REST/objects/0/uhello%3Aworld/uagain/title");
    }

    #[test]
    fn external_checkout() {
        let path = build_object_path(
            &ObjectIdentifier::external_version(0, "repository name", "my object", "version 1"),
            &PathTemplate::OBJECT_VERSION.with_suffix("/checkedout"),
        )
        .unwrap();
        assert_eq!(
            path,
            "/REST/objects/0/urepository%2Bname%3Amy%2Bobject/uversion%2B1/checkedout"
        );
    }

    #[test]
    fn favorites_and_assignments() {
        assert_eq!(
            build_object_path(&ObjectIdentifier::managed(1, 2), &PathTemplate::FAVORITE).unwrap(),
            "/REST/favorites/1/2"
        );
        assert_eq!(
            build_object_path(
                &ObjectIdentifier::managed(10, 123),
                &PathTemplate::ASSIGNMENT.with_suffix("/canCompleteAssignment.aspx")
            )
            .unwrap(),
            "/REST/objects/123/latest/canCompleteAssignment.aspx"
        );
    }

    #[test]
    fn invalid_identifiers() {
        let cases = [
            ObjectIdentifier::managed(-1, 1),
            ObjectIdentifier::managed(0, 0),
            ObjectIdentifier::external(0, "", "obj"),
            ObjectIdentifier::external(0, "repo", ""),
        ];
        for identifier in cases {
            let err = build_object_path(&identifier, &PathTemplate::OBJECT).unwrap_err();
            assert!(
                matches!(err, EncodingError::InvalidArgument(_)),
                "{identifier:?}"
            );
        }
    }

    #[test]
    fn external_segments_round_trip() {
        let identifier = ObjectIdentifier::external_version(0, "a b:c", "100%", "v 1:2");
        let segments = encode_object_segments(&identifier).unwrap();
        assert_eq!(
            decode_external_segment(&segments.id).unwrap(),
            vec!["a b:c".to_string(), "100%".to_string()]
        );
        assert_eq!(
            decode_external_segment(&segments.version).unwrap(),
            vec!["v 1:2".to_string()]
        );
    }

    #[test]
    fn latest_drops_version() {
        let identifier = ObjectIdentifier::external_version(0, "r", "o", "v").latest();
        assert!(!identifier.has_version());
        assert!(ObjectIdentifier::managed_version(0, 1, 3).has_version());
        assert!(!ObjectIdentifier::managed_version(0, 1, 0).has_version());
    }
}
