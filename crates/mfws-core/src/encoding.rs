//! MFWS value and path encoding.
//!
//! Two encodings are in play:
//!
//! - Query values use form encoding: space becomes `+`, alphanumerics and
//!   `-_.!*()` pass through, everything else is percent-escaped.
//! - Path segments are escaped as RFC 3986 data: only alphanumerics and
//!   `-._~` pass through.
//!
//! Externally-mastered object identifiers go through both. The repository
//! name, object id and version id are form-encoded into a logical segment
//! (`u{repository}:{object}`), and the logical segment is then escaped as a
//! path segment. The server expects exactly this double encoding.
//!
//! # References
//!
//! - M-Files Web Service search encoding:
//!   <http://www.m-files.com/mfws/syntax.html#sect:search-encoding>

use crate::error::EncodingError;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left untouched by form encoding.
const FORM_VALUE_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'*')
    .remove(b'(')
    .remove(b')');

/// Characters left untouched in a path segment.
const PATH_SEGMENT_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Prefix marking an externally-mastered identifier segment.
pub(crate) const EXTERNAL_PREFIX: char = 'u';

/// Separator between repository name and object id.
pub(crate) const EXTERNAL_SEPARATOR: char = ':';

/// Form-encode a query value.
///
/// # Examples
///
/// ```
/// use mfws_core::url_encode;
///
/// assert_eq!(url_encode("hello world"), "hello+world");
/// assert_eq!(url_encode("hello*"), "hello*");
/// assert_eq!(url_encode("456,789"), "456%2C789");
/// assert_eq!(url_encode("2017-01-01T11:12:03"), "2017-01-01T11%3A12%3A03");
/// ```
#[must_use]
pub fn url_encode(value: &str) -> String {
    value
        .split(' ')
        .map(|part| utf8_percent_encode(part, FORM_VALUE_ESCAPE).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// Escape a single path segment.
///
/// # Examples
///
/// ```
/// use mfws_core::escape_path_segment;
///
/// assert_eq!(escape_path_segment("uhello+world:123%25123"), "uhello%2Bworld%3A123%2525123");
/// assert_eq!(escape_path_segment("latest"), "latest");
/// ```
#[must_use]
pub fn escape_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT_ESCAPE).to_string()
}

/// Build the escaped id segment for an external object.
pub(crate) fn external_id_segment(repository: &str, object_id: &str) -> String {
    let logical = format!(
        "{EXTERNAL_PREFIX}{}{EXTERNAL_SEPARATOR}{}",
        url_encode(repository),
        url_encode(object_id)
    );
    escape_path_segment(&logical)
}

/// Build the escaped version segment for an external object version.
pub(crate) fn external_version_segment(version_id: &str) -> String {
    let logical = format!("{EXTERNAL_PREFIX}{}", url_encode(version_id));
    escape_path_segment(&logical)
}

/// Reverse the double encoding of an external identifier segment.
///
/// Returns the decoded parts: `[repository, object]` for an id segment,
/// `[version]` for a version segment.
///
/// # Errors
///
/// Returns [`EncodingError::InvariantViolation`] if the segment is not a
/// well-formed external segment.
///
/// # Examples
///
/// ```
/// use mfws_core::decode_external_segment;
///
/// let parts = decode_external_segment("uhello%2Bworld%3A123%2525123").unwrap();
/// assert_eq!(parts, vec!["hello world".to_string(), "123%123".to_string()]);
/// ```
pub fn decode_external_segment(segment: &str) -> Result<Vec<String>, EncodingError> {
    let logical = percent_decode_str(segment)
        .decode_utf8()
        .map_err(|e| violation(segment, &e.to_string()))?;

    let body = logical
        .strip_prefix(EXTERNAL_PREFIX)
        .ok_or_else(|| violation(segment, "missing external prefix"))?;

    body.split(EXTERNAL_SEPARATOR)
        .map(|part| {
            let spaced = part.replace('+', " ");
            percent_decode_str(&spaced)
                .decode_utf8()
                .map(|s| s.into_owned())
                .map_err(|e| violation(segment, &e.to_string()))
        })
        .collect()
}

fn violation(value: &str, reason: &str) -> EncodingError {
    EncodingError::InvariantViolation {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_encoding_space_is_plus() {
        assert_eq!(url_encode("hello world"), "hello+world");
        assert_eq!(url_encode("  "), "++");
    }

    #[test]
    fn form_encoding_keeps_unreserved() {
        assert_eq!(url_encode("a-b_c.d!e*f(g)"), "a-b_c.d!e*f(g)");
        assert_eq!(url_encode("hello*"), "hello*");
    }

    #[test]
    fn form_encoding_escapes_reserved() {
        assert_eq!(url_encode("a+b"), "a%2Bb");
        assert_eq!(url_encode("a:b"), "a%3Ab");
        assert_eq!(url_encode("100%"), "100%25");
        assert_eq!(url_encode("a/b?c&d=e"), "a%2Fb%3Fc%26d%3De");
        assert_eq!(url_encode("~"), "%7E");
    }

    #[test]
    fn form_encoding_unicode() {
        assert_eq!(url_encode("ä"), "%C3%A4");
    }

    #[test]
    fn path_segment_escapes_plus_colon_percent() {
        assert_eq!(escape_path_segment("a+b"), "a%2Bb");
        assert_eq!(escape_path_segment("a:b"), "a%3Ab");
        assert_eq!(escape_path_segment("a%3Ab"), "a%253Ab");
        assert_eq!(escape_path_segment("a-b.c_d~e"), "a-b.c_d~e");
    }

    #[test]
    fn external_id_double_encoded() {
        assert_eq!(
            external_id_segment("hello world", "123%123"),
            "uhello%2Bworld%3A123%2525123"
        );
        assert_eq!(
            external_id_segment("myrepository", "12 3456"),
            "umyrepository%3A12%2B3456"
        );
        assert_eq!(external_id_segment("hello", "world"), "uhello%3Aworld");
    }

    #[test]
    fn external_version_double_encoded() {
        assert_eq!(external_version_segment("abc:123"), "uabc%253A123");
        assert_eq!(external_version_segment("version 1"), "uversion%2B1");
        assert_eq!(external_version_segment("again"), "uagain");
    }

    #[test]
    fn colon_inside_value_is_not_a_separator() {
        let segment = external_id_segment("repo:a", "obj:b");
        let parts = decode_external_segment(&segment).unwrap();
        assert_eq!(parts, vec!["repo:a".to_string(), "obj:b".to_string()]);
    }

    #[test]
    fn external_round_trip() {
        for (repo, obj) in [
            ("hello world", "123%123"),
            ("my repository", "hello world"),
            ("a+b", "c:d"),
            ("ümlaut", "id/with/slashes"),
        ] {
            let segment = external_id_segment(repo, obj);
            let parts = decode_external_segment(&segment).unwrap();
            assert_eq!(parts, vec![repo.to_string(), obj.to_string()], "{segment}");
        }
    }

    #[test]
    fn decode_rejects_missing_prefix() {
        let err = decode_external_segment("hello%3Aworld").unwrap_err();
        assert!(matches!(err, EncodingError::InvariantViolation { .. }));
    }
}
