//! Search condition operators.

use crate::error::EncodingError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator applied by a search condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Not a valid operator; encoding it fails
    Unknown,
    /// `=`
    #[default]
    Equals,
    /// `<<=`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>>=`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `**=`
    MatchesWildcard,
    /// `*=`
    Contains,
    /// `^=`
    StartsWith,
}

impl Operator {
    /// Every operator that can be put on the wire.
    pub const ENCODABLE: [Operator; 8] = [
        Operator::Equals,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::MatchesWildcard,
        Operator::Contains,
        Operator::StartsWith,
    ];

    /// The query-string token, without any inversion marker.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::NotSupported`] for [`Operator::Unknown`].
    pub fn token(self) -> Result<&'static str, EncodingError> {
        let token = match self {
            Operator::Unknown => {
                return Err(EncodingError::NotSupported(format!(
                    "the operator {self} cannot be used"
                )))
            }
            Operator::Equals => "=",
            Operator::LessThan => "<<=",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThan => ">>=",
            Operator::GreaterThanOrEqual => ">=",
            Operator::MatchesWildcard => "**=",
            Operator::Contains => "*=",
            Operator::StartsWith => "^=",
        };
        Ok(token)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Encode an operator, prefixing `!` when inverted.
///
/// # Errors
///
/// Returns [`EncodingError::NotSupported`] for [`Operator::Unknown`].
///
/// # Examples
///
/// ```
/// use mfws_core::{encode_operator, Operator};
///
/// assert_eq!(encode_operator(Operator::GreaterThan, false).unwrap(), ">>=");
/// assert_eq!(encode_operator(Operator::Equals, true).unwrap(), "!=");
/// assert!(encode_operator(Operator::Unknown, false).is_err());
/// ```
pub fn encode_operator(operator: Operator, invert: bool) -> Result<String, EncodingError> {
    let token = operator.token()?;
    Ok(if invert {
        format!("!{token}")
    } else {
        token.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_tokens() {
        let expected = [
            (Operator::Equals, "="),
            (Operator::LessThan, "<<="),
            (Operator::LessThanOrEqual, "<="),
            (Operator::GreaterThan, ">>="),
            (Operator::GreaterThanOrEqual, ">="),
            (Operator::MatchesWildcard, "**="),
            (Operator::Contains, "*="),
            (Operator::StartsWith, "^="),
        ];
        for (operator, token) in expected {
            assert_eq!(encode_operator(operator, false).unwrap(), token);
        }
    }

    #[test]
    fn inverted_tokens_gain_bang() {
        for operator in Operator::ENCODABLE {
            let plain = encode_operator(operator, false).unwrap();
            let inverted = encode_operator(operator, true).unwrap();
            assert!(!plain.is_empty());
            assert_eq!(inverted, format!("!{plain}"));
        }
    }

    #[test]
    fn unknown_is_not_supported() {
        for invert in [false, true] {
            let err = encode_operator(Operator::Unknown, invert).unwrap_err();
            assert!(matches!(err, EncodingError::NotSupported(_)));
        }
    }

    #[test]
    fn default_is_equals() {
        assert_eq!(Operator::default(), Operator::Equals);
    }

    #[test]
    fn serde_uses_variant_names() {
        let json = serde_json::to_string(&Operator::StartsWith).unwrap();
        assert_eq!(json, "\"StartsWith\"");
    }
}
