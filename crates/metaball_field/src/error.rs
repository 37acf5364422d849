//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid field configuration, tweakable property misuse, and generic errors.
//! Registry misuse (removing an unknown listener, cancelling a fired timer) is
//! never an error and has no variant here.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown property '{name}'")]
    UnknownProperty { name: String },

    #[error("property '{name}' is already registered")]
    DuplicateProperty { name: String },

    #[error("property '{name}' expects a {expected} value")]
    PropertyType { name: String, expected: &'static str },

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        assert!(matches!(err, Error::Other(_)));
    }

    #[test]
    fn from_str_allocates_owned_message() {
        let err: Error = "issue".into();
        assert!(matches!(err, Error::Other(ref msg) if msg == "issue"));
    }

    #[test]
    fn property_type_message_names_expected_kind() {
        let err = Error::PropertyType {
            name: "stopped".into(),
            expected: "boolean",
        };
        assert_eq!(err.to_string(), "property 'stopped' expects a boolean value");
    }
}
