//! Error types for satchel.

use derive_more::{Display, Error, From};

/// Main error type for satchel operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Reading a file-like value failed.
    #[display("I/O error: {_0}")]
    #[from]
    Io(std::io::Error),

    /// Converting a serializable value into a parameter tree failed.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// The parameter tree is nested deeper than allowed.
    #[display("parameters nested deeper than {max} levels")]
    #[from(skip)]
    DepthExceeded {
        /// Maximum allowed depth.
        max: usize,
    },

    /// A pass-through value cannot be sent as a request body.
    #[display("invalid body: {_0}")]
    #[from(skip)]
    InvalidBody(#[error(not(source))] String),

    /// Building the outgoing HTTP request failed.
    #[display("HTTP error: {_0}")]
    #[from]
    Http(http::Error),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid body error.
    #[must_use]
    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::InvalidBody(message.into())
    }

    /// Returns `true` if this is an I/O error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Returns `true` if the parameter tree was too deep.
    #[must_use]
    pub const fn is_depth_exceeded(&self) -> bool {
        matches!(self, Self::DepthExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::DepthExceeded { max: 32 };
        assert_eq!(err.to_string(), "parameters nested deeper than 32 levels");

        let err = Error::invalid_body("lists cannot be sent raw");
        assert_eq!(err.to_string(), "invalid body: lists cannot be sent raw");

        let err = Error::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing.txt",
        ));
        assert_eq!(err.to_string(), "I/O error: missing.txt");
    }

    #[test]
    fn error_predicates() {
        assert!(Error::DepthExceeded { max: 1 }.is_depth_exceeded());
        assert!(!Error::invalid_body("x").is_depth_exceeded());

        let io = Error::from(std::io::Error::other("boom"));
        assert!(io.is_io());
        assert!(!Error::DepthExceeded { max: 1 }.is_io());
    }

    #[test]
    fn io_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::from(std::io::Error::other("boom"));
        assert!(err.source().is_some());
    }
}
