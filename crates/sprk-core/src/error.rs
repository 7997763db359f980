//! # Design
//!
//! - Provide structured, constant-message errors for the behavior layer.
//! - Capture the operation and offending input so skipped markup is traceable in logs.
//! - Errors stay internal: initializers log them and degrade to a no-op.

use thiserror::Error;

/// Result type for DOM adapter operations.
pub type DomResult<T> = Result<T, DomError>;

/// Failures reported by a [`crate::dom::DomElement`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The host rejected an operation (for example an invalid attribute name).
    #[error("dom operation rejected")]
    Rejected {
        /// Operation that failed.
        operation: &'static str,
        /// Detail reported by the host, when available.
        detail: Option<String>,
    },
    /// A selector could not be used for a query.
    #[error("dom selector rejected")]
    Selector {
        /// Selector source text.
        selector: String,
    },
    /// A node was inserted into its own subtree.
    #[error("dom hierarchy violation")]
    Hierarchy {
        /// Operation that failed.
        operation: &'static str,
    },
}

/// Errors raised while parsing selector text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// Input was empty or whitespace.
    #[error("empty selector")]
    Empty,
    /// Unexpected character encountered.
    #[error("unexpected character in selector")]
    Unexpected {
        /// Byte offset of the character.
        position: usize,
        /// Character found.
        found: char,
    },
    /// A bracket or quote was never closed.
    #[error("unterminated selector clause")]
    Unterminated {
        /// Byte offset where the clause started.
        position: usize,
    },
    /// An attribute clause had no name.
    #[error("missing attribute name")]
    MissingAttribute {
        /// Byte offset of the clause.
        position: usize,
    },
}

/// Errors raised while loading configuration overrides.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON payload could not be decoded.
    #[error("invalid configuration json")]
    Json {
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
    /// A class token was empty or contained whitespace.
    #[error("invalid class token")]
    InvalidClass {
        /// Field holding the token.
        field: &'static str,
        /// Offending value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_constant() {
        let err = DomError::Rejected {
            operation: "set_attribute",
            detail: Some("bad name".into()),
        };
        assert_eq!(err.to_string(), "dom operation rejected");
        let err = SelectorError::Unexpected {
            position: 3,
            found: '#',
        };
        assert_eq!(err.to_string(), "unexpected character in selector");
    }

    #[test]
    fn config_error_exposes_source() {
        use std::error::Error as _;
        let source = serde_json::from_str::<u8>("nope").unwrap_err();
        let err = ConfigError::Json { source };
        assert!(err.source().is_some());
    }
}
