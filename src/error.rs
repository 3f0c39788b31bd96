//! Error types for talking to the MPC-HC web interface

use thiserror::Error;

/// Errors raised by a single status fetch or command dispatch.
///
/// Adapters never hand these to their host. The media player downgrades its
/// availability on [`MpcError::Connection`] and logs [`MpcError::Unexpected`];
/// command dispatch logs both and drops them.
#[derive(Debug, Error)]
pub enum MpcError {
    /// The player could not be reached: connection refused, timeout, or a
    /// server-side request timeout (HTTP 408).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Anything else that went wrong while fetching or decoding a response.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl MpcError {
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, MpcError::Connection(_))
    }
}

impl From<reqwest::Error> for MpcError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() || error.is_request() {
            MpcError::Connection(error.to_string())
        } else {
            MpcError::Unexpected(error.to_string())
        }
    }
}

/// A malformed `H:MM:SS` string in the status page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected three ':'-separated fields, got {0}")]
    FieldCount(usize),

    #[error("non-numeric time field {0:?}")]
    NotANumber(String),

    #[error("time {0:?} does not fit in seconds")]
    OutOfRange(String),
}

pub type Result<T> = std::result::Result<T, MpcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_variant_is_classified() {
        assert!(MpcError::Connection("refused".into()).is_connection_failure());
        assert!(!MpcError::Unexpected("bad body".into()).is_connection_failure());
    }

    #[test]
    fn parse_error_messages() {
        assert_eq!(
            ParseError::FieldCount(1).to_string(),
            "expected three ':'-separated fields, got 1"
        );
        assert_eq!(
            ParseError::NotANumber("xx".into()).to_string(),
            "non-numeric time field \"xx\""
        );
        assert_eq!(
            ParseError::OutOfRange("1:2:3".into()).to_string(),
            "time \"1:2:3\" does not fit in seconds"
        );
    }
}
