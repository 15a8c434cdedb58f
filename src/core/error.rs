use std::io;
use thiserror::Error;

/// Failures produced while encoding or decoding wire data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// More bytes are needed before the value can be decoded
    #[error("incomplete frame")]
    Incomplete,

    /// A long string is still waiting for its terminator
    #[error("unterminated string")]
    OpenString,

    /// A leading byte no frame type claims
    #[error("unrecognized frame code: {0:#04x}")]
    UnrecognizedCode(u8),

    #[error("unrecognized entry code: {0:#04x}")]
    UnrecognizedEntryCode(u8),

    #[error("a NetworkTable string cannot contain null bytes")]
    NullInString,

    #[error("malformed confirmation byte: {0:#04x}")]
    BadConfirmation(u8),

    /// A confirmation or denial count does not fit its byte
    #[error("acknowledgement count {0} out of range")]
    CountOutOfRange(u8),
}

/// Custom error types for the NetworkTables client
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// The peer denied a put because the value changed on its side
    #[error("Value changed by peer")]
    Denied,

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Put timed out")]
    Timeout,

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Error::Protocol(msg.into())
    }

    /// Creates a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Error::Network(msg.into())
    }

    /// Creates a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Returns true for errors that leave the connection unusable
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Io(_) | Error::ConnectionClosed | Error::Network(_) => true,
            // Rejected local input never reaches the wire
            Error::Codec(e) => *e != CodecError::NullInString,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::protocol("test error");
        assert!(matches!(err, Error::Protocol(_)));
        assert_eq!(err.to_string(), "Protocol error: test error");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.is_fatal());

        let err: Error = CodecError::UnrecognizedEntryCode(0x09).into();
        assert_eq!(err.to_string(), "Codec error: unrecognized entry code: 0x09");
    }

    #[test]
    fn test_denied_is_not_fatal() {
        assert_eq!(Error::Denied.to_string(), "Value changed by peer");
        assert!(!Error::Denied.is_fatal());
        assert!(!Error::from(CodecError::NullInString).is_fatal());
        assert!(Error::from(CodecError::BadConfirmation(0x45)).is_fatal());
    }
}
