//! Error types for the `domain` layer.
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur while producing or
/// rendering stream events. The `source` field is used to hold the original error that caused
/// the domain error. Upper layers (`sse`, `web`) translate this error into their own
/// error kinds and ultimately decide whether a session closes or a response fails.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InternalErrorKind {
    /// A fragment could not be framed for the wire.
    Encode,
    /// Rendered markup could not be parsed back into a stream event.
    Decode,
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalErrorKind {
    /// The host's secure random source could not supply the requested bytes.
    EntropyUnavailable,
}

impl Error {
    pub fn entropy_unavailable(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Error {
            source: Some(source.into()),
            error_kind: DomainErrorKind::External(ExternalErrorKind::EntropyUnavailable),
        }
    }

    pub fn encode(reason: &str) -> Self {
        Error {
            source: Some(reason.into()),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Encode),
        }
    }

    pub fn decode(reason: &str) -> Self {
        Error {
            source: Some(reason.into()),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Decode),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "Domain Error: {:?}: {source}", self.error_kind),
            None => write!(f, "Domain Error: {:?}", self.error_kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Decode),
        }
    }
}

impl From<rand::Error> for Error {
    fn from(err: rand::Error) -> Self {
        Error::entropy_unavailable(err)
    }
}
