//! Error types for the `sse` layer.
use domain::error::{DomainErrorKind, Error as DomainError};
use std::error::Error as StdError;
use std::fmt;

/// Errors raised while running or draining stream sessions.
///
/// Domain errors (entropy, encoding) are translated into `ErrorKind::Domain`
/// and keep the original error as `source`.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    Domain(DomainErrorKind),
    /// The client's response stream no longer accepts writes.
    TransportWrite,
    /// The manager has begun draining and refuses new sessions.
    Draining,
    /// Sessions were still open when the grace period ran out.
    ShutdownTimeout { outstanding: usize },
}

impl Error {
    pub fn transport_write(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Error {
            source: Some(source.into()),
            error_kind: ErrorKind::TransportWrite,
        }
    }

    pub fn draining() -> Self {
        Error {
            source: None,
            error_kind: ErrorKind::Draining,
        }
    }

    pub fn shutdown_timeout(outstanding: usize) -> Self {
        Error {
            source: None,
            error_kind: ErrorKind::ShutdownTimeout { outstanding },
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Domain(_) => match &self.source {
                Some(source) => write!(f, "{source}"),
                None => write!(f, "SSE Error: {:?}", self.error_kind),
            },
            ErrorKind::TransportWrite => write!(f, "failed to write to client stream"),
            ErrorKind::Draining => write!(f, "server is draining, no new streams accepted"),
            ErrorKind::ShutdownTimeout { outstanding } => write!(
                f,
                "shutdown grace period elapsed with {outstanding} session(s) still open"
            ),
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

// This is where we translate errors from the `domain` layer to the `sse` layer.
impl From<DomainError> for Error {
    fn from(err: DomainError) -> Self {
        Error {
            error_kind: ErrorKind::Domain(err.error_kind.clone()),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::error::ExternalErrorKind;

    #[test]
    fn test_domain_error_keeps_kind_and_source() {
        let err: Error = DomainError::entropy_unavailable("exhausted").into();
        assert_eq!(
            err.error_kind,
            ErrorKind::Domain(DomainErrorKind::External(
                ExternalErrorKind::EntropyUnavailable
            ))
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_shutdown_timeout_reports_outstanding_sessions() {
        let err = Error::shutdown_timeout(3);
        assert!(err.to_string().contains("3 session(s)"));
    }
}
