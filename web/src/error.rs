use std::error::Error as StdError;
use std::io;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::*;

use sse::error::{Error as SseError, ErrorKind as SseErrorKind};

pub type Result<T> = core::result::Result<T, Error>;

/// Errors surfaced by the web layer: failed requests, and the process-fatal
/// startup failures of the server itself.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    Session(SseErrorKind),
    /// The listening socket could not be bound.
    ListenBind { address: String },
    /// Termination signal handlers could not be installed.
    SignalSetup,
    /// The HTTP server stopped with an I/O error.
    Serve,
}

impl Error {
    pub fn listen_bind(address: &str, source: io::Error) -> Self {
        Error {
            source: Some(Box::new(source)),
            error_kind: ErrorKind::ListenBind {
                address: address.to_string(),
            },
        }
    }

    pub fn signal_setup(source: io::Error) -> Self {
        Error {
            source: Some(Box::new(source)),
            error_kind: ErrorKind::SignalSetup,
        }
    }

    pub fn serve(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Error {
            source: Some(source.into()),
            error_kind: ErrorKind::Serve,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        match (&self.error_kind, &self.source) {
            (ErrorKind::ListenBind { address }, Some(source)) => {
                write!(fmt, "failed to bind {address}: {source}")
            }
            (ErrorKind::SignalSetup, Some(source)) => {
                write!(fmt, "failed to install signal handlers: {source}")
            }
            (_, Some(source)) => write!(fmt, "{source}"),
            (kind, None) => write!(fmt, "{kind:?}"),
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

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.error_kind {
            ErrorKind::Session(SseErrorKind::Draining) => {
                debug!("Refusing request while draining");
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE UNAVAILABLE").into_response()
            }
            _ => {
                error!("Internal server error: {self}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
            }
        }
    }
}

impl From<SseError> for Error {
    fn from(err: SseError) -> Self {
        Error {
            error_kind: ErrorKind::Session(err.error_kind.clone()),
            source: Some(Box::new(err)),
        }
    }
}
