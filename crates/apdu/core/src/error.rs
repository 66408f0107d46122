//! Core error type for all APDU operations
//!
//! Frame, response and transport failures are consolidated here so callers on
//! the host side have a single type to bubble up.

use crate::response::error::ResponseError;
use crate::response::status::StatusWord;
use crate::transport::TransportError;

/// Result alias using the core [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type that encompasses all possible errors in the crate
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    //
    // Command related errors
    //
    /// Frame too short, or Lc inconsistent with the frame length
    #[error("Invalid command length: {0}")]
    InvalidCommandLength(usize),

    /// Payload does not fit the one-byte Lc field
    #[error("Data too long: {0} bytes (max 255)")]
    DataTooLong(usize),

    /// Hex input could not be decoded
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    //
    // Response related errors
    //
    /// Response could not be parsed
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// Status error from response
    #[error("Status error {status}: {}", .status.description())]
    Status {
        /// Status word that caused the error
        status: StatusWord,
    },

    //
    // Transport related errors
    //
    /// The transport failed to deliver the frame
    #[error(transparent)]
    Transport(#[from] TransportError),

    //
    // General errors
    //
    /// Context error with message and source error
    #[error("{context}: {source}")]
    Context {
        /// Contextual message
        context: String,
        /// Source error
        source: Box<Self>,
    },
}

impl Error {
    /// Create a new error with context information
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a new status error
    pub const fn status(sw1: u8, sw2: u8) -> Self {
        Self::Status {
            status: StatusWord::new(sw1, sw2),
        }
    }

    /// Status word carried by this error, looking through any context
    pub fn status_word(&self) -> Option<StatusWord> {
        match self {
            Self::Status { status } => Some(*status),
            Self::Context { source, .. } => source.status_word(),
            _ => None,
        }
    }
}

/// Extension trait for Result with APDU Errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, context: S) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context<S: Into<String>>(self, context: S) -> Self {
        self.map_err(|e| e.with_context(context))
    }
}
