//! Core types for short-form APDU (Application Protocol Data Unit) frames
//!
//! This crate provides the frame codec shared by the card-side engine and the
//! host-side tooling:
//!
//! - Creating and parsing command frames ([`Command`], [`build_frame`])
//! - Creating and parsing responses ([`Response`], [`StatusWord`])
//! - The [`CardTransport`] abstraction frames travel over
//! - Hex helpers used for logging and operator input
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

pub mod command;
pub mod response;
pub mod transport;
pub mod utils;

mod error;
pub use error::{Error, Result, ResultExt};

pub use command::{Command, ExpectedLength, build_frame};
pub use response::Response;
pub use response::status::{StatusWord, common as status};
pub use transport::{CardTransport, TransportError};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        Bytes, BytesMut, CardTransport, Command, Error, Response, Result, ResultExt, StatusWord,
    };
}
