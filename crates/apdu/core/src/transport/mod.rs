//! Transport traits for APDU communication with cards
//!
//! A transport moves raw frames between the host and a card. It has no
//! knowledge of instruction tables or key state.

pub mod error;

use std::fmt;

use bytes::Bytes;
pub use error::TransportError;
use tracing::{debug, trace};

use crate::utils::to_spaced_hex;
use crate::{Command, Error, Response};

/// Trait for basic card transports
pub trait CardTransport: Send + fmt::Debug {
    /// Send raw APDU bytes to card and return response bytes
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        trace!(command = %to_spaced_hex(command), "Transmitting raw command");
        let result = self.do_transmit_raw(command);
        match &result {
            Ok(response) => {
                trace!(response = %to_spaced_hex(response), "Received raw response");
            }
            Err(e) => {
                debug!(error = ?e, "Transport error during transmission");
            }
        }
        result
    }

    /// Internal implementation of transmit_raw
    ///
    /// This is the method that concrete implementations should override.
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError>;

    /// Serialize a command, transmit it and parse the response
    fn transmit(&mut self, command: &Command) -> Result<Response, Error> {
        let raw = self.transmit_raw(&command.to_bytes()?)?;
        Ok(Response::from_bytes(&raw)?)
    }

    /// Check if the transport is connected to a card
    fn is_connected(&self) -> bool;

    /// Reset the transport connection
    fn reset(&mut self) -> Result<(), TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct MockTransport {
        commands: Vec<Bytes>,
        connected: bool,
    }

    impl CardTransport for MockTransport {
        fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
            if !self.connected {
                return Err(TransportError::Connection);
            }
            self.commands.push(Bytes::copy_from_slice(command));
            Ok(Bytes::from_static(&[0x01, 0x90, 0x00]))
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        fn reset(&mut self) -> Result<(), TransportError> {
            self.connected = true;
            self.commands.clear();
            Ok(())
        }
    }

    #[test]
    fn test_transmit_parses_response() {
        let mut transport = MockTransport::default();
        assert_eq!(
            transport.transmit(&Command::new(0xB0, 0x51, 0, 0)),
            Err(Error::Transport(TransportError::Connection))
        );

        transport.reset().unwrap();
        let response = transport.transmit(&Command::new(0xB0, 0x51, 0, 0)).unwrap();
        assert!(response.is_success());
        assert_eq!(response.payload().as_ref(), &[0x01]);
        assert_eq!(transport.commands[0].as_ref(), &[0xB0, 0x51, 0x00, 0x00]);
    }
}
