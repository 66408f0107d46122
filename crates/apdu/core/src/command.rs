//! APDU command frames
//!
//! Short-form command APDUs according to ISO/IEC 7816-4:
//! `[CLA][INS][P1][P2]`, optionally followed by `[Lc][data]` and an `[Le]` trailer.
//! Payloads above 255 bytes (extended length) are not supported.

use bytes::{BufMut, Bytes, BytesMut};

use crate::Error;

/// Expected length type for APDU commands
pub type ExpectedLength = u8;

/// Length of the mandatory command header (CLA, INS, P1, P2)
pub const HEADER_LEN: usize = 4;

/// Largest payload a short-form command can carry
pub const MAX_PAYLOAD_LEN: usize = 255;

/// Generic APDU command structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Command data (optional)
    pub data: Option<Bytes>,
    /// Expected length (optional)
    pub le: Option<ExpectedLength>,
}

impl Command {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: None,
        }
    }

    /// Create a new command with expected response length (Le)
    pub const fn new_with_le(cla: u8, ins: u8, p1: u8, p2: u8, le: ExpectedLength) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: Some(le),
        }
    }

    /// Create a new command with data payload
    pub fn new_with_data<T: Into<Bytes>>(cla: u8, ins: u8, p1: u8, p2: u8, data: T) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Some(data.into()),
            le: None,
        }
    }

    /// Create a new command with both data and expected length
    pub fn new_with_data_and_le<T: Into<Bytes>>(
        cla: u8,
        ins: u8,
        p1: u8,
        p2: u8,
        data: T,
        le: ExpectedLength,
    ) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Some(data.into()),
            le: Some(le),
        }
    }

    /// ISO 7816 SELECT by DF name
    pub fn select(aid: &[u8]) -> Self {
        Self::new_with_data(0x00, 0xA4, 0x04, 0x00, Bytes::copy_from_slice(aid))
    }

    /// Set the data field
    pub fn with_data<T: Into<Bytes>>(mut self, data: T) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the expected length field
    pub const fn with_le(mut self, le: ExpectedLength) -> Self {
        self.le = Some(le);
        self
    }

    /// Command class (CLA)
    pub const fn class(&self) -> u8 {
        self.cla
    }

    /// Instruction code (INS)
    pub const fn instruction(&self) -> u8 {
        self.ins
    }

    /// First parameter (P1)
    pub const fn p1(&self) -> u8 {
        self.p1
    }

    /// Second parameter (P2)
    pub const fn p2(&self) -> u8 {
        self.p2
    }

    /// Command payload, empty when absent
    pub fn payload(&self) -> &[u8] {
        self.data.as_deref().unwrap_or_default()
    }

    /// Expected response length (optional)
    pub const fn expected_length(&self) -> Option<ExpectedLength> {
        self.le
    }

    /// Calculate length of serialized command
    pub fn command_length(&self) -> usize {
        let mut length = HEADER_LEN;
        if let Some(data) = self.data.as_deref().filter(|d| !d.is_empty()) {
            length += 1 + data.len();
        }
        if self.le.is_some() {
            length += 1;
        }
        length
    }

    /// Convert to raw APDU bytes
    ///
    /// An empty data field is omitted entirely, so `new_with_data(.., [], ..)`
    /// serializes the same as a header-only command.
    pub fn to_bytes(&self) -> Result<Bytes, Error> {
        let mut buffer = BytesMut::with_capacity(self.command_length());

        // Header: CLA, INS, P1, P2
        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);

        // Add Lc and data if present
        if let Some(data) = self.data.as_deref().filter(|d| !d.is_empty()) {
            let lc = u8::try_from(data.len()).map_err(|_| Error::DataTooLong(data.len()))?;
            buffer.put_u8(lc);
            buffer.put_slice(data);
        }

        // Add Le if present
        if let Some(le) = self.le {
            buffer.put_u8(le);
        }

        Ok(buffer.freeze())
    }

    /// Parse a command from raw bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() < HEADER_LEN {
            return Err(Error::InvalidCommandLength(data.len()));
        }

        let mut command = Self::new(data[0], data[1], data[2], data[3]);

        // Parse Lc, data, and Le if present
        if data.len() > HEADER_LEN {
            let lc = data[4] as usize;

            if data.len() == 5 {
                // Only Le present, no data
                command.le = Some(data[4]);
            } else if data.len() >= 5 + lc {
                if lc > 0 {
                    command.data = Some(Bytes::copy_from_slice(&data[5..5 + lc]));
                }

                // Check for Le
                if data.len() > 5 + lc {
                    if data.len() == 5 + lc + 1 {
                        command.le = Some(data[5 + lc]);
                    } else {
                        return Err(Error::InvalidCommandLength(data.len()));
                    }
                }
            } else {
                return Err(Error::InvalidCommandLength(data.len()));
            }
        }

        Ok(command)
    }
}

/// Build a raw frame from its components
///
/// Produces `[CLA][INS][P1][P2][Lc][data][Le]`. With empty data the Lc and data
/// fields are dropped, giving the 5-byte `[CLA][INS][P1][P2][Le]` form.
pub fn build_frame(
    cla: u8,
    ins: u8,
    p1: u8,
    p2: u8,
    data: &[u8],
    le: ExpectedLength,
) -> Result<Bytes, Error> {
    Command::new_with_data_and_le(cla, ins, p1, p2, Bytes::copy_from_slice(data), le).to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serialization() {
        let data = Bytes::from_static(&[0xA0, 0x00, 0x00, 0x01, 0x51, 0x00]);
        let cmd = Command::new_with_data_and_le(0x00, 0xA4, 0x04, 0x00, data, 0);
        let bytes = cmd.to_bytes().unwrap();

        assert_eq!(bytes[0], 0x00); // CLA
        assert_eq!(bytes[1], 0xA4); // INS
        assert_eq!(bytes[2], 0x04); // P1
        assert_eq!(bytes[3], 0x00); // P2
        assert_eq!(bytes[4], 0x06); // Lc
        assert_eq!(&bytes[5..11], &[0xA0, 0x00, 0x00, 0x01, 0x51, 0x00]);
        assert_eq!(bytes[11], 0x00); // Le
    }

    #[test]
    fn test_command_length() {
        let cmd1 = Command::new(0x00, 0xB0, 0x00, 0x00);
        assert_eq!(cmd1.command_length(), 4);

        let cmd2 = Command::new_with_le(0x00, 0xB0, 0x00, 0x00, 0xFF);
        assert_eq!(cmd2.command_length(), 5);

        let data = Bytes::from_static(&[0x01, 0x02, 0x03]);
        let cmd3 = Command::new_with_data(0x00, 0xD6, 0x00, 0x00, data.clone());
        assert_eq!(cmd3.command_length(), 8);

        let cmd4 = Command::new_with_data_and_le(0x00, 0xD6, 0x00, 0x00, data, 0xFF);
        assert_eq!(cmd4.command_length(), 9);
    }

    #[test]
    fn test_command_from_bytes() {
        // Header only
        let cmd = Command::from_bytes(&[0x00, 0xA4, 0x04, 0x00]).unwrap();
        assert_eq!(cmd.cla, 0x00);
        assert_eq!(cmd.ins, 0xA4);
        assert_eq!(cmd.p1, 0x04);
        assert_eq!(cmd.p2, 0x00);
        assert!(cmd.data.is_none());
        assert!(cmd.le.is_none());

        // Data but no Le
        let cmd = Command::from_bytes(&[0x00, 0xA4, 0x04, 0x00, 0x03, 0x01, 0x02, 0x03]).unwrap();
        assert_eq!(cmd.payload(), &[0x01, 0x02, 0x03]);
        assert!(cmd.le.is_none());

        // Data and Le
        let cmd =
            Command::from_bytes(&[0x00, 0xA4, 0x04, 0x00, 0x03, 0x01, 0x02, 0x03, 0xFF]).unwrap();
        assert_eq!(cmd.payload(), &[0x01, 0x02, 0x03]);
        assert_eq!(cmd.le, Some(0xFF));

        // Le only
        let cmd = Command::from_bytes(&[0x00, 0xB0, 0x00, 0x00, 0xFF]).unwrap();
        assert!(cmd.data.is_none());
        assert_eq!(cmd.le, Some(0xFF));
    }

    #[test]
    fn test_malformed_frames() {
        assert_eq!(
            Command::from_bytes(&[0xB0, 0x41]),
            Err(Error::InvalidCommandLength(2))
        );
        // Lc claims more data than is present
        assert_eq!(
            Command::from_bytes(&[0xB0, 0x41, 0x00, 0x00, 0x10, 0x01]),
            Err(Error::InvalidCommandLength(6))
        );
        // Two trailing bytes after the data
        assert!(Command::from_bytes(&[0xB0, 0x41, 0x00, 0x00, 0x01, 0xAA, 0x00, 0x00]).is_err());
    }

    #[test]
    fn test_build_frame_layouts() {
        let frame = build_frame(0xB0, 0x52, 0x00, 0x00, &[], 0x10).unwrap();
        assert_eq!(frame.as_ref(), &[0xB0, 0x52, 0x00, 0x00, 0x10]);

        let frame = build_frame(0xB0, 0x53, 0x01, 0x02, &[0xDE, 0xAD], 0x02).unwrap();
        assert_eq!(
            frame.as_ref(),
            &[0xB0, 0x53, 0x01, 0x02, 0x02, 0xDE, 0xAD, 0x02]
        );

        let parsed = Command::from_bytes(&frame).unwrap();
        assert_eq!(parsed.payload(), &[0xDE, 0xAD]);
        assert_eq!(parsed.le, Some(0x02));
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let cmd = Command::new_with_data(0xB0, 0x53, 0, 0, vec![0u8; 256]);
        assert_eq!(cmd.to_bytes(), Err(Error::DataTooLong(256)));
    }
}
