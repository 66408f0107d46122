//! Card-side view of a command frame
//!
//! Handlers receive the incoming payload in a fixed data region and write
//! their output back into that same region, starting at offset zero. The
//! response payload is whatever prefix of the region the handler reports.
//! Input and output therefore alias: a handler that needs its input after it
//! has started writing output must copy it out first.

use bytes::Bytes;
use cardlab_apdu_core::{Command, Response};

use crate::constants::APDU_DATA_CAPACITY;
use crate::{Error, Result};

/// Header fields plus an in-place data region
pub struct ApduBuffer {
    cla: u8,
    ins: u8,
    p1: u8,
    p2: u8,
    lc: usize,
    le: Option<u8>,
    data: [u8; APDU_DATA_CAPACITY],
}

impl std::fmt::Debug for ApduBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApduBuffer")
            .field("cla", &format_args!("{:#04x}", self.cla))
            .field("ins", &format_args!("{:#04x}", self.ins))
            .field("p1", &self.p1)
            .field("p2", &self.p2)
            .field("lc", &self.lc)
            .field("le", &self.le)
            .finish_non_exhaustive()
    }
}

impl ApduBuffer {
    /// Parse a raw frame into a buffer
    pub fn from_frame(frame: &[u8]) -> Result<Self> {
        Self::from_command(&Command::from_bytes(frame)?)
    }

    /// Load an already parsed command
    pub fn from_command(command: &Command) -> Result<Self> {
        let payload = command.payload();
        let mut data = [0u8; APDU_DATA_CAPACITY];
        data.get_mut(..payload.len())
            .ok_or_else(|| Error::wrong_length(payload.len(), APDU_DATA_CAPACITY))?
            .copy_from_slice(payload);

        Ok(Self {
            cla: command.cla,
            ins: command.ins,
            p1: command.p1,
            p2: command.p2,
            lc: payload.len(),
            le: command.le,
            data,
        })
    }

    pub const fn cla(&self) -> u8 {
        self.cla
    }

    pub const fn ins(&self) -> u8 {
        self.ins
    }

    pub const fn p1(&self) -> u8 {
        self.p1
    }

    pub const fn p2(&self) -> u8 {
        self.p2
    }

    /// Number of incoming payload bytes
    pub const fn lc(&self) -> usize {
        self.lc
    }

    /// Expected response length; a zero Le asks for 256 bytes
    pub fn expected_length(&self) -> Option<usize> {
        self.le
            .map(|le| if le == 0 { APDU_DATA_CAPACITY } else { le as usize })
    }

    /// Incoming payload
    pub fn incoming(&self) -> &[u8] {
        &self.data[..self.lc]
    }

    /// Incoming payload, writable in place
    pub fn incoming_mut(&mut self) -> &mut [u8] {
        &mut self.data[..self.lc]
    }

    /// The whole data region, for outputs longer than the input
    pub const fn data_mut(&mut self) -> &mut [u8; APDU_DATA_CAPACITY] {
        &mut self.data
    }

    /// Copy `bytes` to the start of the data region and return its length
    pub fn write_output(&mut self, bytes: &[u8]) -> Result<usize> {
        if bytes.len() > APDU_DATA_CAPACITY {
            return Err(Error::wrong_length(bytes.len(), APDU_DATA_CAPACITY));
        }
        self.data[..bytes.len()].copy_from_slice(bytes);
        Ok(bytes.len())
    }

    /// Success response carrying the first `len` bytes of the data region
    pub fn response(&self, len: usize) -> Response {
        Response::success(Bytes::copy_from_slice(&self.data[..len]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_frame() {
        let apdu = ApduBuffer::from_frame(&[0xB0, 0x53, 0x01, 0x02, 0x03, 0xAA, 0xBB, 0xCC]).unwrap();
        assert_eq!(apdu.cla(), 0xB0);
        assert_eq!(apdu.ins(), 0x53);
        assert_eq!(apdu.p1(), 0x01);
        assert_eq!(apdu.p2(), 0x02);
        assert_eq!(apdu.incoming(), &[0xAA, 0xBB, 0xCC]);
        assert_eq!(apdu.expected_length(), None);

        assert!(matches!(
            ApduBuffer::from_frame(&[0xB0, 0x53]),
            Err(Error::MalformedFrame(_))
        ));
    }

    #[test]
    fn test_expected_length_zero_means_256() {
        let apdu = ApduBuffer::from_frame(&[0xB0, 0x52, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(apdu.expected_length(), Some(256));
        let apdu = ApduBuffer::from_frame(&[0xB0, 0x52, 0x00, 0x00, 0x10]).unwrap();
        assert_eq!(apdu.expected_length(), Some(16));
    }

    #[test]
    fn test_output_overwrites_input() {
        let mut apdu = ApduBuffer::from_frame(&[0xB0, 0x53, 0x00, 0x00, 0x02, 0x01, 0x02]).unwrap();
        let len = apdu.write_output(&[0xFF, 0xEE, 0xDD]).unwrap();
        assert_eq!(apdu.response(len).payload().as_ref(), &[0xFF, 0xEE, 0xDD]);
        assert!(apdu.write_output(&[0u8; 257]).is_err());
    }

    #[test]
    fn test_oversized_command_is_rejected() {
        let command = Command::new_with_data(0xB0, 0x53, 0x00, 0x00, vec![0u8; 300]);
        assert!(matches!(
            ApduBuffer::from_command(&command),
            Err(Error::WrongLength { actual: 300, expected: 256 })
        ));

        let command = Command::new_with_data(0xB0, 0x53, 0x00, 0x00, vec![0xAB; 256]);
        assert_eq!(ApduBuffer::from_command(&command).unwrap().lc(), 256);
    }
}
