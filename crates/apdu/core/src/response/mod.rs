//! APDU response definitions
//!
//! A response is `[payload][SW1][SW2]`; the payload may be empty.

pub mod error;
pub mod status;
pub mod utils;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::Error;
use error::ResponseError;
use status::StatusWord;

/// Basic APDU response structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Response payload data
    payload: Bytes,
    /// Status word
    status: StatusWord,
}

impl Response {
    /// Create a new response with payload and status
    pub fn new(payload: impl Into<Bytes>, status: impl Into<StatusWord>) -> Self {
        Self {
            payload: payload.into(),
            status: status.into(),
        }
    }

    /// Create a success response
    pub fn success(payload: impl Into<Bytes>) -> Self {
        Self::new(payload, status::common::SUCCESS)
    }

    /// Create an error response from a status word
    pub fn error(status: impl Into<StatusWord>) -> Self {
        Self {
            payload: Bytes::new(),
            status: status.into(),
        }
    }

    /// Parse response from raw bytes (including status word)
    pub fn from_bytes(data: &[u8]) -> Result<Self, ResponseError> {
        let (status, payload) = utils::extract_status_and_payload(data)?;

        trace!(
            sw1 = format_args!("{:#04x}", status.sw1),
            sw2 = format_args!("{:#04x}", status.sw2),
            payload_len = payload.len(),
            "Parsed APDU response"
        );

        Ok(Self {
            payload: Bytes::copy_from_slice(payload),
            status,
        })
    }

    /// Get the response payload data
    pub const fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Get the status word
    pub const fn status(&self) -> StatusWord {
        self.status
    }

    /// Check if the response indicates success
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Convert to the payload, failing on any non-success status
    pub fn into_payload(self) -> Result<Bytes, Error> {
        if self.is_success() {
            Ok(self.payload)
        } else {
            Err(Error::Status {
                status: self.status,
            })
        }
    }

    /// Serialize to `[payload][SW1][SW2]`
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.payload.len() + 2);
        buf.put_slice(&self.payload);
        buf.put_u8(self.status.sw1);
        buf.put_u8(self.status.sw2);
        buf.freeze()
    }
}

impl TryFrom<&[u8]> for Response {
    type Error = ResponseError;

    fn try_from(data: &[u8]) -> Result<Self, ResponseError> {
        Self::from_bytes(data)
    }
}

impl From<Response> for Bytes {
    fn from(response: Response) -> Self {
        response.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_creation() {
        let resp = Response::new(Bytes::from_static(&[0x01, 0x02, 0x03]), (0x90, 0x00));
        assert_eq!(resp.payload().as_ref(), &[0x01, 0x02, 0x03]);
        assert_eq!(resp.status(), StatusWord::new(0x90, 0x00));
        assert!(resp.is_success());
    }

    #[test]
    fn test_response_from_bytes() {
        let resp = Response::from_bytes(&[0x01, 0x02, 0x03, 0x90, 0x00]).unwrap();
        assert_eq!(resp.payload().as_ref(), &[0x01, 0x02, 0x03]);
        assert!(resp.is_success());

        let resp = Response::from_bytes(&[0x67, 0x00]).unwrap();
        assert!(resp.payload().is_empty());
        assert!(resp.status().is_wrong_length());

        assert!(Response::from_bytes(&[0x01]).is_err());
    }

    #[test]
    fn test_response_serialization() {
        let resp = Response::success(Bytes::from_static(&[0xAA]));
        assert_eq!(Bytes::from(resp).as_ref(), &[0xAA, 0x90, 0x00]);
        assert_eq!(
            Response::error((0x6D, 0x00)).to_bytes().as_ref(),
            &[0x6D, 0x00]
        );
    }

    #[test]
    fn test_response_into_payload() {
        let success = Response::success(Bytes::from_static(&[0x01, 0x02]));
        assert_eq!(success.into_payload().unwrap().as_ref(), &[0x01, 0x02]);

        let error = Response::error((0x6A, 0x82)).into_payload().unwrap_err();
        assert_eq!(error.status_word().map(|sw| sw.to_u16()), Some(0x6A82));
    }
}
