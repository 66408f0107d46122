use sha2::{Digest, Sha256};

use crate::constants::SHA256_LEN;
use crate::{Error, Result};

/// SHA-256 over a prefix of a buffer, with the hash written back over it
///
/// One hasher is kept per service and reset before every use.
#[derive(Debug, Default, Clone)]
pub struct DigestEngine {
    hasher: Sha256,
}

impl DigestEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `buf[..len]` and store the 32-byte result at `buf[..32]`
    pub fn digest(&mut self, buf: &mut [u8], len: usize) -> Result<usize> {
        if len > buf.len() {
            return Err(Error::wrong_length(len, buf.len()));
        }
        if buf.len() < SHA256_LEN {
            return Err(Error::wrong_length(buf.len(), SHA256_LEN));
        }

        self.hasher.reset();
        self.hasher.update(&buf[..len]);
        buf[..SHA256_LEN].copy_from_slice(&self.hasher.finalize_reset());
        Ok(SHA256_LEN)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn test_known_vectors() {
        let mut engine = DigestEngine::new();

        let mut buf = [0xFFu8; 64];
        assert_eq!(engine.digest(&mut buf, 0).unwrap(), 32);
        assert_eq!(
            buf[..32],
            hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
        );

        let mut buf = [0u8; 64];
        buf[..3].copy_from_slice(b"abc");
        engine.digest(&mut buf, 3).unwrap();
        assert_eq!(
            buf[..32],
            hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
    }

    #[test]
    fn test_hasher_is_reset_between_calls() {
        let mut engine = DigestEngine::new();
        let mut first = [0x42u8; 40];
        let mut second = [0x42u8; 40];
        engine.digest(&mut first, 40).unwrap();
        engine.digest(&mut second, 40).unwrap();
        assert_eq!(first[..32], second[..32]);
    }

    #[test]
    fn test_rejects_short_buffers() {
        let mut engine = DigestEngine::new();
        assert!(engine.digest(&mut [0u8; 16], 16).is_err());
        assert!(engine.digest(&mut [0u8; 32], 33).is_err());
    }
}
