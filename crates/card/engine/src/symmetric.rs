//! CBC block ciphers over the fixed test keys
//!
//! Every call starts from the fixed IV; nothing is chained between calls and
//! no padding is applied, so callers must submit whole blocks.

use cipher::block_padding::NoPadding;
use cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use tracing::trace;

use crate::constants::{AES_BLOCK_LEN, DES_BLOCK_LEN, fixed};
use crate::store::SymmetricKeys;
use crate::{Error, Result};

/// Block cipher and key size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cipher {
    Aes128,
    Aes192,
    Aes256,
    TripleDes,
}

impl Cipher {
    pub const fn block_size(self) -> usize {
        match self {
            Self::Aes128 | Self::Aes192 | Self::Aes256 => AES_BLOCK_LEN,
            Self::TripleDes => DES_BLOCK_LEN,
        }
    }

    const fn iv(self) -> &'static [u8] {
        match self {
            Self::Aes128 | Self::Aes192 | Self::Aes256 => &fixed::AES_IV,
            Self::TripleDes => &fixed::DES_IV,
        }
    }

    /// Fail before touching the buffer if it is not whole blocks
    pub fn check_alignment(self, len: usize) -> Result<()> {
        let block = self.block_size();
        if len % block != 0 {
            return Err(Error::BlockAlignment { len, block });
        }
        Ok(())
    }
}

/// Encrypts and decrypts in place with the service's fixed keys
#[derive(Debug)]
pub struct SymmetricEngine {
    keys: SymmetricKeys,
}

impl SymmetricEngine {
    pub const fn new(keys: SymmetricKeys) -> Self {
        Self { keys }
    }

    /// Encrypt `buf` in place
    pub fn encrypt(&self, cipher: Cipher, buf: &mut [u8]) -> Result<()> {
        cipher.check_alignment(buf.len())?;
        trace!(?cipher, len = buf.len(), "CBC encrypt");

        let key = self.keys.key(cipher);
        match cipher {
            Cipher::Aes128 => encrypt_cbc::<aes::Aes128>(key, cipher.iv(), buf),
            Cipher::Aes192 => encrypt_cbc::<aes::Aes192>(key, cipher.iv(), buf),
            Cipher::Aes256 => encrypt_cbc::<aes::Aes256>(key, cipher.iv(), buf),
            Cipher::TripleDes => encrypt_cbc::<des::TdesEde3>(key, cipher.iv(), buf),
        }
    }

    /// Decrypt `buf` in place
    pub fn decrypt(&self, cipher: Cipher, buf: &mut [u8]) -> Result<()> {
        cipher.check_alignment(buf.len())?;
        trace!(?cipher, len = buf.len(), "CBC decrypt");

        let key = self.keys.key(cipher);
        match cipher {
            Cipher::Aes128 => decrypt_cbc::<aes::Aes128>(key, cipher.iv(), buf),
            Cipher::Aes192 => decrypt_cbc::<aes::Aes192>(key, cipher.iv(), buf),
            Cipher::Aes256 => decrypt_cbc::<aes::Aes256>(key, cipher.iv(), buf),
            Cipher::TripleDes => decrypt_cbc::<des::TdesEde3>(key, cipher.iv(), buf),
        }
    }
}

fn encrypt_cbc<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<()>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    let len = buf.len();
    cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| Error::Crypto("invalid key or IV length"))?
        .encrypt_padded_mut::<NoPadding>(buf, len)
        .map_err(|_| Error::Crypto("CBC encryption failed"))?;
    Ok(())
}

fn decrypt_cbc<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<()>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| Error::Crypto("invalid key or IV length"))?
        .decrypt_padded_mut::<NoPadding>(buf)
        .map_err(|_| Error::Crypto("CBC decryption failed"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    // With a zero IV, the first CBC block equals the ECB encryption of the
    // first plaintext block, so the NIST SP 800-38A vectors apply.
    const NIST_BLOCK: [u8; 16] = hex!("6bc1bee22e409f96e93d7e117393172a");

    fn engine() -> SymmetricEngine {
        SymmetricEngine::new(SymmetricKeys::fixed())
    }

    #[test]
    fn test_aes_known_answers() {
        let engine = engine();
        for (cipher, expected) in [
            (Cipher::Aes128, hex!("3ad77bb40d7a3660a89ecaf32466ef97")),
            (Cipher::Aes192, hex!("bd334f1d6e45f25ff712a214571fa5cc")),
            (Cipher::Aes256, hex!("f3eed1bdb5d2a03c064b5a7e3db181f8")),
        ] {
            let mut buf = NIST_BLOCK;
            engine.encrypt(cipher, &mut buf).unwrap();
            assert_eq!(buf, expected, "{cipher:?}");

            engine.decrypt(cipher, &mut buf).unwrap();
            assert_eq!(buf, NIST_BLOCK, "{cipher:?}");
        }
    }

    #[test]
    fn test_cbc_chains_within_one_call() {
        let engine = engine();
        let mut buf = [0x5Au8; 32];
        engine.encrypt(Cipher::Aes128, &mut buf).unwrap();
        assert_ne!(buf[..16], buf[16..]);
    }

    #[test]
    fn test_iv_is_not_carried_between_calls() {
        let engine = engine();
        let mut first = [0x11u8; 16];
        let mut second = [0x11u8; 16];
        engine.encrypt(Cipher::Aes256, &mut first).unwrap();
        engine.encrypt(Cipher::Aes256, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_triple_des_round_trip() {
        let engine = engine();
        let plaintext: Vec<u8> = (0u8..24).collect();
        let mut buf = plaintext.clone();

        engine.encrypt(Cipher::TripleDes, &mut buf).unwrap();
        assert_ne!(buf, plaintext);
        engine.decrypt(Cipher::TripleDes, &mut buf).unwrap();
        assert_eq!(buf, plaintext);
    }

    #[test]
    fn test_unaligned_input_is_left_untouched() {
        let engine = engine();
        let mut buf = [0xA5u8; 15];
        assert!(matches!(
            engine.encrypt(Cipher::Aes128, &mut buf),
            Err(Error::BlockAlignment { len: 15, block: 16 })
        ));
        assert_eq!(buf, [0xA5u8; 15]);

        let mut buf = [0xA5u8; 12];
        assert!(matches!(
            engine.decrypt(Cipher::TripleDes, &mut buf),
            Err(Error::BlockAlignment { len: 12, block: 8 })
        ));
        assert_eq!(buf, [0xA5u8; 12]);
    }

    #[test]
    fn test_empty_input() {
        let engine = engine();
        let mut buf: [u8; 0] = [];
        engine.encrypt(Cipher::Aes128, &mut buf).unwrap();
        engine.decrypt(Cipher::TripleDes, &mut buf).unwrap();
    }
}
