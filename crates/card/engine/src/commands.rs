//! Host-side command builders for both services

use bytes::Bytes;
use cardlab_apdu_core::Command;

use crate::constants::{CRYPTO_TEST_AID, RSA1024_AID, cla, ins};

/// SELECT the crypto-primitives service
pub fn select_crypto_test() -> Command {
    Command::select(CRYPTO_TEST_AID)
}

/// SELECT the RSA-1024 / 3DES service
pub fn select_rsa1024() -> Command {
    Command::select(RSA1024_AID)
}

/// Commands for the crypto-primitives service
pub mod crypto_test {
    use super::*;

    use crate::symmetric::Cipher;

    fn command(ins: u8) -> Command {
        Command::new(cla::CRYPTO_TEST, ins, 0x00, 0x00)
    }

    fn command_with_data(ins: u8, data: impl Into<Bytes>) -> Command {
        Command::new_with_data(cla::CRYPTO_TEST, ins, 0x00, 0x00, data)
    }

    pub fn echo_send(data: impl Into<Bytes>) -> Command {
        command_with_data(ins::crypto_test::ECHO_SEND, data)
    }

    /// Ask for `le` pattern bytes; zero asks for 256
    pub fn echo_receive(le: u8) -> Command {
        command(ins::crypto_test::ECHO_RECEIVE).with_le(le)
    }

    pub fn echo(data: impl Into<Bytes>) -> Command {
        command_with_data(ins::crypto_test::ECHO, data)
    }

    pub fn generate_key_pair() -> Command {
        command(ins::crypto_test::EC_GENERATE_KEY_PAIR)
    }

    pub fn export_public() -> Command {
        command(ins::crypto_test::EC_EXPORT_PUBLIC)
    }

    pub fn import_external_public(public: impl Into<Bytes>) -> Command {
        command_with_data(ins::crypto_test::EC_IMPORT_EXTERNAL_PUBLIC, public)
    }

    pub fn derive_shared_secret() -> Command {
        command(ins::crypto_test::EC_DERIVE_SHARED_SECRET)
    }

    pub fn round_trip(public: impl Into<Bytes>) -> Command {
        command_with_data(ins::crypto_test::EC_ROUND_TRIP, public)
    }

    pub fn sha256(message: impl Into<Bytes>) -> Command {
        command_with_data(ins::crypto_test::SHA256, message)
    }

    /// AES encryption with the key size of `cipher`
    ///
    /// Returns `None` for ciphers this service does not offer.
    pub fn encrypt(cipher: Cipher, data: impl Into<Bytes>) -> Option<Command> {
        let ins = match cipher {
            Cipher::Aes128 => ins::crypto_test::AES128_ENCRYPT,
            Cipher::Aes192 => ins::crypto_test::AES192_ENCRYPT,
            Cipher::Aes256 => ins::crypto_test::AES256_ENCRYPT,
            Cipher::TripleDes => return None,
        };
        Some(command_with_data(ins, data))
    }

    /// AES decryption with the key size of `cipher`
    pub fn decrypt(cipher: Cipher, data: impl Into<Bytes>) -> Option<Command> {
        let ins = match cipher {
            Cipher::Aes128 => ins::crypto_test::AES128_DECRYPT,
            Cipher::Aes192 => ins::crypto_test::AES192_DECRYPT,
            Cipher::Aes256 => ins::crypto_test::AES256_DECRYPT,
            Cipher::TripleDes => return None,
        };
        Some(command_with_data(ins, data))
    }
}

/// Commands for the RSA-1024 / 3DES service
pub mod rsa1024 {
    use super::*;

    fn command(ins: u8) -> Command {
        Command::new(cla::RSA1024, ins, 0x00, 0x00)
    }

    fn command_with_data(ins: u8, data: impl Into<Bytes>) -> Command {
        Command::new_with_data(cla::RSA1024, ins, 0x00, 0x00, data)
    }

    pub fn generate_key_pair() -> Command {
        command(ins::rsa1024::GENERATE_KEY_PAIR)
    }

    pub fn export_modulus() -> Command {
        command(ins::rsa1024::EXPORT_MODULUS)
    }

    pub fn export_exponent() -> Command {
        command(ins::rsa1024::EXPORT_EXPONENT)
    }

    pub fn set_external_modulus(modulus: impl Into<Bytes>) -> Command {
        command_with_data(ins::rsa1024::SET_EXTERNAL_MODULUS, modulus)
    }

    pub fn set_external_exponent(exponent: impl Into<Bytes>) -> Command {
        command_with_data(ins::rsa1024::SET_EXTERNAL_EXPONENT, exponent)
    }

    pub fn encrypt(plaintext: impl Into<Bytes>) -> Command {
        command_with_data(ins::rsa1024::ENCRYPT, plaintext)
    }

    pub fn decrypt(ciphertext: impl Into<Bytes>) -> Command {
        command_with_data(ins::rsa1024::DECRYPT, ciphertext)
    }

    pub fn sign(message: impl Into<Bytes>) -> Command {
        command_with_data(ins::rsa1024::SIGN, message)
    }

    /// Verify `message` against `signature` with the external public key
    pub fn verify(signature: &[u8], message: &[u8]) -> Command {
        let mut data = Vec::with_capacity(signature.len() + message.len());
        data.extend_from_slice(signature);
        data.extend_from_slice(message);
        command_with_data(ins::rsa1024::VERIFY, data)
    }

    pub fn des3_encrypt(data: impl Into<Bytes>) -> Command {
        command_with_data(ins::rsa1024::DES3_ENCRYPT, data)
    }

    pub fn des3_decrypt(data: impl Into<Bytes>) -> Command {
        command_with_data(ins::rsa1024::DES3_DECRYPT, data)
    }
}
