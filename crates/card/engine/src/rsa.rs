//! RSA-1024 operations
//!
//! Operations take the whole data region and the number of input bytes in it,
//! and return the number of output bytes written back from offset zero.
//! Library calls never write into the region directly: results are produced
//! into owned buffers and copied back.

use ::rsa::traits::PublicKeyParts;
use ::rsa::{Pkcs1v15Encrypt, Pkcs1v15Sign};
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::Zeroizing;

use crate::constants::{PKCS1_OVERHEAD, RSA_MODULUS_LEN};
use crate::store::RsaKeyStore;
use crate::{Error, Result};

/// Replace the own key pair
pub fn generate_key_pair(store: &mut RsaKeyStore) -> Result<()> {
    store.generate_rsa_key_pair()
}

/// Own modulus, big-endian
pub fn export_modulus(store: &RsaKeyStore, buf: &mut [u8]) -> Result<usize> {
    write_back(buf, &store.key_pair().n().to_bytes_be())
}

/// Own public exponent, big-endian with no leading zeros
pub fn export_exponent(store: &RsaKeyStore, buf: &mut [u8]) -> Result<usize> {
    write_back(buf, &store.key_pair().e().to_bytes_be())
}

/// PKCS#1 v1.5 encryption of `buf[..len]` to the peer's public key
pub fn encrypt(store: &RsaKeyStore, buf: &mut [u8], len: usize) -> Result<usize> {
    let public = store.external_public()?;
    let limit = public.size().saturating_sub(PKCS1_OVERHEAD);
    if len > limit {
        return Err(Error::wrong_length(len, limit));
    }

    let ciphertext = public
        .encrypt(&mut rand_v8::thread_rng(), Pkcs1v15Encrypt, input(buf, len)?)
        .map_err(|_| Error::Crypto("PKCS#1 encryption failed"))?;
    write_back(buf, &ciphertext)
}

/// PKCS#1 v1.5 decryption of a full-length ciphertext with the own key
pub fn decrypt(store: &RsaKeyStore, buf: &mut [u8], len: usize) -> Result<usize> {
    if len != RSA_MODULUS_LEN {
        return Err(Error::wrong_length(len, RSA_MODULUS_LEN));
    }

    let plaintext = Zeroizing::new(
        store
            .key_pair()
            .decrypt(Pkcs1v15Encrypt, input(buf, len)?)
            .map_err(|_| Error::Crypto("PKCS#1 decryption failed"))?,
    );
    write_back(buf, &plaintext)
}

/// Sign `buf[..len]` with the own key (PKCS#1 v1.5, SHA-256)
///
/// The signature is kept in the store and copied to the start of `buf`.
pub fn sign(store: &mut RsaKeyStore, buf: &mut [u8], len: usize) -> Result<usize> {
    let hashed = Sha256::digest(input(buf, len)?);
    let signature = store
        .key_pair()
        .sign(Pkcs1v15Sign::new::<Sha256>(), &hashed)?;
    if signature.len() != RSA_MODULUS_LEN {
        return Err(Error::Crypto("unexpected signature length"));
    }

    store.signature_mut().copy_from_slice(&signature);
    debug!(message_len = len, "Signed message");
    write_back(buf, store.signature())
}

/// Check `buf[..len]`, laid out as `[signature][message]`, against the peer's
/// public key
pub fn verify(store: &RsaKeyStore, buf: &[u8], len: usize) -> Result<usize> {
    let data = input(buf, len)?;
    if data.len() < RSA_MODULUS_LEN {
        return Err(Error::wrong_length(data.len(), RSA_MODULUS_LEN));
    }
    let (signature, message) = data.split_at(RSA_MODULUS_LEN);

    let public = store.external_public()?;
    let hashed = Sha256::digest(message);
    public
        .verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, signature)
        .map_err(|_| Error::SignatureVerificationFailed)?;
    Ok(0)
}

fn input(buf: &[u8], len: usize) -> Result<&[u8]> {
    buf.get(..len)
        .ok_or_else(|| Error::wrong_length(len, buf.len()))
}

fn write_back(buf: &mut [u8], output: &[u8]) -> Result<usize> {
    let capacity = buf.len();
    let target = buf
        .get_mut(..output.len())
        .ok_or_else(|| Error::wrong_length(output.len(), capacity))?;
    target.copy_from_slice(output);
    Ok(output.len())
}
