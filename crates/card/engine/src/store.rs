//! Key & secret store
//!
//! Each service owns the stores it needs, created once at installation. Key
//! material is only changed through the methods here; everything is wiped on
//! drop, and the transient buffers are additionally wiped on every deselect.

use std::fmt;

type SecretKey = elliptic_curve::SecretKey<p192::NistP192>;
use p192::elliptic_curve::sec1::ToEncodedPoint;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{
    EC_PUBLIC_KEY_LEN, RSA_DEFAULT_EXPONENT, RSA_KEY_BITS, RSA_MODULUS_LEN, SHARED_SECRET_LEN,
    fixed,
};
use crate::symmetric::Cipher;
use crate::{Error, Result};

/// Fixed-size secret with a presence flag, zeroed when wiped or dropped
pub struct SecretBuffer<const N: usize> {
    bytes: [u8; N],
    present: bool,
}

impl<const N: usize> SecretBuffer<N> {
    pub const fn new() -> Self {
        Self {
            bytes: [0u8; N],
            present: false,
        }
    }

    /// Overwrite the buffer with a new value
    pub fn set(&mut self, bytes: &[u8; N]) {
        self.bytes.copy_from_slice(bytes);
        self.present = true;
    }

    pub const fn get(&self) -> Option<&[u8; N]> {
        if self.present { Some(&self.bytes) } else { None }
    }

    pub const fn is_present(&self) -> bool {
        self.present
    }

    /// Zero the bytes and mark the buffer empty
    pub fn wipe(&mut self) {
        self.zeroize();
    }
}

impl<const N: usize> Default for SecretBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Zeroize for SecretBuffer<N> {
    fn zeroize(&mut self) {
        self.bytes.zeroize();
        self.present = false;
    }
}

impl<const N: usize> Drop for SecretBuffer<N> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<const N: usize> ZeroizeOnDrop for SecretBuffer<N> {}

impl<const N: usize> fmt::Debug for SecretBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBuffer")
            .field("len", &N)
            .field("present", &self.present)
            .finish()
    }
}

/// Compiled-in symmetric keys
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKeys {
    aes128: [u8; 16],
    aes192: [u8; 24],
    aes256: [u8; 32],
    des3: [u8; 24],
}

impl SymmetricKeys {
    /// The fixed test keys
    pub const fn fixed() -> Self {
        Self {
            aes128: fixed::AES128_KEY,
            aes192: fixed::AES192_KEY,
            aes256: fixed::AES256_KEY,
            des3: fixed::DES3_KEY,
        }
    }

    pub const fn key(&self, cipher: Cipher) -> &[u8] {
        match cipher {
            Cipher::Aes128 => &self.aes128,
            Cipher::Aes192 => &self.aes192,
            Cipher::Aes256 => &self.aes256,
            Cipher::TripleDes => &self.des3,
        }
    }
}

impl fmt::Debug for SymmetricKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKeys(..)")
    }
}

/// EC key pair, external public key and derived shared secret
#[derive(Default)]
pub struct EcKeyStore {
    key_pair: Option<SecretKey>,
    external_public: SecretBuffer<EC_PUBLIC_KEY_LEN>,
    shared_secret: SecretBuffer<SHARED_SECRET_LEN>,
}

impl EcKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the own key pair; the previous shared secret no longer applies
    pub fn generate_ec_key_pair(&mut self) {
        self.key_pair = Some(SecretKey::random(&mut rand_v8::thread_rng()));
        self.shared_secret.wipe();
        debug!("Generated EC key pair");
    }

    pub const fn key_pair(&self) -> Option<&SecretKey> {
        self.key_pair.as_ref()
    }

    /// Own public key, uncompressed SEC1
    pub fn own_ec_public(&self) -> Result<[u8; EC_PUBLIC_KEY_LEN]> {
        let secret = self.key_pair.as_ref().ok_or(Error::NoKeyPair)?;
        let point = secret.public_key().to_encoded_point(false);
        point
            .as_bytes()
            .try_into()
            .map_err(|_| Error::Crypto("unexpected encoded point length"))
    }

    /// Store the peer's public key; it is only validated as a point on use
    pub fn set_external_ec_public(&mut self, bytes: &[u8]) -> Result<()> {
        let bytes: &[u8; EC_PUBLIC_KEY_LEN] = bytes
            .try_into()
            .map_err(|_| Error::wrong_length(bytes.len(), EC_PUBLIC_KEY_LEN))?;
        self.external_public.set(bytes);
        self.shared_secret.wipe();
        Ok(())
    }

    pub const fn external_ec_public(&self) -> Option<&[u8; EC_PUBLIC_KEY_LEN]> {
        self.external_public.get()
    }

    pub(crate) fn set_shared_secret(&mut self, secret: &[u8; SHARED_SECRET_LEN]) {
        self.shared_secret.set(secret);
    }

    pub const fn shared_secret(&self) -> Option<&[u8; SHARED_SECRET_LEN]> {
        self.shared_secret.get()
    }

    /// Wipe the external public key and shared secret; long-lived keys stay
    pub fn clear_transient_secrets(&mut self) {
        self.external_public.wipe();
        self.shared_secret.wipe();
    }
}

impl fmt::Debug for EcKeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcKeyStore")
            .field("key_pair", &self.key_pair.is_some())
            .field("external_public", &self.external_public)
            .field("shared_secret", &self.shared_secret)
            .finish()
    }
}

/// Own RSA key pair, the peer's public key and the last signature
pub struct RsaKeyStore {
    key_pair: RsaPrivateKey,
    external_modulus: Option<BigUint>,
    external_exponent: BigUint,
    signature: [u8; RSA_MODULUS_LEN],
}

impl RsaKeyStore {
    /// Create a store holding a freshly generated key pair
    pub fn generate() -> Result<Self> {
        Ok(Self {
            key_pair: generate_rsa_key(&BigUint::from(RSA_DEFAULT_EXPONENT))?,
            external_modulus: None,
            external_exponent: BigUint::from(RSA_DEFAULT_EXPONENT),
            signature: [0u8; RSA_MODULUS_LEN],
        })
    }

    /// Replace the own key pair, keeping its public exponent
    pub fn generate_rsa_key_pair(&mut self) -> Result<()> {
        let exponent = self.key_pair.e().clone();
        self.key_pair = generate_rsa_key(&exponent)?;
        self.signature.zeroize();
        Ok(())
    }

    pub const fn key_pair(&self) -> &RsaPrivateKey {
        &self.key_pair
    }

    pub fn own_public(&self) -> RsaPublicKey {
        self.key_pair.to_public_key()
    }

    /// Set the peer's modulus and reset its exponent to the default
    ///
    /// The stored key is left untouched when the modulus is rejected.
    pub fn set_external_modulus(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() < RSA_MODULUS_LEN {
            return Err(Error::ModulusLength(bytes.len()));
        }
        self.external_modulus = Some(BigUint::from_bytes_be(bytes));
        self.external_exponent = BigUint::from(RSA_DEFAULT_EXPONENT);
        Ok(())
    }

    pub fn set_external_exponent(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Err(Error::ExponentLength);
        }
        self.external_exponent = BigUint::from_bytes_be(bytes);
        Ok(())
    }

    pub const fn external_modulus(&self) -> Option<&BigUint> {
        self.external_modulus.as_ref()
    }

    pub const fn external_exponent(&self) -> &BigUint {
        &self.external_exponent
    }

    /// The peer's public key, validated
    pub fn external_public(&self) -> Result<RsaPublicKey> {
        let modulus = self
            .external_modulus
            .clone()
            .ok_or(Error::MissingKeyMaterial("external RSA modulus"))?;
        RsaPublicKey::new(modulus, self.external_exponent.clone())
            .map_err(|_| Error::InvalidData("external RSA key parameters"))
    }

    pub(crate) const fn signature_mut(&mut self) -> &mut [u8; RSA_MODULUS_LEN] {
        &mut self.signature
    }

    pub const fn signature(&self) -> &[u8; RSA_MODULUS_LEN] {
        &self.signature
    }
}

impl Drop for RsaKeyStore {
    fn drop(&mut self) {
        self.signature.zeroize();
    }
}

impl fmt::Debug for RsaKeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKeyStore")
            .field("modulus_bits", &self.key_pair.n().bits())
            .field("external_modulus", &self.external_modulus.is_some())
            .field("external_exponent", &self.external_exponent)
            .finish_non_exhaustive()
    }
}

/// Generate an RSA-1024 key with its CRT parameters precomputed
fn generate_rsa_key(exponent: &BigUint) -> Result<RsaPrivateKey> {
    let mut key = RsaPrivateKey::new_with_exp(&mut rand_v8::thread_rng(), RSA_KEY_BITS, exponent)?;
    key.precompute()?;
    debug!(bits = RSA_KEY_BITS, "Generated RSA key pair");
    Ok(key)
}
