//! Key agreement over NIST P-192
//!
//! The engine holds no state of its own; its state is read off the key store:
//!
//! ```text
//! NoKeyPair ──generate──▶ HaveOwnKeyPair ──import──▶ HaveExternalPublic ──derive──▶ HaveSharedSecret
//! ```
//!
//! Generating from any state lands in `HaveOwnKeyPair` (or `HaveExternalPublic`
//! when a peer key is already stored) and discards the shared secret.

use elliptic_curve::ecdh::diffie_hellman;
type PublicKey = elliptic_curve::PublicKey<p192::NistP192>;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::constants::{EC_PUBLIC_KEY_LEN, SHARED_SECRET_LEN};
use crate::store::EcKeyStore;
use crate::{Error, Result};

/// Key-agreement progress derived from the key material present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcdhState {
    NoKeyPair,
    HaveOwnKeyPair,
    HaveExternalPublic,
    HaveSharedSecret,
}

impl EcdhState {
    pub fn of(store: &EcKeyStore) -> Self {
        if store.key_pair().is_none() {
            Self::NoKeyPair
        } else if store.shared_secret().is_some() {
            Self::HaveSharedSecret
        } else if store.external_ec_public().is_some() {
            Self::HaveExternalPublic
        } else {
            Self::HaveOwnKeyPair
        }
    }
}

/// Replace the own key pair
pub fn generate_key_pair(store: &mut EcKeyStore) {
    store.generate_ec_key_pair();
}

/// Own public key, uncompressed
pub fn export_own_public(store: &EcKeyStore) -> Result<[u8; EC_PUBLIC_KEY_LEN]> {
    store.own_ec_public()
}

/// Record the peer's public key; any earlier shared secret is dropped
pub fn import_external_public(store: &mut EcKeyStore, bytes: &[u8]) -> Result<()> {
    store.set_external_ec_public(bytes)
}

/// Derive and store the shared secret: SHA-256 of the 24-byte x-coordinate
/// of the product
pub fn derive_shared_secret(store: &mut EcKeyStore) -> Result<[u8; SHARED_SECRET_LEN]> {
    let secret = store.key_pair().ok_or(Error::NoKeyPair)?;
    let external = store
        .external_ec_public()
        .ok_or(Error::MissingKeyMaterial("external EC public key"))?;
    let public = PublicKey::from_sec1_bytes(external)
        .map_err(|_| Error::InvalidData("external public key is not a curve point"))?;

    let shared = diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());
    let bytes: [u8; SHARED_SECRET_LEN] = Sha256::digest(shared.raw_secret_bytes()).into();

    store.set_shared_secret(&bytes);
    debug!("Derived ECDH shared secret");
    Ok(bytes)
}

/// Import the peer key, regenerate the own pair, derive, and return the new
/// own public key
///
/// A fresh pair is generated on every call. On error the store keeps
/// whatever the completed steps left in it.
pub fn round_trip(store: &mut EcKeyStore, external: &[u8]) -> Result<[u8; EC_PUBLIC_KEY_LEN]> {
    import_external_public(store, external)?;
    generate_key_pair(store);
    let public = export_own_public(store)?;
    derive_shared_secret(store)?;
    Ok(public)
}
