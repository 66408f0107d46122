//! On-card command engine
//!
//! Two services answer short-form APDUs: a crypto-primitives service (echo,
//! ECDH, AES, SHA-256) and an RSA-1024 / 3DES service. The [`Simulator`] hosts
//! both and implements [`CardTransport`](cardlab_apdu_core::CardTransport), so
//! host code drives it exactly as it would a reader.
//!
//! The symmetric keys and IVs are fixed test values compiled into the crate.
//! Nothing encrypted with them is protected.

pub mod apdu;
pub mod applet;
pub mod applets;
pub mod commands;
mod constants;
pub mod digest;
pub mod ecdh;
mod error;
pub mod rsa;
pub mod simulator;
pub mod store;
pub mod symmetric;

pub use applet::{Applet, Instruction};
pub use applets::{CryptoTestApplet, CryptoTestInstruction, Rsa1024Applet, Rsa1024Instruction};
pub use error::{Error, Result};
pub use simulator::{AppletId, Simulator, SimulatorConfig};
pub use symmetric::Cipher;

pub use constants::*;
