//! RSA-1024 and 3DES service

use tracing::trace;

use crate::Result;
use crate::apdu::ApduBuffer;
use crate::applet::{Applet, Instruction};
use crate::constants::{RSA1024_AID, cla, ins::rsa1024 as ins};
use crate::rsa;
use crate::store::{RsaKeyStore, SymmetricKeys};
use crate::symmetric::{Cipher, SymmetricEngine};

/// Instructions of the RSA-1024 / 3DES service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rsa1024Instruction {
    GenerateKeyPair,
    ExportModulus,
    ExportExponent,
    SetExternalModulus,
    SetExternalExponent,
    Encrypt,
    Decrypt,
    Sign,
    Verify,
    Des3Encrypt,
    Des3Decrypt,
}

impl Instruction for Rsa1024Instruction {
    const ALL: &'static [Self] = &[
        Self::GenerateKeyPair,
        Self::ExportModulus,
        Self::ExportExponent,
        Self::SetExternalModulus,
        Self::SetExternalExponent,
        Self::Encrypt,
        Self::Decrypt,
        Self::Sign,
        Self::Verify,
        Self::Des3Encrypt,
        Self::Des3Decrypt,
    ];

    fn code(self) -> u8 {
        match self {
            Self::GenerateKeyPair => ins::GENERATE_KEY_PAIR,
            Self::ExportModulus => ins::EXPORT_MODULUS,
            Self::ExportExponent => ins::EXPORT_EXPONENT,
            Self::SetExternalModulus => ins::SET_EXTERNAL_MODULUS,
            Self::SetExternalExponent => ins::SET_EXTERNAL_EXPONENT,
            Self::Encrypt => ins::ENCRYPT,
            Self::Decrypt => ins::DECRYPT,
            Self::Sign => ins::SIGN,
            Self::Verify => ins::VERIFY,
            Self::Des3Encrypt => ins::DES3_ENCRYPT,
            Self::Des3Decrypt => ins::DES3_DECRYPT,
        }
    }
}

/// RSA-1024 / 3DES service instance
#[derive(Debug)]
pub struct Rsa1024Applet {
    rsa: RsaKeyStore,
    symmetric: SymmetricEngine,
}

impl Rsa1024Applet {
    /// Allocate the service's keys; the own RSA key pair is generated here
    pub fn install() -> Result<Self> {
        Ok(Self {
            rsa: RsaKeyStore::generate()?,
            symmetric: SymmetricEngine::new(SymmetricKeys::fixed()),
        })
    }

    pub const fn rsa_store(&self) -> &RsaKeyStore {
        &self.rsa
    }
}

impl Applet for Rsa1024Applet {
    type Instruction = Rsa1024Instruction;

    const NAME: &'static str = "Rsa1024";
    const CLA: u8 = cla::RSA1024;
    const AID: &'static [u8] = RSA1024_AID;

    fn deselect(&mut self) {
        // Nothing transient here: the peer key and last signature persist
        trace!(applet = Self::NAME, "Deselected");
    }

    fn execute(&mut self, instruction: Rsa1024Instruction, apdu: &mut ApduBuffer) -> Result<usize> {
        use Rsa1024Instruction::*;

        let len = apdu.lc();
        match instruction {
            GenerateKeyPair => {
                rsa::generate_key_pair(&mut self.rsa)?;
                Ok(0)
            }
            ExportModulus => rsa::export_modulus(&self.rsa, apdu.data_mut()),
            ExportExponent => rsa::export_exponent(&self.rsa, apdu.data_mut()),
            SetExternalModulus => {
                self.rsa.set_external_modulus(apdu.incoming())?;
                Ok(0)
            }
            SetExternalExponent => {
                self.rsa.set_external_exponent(apdu.incoming())?;
                Ok(0)
            }

            Encrypt => rsa::encrypt(&self.rsa, apdu.data_mut(), len),
            Decrypt => rsa::decrypt(&self.rsa, apdu.data_mut(), len),
            Sign => rsa::sign(&mut self.rsa, apdu.data_mut(), len),
            Verify => rsa::verify(&self.rsa, apdu.incoming(), len),

            Des3Encrypt => {
                self.symmetric.encrypt(Cipher::TripleDes, apdu.incoming_mut())?;
                Ok(len)
            }
            Des3Decrypt => {
                self.symmetric.decrypt(Cipher::TripleDes, apdu.incoming_mut())?;
                Ok(len)
            }
        }
    }
}
