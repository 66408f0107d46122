use cardlab_apdu_core::{StatusWord, status};

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for engine operations
///
/// Every variant is reported to the host as the status word of the command
/// that raised it; none of them end the session.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame shorter than the header, or Lc inconsistent with its length
    #[error("Malformed frame: {0}")]
    MalformedFrame(#[from] cardlab_apdu_core::Error),

    #[error("Class not supported: {0:#04X}")]
    ClassNotSupported(u8),

    #[error("Instruction not supported: {0:#04X}")]
    InstructionNotSupported(u8),

    #[error("Wrong length: {actual} bytes, expected {expected}")]
    WrongLength { actual: usize, expected: usize },

    #[error("Length {len} is not a multiple of the {block}-byte block size")]
    BlockAlignment { len: usize, block: usize },

    #[error("External modulus too short: {0} bytes")]
    ModulusLength(usize),

    #[error("External exponent is empty")]
    ExponentLength,

    #[error("Invalid data: {0}")]
    InvalidData(&'static str),

    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    #[error("No key pair generated")]
    NoKeyPair,

    #[error("Missing key material: {0}")]
    MissingKeyMaterial(&'static str),

    #[error("No applet with AID {0:02X?}")]
    AppletNotFound(Vec<u8>),

    #[error("No applet selected")]
    NoAppletSelected,

    #[error("Crypto failure: {0}")]
    Crypto(&'static str),

    #[error(transparent)]
    Rsa(#[from] rsa::Error),
}

impl Error {
    /// Status word reported to the host for this error
    pub fn status_word(&self) -> StatusWord {
        match self {
            Self::MalformedFrame(_) | Self::WrongLength { .. } | Self::BlockAlignment { .. } => {
                status::WRONG_LENGTH
            }
            Self::ClassNotSupported(_) => status::CLASS_NOT_SUPPORTED,
            Self::InstructionNotSupported(_) => status::INVALID_INSTRUCTION,
            Self::ModulusLength(_) | Self::InvalidData(_) => status::INCORRECT_DATA,
            Self::ExponentLength => status::LC_INCONSISTENT,
            Self::SignatureVerificationFailed => status::VERIFICATION_FAILED,
            Self::NoKeyPair | Self::MissingKeyMaterial(_) | Self::NoAppletSelected => {
                status::CONDITIONS_NOT_SATISFIED
            }
            Self::AppletNotFound(_) => status::FILE_NOT_FOUND,
            Self::Crypto(_) | Self::Rsa(_) => status::NO_PRECISE_DIAGNOSIS,
        }
    }

    pub(crate) const fn wrong_length(actual: usize, expected: usize) -> Self {
        Self::WrongLength { actual, expected }
    }
}
