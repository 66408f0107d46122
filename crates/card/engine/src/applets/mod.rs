mod rsa1024;

pub use crypto_test::{CryptoTestApplet, CryptoTestInstruction};
pub use rsa1024::{Rsa1024Applet, Rsa1024Instruction};
