/// AID of the crypto-primitives service
pub const CRYPTO_TEST_AID: &[u8] = b"\xF0\x43\x4C\x41\x42\x01";
/// AID of the RSA-1024 / 3DES service
pub const RSA1024_AID: &[u8] = b"\xF0\x43\x4C\x41\x42\x02";

/// Command classes, one per service
pub mod cla {
    /// ISO 7816 interindustry class (SELECT)
    pub const ISO7816: u8 = 0x00;
    /// Crypto-primitives service
    pub const CRYPTO_TEST: u8 = 0xB0;
    /// RSA-1024 / 3DES service
    pub const RSA1024: u8 = 0xB1;
}

/// Instruction codes. Each service has its own table; the numeric values
/// overlap and must never be looked up across services.
pub mod ins {
    /// SELECT by DF name
    pub const SELECT: u8 = 0xA4;
    /// P1 of SELECT by DF name
    pub const SELECT_BY_NAME: u8 = 0x04;

    /// Crypto-primitives service
    pub mod crypto_test {
        /// Generate a fresh EC key pair
        pub const EC_GENERATE_KEY_PAIR: u8 = 0x10;
        /// Export the own EC public key
        pub const EC_EXPORT_PUBLIC: u8 = 0x11;
        /// Store the peer's EC public key
        pub const EC_IMPORT_EXTERNAL_PUBLIC: u8 = 0x12;
        /// Derive the shared secret and return it
        pub const EC_DERIVE_SHARED_SECRET: u8 = 0x13;
        /// Import external, regenerate own, export own, derive
        pub const EC_ROUND_TRIP: u8 = 0x14;

        /// SHA-256 of the payload
        pub const SHA256: u8 = 0x26;

        /// AES-128-CBC encrypt in place
        pub const AES128_ENCRYPT: u8 = 0x41;
        /// AES-128-CBC decrypt in place
        pub const AES128_DECRYPT: u8 = 0x42;
        /// AES-256-CBC encrypt in place
        pub const AES256_ENCRYPT: u8 = 0x43;
        /// AES-256-CBC decrypt in place
        pub const AES256_DECRYPT: u8 = 0x44;
        /// AES-192-CBC encrypt in place
        pub const AES192_ENCRYPT: u8 = 0x45;
        /// AES-192-CBC decrypt in place
        pub const AES192_DECRYPT: u8 = 0x46;

        /// Accept a payload, answer with no data
        pub const ECHO_SEND: u8 = 0x51;
        /// Answer with Le bytes counting up from zero
        pub const ECHO_RECEIVE: u8 = 0x52;
        /// Answer with the payload unchanged
        pub const ECHO: u8 = 0x53;
    }

    /// RSA-1024 / 3DES service
    pub mod rsa1024 {
        /// Replace the own RSA key pair
        pub const GENERATE_KEY_PAIR: u8 = 0x30;
        /// Export the own modulus
        pub const EXPORT_MODULUS: u8 = 0x31;
        /// Export the own public exponent
        pub const EXPORT_EXPONENT: u8 = 0x32;
        /// Set the peer's modulus; the peer exponent returns to 65537
        pub const SET_EXTERNAL_MODULUS: u8 = 0x33;
        /// Set the peer's public exponent
        pub const SET_EXTERNAL_EXPONENT: u8 = 0x34;

        /// PKCS#1 v1.5 encrypt to the peer key
        pub const ENCRYPT: u8 = 0x41;
        /// PKCS#1 v1.5 decrypt with the own key
        pub const DECRYPT: u8 = 0x42;
        /// SHA-256 PKCS#1 v1.5 signature with the own key
        pub const SIGN: u8 = 0x43;
        /// Data is `[signature][message]`
        pub const VERIFY: u8 = 0x44;

        /// 3DES-CBC encrypt in place
        pub const DES3_ENCRYPT: u8 = 0x51;
        /// 3DES-CBC decrypt in place
        pub const DES3_DECRYPT: u8 = 0x52;
    }
}

/// Uncompressed SEC1 encoding of a P-192 point
pub const EC_PUBLIC_KEY_LEN: usize = 49;
/// SHA-256 of the x-coordinate of the ECDH product
pub const SHARED_SECRET_LEN: usize = 32;

/// Size of both the own and the expected peer RSA keys
pub const RSA_KEY_BITS: usize = 1024;
/// Modulus, ciphertext and signature length
pub const RSA_MODULUS_LEN: usize = RSA_KEY_BITS / 8;
/// Public exponent of generated keys and default peer exponent
pub const RSA_DEFAULT_EXPONENT: u32 = 65537;
/// PKCS#1 v1.5 encryption padding overhead
pub const PKCS1_OVERHEAD: usize = 11;

/// SHA-256 output length
pub const SHA256_LEN: usize = 32;

/// AES block size, for every key size
pub const AES_BLOCK_LEN: usize = 16;
/// DES and 3DES block size
pub const DES_BLOCK_LEN: usize = 8;

/// Fixed test keys and IVs. These are compiled in so results can be compared
/// against other implementations; they are not fit for protecting anything.
pub mod fixed {
    /// AES-128 key (FIPS-197 example key)
    pub const AES128_KEY: [u8; 16] = *b"\x2B\x7E\x15\x16\x28\xAE\xD2\xA6\xAB\xF7\x15\x88\x09\xCF\x4F\x3C";
    /// AES-192 key
    pub const AES192_KEY: [u8; 24] = *b"\x8E\x73\xB0\xF7\xDA\x0E\x64\x52\xC8\x10\xF3\x2B\x80\x90\x79\xE5\x62\xF8\xEA\xD2\x52\x2C\x6B\x7B";
    /// AES-256 key
    pub const AES256_KEY: [u8; 32] = *b"\x60\x3D\xEB\x10\x15\xCA\x71\xBE\x2B\x73\xAE\xF0\x85\x7D\x77\x81\x1F\x35\x2C\x07\x3B\x61\x08\xD7\x2D\x98\x10\xA3\x09\x14\xDF\xF4";
    /// Three-key 3DES key
    pub const DES3_KEY: [u8; 24] = *b"\x01\x23\x45\x67\x89\xAB\xCD\xEF\x23\x45\x67\x89\xAB\xCD\xEF\x01\x45\x67\x89\xAB\xCD\xEF\x01\x23";

    /// IV for every AES call
    pub const AES_IV: [u8; 16] = [0u8; 16];
    /// IV for every 3DES call
    pub const DES_IV: [u8; 8] = [0u8; 8];
}

/// Data region of the card-side APDU buffer: one short-form payload, or a
/// 256-byte response when Le is zero
pub const APDU_DATA_CAPACITY: usize = 256;
