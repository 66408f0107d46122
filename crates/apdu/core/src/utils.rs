//! Hex conversions used at the host boundary
//!
//! Frames are logged as upper-case, space-separated byte groups (`"B0 41 00 00"`);
//! input typed by an operator is a plain hex string with no separators.

use crate::Error;

/// Render bytes as upper-case, space-separated two-digit hex groups
pub fn to_spaced_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a separator-free hex string pairwise into bytes
pub fn from_hex(input: &str) -> Result<Vec<u8>, Error> {
    hex::decode(input.trim()).map_err(|e| Error::InvalidHex(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_to_spaced_hex() {
        assert_eq!(to_spaced_hex(&hex!("0a1bff")), "0A 1B FF");
        assert_eq!(to_spaced_hex(&[]), "");
        assert_eq!(to_spaced_hex(&[0x00]), "00");
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(from_hex("B0410000").unwrap(), hex!("B0410000"));
        assert_eq!(from_hex("deadBEEF").unwrap(), hex!("deadbeef"));
        assert!(from_hex("").unwrap().is_empty());
        assert!(matches!(from_hex("ABC"), Err(Error::InvalidHex(_))));
        assert!(matches!(from_hex("ZZ"), Err(Error::InvalidHex(_))));
    }
}
