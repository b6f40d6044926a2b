//! secp256k1 account keys: generation, parsing and address derivation.

use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;
use rand_core::OsRng;
use zeroize::Zeroize;

use crate::address::{pubkey_to_eth_address, ADDRESS_PREFIX};
use crate::error::EthError;

/// Generates a fresh secp256k1 private key from the OS random source.
pub fn generate_private_key() -> [u8; 32] {
    let secret = SecretKey::random(&mut OsRng);
    let mut out = [0u8; 32];
    out.copy_from_slice(&secret.to_bytes());
    out
}

/// Parses a hex private key, with or without the `0x` prefix.
///
/// The scalar must be a valid secp256k1 secret (non-zero, below the curve
/// order).
pub fn parse_private_key(key_hex: &str) -> Result<[u8; 32], EthError> {
    let body = key_hex.strip_prefix(ADDRESS_PREFIX).unwrap_or(key_hex);

    if body.len() != 64 {
        return Err(EthError::InvalidPrivateKey(format!(
            "expected 64 hex characters, got {}",
            body.len()
        )));
    }

    let mut bytes = hex::decode(body)
        .map_err(|e| EthError::InvalidPrivateKey(format!("invalid hex: {e}")))?;

    let mut key = [0u8; 32];
    key.copy_from_slice(&bytes);
    bytes.zeroize();

    if let Err(e) = SigningKey::from_bytes((&key).into()) {
        key.zeroize();
        return Err(EthError::InvalidPrivateKey(e.to_string()));
    }

    Ok(key)
}

/// Encodes a private key as `0x` + 64 lowercase hex characters.
pub fn encode_private_key(key: &[u8; 32]) -> String {
    format!("{ADDRESS_PREFIX}{}", hex::encode(key))
}

/// Derives the EIP-55 checksummed address controlled by `private_key`.
pub fn private_key_to_address(private_key: &[u8; 32]) -> Result<String, EthError> {
    let mut key_bytes = *private_key;
    let signing_key = SigningKey::from_bytes((&key_bytes).into())
        .map_err(|e| EthError::InvalidPrivateKey(e.to_string()));
    key_bytes.zeroize();
    let signing_key = signing_key?;

    let uncompressed = signing_key.verifying_key().to_encoded_point(false);
    let mut key_65 = [0u8; 65];
    key_65.copy_from_slice(uncompressed.as_bytes());

    pubkey_to_eth_address(&key_65)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn generated_keys_are_valid_and_distinct() {
        let a = generate_private_key();
        let b = generate_private_key();
        assert_ne!(a, b);
        assert!(private_key_to_address(&a).is_ok());
    }

    #[test]
    fn parse_accepts_both_prefix_forms() {
        let bare = parse_private_key(KEY_ONE).unwrap();
        let prefixed = parse_private_key(&format!("0x{KEY_ONE}")).unwrap();
        assert_eq!(bare, prefixed);
        assert_eq!(bare[31], 1);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(parse_private_key("0xdeadbeef").is_err());
    }

    #[test]
    fn parse_rejects_non_hex() {
        let bad = "zz".repeat(32);
        assert!(parse_private_key(&bad).is_err());
    }

    #[test]
    fn parse_rejects_zero_scalar() {
        assert!(parse_private_key(&"0".repeat(64)).is_err());
    }

    #[test]
    fn known_key_derives_known_address() {
        let key = parse_private_key(KEY_ONE).unwrap();
        assert_eq!(
            private_key_to_address(&key).unwrap(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
    }

    #[test]
    fn encode_is_prefixed_lowercase() {
        let key = parse_private_key(KEY_ONE).unwrap();
        assert_eq!(encode_private_key(&key), format!("0x{KEY_ONE}"));
    }
}
