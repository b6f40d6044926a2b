use sha3::{Digest, Keccak256};

use crate::error::EthError;

/// The textual prefix every EVM address and hex quantity carries.
pub const ADDRESS_PREFIX: &str = "0x";

/// Returns the 40 hex characters of an address after checking the prefix,
/// length and alphabet.
fn hex_body(address: &str) -> Result<&str, EthError> {
    let body = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| EthError::InvalidAddress("address must start with 0x".into()))?;

    if body.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            body.len()
        )));
    }

    if !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EthError::InvalidAddress(
            "address contains non-hex characters".into(),
        ));
    }

    Ok(body)
}

/// Derives an EIP-55 checksummed Ethereum address from an uncompressed secp256k1
/// public key (65 bytes, starting with 0x04).
///
/// The address is the last 20 bytes of Keccak-256 over the 64-byte key body.
pub fn pubkey_to_eth_address(uncompressed_pubkey: &[u8; 65]) -> Result<String, EthError> {
    if uncompressed_pubkey[0] != 0x04 {
        return Err(EthError::InvalidPublicKey(
            "uncompressed key must start with 0x04".into(),
        ));
    }

    let hash = Keccak256::digest(&uncompressed_pubkey[1..]);

    let mut addr_bytes = [0u8; 20];
    addr_bytes.copy_from_slice(&hash[12..]);

    Ok(bytes_to_address(&addr_bytes))
}

/// Parses a 0x-prefixed hex address string into its 20 raw bytes.
///
/// Checksums are not verified here; use [`validate_address`] for that.
pub fn address_to_bytes(address: &str) -> Result<[u8; 20], EthError> {
    let body = hex_body(address)?;
    let bytes = hex::decode(body)
        .map_err(|e| EthError::InvalidAddress(format!("invalid hex: {e}")))?;

    let mut addr = [0u8; 20];
    addr.copy_from_slice(&bytes);
    Ok(addr)
}

/// Renders 20 raw bytes as an EIP-55 checksummed address.
pub fn bytes_to_address(bytes: &[u8; 20]) -> String {
    eip55(&hex::encode(bytes))
}

/// Returns true when `identifier` is shaped like a raw address rather than a
/// token symbol. Only the prefix is inspected.
pub fn looks_like_address(identifier: &str) -> bool {
    identifier.starts_with(ADDRESS_PREFIX)
}

/// Validates an Ethereum address string.
///
/// Checks the format (0x + 40 hex characters). Mixed-case input must also
/// carry a correct EIP-55 checksum; a mismatch yields `Ok(false)`.
pub fn validate_address(address: &str) -> Result<bool, EthError> {
    let body = hex_body(address)?;

    let is_all_lower = body.chars().all(|c| !c.is_ascii_uppercase());
    let is_all_upper = body.chars().all(|c| !c.is_ascii_lowercase());
    if is_all_lower || is_all_upper {
        return Ok(true);
    }

    Ok(&eip55(&body.to_lowercase())[2..] == body)
}

/// Applies EIP-55 mixed-case checksum encoding to an Ethereum address of any
/// case.
pub fn checksum_address(address: &str) -> Result<String, EthError> {
    let body = hex_body(address)?;
    Ok(eip55(&body.to_lowercase()))
}

/// EIP-55 over 40 lowercase hex characters. Returns the 0x-prefixed result.
fn eip55(lower_hex: &str) -> String {
    let hash = Keccak256::digest(lower_hex.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str(ADDRESS_PREFIX);

    for (i, c) in lower_hex.chars().enumerate() {
        // Nibble i of the hash: high nibble for even i, low nibble for odd.
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    checksummed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eip55_checksum_known_addresses() {
        // Test vectors from EIP-55.
        let cases = [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ];

        for expected in &cases {
            let lower = format!("0x{}", expected[2..].to_lowercase());
            let result = checksum_address(&lower).unwrap();
            assert_eq!(&result, expected, "checksum mismatch for {}", expected);
        }
    }

    #[test]
    fn checksum_from_uppercase_input() {
        let input = "0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED";
        let result = checksum_address(input).unwrap();
        assert_eq!(result, "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    }

    #[test]
    fn validate_accepts_checksummed_and_single_case() {
        assert!(validate_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap());
        assert!(validate_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap());
        assert!(validate_address("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").unwrap());
    }

    #[test]
    fn validate_bad_checksum_returns_false() {
        let addr = "0x5AAEB6053F3E94C9b9A09f33669435E7Ef1BeAed";
        assert!(!validate_address(addr).unwrap());
    }

    #[test]
    fn validate_malformed_errors() {
        assert!(validate_address("0x5aAeb6053F").is_err());
        assert!(validate_address("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_err());
        assert!(validate_address("0xGGGGb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_err());
    }

    #[test]
    fn bytes_round_trip_through_checksum() {
        let text = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        let bytes = address_to_bytes(text).unwrap();
        assert_eq!(bytes[0], 0x5a);
        assert_eq!(bytes_to_address(&bytes), text);
    }

    #[test]
    fn address_to_bytes_rejects_short_input() {
        assert!(address_to_bytes("0xdead").is_err());
    }

    #[test]
    fn looks_like_address_checks_prefix_only() {
        assert!(looks_like_address("0xnot-even-hex"));
        assert!(!looks_like_address("USDC"));
        assert!(!looks_like_address("0X5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
    }

    #[test]
    fn pubkey_to_address_known_vector() {
        use k256::elliptic_curve::sec1::ToEncodedPoint;
        use k256::SecretKey;

        // Private key 0x00..01 maps to 0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf.
        let mut privkey = [0u8; 32];
        privkey[31] = 1;

        let secret = SecretKey::from_bytes((&privkey).into()).expect("valid private key");
        let uncompressed = secret.public_key().to_encoded_point(false);

        let mut key_65 = [0u8; 65];
        key_65.copy_from_slice(uncompressed.as_bytes());

        let address = pubkey_to_eth_address(&key_65).unwrap();
        assert_eq!(address, "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
    }

    #[test]
    fn invalid_uncompressed_prefix_errors() {
        let mut key = [0u8; 65];
        key[0] = 0x03;
        assert!(pubkey_to_eth_address(&key).is_err());
    }
}
