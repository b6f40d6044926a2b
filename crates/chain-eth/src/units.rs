//! Conversion between raw integer amounts and human-readable decimal strings.
//!
//! All arithmetic is done on decimal digit strings and [`U256`]; nothing here
//! goes through floating point.

use alloy_primitives::U256;

use crate::error::EthError;

/// Decimals of the native currency on every supported chain.
pub const NATIVE_DECIMALS: u8 = 18;

/// Formats a raw integer amount as a decimal string with `decimals` places.
///
/// Trailing zeros in the fraction are dropped, and the decimal point is
/// omitted for whole numbers: `1_500_000` with 6 decimals is `"1.5"`, and
/// `2_000_000` is `"2"`.
pub fn format_units(raw: U256, decimals: u8) -> String {
    let digits = raw.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };

    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
    let frac_part = frac_part.trim_end_matches('0');

    if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac_part}")
    }
}

/// Parses a decimal string into a raw integer amount with `decimals` places.
///
/// Fraction digits beyond `decimals` are rounded half-up at the last kept
/// place. Signs, exponents and separators are rejected.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, EthError> {
    let amount = amount.trim();
    let invalid = || EthError::InvalidAmount(amount.to_string());

    let (int_part, frac_part) = match amount.split_once('.') {
        Some((i, f)) => (i, f),
        None => (amount, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let decimals = decimals as usize;
    let (kept, dropped) = if frac_part.len() > decimals {
        frac_part.split_at(decimals)
    } else {
        (frac_part, "")
    };

    let mut digits = String::with_capacity(int_part.len() + decimals);
    digits.push_str(int_part);
    digits.push_str(kept);
    digits.push_str(&"0".repeat(decimals - kept.len()));

    let digits = digits.trim_start_matches('0');
    let mut raw = if digits.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(digits, 10).map_err(|_| invalid())?
    };

    if dropped.as_bytes().first().is_some_and(|d| *d >= b'5') {
        raw = raw.checked_add(U256::from(1u8)).ok_or_else(invalid)?;
    }

    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(s: &str) -> U256 {
        U256::from_str_radix(s, 10).unwrap()
    }

    #[test]
    fn format_zero() {
        assert_eq!(format_units(U256::ZERO, 6), "0");
        assert_eq!(format_units(U256::ZERO, 0), "0");
    }

    #[test]
    fn format_whole_amount_has_no_point() {
        assert_eq!(format_units(u("2000000"), 6), "2");
    }

    #[test]
    fn format_trims_trailing_fraction_zeros() {
        assert_eq!(format_units(u("1500000"), 6), "1.5");
    }

    #[test]
    fn format_sub_unit_amount() {
        assert_eq!(format_units(u("1"), 18), "0.000000000000000001");
        assert_eq!(format_units(u("123"), 3), "0.123");
    }

    #[test]
    fn format_beyond_u128_keeps_every_digit() {
        let raw = U256::MAX;
        let formatted = format_units(raw, 18);
        assert_eq!(formatted.replace('.', ""), raw.to_string());
    }

    #[test]
    fn format_one_wei_short_of_one_ether() {
        assert_eq!(
            format_units(u("999999999999999999"), NATIVE_DECIMALS),
            "0.999999999999999999"
        );
    }

    #[test]
    fn parse_whole_and_fractional() {
        assert_eq!(parse_units("1", 6).unwrap(), u("1000000"));
        assert_eq!(parse_units("10.5", 6).unwrap(), u("10500000"));
        assert_eq!(parse_units(".25", 2).unwrap(), u("25"));
        assert_eq!(parse_units("3.", 2).unwrap(), u("300"));
    }

    #[test]
    fn parse_tenth_of_an_ether() {
        assert_eq!(
            parse_units("0.1", NATIVE_DECIMALS).unwrap(),
            u("100000000000000000")
        );
    }

    #[test]
    fn parse_rounds_excess_precision_half_up() {
        assert_eq!(parse_units("1.2345", 2).unwrap(), u("123"));
        assert_eq!(parse_units("1.2351", 2).unwrap(), u("124"));
        assert_eq!(parse_units("0.999", 2).unwrap(), u("100"));
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", ".", "-1", "1e18", "1.2.3", "abc", "1,000"] {
            assert!(parse_units(bad, 18).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn parse_rejects_overflow() {
        let too_big = format!("1{}", "0".repeat(80));
        assert!(parse_units(&too_big, 0).is_err());
    }

    #[test]
    fn format_and_parse_agree_on_scaling() {
        let raw = u("123456789012345678901234567890");
        let text = format_units(raw, 18);
        assert_eq!(parse_units(&text, 18).unwrap(), raw);
    }
}
