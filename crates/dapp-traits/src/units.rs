//! Unit, address and chain-id helpers.
//!
//! Conversions are delegated to `alloy_primitives::utils`; this module only
//! adapts them to the text a user types into a form and to the strings the
//! wallet UI displays.

use std::str::FromStr;

use alloy_primitives::utils::{format_units, parse_units, ParseUnits};
use alloy_primitives::{Address, U256};

use crate::UnitError;

/// Parses a `0x`-prefixed (or bare) 20-byte hex address.
///
/// All-lowercase and all-uppercase forms are accepted as is; mixed case must
/// carry a valid EIP-55 checksum.
pub fn parse_address(input: &str) -> Result<Address, UnitError> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(UnitError::InvalidAddress(input.to_string()));
    }

    let address =
        Address::from_str(digits).map_err(|_| UnitError::InvalidAddress(input.to_string()))?;

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum(None)[2..] != *digits {
        return Err(UnitError::InvalidAddress(input.to_string()));
    }

    Ok(address)
}

/// True when `input` is a syntactically valid address.
pub fn is_address(input: &str) -> bool {
    parse_address(input).is_ok()
}

fn parse_in_unit(input: &str, unit: &str, decimals: usize) -> Result<U256, UnitError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UnitError::InvalidDecimal {
            input: input.to_string(),
            reason: "empty".to_string(),
        });
    }
    if trimmed.starts_with('-') {
        return Err(UnitError::InvalidDecimal {
            input: input.to_string(),
            reason: "negative".to_string(),
        });
    }

    // parse_units truncates extra fraction digits instead of failing
    if let Some((_, fraction)) = trimmed.split_once('.') {
        if fraction.len() > decimals {
            return Err(UnitError::InvalidDecimal {
                input: input.to_string(),
                reason: "too many decimal places".to_string(),
            });
        }
    }

    let parsed: ParseUnits = parse_units(trimmed, unit).map_err(|e| UnitError::InvalidDecimal {
        input: input.to_string(),
        reason: e.to_string(),
    })?;
    Ok(parsed.get_absolute())
}

/// Converts a decimal ETH amount ("1.5") to wei.
pub fn parse_ether(input: &str) -> Result<U256, UnitError> {
    parse_in_unit(input, "ether", 18)
}

/// Converts a decimal gwei amount ("1.5") to wei.
pub fn parse_gwei(input: &str) -> Result<u128, UnitError> {
    let wei = parse_in_unit(input, "gwei", 9)?;
    u128::try_from(wei).map_err(|_| UnitError::InvalidDecimal {
        input: input.to_string(),
        reason: "fee does not fit in 128 bits".to_string(),
    })
}

/// Parses an unsigned decimal integer (nonce, gas limit).
pub fn parse_quantity(input: &str) -> Result<u64, UnitError> {
    input
        .trim()
        .parse::<u64>()
        .map_err(|_| UnitError::InvalidInteger(input.to_string()))
}

/// Formats wei as a decimal ETH string ("1.5", "0.0").
pub fn format_ether(wei: U256) -> String {
    format_in_unit(wei, "ether")
}

/// Formats wei as a decimal gwei string ("30.0", "1.5").
pub fn format_gwei(wei: u128) -> String {
    format_in_unit(U256::from(wei), "gwei")
}

fn format_in_unit(wei: U256, unit: &str) -> String {
    match format_units(wei, unit) {
        Ok(formatted) => trim_fraction(&formatted),
        Err(_) => wei.to_string(),
    }
}

/// Drops trailing zeros of the fractional part, keeping at least one digit.
fn trim_fraction(formatted: &str) -> String {
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{whole}.0")
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => format!("{formatted}.0"),
    }
}

/// Parses a chain id typed as decimal ("137") or hex ("0x89").
pub fn parse_chain_id(input: &str) -> Result<u64, UnitError> {
    let trimmed = input.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|_| UnitError::InvalidChainId(input.to_string()))
}

/// Normalizes a decimal or hex chain id to the `0x`-prefixed form wallets expect.
pub fn normalize_chain_id(input: &str) -> Result<String, UnitError> {
    parse_chain_id(input).map(|id| format!("{id:#x}"))
}
