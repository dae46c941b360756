//! # dApp Testing Infrastructure
//!
//! Testing utilities for the transfer dApp including:
//! - A scripted wallet double ([`MockEnvironment`]) that records every call
//! - Edge case addresses and amounts
//! - Property-based testing strategies for form input
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dapp_testing::*;
//!
//! let env = MockEnvironment::new().with_nonce(4);
//! env.fail_next(Method::SendTransaction, ProviderError::user_rejected());
//!
//! proptest! {
//!     #[test]
//!     fn test_amount_parses(amount in eth_amount()) {
//!         // ...
//!     }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proptest::prelude::*;

mod mock;
pub use mock::{Call, MockEnvironment, MockPending, MockProvider, MockSigner, Method};

// ============================================================================
// Edge Case Addresses
// ============================================================================

/// Edge case addresses for testing
pub struct EdgeCaseAddresses;

impl EdgeCaseAddresses {
    /// Valid Ethereum address, EIP-55 checksummed
    pub const ETH_VALID: &'static str = "0x742D35Cc6634c0532925A3B844bc9E7595f5fFb9";

    /// Same address, all lowercase
    pub const ETH_LOWERCASE: &'static str = "0x742d35cc6634c0532925a3b844bc9e7595f5ffb9";

    /// Ethereum zero address
    pub const ETH_ZERO: &'static str = "0x0000000000000000000000000000000000000000";

    /// Ethereum max address
    pub const ETH_MAX: &'static str = "0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF";

    /// Valid addresses in every accepted spelling
    pub fn valid_ethereum() -> Vec<&'static str> {
        vec![
            Self::ETH_VALID,
            Self::ETH_LOWERCASE,
            Self::ETH_ZERO,
            Self::ETH_MAX,
            "742d35cc6634c0532925a3b844bc9e7595f5ffb9", // Missing 0x
        ]
    }

    /// Invalid Ethereum addresses
    pub fn invalid_ethereum() -> Vec<&'static str> {
        vec![
            "",
            "0x",
            "0xabc",
            "0xGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGG", // Invalid hex
            "0x742d35Cc6634C0532925a3b844Bc9e7595f5",     // Too short
            "0x742d35Cc6634C0532925a3b844Bc9e7595f5fFb9aa", // Too long
            "0x742d35Cc6634C0532925a3b844Bc9e7595f5fFb9", // Bad checksum
        ]
    }
}

// ============================================================================
// Edge Case Amounts
// ============================================================================

/// Edge case amount text for testing unit conversion
pub struct EdgeCaseAmounts;

impl EdgeCaseAmounts {
    /// Smallest unit expressed in ETH
    pub const ONE_WEI: &'static str = "0.000000000000000001";

    /// 1 million ETH
    pub const ETH_LARGE: &'static str = "1000000";

    /// Amounts that convert
    pub fn valid() -> Vec<&'static str> {
        vec!["0", "1", "1.5", "0.25", Self::ONE_WEI, Self::ETH_LARGE]
    }

    /// Amounts that must be rejected
    pub fn invalid() -> Vec<&'static str> {
        vec!["", "-1", "abc", "1.2.3", "1,5"]
    }
}

// ============================================================================
// Property-Based Testing Strategies
// ============================================================================

/// Generates lowercase `0x` addresses
pub fn valid_address() -> impl Strategy<Value = String> {
    prop::array::uniform20(any::<u8>()).prop_map(|bytes| format!("0x{}", hex::encode(bytes)))
}

/// Generates decimal ETH amounts with up to 18 fractional digits
pub fn eth_amount() -> impl Strategy<Value = String> {
    (0u64..1_000_000, prop::option::of("[0-9]{1,18}")).prop_map(|(whole, fraction)| match fraction {
        Some(fraction) => format!("{whole}.{fraction}"),
        None => whole.to_string(),
    })
}

/// Generates decimal gwei amounts with up to 9 fractional digits
pub fn gwei_amount() -> impl Strategy<Value = String> {
    (0u32..10_000, prop::option::of("[0-9]{1,9}")).prop_map(|(whole, fraction)| match fraction {
        Some(fraction) => format!("{whole}.{fraction}"),
        None => whole.to_string(),
    })
}

/// Generates nonce text
pub fn nonce_text() -> impl Strategy<Value = String> {
    (0u64..1_000_000).prop_map(|n| n.to_string())
}

/// Generates gas limit text
pub fn gas_limit_text() -> impl Strategy<Value = String> {
    (21_000u64..=30_000_000).prop_map(|n| n.to_string())
}

/// Either an empty string or a value from `inner`
pub fn maybe_empty<S>(inner: S) -> impl Strategy<Value = String>
where
    S: Strategy<Value = String>,
{
    prop_oneof![Just(String::new()), inner]
}

/// Generates RPC URLs that pass the dialog's URL check
pub fn rpc_url() -> impl Strategy<Value = String> {
    (
        prop::option::of(prop_oneof![Just("http://"), Just("https://")]),
        prop::collection::vec("[a-z0-9][a-z0-9-]{0,10}", 1..=3),
        "[a-z]{2,6}",
        prop::option::of(1u16..=65535),
        prop::option::of("[a-z0-9]{1,8}"),
    )
        .prop_map(|(scheme, labels, tld, port, path)| {
            let mut url = String::new();
            url.push_str(scheme.unwrap_or(""));
            for label in labels {
                url.push_str(&label);
                url.push('.');
            }
            url.push_str(&tld);
            if let Some(port) = port {
                url.push_str(&format!(":{port}"));
            }
            if let Some(path) = path {
                url.push('/');
                url.push_str(&path);
            }
            url
        })
}

/// Generates currency-decimals text of any length from 0 to 8
pub fn decimals_text() -> impl Strategy<Value = String> {
    "[0-9]{0,8}"
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use dapp_traits::units::{is_address, parse_ether, parse_gwei};

    #[test]
    fn test_edge_case_addresses() {
        for address in EdgeCaseAddresses::valid_ethereum() {
            assert!(is_address(address), "{address} should be valid");
        }
        for address in EdgeCaseAddresses::invalid_ethereum() {
            assert!(!is_address(address), "{address} should be invalid");
        }
    }

    #[test]
    fn test_edge_case_amounts() {
        for amount in EdgeCaseAmounts::valid() {
            assert!(parse_ether(amount).is_ok(), "{amount} should parse");
        }
        for amount in EdgeCaseAmounts::invalid() {
            assert!(parse_ether(amount).is_err(), "{amount} should not parse");
        }
    }

    proptest! {
        #[test]
        fn test_valid_address_is_accepted(address in valid_address()) {
            prop_assert!(is_address(&address));
        }

        #[test]
        fn test_amount_strategies_parse(eth in eth_amount(), gwei in gwei_amount()) {
            prop_assert!(parse_ether(&eth).is_ok());
            prop_assert!(parse_gwei(&gwei).is_ok());
        }
    }
}
