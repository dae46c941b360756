//! The add/switch network dialog: its inputs, the confirmation gate and the
//! inline messages shown next to the fields.

use dapp_traits::units::normalize_chain_id;
use dapp_traits::{AddChainParams, NativeCurrency, UnitError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Scheme optional, dotted host with a 2-6 letter TLD, optional port and path.
static RPC_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(https?://)?([\da-z-]+\.)+[a-z]{2,6}(:\d{1,5})?(/[\w .~%+=&?-]*)*/?$")
        .unwrap()
});

/// Shown under the RPC URL input
pub const INVALID_URL_MESSAGE: &str = "Please Enter Valid URL";
/// Shown under the decimals input
pub const INVALID_DECIMALS_MESSAGE: &str = "Decimal Length Should Between 2 to 6";
/// Shown when the wallet rejected the parameters
pub const CHAIN_NOT_FOUND_MESSAGE: &str = "Chain Not Found! Please Check!";

/// True when `url` looks like an RPC endpoint URL.
pub fn is_valid_rpc_url(url: &str) -> bool {
    RPC_URL_REGEX.is_match(url)
}

/// True when the decimals text has between 2 and 6 characters.
pub fn is_valid_decimals_length(decimals: &str) -> bool {
    (2..=6).contains(&decimals.chars().count())
}

/// Inputs of the network dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkForm {
    /// Display name of the network
    pub chain_name: String,
    /// RPC endpoint
    pub rpc_url: String,
    /// Chain id, decimal or `0x` hex
    pub chain_id: String,
    /// Native currency decimals
    pub currency_decimals: String,
    /// Native currency symbol
    pub currency_symbol: String,
}

impl NetworkForm {
    /// Whether the switch button is enabled.
    pub fn can_confirm(&self) -> bool {
        !self.chain_name.is_empty()
            && !self.rpc_url.is_empty()
            && is_valid_rpc_url(&self.rpc_url)
            && !self.chain_id.is_empty()
            && !self.currency_symbol.is_empty()
            && !self.currency_decimals.is_empty()
            && is_valid_decimals_length(&self.currency_decimals)
    }

    /// Inline message for the RPC URL field, only once something was typed.
    pub fn rpc_url_message(&self) -> Option<&'static str> {
        (!self.rpc_url.is_empty() && !is_valid_rpc_url(&self.rpc_url))
            .then_some(INVALID_URL_MESSAGE)
    }

    /// Inline message for the decimals field, only once something was typed.
    pub fn decimals_message(&self) -> Option<&'static str> {
        (!self.currency_decimals.is_empty() && !is_valid_decimals_length(&self.currency_decimals))
            .then_some(INVALID_DECIMALS_MESSAGE)
    }

    /// The `0x` chain id passed to the switch request.
    pub fn chain_id_hex(&self) -> Result<String, UnitError> {
        normalize_chain_id(&self.chain_id)
    }

    /// Builds the add-chain request used when the wallet does not know the chain.
    pub fn add_chain_params(&self) -> Result<AddChainParams, UnitError> {
        let decimals = self
            .currency_decimals
            .trim()
            .parse::<u8>()
            .map_err(|_| UnitError::InvalidDecimals(self.currency_decimals.clone()))?;

        Ok(AddChainParams {
            chain_id: self.chain_id_hex()?,
            chain_name: self.chain_name.clone(),
            rpc_urls: vec![self.rpc_url.clone()],
            native_currency: NativeCurrency {
                symbol: self.currency_symbol.clone(),
                decimals,
            },
        })
    }
}

/// Dialog state owned by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkDialog {
    /// Whether the dialog is visible
    pub open: bool,
    /// Typed values, kept across open and cancel
    pub form: NetworkForm,
    /// Set when the wallet (or local parsing) rejected the parameters
    pub validation_error: bool,
    /// A switch request is awaiting the wallet
    pub in_flight: bool,
}

impl NetworkDialog {
    /// Shows the dialog and clears the previous validation error.
    pub fn open(&mut self) {
        self.open = true;
        self.validation_error = false;
    }

    /// Hides the dialog. Typed values are kept.
    pub fn cancel(&mut self) {
        self.open = false;
    }

    /// Message shown at the bottom of the dialog
    pub fn error_message(&self) -> Option<&'static str> {
        self.validation_error.then_some(CHAIN_NOT_FOUND_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polygon() -> NetworkForm {
        NetworkForm {
            chain_name: "Polygon".into(),
            rpc_url: "https://polygon-rpc.com".into(),
            chain_id: "137".into(),
            currency_decimals: "18".into(),
            currency_symbol: "POL".into(),
        }
    }

    #[test]
    fn test_rpc_url_shapes() {
        for url in [
            "https://polygon-rpc.com",
            "http://rpc.sepolia.org",
            "polygon-rpc.com",
            "https://mainnet.infura.io/v3/abc123",
            "https://rpc.example.com:8545",
            "https://RPC.Example.com/",
        ] {
            assert!(is_valid_rpc_url(url), "{url} should be accepted");
        }
        for url in [
            "",
            "not a url",
            "http://localhost",
            "ftp://files.example.com",
            "https://example",
            "https://example.c",
        ] {
            assert!(!is_valid_rpc_url(url), "{url} should be rejected");
        }
    }

    #[test]
    fn test_decimals_length() {
        assert!(!is_valid_decimals_length("8"));
        assert!(is_valid_decimals_length("18"));
        assert!(is_valid_decimals_length("000018"));
        assert!(!is_valid_decimals_length("0000018"));
    }

    #[test]
    fn test_gate_requires_every_field() {
        assert!(polygon().can_confirm());

        let mut form = polygon();
        form.chain_name.clear();
        assert!(!form.can_confirm());

        let mut form = polygon();
        form.currency_symbol.clear();
        assert!(!form.can_confirm());

        let mut form = polygon();
        form.chain_id.clear();
        assert!(!form.can_confirm());

        let mut form = polygon();
        form.rpc_url = "polygon".into();
        assert!(!form.can_confirm());

        let mut form = polygon();
        form.currency_decimals = "1".into();
        assert!(!form.can_confirm());
    }

    #[test]
    fn test_inline_messages_only_after_input() {
        let mut form = NetworkForm::default();
        assert_eq!(form.rpc_url_message(), None);
        assert_eq!(form.decimals_message(), None);

        form.rpc_url = "nope".into();
        form.currency_decimals = "1234567".into();
        assert_eq!(form.rpc_url_message(), Some(INVALID_URL_MESSAGE));
        assert_eq!(form.decimals_message(), Some(INVALID_DECIMALS_MESSAGE));
    }

    #[test]
    fn test_add_chain_params() {
        let params = polygon().add_chain_params().unwrap();
        assert_eq!(params.chain_id, "0x89");
        assert_eq!(params.rpc_urls, vec!["https://polygon-rpc.com".to_string()]);
        assert_eq!(params.native_currency.decimals, 18);

        let mut form = polygon();
        form.currency_decimals = "eighteen".into();
        assert!(matches!(
            form.add_chain_params(),
            Err(UnitError::InvalidDecimals(_))
        ));
    }

    #[test]
    fn test_dialog_lifecycle() {
        let mut dialog = NetworkDialog {
            validation_error: true,
            form: polygon(),
            ..Default::default()
        };
        dialog.open();
        assert!(dialog.open);
        assert!(!dialog.validation_error);

        dialog.cancel();
        assert!(!dialog.open);
        assert_eq!(dialog.form, polygon());
    }
}
