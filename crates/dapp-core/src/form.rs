//! The transfer form and the payload it builds.

use dapp_traits::units::{is_address, parse_address, parse_ether, parse_gwei, parse_quantity};
use dapp_traits::{TransferPayload, UnitError};
use serde::Serialize;

/// Text the user typed into the transfer form.
///
/// The three advanced fields can only be edited while advanced mode is on,
/// and toggling the mode clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferForm {
    target_address: String,
    nonce: String,
    amount: String,
    gas_limit: String,
    max_priority_fee_per_gas: String,
    max_fee_per_gas: String,
    advanced: bool,
}

impl TransferForm {
    /// Creates an empty form with advanced mode off
    pub fn new() -> Self {
        Self::default()
    }

    /// Recipient address text
    pub fn target_address(&self) -> &str {
        &self.target_address
    }

    /// Nonce text
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// Amount text, in ETH
    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Gas limit text
    pub fn gas_limit(&self) -> &str {
        &self.gas_limit
    }

    /// Max priority fee text, in gwei
    pub fn max_priority_fee_per_gas(&self) -> &str {
        &self.max_priority_fee_per_gas
    }

    /// Max fee text, in gwei
    pub fn max_fee_per_gas(&self) -> &str {
        &self.max_fee_per_gas
    }

    /// Whether the advanced fee inputs are shown
    pub fn is_advanced(&self) -> bool {
        self.advanced
    }

    /// Sets the recipient address text
    pub fn set_target_address(&mut self, value: impl Into<String>) {
        self.target_address = value.into();
    }

    /// Sets the nonce text
    pub fn set_nonce(&mut self, value: impl Into<String>) {
        self.nonce = value.into();
    }

    /// Sets the amount text
    pub fn set_amount(&mut self, value: impl Into<String>) {
        self.amount = value.into();
    }

    /// Sets the gas limit text. Ignored unless advanced mode is on.
    pub fn set_gas_limit(&mut self, value: impl Into<String>) -> bool {
        self.set_advanced_field(Field::GasLimit, value.into())
    }

    /// Sets the max priority fee text. Ignored unless advanced mode is on.
    pub fn set_max_priority_fee_per_gas(&mut self, value: impl Into<String>) -> bool {
        self.set_advanced_field(Field::MaxPriorityFee, value.into())
    }

    /// Sets the max fee text. Ignored unless advanced mode is on.
    pub fn set_max_fee_per_gas(&mut self, value: impl Into<String>) -> bool {
        self.set_advanced_field(Field::MaxFee, value.into())
    }

    fn set_advanced_field(&mut self, field: Field, value: String) -> bool {
        if !self.advanced {
            tracing::debug!(?field, "advanced mode is off, ignoring input");
            return false;
        }
        match field {
            Field::GasLimit => self.gas_limit = value,
            Field::MaxPriorityFee => self.max_priority_fee_per_gas = value,
            Field::MaxFee => self.max_fee_per_gas = value,
        }
        true
    }

    /// Flips advanced mode. Either direction clears the advanced fields.
    pub fn toggle_advanced(&mut self) {
        self.set_advanced(!self.advanced);
    }

    /// Sets advanced mode and clears the advanced fields.
    pub fn set_advanced(&mut self, enabled: bool) {
        self.advanced = enabled;
        self.gas_limit.clear();
        self.max_priority_fee_per_gas.clear();
        self.max_fee_per_gas.clear();
    }

    /// Clears the recipient and the amount. Nonce and fee fields are kept.
    pub fn clear(&mut self) {
        self.target_address.clear();
        self.amount.clear();
    }

    /// True when the form holds enough to attempt a send: a valid target
    /// address and non-empty amount and nonce.
    pub fn is_complete(&self) -> bool {
        is_address(&self.target_address) && !self.amount.is_empty() && !self.nonce.is_empty()
    }

    /// Converts the form into a payload.
    ///
    /// The gas limit and the two fee caps are attached if and only if their
    /// text is non-empty. Fees are entered in gwei.
    pub fn build_payload(&self) -> Result<TransferPayload, UnitError> {
        let to = parse_address(&self.target_address)?;
        let value = parse_ether(&self.amount)?;
        let nonce = parse_quantity(&self.nonce)?;

        let mut payload = TransferPayload::new(to, value, nonce);
        if !self.gas_limit.is_empty() {
            payload = payload.with_gas_limit(parse_quantity(&self.gas_limit)?);
        }
        if !self.max_priority_fee_per_gas.is_empty() {
            payload =
                payload.with_max_priority_fee_per_gas(parse_gwei(&self.max_priority_fee_per_gas)?);
        }
        if !self.max_fee_per_gas.is_empty() {
            payload = payload.with_max_fee_per_gas(parse_gwei(&self.max_fee_per_gas)?);
        }
        Ok(payload)
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    GasLimit,
    MaxPriorityFee,
    MaxFee,
}

#[cfg(test)]
mod tests {
    use super::*;
    use dapp_traits::U256;

    const TARGET: &str = "0x742d35cc6634c0532925a3b844bc9e7595f5ffb9";

    fn filled() -> TransferForm {
        let mut form = TransferForm::new();
        form.set_target_address(TARGET);
        form.set_amount("1.5");
        form.set_nonce("4");
        form
    }

    #[test]
    fn test_base_payload_has_no_optional_fields() {
        let payload = filled().build_payload().unwrap();
        assert_eq!(payload.to, parse_address(TARGET).unwrap());
        assert_eq!(payload.value, U256::from(1_500_000_000_000_000_000u128));
        assert_eq!(payload.nonce, 4);
        assert!(!payload.is_extended());
    }

    #[test]
    fn test_advanced_fields_are_attached_in_wei() {
        let mut form = filled();
        form.set_advanced(true);
        assert!(form.set_gas_limit("21000"));
        assert!(form.set_max_priority_fee_per_gas("1.5"));
        assert!(form.set_max_fee_per_gas("30"));

        let payload = form.build_payload().unwrap();
        assert_eq!(payload.gas_limit, Some(21_000));
        assert_eq!(payload.max_priority_fee_per_gas, Some(1_500_000_000));
        assert_eq!(payload.max_fee_per_gas, Some(30_000_000_000));
    }

    #[test]
    fn test_advanced_inputs_ignored_when_off() {
        let mut form = filled();
        assert!(!form.set_gas_limit("21000"));
        assert_eq!(form.gas_limit(), "");
    }

    #[test]
    fn test_toggle_clears_advanced_fields() {
        let mut form = filled();
        form.toggle_advanced();
        form.set_gas_limit("21000");
        form.set_max_fee_per_gas("30");
        form.toggle_advanced();

        assert!(!form.is_advanced());
        assert_eq!(form.gas_limit(), "");
        assert_eq!(form.max_fee_per_gas(), "");
        assert_eq!(form.nonce(), "4");
    }

    #[test]
    fn test_clear_keeps_nonce() {
        let mut form = filled();
        form.clear();
        assert_eq!(form.target_address(), "");
        assert_eq!(form.amount(), "");
        assert_eq!(form.nonce(), "4");
    }

    #[test]
    fn test_is_complete() {
        assert!(filled().is_complete());

        let mut form = filled();
        form.set_target_address("0xabc");
        assert!(!form.is_complete());

        let mut form = filled();
        form.set_nonce("");
        assert!(!form.is_complete());
    }

    #[test]
    fn test_bad_numbers_fail() {
        let mut form = filled();
        form.set_amount("one");
        assert!(matches!(
            form.build_payload(),
            Err(UnitError::InvalidDecimal { .. })
        ));

        let mut form = filled();
        form.set_nonce("4.2");
        assert!(matches!(form.build_payload(), Err(UnitError::InvalidInteger(_))));
    }
}
