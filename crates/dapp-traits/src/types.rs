use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Describes the network a wallet is connected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDescriptor {
    /// EIP-155 chain id
    pub chain_id: u64,
    /// Human readable network name ("homestead", "sepolia", "unknown", ...)
    pub name: String,
    /// ENS registry address, when the network has one
    pub ens_address: Option<Address>,
}

impl ChainDescriptor {
    /// Creates a descriptor without an ENS registry
    pub fn new(chain_id: u64, name: impl Into<String>) -> Self {
        Self {
            chain_id,
            name: name.into(),
            ens_address: None,
        }
    }

    /// Sets the ENS registry address
    pub fn with_ens_address(mut self, address: Address) -> Self {
        self.ens_address = Some(address);
        self
    }
}

/// Current fee estimates, all in wei.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeData {
    /// Legacy gas price
    pub gas_price: Option<u128>,
    /// EIP-1559 max fee per gas
    pub max_fee_per_gas: Option<u128>,
    /// EIP-1559 max priority fee per gas
    pub max_priority_fee_per_gas: Option<u128>,
}

/// Native currency of a network being registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    /// Ticker symbol
    pub symbol: String,
    /// Decimal places of the smallest unit
    pub decimals: u8,
}

/// Parameters of a `wallet_addEthereumChain` request (EIP-3085).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    /// `0x`-prefixed hex chain id
    pub chain_id: String,
    /// Display name
    pub chain_name: String,
    /// RPC endpoints, the first one is used
    pub rpc_urls: Vec<String>,
    /// Native currency
    pub native_currency: NativeCurrency,
}

/// A native-currency transfer ready to be handed to a signer.
///
/// The base fields are always present. The gas limit and EIP-1559 fee caps
/// are optional: a `None` field is left for the wallet to fill in and is
/// never sent as an explicit value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPayload {
    /// Recipient
    pub to: Address,
    /// Amount in wei
    pub value: U256,
    /// Account nonce
    pub nonce: u64,
    /// Gas limit override
    pub gas_limit: Option<u64>,
    /// Max priority fee per gas in wei
    pub max_priority_fee_per_gas: Option<u128>,
    /// Max fee per gas in wei
    pub max_fee_per_gas: Option<u128>,
}

impl TransferPayload {
    /// Creates a base payload with no optional fields
    pub fn new(to: Address, value: U256, nonce: u64) -> Self {
        Self {
            to,
            value,
            nonce,
            gas_limit: None,
            max_priority_fee_per_gas: None,
            max_fee_per_gas: None,
        }
    }

    /// Sets the gas limit
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Sets the max priority fee per gas (wei)
    pub fn with_max_priority_fee_per_gas(mut self, fee: u128) -> Self {
        self.max_priority_fee_per_gas = Some(fee);
        self
    }

    /// Sets the max fee per gas (wei)
    pub fn with_max_fee_per_gas(mut self, fee: u128) -> Self {
        self.max_fee_per_gas = Some(fee);
        self
    }

    /// True when any optional field is set
    pub fn is_extended(&self) -> bool {
        self.gas_limit.is_some()
            || self.max_priority_fee_per_gas.is_some()
            || self.max_fee_per_gas.is_some()
    }
}

/// The confirmed record of an included transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// Transaction hash
    pub transaction_hash: B256,
    /// Block the transaction was included in
    pub block_number: u64,
    /// Sender
    pub from: Address,
    /// Recipient, `None` only for contract creation
    pub to: Option<Address>,
    /// False when execution reverted
    pub status: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_payload_base() {
        let payload = TransferPayload::new(Address::ZERO, U256::from(1u64), 4);
        assert_eq!(payload.nonce, 4);
        assert!(payload.gas_limit.is_none());
        assert!(payload.max_priority_fee_per_gas.is_none());
        assert!(payload.max_fee_per_gas.is_none());
        assert!(!payload.is_extended());
    }

    #[test]
    fn test_transfer_payload_chaining() {
        let payload = TransferPayload::new(Address::ZERO, U256::ZERO, 0)
            .with_gas_limit(21_000)
            .with_max_priority_fee_per_gas(1_500_000_000)
            .with_max_fee_per_gas(30_000_000_000);

        assert_eq!(payload.gas_limit, Some(21_000));
        assert_eq!(payload.max_priority_fee_per_gas, Some(1_500_000_000));
        assert_eq!(payload.max_fee_per_gas, Some(30_000_000_000));
        assert!(payload.is_extended());
    }

    #[test]
    fn test_add_chain_params_wire_format() {
        let params = AddChainParams {
            chain_id: "0x89".to_string(),
            chain_name: "Polygon".to_string(),
            rpc_urls: vec!["https://polygon-rpc.com".to_string()],
            native_currency: NativeCurrency {
                symbol: "POL".to_string(),
                decimals: 18,
            },
        };

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["chainId"], "0x89");
        assert_eq!(json["chainName"], "Polygon");
        assert_eq!(json["rpcUrls"][0], "https://polygon-rpc.com");
        assert_eq!(json["nativeCurrency"]["symbol"], "POL");
        assert_eq!(json["nativeCurrency"]["decimals"], 18);
    }

    #[test]
    fn test_chain_descriptor_builder() {
        let chain = ChainDescriptor::new(1, "homestead").with_ens_address(Address::ZERO);
        assert_eq!(chain.chain_id, 1);
        assert_eq!(chain.ens_address, Some(Address::ZERO));
    }
}
