//! Networks the local wallet can be pointed at.

use serde::{Deserialize, Serialize};

pub use dapp_traits::networks::{describe, ens_registry, network_name, ENS_REGISTRY};

/// A network the wallet can switch to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownChain {
    /// EIP-155 chain id
    pub chain_id: u64,
    /// Display name given when the chain was registered
    pub name: String,
    /// JSON-RPC endpoint
    pub rpc_url: String,
}

impl KnownChain {
    /// Creates a registry entry
    pub fn new(chain_id: u64, name: impl Into<String>, rpc_url: impl Into<String>) -> Self {
        Self {
            chain_id,
            name: name.into(),
            rpc_url: rpc_url.into(),
        }
    }

    /// Descriptor the wallet reports while on this chain
    pub fn descriptor(&self) -> dapp_traits::ChainDescriptor {
        describe(self.chain_id, Some(&self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_chain_config_format() {
        let chain: KnownChain = serde_json::from_str(
            r#"{"chain_id": 137, "name": "Polygon", "rpc_url": "https://polygon-rpc.com"}"#,
        )
        .unwrap();
        assert_eq!(chain, KnownChain::new(137, "Polygon", "https://polygon-rpc.com"));
        assert_eq!(chain.descriptor().name, "Polygon");
        assert_eq!(chain.descriptor().ens_address, None);
    }

    #[test]
    fn test_registered_name_yields_to_canonical() {
        let chain = KnownChain::new(1, "Ethereum", "https://eth.llamarpc.com");
        assert_eq!(chain.descriptor().name, "homestead");
        assert_eq!(chain.descriptor().ens_address, Some(ENS_REGISTRY));
    }
}
