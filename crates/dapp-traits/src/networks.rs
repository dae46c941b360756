//! Well-known network names and ENS registry locations.

use alloy_primitives::{address, Address};

use crate::ChainDescriptor;

/// ENS registry, deployed at the same address on mainnet and the public testnets
pub const ENS_REGISTRY: Address = address!("00000000000C2E074eC69A0dFb2997BA6C7d2e1e");

/// Canonical network name for well-known chain ids.
pub fn network_name(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        1 => Some("homestead"),
        5 => Some("goerli"),
        11155111 => Some("sepolia"),
        _ => None,
    }
}

/// ENS registry address for chains that have one.
pub fn ens_registry(chain_id: u64) -> Option<Address> {
    match chain_id {
        1 | 5 | 11155111 => Some(ENS_REGISTRY),
        _ => None,
    }
}

/// Builds the descriptor for `chain_id`. Chains without a canonical name are
/// called by the name they were registered with, or "unknown".
pub fn describe(chain_id: u64, registered_name: Option<&str>) -> ChainDescriptor {
    let name = network_name(chain_id)
        .or(registered_name)
        .unwrap_or("unknown");
    let chain = ChainDescriptor::new(chain_id, name);
    match ens_registry(chain_id) {
        Some(ens) => chain.with_ens_address(ens),
        None => chain,
    }
}
