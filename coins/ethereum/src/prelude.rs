//! This prelude module simplifies importing many useful items from the dapp_ethereum crate using a glob import.
//!
//! To use this prelude, add the following to your code:
//! ```
//! use dapp_ethereum::prelude::*;
//! ```

pub use crate::{KnownChain, RpcEnvironment, RpcEnvironmentConfig, RpcProvider, RpcSigner};

pub use alloy::primitives::{Address, B256, U256};
pub use dapp_traits::{ChainEnvironment, PendingTransaction, TransactionSigner, WalletProvider};
