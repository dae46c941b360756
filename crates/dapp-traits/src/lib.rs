//! # dApp Traits
//!
//! Capability traits describing the wallet a transfer dApp talks to.
//!
//! Browser wallets are normally reached through an ambient `window.ethereum`
//! object. This crate replaces that global with an explicit
//! [`ChainEnvironment`] that is handed to the session controller, so the same
//! flows run against an injected browser wallet, a local-key JSON-RPC wallet,
//! or a scripted test double.
//!
//! ## Core Traits
//!
//! - [`ChainEnvironment`] - Detects whether a wallet is present
//! - [`WalletProvider`] - Read-only queries plus chain switching/registration
//! - [`TransactionSigner`] - Account-bound handle that submits transfers
//! - [`PendingTransaction`] - A submitted transfer awaiting inclusion
//!
//! ## Example
//!
//! ```ignore
//! use dapp_traits::prelude::*;
//!
//! async fn show_balance<P: WalletProvider>(provider: &P) -> ProviderResult<String> {
//!     let accounts = provider.request_accounts().await?;
//!     let wei = provider.balance(accounts[0]).await?;
//!     Ok(units::format_ether(wei))
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;

mod error;
pub use error::{codes, ProviderError, ProviderErrorKind, ProviderResult, UnitError};

mod types;
pub use types::{
    AddChainParams, ChainDescriptor, FeeData, NativeCurrency, TransactionReceipt,
    TransferPayload,
};

pub mod networks;
pub mod units;

pub use alloy_primitives::{Address, B256, U256};

/// The execution environment a dApp runs in.
///
/// In a browser this is the page, which may or may not have a wallet
/// extension injected into it.
pub trait ChainEnvironment {
    /// Provider handle type handed out by this environment
    type Provider: WalletProvider;

    /// Returns the wallet provider, or `None` when no wallet is installed.
    fn provider(&self) -> Option<Self::Provider>;
}

/// Read-only chain access plus the wallet-side network management calls.
///
/// Handles are cheap to clone; every call is independent and is never
/// retried by callers.
#[async_trait(?Send)]
pub trait WalletProvider: Clone {
    /// Signer handle type derived from this provider
    type Signer: TransactionSigner;

    /// Asks the wallet for account access (`eth_requestAccounts`).
    async fn request_accounts(&self) -> ProviderResult<Vec<Address>>;

    /// Returns a signer bound to the currently selected account.
    async fn signer(&self) -> ProviderResult<Self::Signer>;

    /// Returns the balance of `address` in wei.
    async fn balance(&self, address: Address) -> ProviderResult<U256>;

    /// Describes the network the wallet is currently on.
    async fn network(&self) -> ProviderResult<ChainDescriptor>;

    /// Returns the current fee estimates. Fields the network does not report are `None`.
    async fn fee_data(&self) -> ProviderResult<FeeData>;

    /// Asks the wallet to switch to `chain_id` (`0x`-prefixed hex).
    async fn switch_chain(&self, chain_id: &str) -> ProviderResult<()>;

    /// Asks the wallet to register a new network.
    async fn add_chain(&self, params: &AddChainParams) -> ProviderResult<()>;
}

/// Account-bound handle able to authorize and submit transactions.
#[async_trait(?Send)]
pub trait TransactionSigner: Clone {
    /// Pending transaction handle returned by [`TransactionSigner::send_transaction`]
    type Pending: PendingTransaction;

    /// Address of the account this signer acts for
    fn address(&self) -> Address;

    /// Returns the account nonce including pending transactions.
    async fn transaction_count(&self) -> ProviderResult<u64>;

    /// Signs and broadcasts a native-currency transfer.
    async fn send_transaction(&self, payload: &TransferPayload) -> ProviderResult<Self::Pending>;
}

/// A broadcast transaction that has not been observed on chain yet.
#[async_trait(?Send)]
pub trait PendingTransaction {
    /// Hash of the broadcast transaction
    fn hash(&self) -> B256;

    /// Waits until the transaction has one confirmation and returns its receipt.
    ///
    /// There is no timeout; the wait ends only when the provider resolves or
    /// rejects.
    async fn wait(self) -> ProviderResult<TransactionReceipt>;
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::units;
    pub use crate::{
        AddChainParams, Address, ChainDescriptor, ChainEnvironment, FeeData, NativeCurrency,
        PendingTransaction, ProviderError, ProviderErrorKind, ProviderResult, TransactionReceipt,
        TransactionSigner, TransferPayload, UnitError, WalletProvider, B256, U256,
    };
}
