//! Wallet session state and the refresh that populates it.

use dapp_traits::units::{format_ether, format_gwei};
use dapp_traits::{
    Address, ChainDescriptor, FeeData, ProviderResult, TransactionSigner, WalletProvider,
};
use tracing::debug;

/// Everything the page knows about the connected wallet.
///
/// Created empty, populated by a refresh after connecting, and cleared as a
/// whole on disconnect. Each connect or disconnect starts a new epoch so late
/// results from a previous session can be recognised.
pub struct WalletSession<P: WalletProvider> {
    provider: Option<P>,
    signer: Option<P::Signer>,
    account: Option<Address>,
    balance: Option<String>,
    chain: Option<ChainDescriptor>,
    gas_price: Option<String>,
    max_fee_per_gas: Option<String>,
    max_priority_fee_per_gas: Option<String>,
    epoch: u64,
}

impl<P: WalletProvider> Default for WalletSession<P> {
    fn default() -> Self {
        Self {
            provider: None,
            signer: None,
            account: None,
            balance: None,
            chain: None,
            gas_price: None,
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
            epoch: 0,
        }
    }
}

impl<P: WalletProvider> WalletSession<P> {
    /// Creates an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider handle, set once an account is connected
    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    /// Signer handle, set by the first successful refresh
    pub fn signer(&self) -> Option<&P::Signer> {
        self.signer.as_ref()
    }

    /// Connected account
    pub fn account(&self) -> Option<Address> {
        self.account
    }

    /// Balance in ETH
    pub fn balance(&self) -> Option<&str> {
        self.balance.as_deref()
    }

    /// Current network
    pub fn chain(&self) -> Option<&ChainDescriptor> {
        self.chain.as_ref()
    }

    /// Legacy gas price in gwei
    pub fn gas_price(&self) -> Option<&str> {
        self.gas_price.as_deref()
    }

    /// EIP-1559 max fee in gwei
    pub fn max_fee_per_gas(&self) -> Option<&str> {
        self.max_fee_per_gas.as_deref()
    }

    /// EIP-1559 max priority fee in gwei
    pub fn max_priority_fee_per_gas(&self) -> Option<&str> {
        self.max_priority_fee_per_gas.as_deref()
    }

    /// Session generation, bumped on every connect and disconnect
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// True when an account is connected
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    /// True when the pieces needed to send a transfer are present
    pub fn can_sign(&self) -> bool {
        self.provider.is_some() && self.signer.is_some()
    }

    /// Starts a new session for `account`. Previously fetched data is dropped.
    pub fn begin(&mut self, provider: P, account: Address) {
        let epoch = self.epoch + 1;
        *self = Self {
            provider: Some(provider),
            account: Some(account),
            epoch,
            ..Self::default()
        };
    }

    /// Resets every field to its empty default and starts a new epoch.
    pub fn clear(&mut self) {
        let epoch = self.epoch + 1;
        *self = Self {
            epoch,
            ..Self::default()
        };
    }

    /// What a refresh needs, or `None` when no account is connected.
    pub fn refresh_request(&self, skip_nonce: bool) -> Option<RefreshRequest<P>> {
        let provider = self.provider.clone()?;
        let account = self.account?;
        Some(RefreshRequest {
            provider,
            account,
            skip_nonce,
            epoch: self.epoch,
        })
    }

    /// Commits a snapshot in one step. Fee fields the network did not report
    /// keep their previous value.
    pub fn apply(&mut self, snapshot: SessionSnapshot<P::Signer>) {
        self.signer = Some(snapshot.signer);
        self.balance = Some(format_ether(snapshot.balance));
        self.chain = Some(snapshot.chain);
        if let Some(price) = snapshot.fees.gas_price {
            self.gas_price = Some(format_gwei(price));
        }
        if let Some(fee) = snapshot.fees.max_fee_per_gas {
            self.max_fee_per_gas = Some(format_gwei(fee));
        }
        if let Some(fee) = snapshot.fees.max_priority_fee_per_gas {
            self.max_priority_fee_per_gas = Some(format_gwei(fee));
        }
    }
}

/// Inputs of a refresh, captured before the first await.
#[derive(Debug, Clone)]
pub struct RefreshRequest<P> {
    /// Wallet to query
    pub provider: P,
    /// Account whose state is fetched
    pub account: Address,
    /// The user already typed a nonce, so it is not fetched
    pub skip_nonce: bool,
    /// Session epoch the request belongs to
    pub epoch: u64,
}

/// Values fetched by a refresh, not yet visible to the page.
#[derive(Debug, Clone)]
pub struct SessionSnapshot<S> {
    /// Signer for the selected account
    pub signer: S,
    /// Balance in wei
    pub balance: dapp_traits::U256,
    /// Pending nonce, when it was fetched
    pub nonce: Option<u64>,
    /// Current network
    pub chain: ChainDescriptor,
    /// Current fee estimates
    pub fees: FeeData,
}

/// Fetches signer, balance, nonce, network and fees, in that order.
///
/// Stops at the first failure; nothing is written anywhere until the caller
/// applies the snapshot.
pub async fn fetch_session<P: WalletProvider>(
    request: &RefreshRequest<P>,
) -> ProviderResult<SessionSnapshot<P::Signer>> {
    let provider = &request.provider;

    let signer = provider.signer().await?;
    let balance = provider.balance(request.account).await?;
    let nonce = if request.skip_nonce {
        None
    } else {
        Some(signer.transaction_count().await?)
    };
    let chain = provider.network().await?;
    let fees = provider.fee_data().await?;

    debug!(
        account = %request.account,
        chain_id = chain.chain_id,
        ?nonce,
        "fetched session snapshot"
    );

    Ok(SessionSnapshot {
        signer,
        balance,
        nonce,
        chain,
        fees,
    })
}
