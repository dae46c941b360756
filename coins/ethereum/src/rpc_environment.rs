use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::str::FromStr;

use alloy::network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, B256, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use dapp_traits::units::parse_chain_id;
use dapp_traits::{
    AddChainParams, ChainDescriptor, ChainEnvironment, FeeData, PendingTransaction, ProviderError,
    ProviderResult, TransactionReceipt, TransactionSigner, TransferPayload, WalletProvider,
};
use tracing::{debug, info, warn};

use crate::chains::{describe, KnownChain};
use crate::error::provider_error;
use crate::Error;

/// Native currency decimals accepted when registering a chain
const NATIVE_DECIMALS: u8 = 18;

fn connect(rpc_url: &str, signer: Option<PrivateKeySigner>) -> Result<DynProvider, Error> {
    let url = rpc_url.parse::<Url>().map_err(|e| Error::InvalidUrl {
        url: rpc_url.to_string(),
        reason: format!("{e}"),
    })?;
    let provider = match signer {
        Some(signer) => ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased(),
        None => ProviderBuilder::new().connect_http(url).erased(),
    };
    Ok(provider)
}

/// Builder for [RpcEnvironment], allows for specification of the key and the known networks
#[derive(Debug, Clone, Default)]
pub struct RpcEnvironmentConfig {
    private_key: Option<String>,
    chains: Vec<KnownChain>,
    active_chain: Option<u64>,
}

impl RpcEnvironmentConfig {
    /// Creates a new RpcEnvironmentConfig with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hex private key of the account. Without one the environment has no wallet.
    pub fn private_key(&mut self, private_key: impl Into<String>) -> &mut Self {
        self.private_key = Some(private_key.into());
        self
    }

    /// Adds a network the wallet knows about
    pub fn chain(&mut self, chain: KnownChain) -> &mut Self {
        self.chains.push(chain);
        self
    }

    /// Network the wallet starts on. Defaults to the first registered chain.
    pub fn active_chain(&mut self, chain_id: u64) -> &mut Self {
        self.active_chain = Some(chain_id);
        self
    }

    /// Builds the RpcEnvironment with the specified options
    pub fn build(&self) -> Result<RpcEnvironment, Error> {
        let signer = match &self.private_key {
            Some(key) => Some(
                PrivateKeySigner::from_str(key.trim())
                    .map_err(|e| Error::InvalidPrivateKey(e.to_string()))?,
            ),
            None => None,
        };

        let chains: BTreeMap<u64, KnownChain> = self
            .chains
            .iter()
            .map(|chain| (chain.chain_id, chain.clone()))
            .collect();
        let active = match self.active_chain.or_else(|| self.chains.first().map(|c| c.chain_id)) {
            Some(id) if chains.contains_key(&id) => id,
            Some(id) => return Err(Error::UnknownChain(id)),
            None => return Err(Error::UnknownChain(0)),
        };

        Ok(RpcEnvironment {
            state: Rc::new(RefCell::new(WalletState {
                signer,
                chains,
                active,
            })),
        })
    }
}

#[derive(Debug)]
struct WalletState {
    signer: Option<PrivateKeySigner>,
    chains: BTreeMap<u64, KnownChain>,
    active: u64,
}

/// A wallet backed by a local private key and plain JSON-RPC endpoints.
///
/// It answers the same requests an injected browser wallet does, including
/// `4902` for networks it has not been told about.
#[derive(Debug, Clone)]
pub struct RpcEnvironment {
    state: Rc<RefCell<WalletState>>,
}

impl RpcEnvironment {
    /// Returns the builder for the [RpcEnvironment].
    pub fn builder() -> RpcEnvironmentConfig {
        RpcEnvironmentConfig::new()
    }

    /// Chain the wallet is currently on
    pub fn active_chain(&self) -> KnownChain {
        let state = self.state.borrow();
        state
            .chains
            .get(&state.active)
            .cloned()
            .unwrap_or_else(|| KnownChain::new(state.active, "unknown", ""))
    }

    /// Every network the wallet knows, ordered by chain id
    pub fn known_chains(&self) -> Vec<KnownChain> {
        self.state.borrow().chains.values().cloned().collect()
    }

    /// Address of the configured key
    pub fn address(&self) -> Option<Address> {
        self.state.borrow().signer.as_ref().map(|s| s.address())
    }
}

impl ChainEnvironment for RpcEnvironment {
    type Provider = RpcProvider;

    fn provider(&self) -> Option<RpcProvider> {
        let installed = self.state.borrow().signer.is_some();
        installed.then(|| RpcProvider {
            state: Rc::clone(&self.state),
        })
    }
}

/// Provider handle of [RpcEnvironment]. Every call goes to the active chain's endpoint.
#[derive(Debug, Clone)]
pub struct RpcProvider {
    state: Rc<RefCell<WalletState>>,
}

impl RpcProvider {
    fn active(&self) -> ProviderResult<(DynProvider, Option<PrivateKeySigner>, KnownChain)> {
        let state = self.state.borrow();
        let chain = state
            .chains
            .get(&state.active)
            .cloned()
            .ok_or(Error::UnknownChain(state.active))?;
        let provider = connect(&chain.rpc_url, state.signer.clone())?;
        Ok((provider, state.signer.clone(), chain))
    }
}

#[async_trait(?Send)]
impl WalletProvider for RpcProvider {
    type Signer = RpcSigner;

    async fn request_accounts(&self) -> ProviderResult<Vec<Address>> {
        Ok(self
            .state
            .borrow()
            .signer
            .as_ref()
            .map(|s| s.address())
            .into_iter()
            .collect())
    }

    async fn signer(&self) -> ProviderResult<RpcSigner> {
        let (provider, signer, chain) = self.active()?;
        let signer = signer
            .ok_or_else(|| ProviderError::new(dapp_traits::codes::UNAUTHORIZED, "No account"))?;
        Ok(RpcSigner {
            provider,
            address: signer.address(),
            chain_id: chain.chain_id,
        })
    }

    async fn balance(&self, address: Address) -> ProviderResult<U256> {
        let (provider, _, _) = self.active()?;
        provider
            .get_balance(address)
            .await
            .map_err(|e| provider_error(&e))
    }

    async fn network(&self) -> ProviderResult<ChainDescriptor> {
        let (provider, _, chain) = self.active()?;
        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| provider_error(&e))?;
        if chain_id != chain.chain_id {
            warn!(expected = chain.chain_id, actual = chain_id, "endpoint serves a different chain");
        }
        Ok(describe(chain_id, Some(&chain.name)))
    }

    async fn fee_data(&self) -> ProviderResult<FeeData> {
        let (provider, _, _) = self.active()?;
        let gas_price = provider
            .get_gas_price()
            .await
            .map_err(|e| provider_error(&e))?;

        // pre-London networks have no base fee
        let eip1559 = match provider.estimate_eip1559_fees().await {
            Ok(estimate) => Some(estimate),
            Err(e) => {
                debug!(error = %e, "EIP-1559 fee estimate unavailable");
                None
            }
        };

        Ok(FeeData {
            gas_price: Some(gas_price),
            max_fee_per_gas: eip1559.as_ref().map(|e| e.max_fee_per_gas),
            max_priority_fee_per_gas: eip1559.as_ref().map(|e| e.max_priority_fee_per_gas),
        })
    }

    async fn switch_chain(&self, chain_id: &str) -> ProviderResult<()> {
        let id = parse_chain_id(chain_id).map_err(|e| ProviderError::invalid_params(e.to_string()))?;
        let mut state = self.state.borrow_mut();
        if !state.chains.contains_key(&id) {
            return Err(Error::UnknownChain(id).into());
        }
        state.active = id;
        info!(chain_id = id, "switched chain");
        Ok(())
    }

    async fn add_chain(&self, params: &AddChainParams) -> ProviderResult<()> {
        let id = parse_chain_id(&params.chain_id)
            .map_err(|e| ProviderError::invalid_params(e.to_string()))?;
        let rpc_url = params
            .rpc_urls
            .first()
            .cloned()
            .ok_or_else(|| ProviderError::invalid_params("Expected at least one RPC URL"))?;
        if params.native_currency.decimals != NATIVE_DECIMALS {
            return Err(ProviderError::invalid_params(format!(
                "Expected the number {NATIVE_DECIMALS} for 'nativeCurrency.decimals', received {}",
                params.native_currency.decimals
            )));
        }

        let probe = connect(&rpc_url, None)?;
        let served = probe
            .get_chain_id()
            .await
            .map_err(|e| ProviderError::new(dapp_traits::codes::INTERNAL_ERROR, e.to_string()))?;
        if served != id {
            return Err(Error::ChainMismatch {
                expected: id,
                actual: served,
            }
            .into());
        }

        let mut state = self.state.borrow_mut();
        state
            .chains
            .insert(id, KnownChain::new(id, params.chain_name.clone(), rpc_url));
        state.active = id;
        info!(chain_id = id, name = %params.chain_name, "registered chain");
        Ok(())
    }
}

/// Signer handle of [RpcEnvironment], bound to the chain that was active when it was created.
#[derive(Debug, Clone)]
pub struct RpcSigner {
    provider: DynProvider,
    address: Address,
    chain_id: u64,
}

impl RpcSigner {
    /// Chain this signer submits to
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

#[async_trait(?Send)]
impl TransactionSigner for RpcSigner {
    type Pending = RpcPending;

    fn address(&self) -> Address {
        self.address
    }

    async fn transaction_count(&self) -> ProviderResult<u64> {
        self.provider
            .get_transaction_count(self.address)
            .pending()
            .await
            .map_err(|e| provider_error(&e))
    }

    async fn send_transaction(&self, payload: &TransferPayload) -> ProviderResult<RpcPending> {
        let mut tx = TransactionRequest::default()
            .with_from(self.address)
            .with_to(payload.to)
            .with_value(payload.value)
            .with_nonce(payload.nonce)
            .with_chain_id(self.chain_id);
        if let Some(gas_limit) = payload.gas_limit {
            tx = tx.with_gas_limit(gas_limit);
        }
        if let Some(fee) = payload.max_priority_fee_per_gas {
            tx = tx.with_max_priority_fee_per_gas(fee);
        }
        if let Some(fee) = payload.max_fee_per_gas {
            tx = tx.with_max_fee_per_gas(fee);
        }

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| provider_error(&e))?;
        Ok(RpcPending {
            inner: pending,
            to: payload.to,
        })
    }
}

/// A broadcast transfer awaiting one confirmation.
pub struct RpcPending {
    inner: PendingTransactionBuilder<alloy::network::Ethereum>,
    to: Address,
}

#[async_trait(?Send)]
impl PendingTransaction for RpcPending {
    fn hash(&self) -> B256 {
        *self.inner.tx_hash()
    }

    async fn wait(self) -> ProviderResult<TransactionReceipt> {
        let receipt = self
            .inner
            .get_receipt()
            .await
            .map_err(|e| ProviderError::from(Error::TxResponse(e.to_string())))?;
        let block_number = receipt.block_number.ok_or_else(|| {
            ProviderError::from(Error::TxResponse(format!(
                "receipt for {} has no block number",
                receipt.transaction_hash
            )))
        })?;
        Ok(TransactionReceipt {
            transaction_hash: receipt.transaction_hash,
            block_number,
            from: receipt.from,
            to: receipt.to.or(Some(self.to)),
            status: receipt.status(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dapp_traits::{codes, NativeCurrency, ProviderErrorKind};

    // Anvil's first default account
    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn environment() -> RpcEnvironment {
        RpcEnvironment::builder()
            .private_key(KEY)
            .chain(KnownChain::new(1, "Ethereum", "https://eth.llamarpc.com"))
            .chain(KnownChain::new(11155111, "Sepolia", "https://rpc.sepolia.org"))
            .build()
            .unwrap()
    }

    fn polygon(decimals: u8, rpc_url: &str) -> AddChainParams {
        AddChainParams {
            chain_id: "0x89".into(),
            chain_name: "Polygon".into(),
            rpc_urls: vec![rpc_url.into()],
            native_currency: NativeCurrency {
                symbol: "POL".into(),
                decimals,
            },
        }
    }

    #[test]
    fn test_builder_defaults_to_first_chain() {
        let env = environment();
        assert_eq!(env.active_chain().chain_id, 1);
        assert_eq!(env.known_chains().len(), 2);
        assert_eq!(
            env.address(),
            Some("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap())
        );
    }

    #[test]
    fn test_builder_errors() {
        assert!(matches!(
            RpcEnvironment::builder()
                .private_key("not a key")
                .chain(KnownChain::new(1, "Ethereum", "https://eth.llamarpc.com"))
                .build(),
            Err(Error::InvalidPrivateKey(_))
        ));
        assert!(matches!(
            RpcEnvironment::builder().private_key(KEY).build(),
            Err(Error::UnknownChain(_))
        ));
        assert!(matches!(
            RpcEnvironment::builder()
                .chain(KnownChain::new(1, "Ethereum", "https://eth.llamarpc.com"))
                .active_chain(5)
                .build(),
            Err(Error::UnknownChain(5))
        ));
    }

    #[test]
    fn test_no_key_means_no_wallet() {
        let env = RpcEnvironment::builder()
            .chain(KnownChain::new(1, "Ethereum", "https://eth.llamarpc.com"))
            .build()
            .unwrap();
        assert!(env.provider().is_none());
    }

    #[tokio::test]
    async fn test_request_accounts_returns_key_address() {
        let env = environment();
        let accounts = env.provider().unwrap().request_accounts().await.unwrap();
        assert_eq!(accounts, vec![env.address().unwrap()]);
    }

    #[tokio::test]
    async fn test_switch_known_and_unknown_chains() {
        let env = environment();
        let provider = env.provider().unwrap();

        provider.switch_chain("0xaa36a7").await.unwrap();
        assert_eq!(env.active_chain().chain_id, 11155111);

        let err = provider.switch_chain("0x89").await.unwrap_err();
        assert_eq!(err.code, Some(codes::UNRECOGNIZED_CHAIN));
        assert_eq!(env.active_chain().chain_id, 11155111);
    }

    #[tokio::test]
    async fn test_add_chain_rejects_malformed_params() {
        let provider = environment().provider().unwrap();

        let err = provider
            .add_chain(&polygon(8, "https://polygon-rpc.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ProviderErrorKind::InvalidParams);

        let err = provider.add_chain(&polygon(18, "not a url")).await.unwrap_err();
        assert_eq!(err.kind(), ProviderErrorKind::InvalidParams);

        let mut params = polygon(18, "https://polygon-rpc.com");
        params.chain_id = "polygon".into();
        let err = provider.add_chain(&params).await.unwrap_err();
        assert_eq!(err.kind(), ProviderErrorKind::InvalidParams);

        params.chain_id = "0x89".into();
        params.rpc_urls.clear();
        let err = provider.add_chain(&params).await.unwrap_err();
        assert_eq!(err.kind(), ProviderErrorKind::InvalidParams);
    }
}
