//! A scripted in-memory wallet.
//!
//! The mock behaves like a well-mannered injected wallet: it switches to
//! chains it knows, answers `4902` for chains it does not, registers chains
//! on request and mines every sent transaction into the next block. Any call
//! can be made to fail once with [`MockEnvironment::fail_next`], and every
//! call is recorded so tests can assert on what reached the wallet.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use dapp_traits::units::parse_chain_id;
use dapp_traits::{
    codes, AddChainParams, Address, ChainDescriptor, ChainEnvironment, FeeData,
    PendingTransaction, ProviderError, ProviderResult, TransactionReceipt, TransactionSigner,
    TransferPayload, WalletProvider, B256, U256,
};

/// Wallet methods, used to script failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `request_accounts`
    RequestAccounts,
    /// `signer`
    Signer,
    /// `balance`
    Balance,
    /// `transaction_count`
    TransactionCount,
    /// `network`
    Network,
    /// `fee_data`
    FeeData,
    /// `switch_chain`
    SwitchChain,
    /// `add_chain`
    AddChain,
    /// `send_transaction`
    SendTransaction,
    /// `wait`
    Wait,
}

/// A call that reached the mock wallet, with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Account access was requested
    RequestAccounts,
    /// A signer was requested
    Signer,
    /// Balance of an address
    Balance(Address),
    /// Pending nonce of an address
    TransactionCount(Address),
    /// Network descriptor
    Network,
    /// Fee estimates
    FeeData,
    /// Switch request with its hex chain id
    SwitchChain(String),
    /// Add-chain request
    AddChain(AddChainParams),
    /// Transfer broadcast
    SendTransaction(TransferPayload),
    /// Receipt wait for a hash
    Wait(B256),
}

impl Call {
    /// The method this call invoked
    pub fn method(&self) -> Method {
        match self {
            Call::RequestAccounts => Method::RequestAccounts,
            Call::Signer => Method::Signer,
            Call::Balance(_) => Method::Balance,
            Call::TransactionCount(_) => Method::TransactionCount,
            Call::Network => Method::Network,
            Call::FeeData => Method::FeeData,
            Call::SwitchChain(_) => Method::SwitchChain,
            Call::AddChain(_) => Method::AddChain,
            Call::SendTransaction(_) => Method::SendTransaction,
            Call::Wait(_) => Method::Wait,
        }
    }
}

#[derive(Debug)]
struct MockState {
    accounts: Vec<Address>,
    balance: U256,
    nonce: u64,
    chain_id: u64,
    chains: BTreeMap<u64, String>,
    ens_address: Option<Address>,
    fees: FeeData,
    failures: VecDeque<(Method, ProviderError)>,
    calls: Vec<Call>,
    next_block: u64,
    sent: u64,
    receipt_without_recipient: bool,
    reverted_receipts: bool,
}

impl MockState {
    fn record(&mut self, call: Call) -> ProviderResult<()> {
        let method = call.method();
        self.calls.push(call);
        match self.failures.iter().position(|(m, _)| *m == method) {
            Some(index) => match self.failures.remove(index) {
                Some((_, error)) => Err(error),
                None => Ok(()),
            },
            None => Ok(()),
        }
    }
}

type Shared = Rc<RefCell<MockState>>;

/// A page with (or without) a scripted wallet.
#[derive(Debug, Clone)]
pub struct MockEnvironment {
    state: Shared,
    installed: bool,
}

impl Default for MockEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEnvironment {
    /// Default account of a fresh mock
    pub const ACCOUNT: &'static str = "0x742d35cc6634c0532925a3b844bc9e7595f5ffb9";

    /// ENS registry reported for mainnet
    pub const ENS_REGISTRY: &'static str = "0x00000000000c2e074ec69a0dfb2997ba6c7d2e1e";

    /// A wallet with one account holding 2 ETH on mainnet, which also knows Sepolia.
    pub fn new() -> Self {
        let account = Self::ACCOUNT.parse().unwrap_or(Address::ZERO);
        let ens = Self::ENS_REGISTRY.parse().ok();

        let mut chains = BTreeMap::new();
        chains.insert(1, "homestead".to_string());
        chains.insert(11_155_111, "sepolia".to_string());

        let state = MockState {
            accounts: vec![account],
            balance: U256::from(2_000_000_000_000_000_000u128),
            nonce: 0,
            chain_id: 1,
            chains,
            ens_address: ens,
            fees: FeeData {
                gas_price: Some(20_000_000_000),
                max_fee_per_gas: Some(40_000_000_000),
                max_priority_fee_per_gas: Some(1_500_000_000),
            },
            failures: VecDeque::new(),
            calls: Vec::new(),
            next_block: 100,
            sent: 0,
            receipt_without_recipient: false,
            reverted_receipts: false,
        };

        Self {
            state: Rc::new(RefCell::new(state)),
            installed: true,
        }
    }

    /// A page without any wallet.
    pub fn not_installed() -> Self {
        Self {
            installed: false,
            ..Self::new()
        }
    }

    /// Replaces the accounts returned by `request_accounts`.
    pub fn with_accounts(self, accounts: Vec<Address>) -> Self {
        self.state.borrow_mut().accounts = accounts;
        self
    }

    /// Sets the balance reported for any address.
    pub fn with_balance(self, wei: U256) -> Self {
        self.state.borrow_mut().balance = wei;
        self
    }

    /// Sets the pending nonce.
    pub fn with_nonce(self, nonce: u64) -> Self {
        self.state.borrow_mut().nonce = nonce;
        self
    }

    /// Sets the fee estimates.
    pub fn with_fees(self, fees: FeeData) -> Self {
        self.state.borrow_mut().fees = fees;
        self
    }

    /// Forgets every known chain except the current one.
    pub fn with_only_current_chain(self) -> Self {
        {
            let mut state = self.state.borrow_mut();
            let current = state.chain_id;
            state.chains.retain(|id, _| *id == current);
        }
        self
    }

    /// Puts the wallet on `chain_id`, registering it under `name`.
    pub fn on_chain(self, chain_id: u64, name: &str) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.chains.insert(chain_id, name.to_string());
            state.chain_id = chain_id;
        }
        self
    }

    /// Receipts will not carry a recipient.
    pub fn with_receipts_without_recipient(self) -> Self {
        self.state.borrow_mut().receipt_without_recipient = true;
        self
    }

    /// Sent transfers are mined but revert.
    pub fn with_reverted_receipts(self) -> Self {
        self.state.borrow_mut().reverted_receipts = true;
        self
    }

    /// Makes the next call to `method` fail with `error`.
    pub fn fail_next(&self, method: Method, error: ProviderError) {
        self.state
            .borrow_mut()
            .failures
            .push_back((method, error));
    }

    /// Every call that reached the wallet, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Calls to a single method, in order.
    pub fn calls_to(&self, method: Method) -> Vec<Call> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.method() == method)
            .cloned()
            .collect()
    }

    /// Forgets the recorded calls.
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Chain the wallet is on
    pub fn current_chain_id(&self) -> u64 {
        self.state.borrow().chain_id
    }

    /// Whether the wallet knows `chain_id`
    pub fn knows_chain(&self, chain_id: u64) -> bool {
        self.state.borrow().chains.contains_key(&chain_id)
    }

    /// Default account as an [`Address`]
    pub fn account(&self) -> Address {
        self.state
            .borrow()
            .accounts
            .first()
            .copied()
            .unwrap_or(Address::ZERO)
    }
}

impl ChainEnvironment for MockEnvironment {
    type Provider = MockProvider;

    fn provider(&self) -> Option<MockProvider> {
        self.installed.then(|| MockProvider {
            state: Rc::clone(&self.state),
        })
    }
}

/// Provider handle of [`MockEnvironment`].
#[derive(Debug, Clone)]
pub struct MockProvider {
    state: Shared,
}

#[async_trait(?Send)]
impl WalletProvider for MockProvider {
    type Signer = MockSigner;

    async fn request_accounts(&self) -> ProviderResult<Vec<Address>> {
        let mut state = self.state.borrow_mut();
        state.record(Call::RequestAccounts)?;
        Ok(state.accounts.clone())
    }

    async fn signer(&self) -> ProviderResult<MockSigner> {
        let mut state = self.state.borrow_mut();
        state.record(Call::Signer)?;
        let address = state
            .accounts
            .first()
            .copied()
            .ok_or_else(|| ProviderError::new(codes::UNAUTHORIZED, "No account selected"))?;
        Ok(MockSigner {
            state: Rc::clone(&self.state),
            address,
        })
    }

    async fn balance(&self, address: Address) -> ProviderResult<U256> {
        let mut state = self.state.borrow_mut();
        state.record(Call::Balance(address))?;
        Ok(state.balance)
    }

    async fn network(&self) -> ProviderResult<ChainDescriptor> {
        let mut state = self.state.borrow_mut();
        state.record(Call::Network)?;
        let name = state
            .chains
            .get(&state.chain_id)
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());
        let mut chain = ChainDescriptor::new(state.chain_id, name);
        if let (1, Some(ens)) = (state.chain_id, state.ens_address) {
            chain = chain.with_ens_address(ens);
        }
        Ok(chain)
    }

    async fn fee_data(&self) -> ProviderResult<FeeData> {
        let mut state = self.state.borrow_mut();
        state.record(Call::FeeData)?;
        Ok(state.fees)
    }

    async fn switch_chain(&self, chain_id: &str) -> ProviderResult<()> {
        let mut state = self.state.borrow_mut();
        state.record(Call::SwitchChain(chain_id.to_string()))?;
        let id = parse_chain_id(chain_id)
            .map_err(|e| ProviderError::invalid_params(e.to_string()))?;
        if !state.chains.contains_key(&id) {
            return Err(ProviderError::unrecognized_chain(chain_id));
        }
        state.chain_id = id;
        Ok(())
    }

    async fn add_chain(&self, params: &AddChainParams) -> ProviderResult<()> {
        let mut state = self.state.borrow_mut();
        state.record(Call::AddChain(params.clone()))?;
        let id = parse_chain_id(&params.chain_id)
            .map_err(|e| ProviderError::invalid_params(e.to_string()))?;
        if params.rpc_urls.is_empty() {
            return Err(ProviderError::invalid_params("rpcUrls must not be empty"));
        }
        state.chains.insert(id, params.chain_name.clone());
        state.chain_id = id;
        Ok(())
    }
}

/// Signer handle of [`MockEnvironment`].
#[derive(Debug, Clone)]
pub struct MockSigner {
    state: Shared,
    address: Address,
}

#[async_trait(?Send)]
impl TransactionSigner for MockSigner {
    type Pending = MockPending;

    fn address(&self) -> Address {
        self.address
    }

    async fn transaction_count(&self) -> ProviderResult<u64> {
        let mut state = self.state.borrow_mut();
        state.record(Call::TransactionCount(self.address))?;
        Ok(state.nonce)
    }

    async fn send_transaction(&self, payload: &TransferPayload) -> ProviderResult<MockPending> {
        let mut state = self.state.borrow_mut();
        state.record(Call::SendTransaction(payload.clone()))?;
        state.sent += 1;
        state.nonce = state.nonce.max(payload.nonce + 1);
        let hash = B256::left_padding_from(&state.sent.to_be_bytes());
        Ok(MockPending {
            state: Rc::clone(&self.state),
            hash,
            from: self.address,
            to: payload.to,
        })
    }
}

/// Pending transfer of [`MockEnvironment`]. Mined into the next block on `wait`.
#[derive(Debug)]
pub struct MockPending {
    state: Shared,
    hash: B256,
    from: Address,
    to: Address,
}

#[async_trait(?Send)]
impl PendingTransaction for MockPending {
    fn hash(&self) -> B256 {
        self.hash
    }

    async fn wait(self) -> ProviderResult<TransactionReceipt> {
        let mut state = self.state.borrow_mut();
        state.record(Call::Wait(self.hash))?;
        let block_number = state.next_block;
        state.next_block += 1;
        Ok(TransactionReceipt {
            transaction_hash: self.hash,
            block_number,
            from: self.from,
            to: (!state.receipt_without_recipient).then_some(self.to),
            status: !state.reverted_receipts,
        })
    }
}
