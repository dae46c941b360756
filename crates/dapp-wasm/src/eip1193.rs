//! Wallet capabilities over an injected EIP-1193 provider (`window.ethereum`).

use async_trait::async_trait;
use dapp_traits::networks::describe;
use dapp_traits::{
    codes, AddChainParams, Address, ChainDescriptor, ChainEnvironment, FeeData,
    PendingTransaction, ProviderError, ProviderResult, TransactionReceipt, TransactionSigner,
    TransferPayload, WalletProvider, B256, U256,
};
use js_sys::{Array, Function, Object, Promise, Reflect};
use serde::{Deserialize, Serialize};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Receipt polling interval, matching the browser libraries' default
pub const RECEIPT_POLL_INTERVAL_MS: i32 = 4_000;

/// Priority fee suggested when the wallet does not answer `eth_maxPriorityFeePerGas` (1.5 gwei)
pub const FALLBACK_PRIORITY_FEE: u128 = 1_500_000_000;

// ============================================================================
// Value conversion
// ============================================================================

/// Parses a `0x`-prefixed JSON-RPC quantity.
pub fn parse_quantity(value: &str) -> ProviderResult<U256> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| malformed("quantity", value))?;
    if digits.is_empty() {
        return Err(malformed("quantity", value));
    }
    U256::from_str_radix(digits, 16).map_err(|_| malformed("quantity", value))
}

/// Parses a quantity that must fit in 64 bits (nonces, block numbers, chain ids).
pub fn parse_quantity_u64(value: &str) -> ProviderResult<u64> {
    u64::try_from(parse_quantity(value)?).map_err(|_| malformed("quantity", value))
}

/// Parses a quantity that must fit in 128 bits (fees).
pub fn parse_quantity_u128(value: &str) -> ProviderResult<u128> {
    u128::try_from(parse_quantity(value)?).map_err(|_| malformed("quantity", value))
}

fn malformed(what: &str, value: &str) -> ProviderError {
    ProviderError::other(format!("Wallet returned a malformed {what}: {value:?}"))
}

/// Builds the error for a rejected request.
///
/// Some mobile wallets wrap the real code inside `data.originalError` of an
/// internal error; the inner code wins when the outer one is missing or `-32603`.
pub fn error_from_parts(
    code: Option<f64>,
    original_code: Option<f64>,
    message: Option<String>,
) -> ProviderError {
    let outer = code.map(|c| c as i64);
    let code = match (outer, original_code.map(|c| c as i64)) {
        (None, inner) | (Some(codes::INTERNAL_ERROR), inner @ Some(_)) => inner,
        (outer, _) => outer,
    };
    let message = message.unwrap_or_else(|| "Unknown wallet error".to_string());
    match code {
        Some(code) => ProviderError::new(code, message),
        None => ProviderError::other(message),
    }
}

fn js_number(value: &JsValue, path: &[&str]) -> Option<f64> {
    let mut current = value.clone();
    for key in path {
        current = Reflect::get(&current, &JsValue::from_str(key)).ok()?;
    }
    current.as_f64()
}

/// Maps a rejected JS promise value to a wallet error.
pub fn provider_error(value: &JsValue) -> ProviderError {
    if let Some(message) = value.as_string() {
        return ProviderError::other(message);
    }
    let message = Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string());
    error_from_parts(
        js_number(value, &["code"]),
        js_number(value, &["data", "originalError", "code"]),
        message,
    )
}

/// `eth_sendTransaction` parameter object.
///
/// Optional fields are omitted entirely when unset so the wallet fills them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionObject {
    from: String,
    to: String,
    value: String,
    nonce: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    gas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_priority_fee_per_gas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_fee_per_gas: Option<String>,
}

impl TransactionObject {
    /// Encodes `payload` as sent from `from`
    pub fn new(from: Address, payload: &TransferPayload) -> Self {
        Self {
            from: from.to_string(),
            to: payload.to.to_string(),
            value: format!("0x{:x}", payload.value),
            nonce: format!("{:#x}", payload.nonce),
            gas: payload.gas_limit.map(|gas| format!("{gas:#x}")),
            max_priority_fee_per_gas: payload
                .max_priority_fee_per_gas
                .map(|fee| format!("{fee:#x}")),
            max_fee_per_gas: payload.max_fee_per_gas.map(|fee| format!("{fee:#x}")),
        }
    }
}

/// The fields of `eth_getTransactionReceipt` the history needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    transaction_hash: String,
    block_number: Option<String>,
    from: String,
    #[serde(default)]
    to: Option<String>,
    // absent before Byzantium
    #[serde(default)]
    status: Option<String>,
}

impl RpcReceipt {
    /// Decodes the hex fields. A receipt without a block is not confirmed yet.
    pub fn into_receipt(self) -> ProviderResult<Option<TransactionReceipt>> {
        let Some(block) = self.block_number else {
            return Ok(None);
        };
        let transaction_hash = self
            .transaction_hash
            .parse::<B256>()
            .map_err(|_| malformed("transaction hash", &self.transaction_hash))?;
        let from = self
            .from
            .parse::<Address>()
            .map_err(|_| malformed("address", &self.from))?;
        let to = match self.to {
            Some(to) => Some(to.parse::<Address>().map_err(|_| malformed("address", &to))?),
            None => None,
        };
        let status = match self.status {
            Some(status) => parse_quantity_u64(&status)? == 1,
            None => true,
        };
        Ok(Some(TransactionReceipt {
            transaction_hash,
            block_number: parse_quantity_u64(&block)?,
            from,
            to,
            status,
        }))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcBlock {
    #[serde(default)]
    base_fee_per_gas: Option<String>,
}

/// Derives fee estimates the way browser wallets suggest them: the max fee
/// leaves room for the base fee to double.
pub fn estimate_fees(gas_price: u128, base_fee: Option<u128>, priority_fee: u128) -> FeeData {
    match base_fee {
        Some(base_fee) => FeeData {
            gas_price: Some(gas_price),
            max_fee_per_gas: Some(base_fee.saturating_mul(2).saturating_add(priority_fee)),
            max_priority_fee_per_gas: Some(priority_fee),
        },
        // pre-London networks
        None => FeeData {
            gas_price: Some(gas_price),
            ..FeeData::default()
        },
    }
}

// ============================================================================
// Transport
// ============================================================================

#[derive(Clone)]
struct Eip1193 {
    ethereum: JsValue,
}

impl Eip1193 {
    async fn request(&self, method: &str, params: Array) -> ProviderResult<JsValue> {
        let request = Reflect::get(&self.ethereum, &JsValue::from_str("request"))
            .map_err(|e| provider_error(&e))?
            .dyn_into::<Function>()
            .map_err(|_| ProviderError::other("window.ethereum.request is not a function"))?;

        let args = Object::new();
        Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
            .map_err(|e| provider_error(&e))?;
        Reflect::set(&args, &JsValue::from_str("params"), &params)
            .map_err(|e| provider_error(&e))?;

        let promise = request
            .call1(&self.ethereum, &args)
            .map_err(|e| provider_error(&e))?
            .dyn_into::<Promise>()
            .map_err(|_| ProviderError::other("window.ethereum.request did not return a promise"))?;
        JsFuture::from(promise).await.map_err(|e| {
            let error = provider_error(&e);
            tracing::debug!(method, code = ?error.code, "wallet request rejected");
            error
        })
    }

    async fn request_string(&self, method: &str, params: Array) -> ProviderResult<String> {
        self.request(method, params)
            .await?
            .as_string()
            .ok_or_else(|| ProviderError::other(format!("{method} returned a non-string result")))
    }
}

fn to_js<T: Serialize>(value: &T) -> ProviderResult<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| ProviderError::other(e.to_string()))
}

fn address_param(address: Address) -> JsValue {
    JsValue::from_str(&address.to_string())
}

async fn sleep(ms: i32) -> ProviderResult<()> {
    let window = web_sys::window().ok_or_else(|| ProviderError::other("No window"))?;
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms) {
            web_sys::console::error_1(&e);
        }
    });
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| provider_error(&e))
}

// ============================================================================
// Capabilities
// ============================================================================

/// The page. Holds a wallet when an extension injected `window.ethereum`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InjectedEnvironment;

impl ChainEnvironment for InjectedEnvironment {
    type Provider = InjectedProvider;

    fn provider(&self) -> Option<InjectedProvider> {
        let window = web_sys::window()?;
        let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        Some(InjectedProvider {
            transport: Eip1193 { ethereum },
        })
    }
}

/// Provider handle over `window.ethereum`
#[derive(Clone)]
pub struct InjectedProvider {
    transport: Eip1193,
}

#[async_trait(?Send)]
impl WalletProvider for InjectedProvider {
    type Signer = InjectedSigner;

    async fn request_accounts(&self) -> ProviderResult<Vec<Address>> {
        let accounts = self
            .transport
            .request("eth_requestAccounts", Array::new())
            .await?;
        let accounts: Vec<String> = serde_wasm_bindgen::from_value(accounts)
            .map_err(|e| ProviderError::other(e.to_string()))?;
        accounts
            .iter()
            .map(|a| a.parse::<Address>().map_err(|_| malformed("address", a)))
            .collect()
    }

    async fn signer(&self) -> ProviderResult<InjectedSigner> {
        let accounts = self.transport.request("eth_accounts", Array::new()).await?;
        let accounts: Vec<String> = serde_wasm_bindgen::from_value(accounts)
            .map_err(|e| ProviderError::other(e.to_string()))?;
        let first = accounts
            .first()
            .ok_or_else(|| ProviderError::new(codes::UNAUTHORIZED, "No account is connected"))?;
        Ok(InjectedSigner {
            transport: self.transport.clone(),
            address: first.parse().map_err(|_| malformed("address", first))?,
        })
    }

    async fn balance(&self, address: Address) -> ProviderResult<U256> {
        let params = Array::of2(&address_param(address), &JsValue::from_str("latest"));
        let balance = self.transport.request_string("eth_getBalance", params).await?;
        parse_quantity(&balance)
    }

    async fn network(&self) -> ProviderResult<ChainDescriptor> {
        let chain_id = self.transport.request_string("eth_chainId", Array::new()).await?;
        Ok(describe(parse_quantity_u64(&chain_id)?, None))
    }

    async fn fee_data(&self) -> ProviderResult<FeeData> {
        let params = Array::of2(&JsValue::from_str("latest"), &JsValue::FALSE);
        let block = self.transport.request("eth_getBlockByNumber", params).await?;
        let block: RpcBlock = if block.is_null() {
            RpcBlock::default()
        } else {
            serde_wasm_bindgen::from_value(block).map_err(|e| ProviderError::other(e.to_string()))?
        };
        let gas_price = self.transport.request_string("eth_gasPrice", Array::new()).await?;

        let base_fee = match block.base_fee_per_gas {
            Some(base_fee) => Some(parse_quantity_u128(&base_fee)?),
            None => None,
        };
        let priority_fee = match base_fee {
            Some(_) => match self
                .transport
                .request_string("eth_maxPriorityFeePerGas", Array::new())
                .await
            {
                Ok(fee) => parse_quantity_u128(&fee)?,
                Err(_) => FALLBACK_PRIORITY_FEE,
            },
            None => FALLBACK_PRIORITY_FEE,
        };
        Ok(estimate_fees(parse_quantity_u128(&gas_price)?, base_fee, priority_fee))
    }

    async fn switch_chain(&self, chain_id: &str) -> ProviderResult<()> {
        let params = Object::new();
        Reflect::set(&params, &JsValue::from_str("chainId"), &JsValue::from_str(chain_id))
            .map_err(|e| provider_error(&e))?;
        self.transport
            .request("wallet_switchEthereumChain", Array::of1(&params))
            .await
            .map(|_| ())
    }

    async fn add_chain(&self, params: &AddChainParams) -> ProviderResult<()> {
        self.transport
            .request("wallet_addEthereumChain", Array::of1(&to_js(params)?))
            .await
            .map(|_| ())
    }
}

/// Signer handle for the wallet's selected account
#[derive(Clone)]
pub struct InjectedSigner {
    transport: Eip1193,
    address: Address,
}

#[async_trait(?Send)]
impl TransactionSigner for InjectedSigner {
    type Pending = InjectedPending;

    fn address(&self) -> Address {
        self.address
    }

    async fn transaction_count(&self) -> ProviderResult<u64> {
        let params = Array::of2(&address_param(self.address), &JsValue::from_str("pending"));
        let count = self
            .transport
            .request_string("eth_getTransactionCount", params)
            .await?;
        parse_quantity_u64(&count)
    }

    async fn send_transaction(&self, payload: &TransferPayload) -> ProviderResult<InjectedPending> {
        let tx = to_js(&TransactionObject::new(self.address, payload))?;
        let hash = self
            .transport
            .request_string("eth_sendTransaction", Array::of1(&tx))
            .await?;
        Ok(InjectedPending {
            transport: self.transport.clone(),
            hash: hash.parse().map_err(|_| malformed("transaction hash", &hash))?,
        })
    }
}

/// A broadcast transfer, confirmed by polling for its receipt
pub struct InjectedPending {
    transport: Eip1193,
    hash: B256,
}

#[async_trait(?Send)]
impl PendingTransaction for InjectedPending {
    fn hash(&self) -> B256 {
        self.hash
    }

    async fn wait(self) -> ProviderResult<TransactionReceipt> {
        let hash = JsValue::from_str(&self.hash.to_string());
        loop {
            let receipt = self
                .transport
                .request("eth_getTransactionReceipt", Array::of1(&hash))
                .await?;
            if !receipt.is_null() && !receipt.is_undefined() {
                let receipt: RpcReceipt = serde_wasm_bindgen::from_value(receipt)
                    .map_err(|e| ProviderError::other(e.to_string()))?;
                if let Some(receipt) = receipt.into_receipt()? {
                    return Ok(receipt);
                }
            }
            sleep(RECEIPT_POLL_INTERVAL_MS).await?;
        }
    }
}
