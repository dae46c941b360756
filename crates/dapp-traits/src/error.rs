/// Numeric error codes wallets attach to failed requests.
///
/// The 4xxx range comes from EIP-1193 and EIP-3085/3326, the negative codes
/// from JSON-RPC 2.0.
pub mod codes {
    /// The user rejected the request
    pub const USER_REJECTED: i64 = 4001;
    /// The requested method or account has not been authorized by the user
    pub const UNAUTHORIZED: i64 = 4100;
    /// The provider does not support the requested method
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    /// The provider is disconnected from all chains
    pub const DISCONNECTED: i64 = 4900;
    /// The provider is not connected to the requested chain
    pub const CHAIN_DISCONNECTED: i64 = 4901;
    /// The wallet does not know the requested chain
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
    /// Invalid method parameters
    pub const INVALID_PARAMS: i64 = -32602;
    /// Internal JSON-RPC error
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// Classification of a [`ProviderError`] used for branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// The wallet (or its user) refused the request
    WalletRejected,
    /// The target chain has not been added to the wallet
    UnrecognizedChain,
    /// The wallet considers the request parameters malformed
    InvalidParams,
    /// Anything else: transport failures, RPC errors, unknown codes
    Unknown,
}

impl ProviderErrorKind {
    /// Maps a raw error code to its kind.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(codes::UNRECOGNIZED_CHAIN) => Self::UnrecognizedChain,
            Some(codes::INVALID_PARAMS) => Self::InvalidParams,
            Some(
                codes::USER_REJECTED
                | codes::UNAUTHORIZED
                | codes::UNSUPPORTED_METHOD
                | codes::DISCONNECTED
                | codes::CHAIN_DISCONNECTED,
            ) => Self::WalletRejected,
            _ => Self::Unknown,
        }
    }
}

/// An error reported by the wallet or the transport beneath it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}{}", .code.map(|code| format!(" (code {code})")).unwrap_or_default())]
pub struct ProviderError {
    /// Error code, when the wallet supplied one
    pub code: Option<i64>,
    /// Human readable message
    pub message: String,
}

impl ProviderError {
    /// Creates an error with an explicit code.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    /// Creates an error without a code (transport or decoding failures).
    pub fn other(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// The wallet does not know the chain.
    pub fn unrecognized_chain(chain_id: &str) -> Self {
        Self::new(
            codes::UNRECOGNIZED_CHAIN,
            format!("Unrecognized chain ID \"{chain_id}\""),
        )
    }

    /// The request parameters were rejected as malformed.
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(codes::INVALID_PARAMS, message)
    }

    /// The user declined the request.
    pub fn user_rejected() -> Self {
        Self::new(codes::USER_REJECTED, "User rejected the request")
    }

    /// Returns the classification of this error.
    pub fn kind(&self) -> ProviderErrorKind {
        ProviderErrorKind::from_code(self.code)
    }
}

/// Result type for provider calls
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Malformed user input rejected before anything reaches the wallet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitError {
    /// Not a 20-byte hex address, or a mixed-case address with a bad checksum
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Not a non-negative decimal amount in the expected unit
    #[error("Invalid amount '{input}': {reason}")]
    InvalidDecimal {
        /// Raw input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// Not an unsigned integer (nonce, gas limit)
    #[error("Invalid integer: {0}")]
    InvalidInteger(String),

    /// Neither a decimal nor a `0x` hex chain id
    #[error("Invalid chain ID: {0}")]
    InvalidChainId(String),

    /// Currency decimals that do not fit the native currency descriptor
    #[error("Invalid currency decimals: {0}")]
    InvalidDecimals(String),
}
