use alloy::transports::TransportError;
use dapp_traits::{codes, ProviderError};
use thiserror::Error;

/// Custom error type for the local-key wallet
#[derive(Debug, Error)]
pub enum Error {
    /// The RPC URL could not be parsed
    #[error("Invalid RPC URL {url}: {reason}")]
    InvalidUrl {
        /// The offending URL
        url: String,
        /// Parser message
        reason: String,
    },
    /// The private key is not a 32-byte hex secret
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
    /// The active chain is not in the registry
    #[error("No RPC endpoint configured for chain {0}")]
    UnknownChain(u64),
    /// The endpoint reports a different chain than the one it is registered for
    #[error("RPC endpoint serves chain {actual}, expected {expected}")]
    ChainMismatch {
        /// Chain the endpoint was registered for
        expected: u64,
        /// Chain the endpoint reports
        actual: u64,
    },
    /// JSON-RPC or transport failure
    #[error("RPC error: {0}")]
    Transport(#[from] TransportError),
    /// Error waiting for a transaction
    #[error("Error with transaction: {0}")]
    TxResponse(String),
}

/// Maps a transport error to a wallet error, keeping the JSON-RPC code.
pub(crate) fn provider_error(error: &TransportError) -> ProviderError {
    match error.as_error_resp() {
        Some(payload) => ProviderError::new(payload.code, payload.message.to_string()),
        None => ProviderError::other(error.to_string()),
    }
}

impl From<Error> for ProviderError {
    fn from(error: Error) -> Self {
        match error {
            Error::Transport(e) => provider_error(&e),
            Error::InvalidUrl { .. } | Error::ChainMismatch { .. } => {
                ProviderError::invalid_params(error.to_string())
            }
            Error::UnknownChain(id) => ProviderError::unrecognized_chain(&format!("{id:#x}")),
            Error::InvalidPrivateKey(_) => {
                ProviderError::new(codes::UNAUTHORIZED, error.to_string())
            }
            Error::TxResponse(_) => ProviderError::new(codes::INTERNAL_ERROR, error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::rpc::json_rpc::ErrorPayload;
    use alloy::transports::RpcError;
    use dapp_traits::ProviderErrorKind;

    #[test]
    fn test_error_response_keeps_code() {
        let error: TransportError = RpcError::ErrorResp(ErrorPayload {
            code: 4001,
            message: "User denied transaction signature".into(),
            data: None,
        });
        let mapped = provider_error(&error);
        assert_eq!(mapped.code, Some(4001));
        assert_eq!(mapped.message, "User denied transaction signature");
        assert_eq!(mapped.kind(), ProviderErrorKind::WalletRejected);
    }

    #[test]
    fn test_local_errors_map_to_kinds() {
        let mismatch: ProviderError = Error::ChainMismatch {
            expected: 137,
            actual: 1,
        }
        .into();
        assert_eq!(mismatch.kind(), ProviderErrorKind::InvalidParams);

        let unknown: ProviderError = Error::UnknownChain(137).into();
        assert_eq!(unknown.kind(), ProviderErrorKind::UnrecognizedChain);
        assert!(unknown.message.contains("0x89"));
    }
}
