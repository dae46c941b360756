use dapp_traits::{ProviderError, ProviderErrorKind, UnitError, B256};
use thiserror::Error;

/// Errors surfaced to the user by the transfer flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DappError {
    /// A form field could not be converted into the payload
    #[error(transparent)]
    Unit(#[from] UnitError),

    /// The wallet refused or failed the request
    #[error("Wallet error: {0}")]
    Provider(#[from] ProviderError),

    /// The transaction was broadcast but waiting for its receipt failed
    #[error("Transaction {hash} was not confirmed: {source}")]
    Receipt {
        /// Hash of the broadcast transaction
        hash: B256,
        /// Provider failure while waiting
        source: ProviderError,
    },

    /// The transaction was mined but its execution reverted
    #[error("Transaction {hash} reverted in block {block}")]
    Reverted {
        /// Hash of the mined transaction
        hash: B256,
        /// Block it was included in
        block: u64,
    },
}

impl DappError {
    /// True when the wallet user declined the request
    pub fn is_user_rejection(&self) -> bool {
        match self {
            DappError::Provider(e) | DappError::Receipt { source: e, .. } => {
                e.kind() == ProviderErrorKind::WalletRejected
            }
            DappError::Unit(_) | DappError::Reverted { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_wraps_provider_error() {
        let err = DappError::from(ProviderError::user_rejected());
        assert_eq!(
            err.to_string(),
            "Wallet error: User rejected the request (code 4001)"
        );
        assert!(err.is_user_rejection());
    }

    #[test]
    fn test_unit_error_is_transparent() {
        let err = DappError::from(UnitError::InvalidInteger("x".into()));
        assert_eq!(err.to_string(), "Invalid integer: x");
        assert!(!err.is_user_rejection());
    }

    #[test]
    fn test_receipt_error_names_hash() {
        let err = DappError::Receipt {
            hash: B256::ZERO,
            source: ProviderError::other("dropped"),
        };
        assert!(err.to_string().contains(&B256::ZERO.to_string()));
        assert!(err.to_string().ends_with("dropped"));
    }

    #[test]
    fn test_reverted_is_not_a_rejection() {
        let err = DappError::Reverted {
            hash: B256::ZERO,
            block: 7,
        };
        assert!(err.to_string().ends_with("reverted in block 7"));
        assert!(!err.is_user_rejection());
    }
}
