use std::fmt;

use dapp_traits::B256;
use serde::Serialize;

/// A blocking, user-facing message (the browser build shows these as alerts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum Notice {
    /// No wallet is present in the environment
    WalletNotInstalled,
    /// A transfer was attempted without a connected signer or a target
    ConnectWallet,
    /// The transfer failed
    TransactionFailed(String),
    /// The network switch failed for a reason other than invalid input
    NetworkSwitchFailed(String),
    /// A transfer confirmed after the session it was sent from was closed
    ConfirmedAfterDisconnect(B256),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::WalletNotInstalled => f.write_str("Please install a browser wallet such as MetaMask"),
            Notice::ConnectWallet => f.write_str("Please connect a wallet"),
            Notice::TransactionFailed(reason) => write!(f, "Transaction failed: {reason}"),
            Notice::NetworkSwitchFailed(reason) => write!(f, "Network switch failed: {reason}"),
            Notice::ConfirmedAfterDisconnect(hash) => {
                write!(f, "Transaction {hash} confirmed after the wallet was disconnected")
            }
        }
    }
}
