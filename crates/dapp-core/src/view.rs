//! Presentation state derived from the controller.
//!
//! The view holds no logic of its own. The browser build serialises it to
//! JS, the terminal front-end prints its `Display` form.

use std::fmt;

use dapp_traits::ChainEnvironment;
use serde::Serialize;

use crate::{DappController, NetworkForm, TransferForm};

/// Header label while disconnected
pub const CONNECT_LABEL: &str = "Connect Wallet";
/// Banner shown after a failed transfer
pub const TRANSACTION_ERROR_BANNER: &str = "Something Went Wrong! Please check your input!";

/// The whole page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DappView {
    /// Connect/disconnect control
    pub header: HeaderView,
    /// Account and chain panel, only while connected
    pub account: Option<AccountView>,
    /// Transfer form
    pub transfer: TransferView,
    /// History table rows, oldest first
    pub history: Vec<HistoryRow>,
    /// Add/switch network dialog
    pub network_dialog: NetworkDialogView,
}

/// Connect/disconnect control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderView {
    /// "Connect Wallet" or "Account: <address>"
    pub label: String,
    /// Whether clicking disconnects
    pub connected: bool,
}

/// Account and chain panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    /// Connected account, checksummed
    pub address: String,
    /// Balance in ETH
    pub balance: Option<String>,
    /// EIP-155 chain id
    pub chain_id: Option<u64>,
    /// Network name
    pub chain_name: Option<String>,
    /// ENS registry, when the network has one
    pub ens_address: Option<String>,
}

/// Current fee estimates in gwei, shown next to the advanced inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeHints {
    /// Legacy gas price
    pub gas_price: Option<String>,
    /// Suggested tip
    pub max_priority_fee_per_gas: Option<String>,
    /// Suggested fee cap
    pub max_fee_per_gas: Option<String>,
}

/// Transfer form with its button and banner state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferView {
    /// Typed values
    pub form: TransferForm,
    /// Fee hints
    pub fees: FeeHints,
    /// Send button enabled
    pub send_enabled: bool,
    /// Send button spinner
    pub loading: bool,
    /// Banner shown after a failed transfer
    pub error_banner: Option<String>,
}

/// One history table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    /// Transaction hash
    pub hash: String,
    /// Sender
    pub from: String,
    /// Recipient
    pub to: String,
    /// Inclusion block
    pub block: u64,
}

/// Network dialog with its inline messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDialogView {
    /// Dialog visible
    pub open: bool,
    /// Typed values
    pub form: NetworkForm,
    /// Shown under a malformed RPC URL
    pub rpc_url_message: Option<String>,
    /// Shown under out-of-range decimals
    pub decimals_message: Option<String>,
    /// Shown after the wallet rejected the parameters
    pub error_message: Option<String>,
    /// Switch button enabled
    pub switch_enabled: bool,
    /// A switch request is in flight
    pub switching: bool,
}

impl DappView {
    /// Derives the view from the controller state.
    pub fn new<E: ChainEnvironment>(app: &DappController<E>) -> Self {
        let session = app.session();

        let header = match session.account() {
            Some(account) => HeaderView {
                label: format!("Account: {account}"),
                connected: true,
            },
            None => HeaderView {
                label: CONNECT_LABEL.to_string(),
                connected: false,
            },
        };

        let account = session.account().map(|address| AccountView {
            address: address.to_string(),
            balance: session.balance().map(str::to_string),
            chain_id: session.chain().map(|c| c.chain_id),
            chain_name: session.chain().map(|c| c.name.clone()),
            ens_address: session
                .chain()
                .and_then(|c| c.ens_address)
                .map(|a| a.to_string()),
        });

        let transfer = TransferView {
            form: app.form().clone(),
            fees: FeeHints {
                gas_price: session.gas_price().map(str::to_string),
                max_priority_fee_per_gas: session.max_priority_fee_per_gas().map(str::to_string),
                max_fee_per_gas: session.max_fee_per_gas().map(str::to_string),
            },
            send_enabled: app.can_send(),
            loading: app.is_loading(),
            error_banner: app
                .has_transaction_error()
                .then(|| TRANSACTION_ERROR_BANNER.to_string()),
        };

        let history = app
            .history()
            .iter()
            .map(|record| HistoryRow {
                hash: record.transaction_hash.to_string(),
                from: record.from.to_string(),
                to: record.to.to_string(),
                block: record.block_number,
            })
            .collect();

        let dialog = app.network();
        let network_dialog = NetworkDialogView {
            open: dialog.open,
            form: dialog.form.clone(),
            rpc_url_message: dialog.form.rpc_url_message().map(str::to_string),
            decimals_message: dialog.form.decimals_message().map(str::to_string),
            error_message: dialog.error_message().map(str::to_string),
            switch_enabled: app.can_switch_network(),
            switching: dialog.in_flight,
        };

        Self {
            header,
            account,
            transfer,
            history,
            network_dialog,
        }
    }
}

fn or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

impl fmt::Display for DappView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[ {} ]", self.header.label)?;

        if let Some(account) = &self.account {
            writeln!(f)?;
            writeln!(f, "Address:     {}", account.address)?;
            writeln!(f, "Balance:     {} ETH", or_dash(&account.balance))?;
            match account.chain_id {
                Some(id) => writeln!(f, "Chain ID:    {id}")?,
                None => writeln!(f, "Chain ID:    -")?,
            }
            writeln!(f, "Chain Name:  {}", or_dash(&account.chain_name))?;
            writeln!(f, "ENS Address: {}", or_dash(&account.ens_address))?;
        }

        write!(f, "{}", self.transfer)?;

        writeln!(f)?;
        writeln!(f, "Transactions ({})", self.history.len())?;
        for row in &self.history {
            writeln!(f, "  {row}")?;
        }

        if self.network_dialog.open {
            write!(f, "{}", self.network_dialog)?;
        }
        Ok(())
    }
}

impl fmt::Display for HistoryRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {} -> {}  block {}", self.hash, self.from, self.to, self.block)
    }
}

impl fmt::Display for TransferView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = &self.form;
        writeln!(f)?;
        writeln!(f, "Transfer")?;
        writeln!(f, "  Target Address: {}", form.target_address())?;
        writeln!(f, "  Nonce:          {}", form.nonce())?;
        writeln!(f, "  Amount (ETH):   {}", form.amount())?;
        if form.is_advanced() {
            writeln!(f, "  Gas Limit:      {}", form.gas_limit())?;
            writeln!(
                f,
                "  Max Priority Fee (gwei): {}  (current {})",
                form.max_priority_fee_per_gas(),
                or_dash(&self.fees.max_priority_fee_per_gas)
            )?;
            writeln!(
                f,
                "  Max Fee (gwei):          {}  (current {}, gas price {})",
                form.max_fee_per_gas(),
                or_dash(&self.fees.max_fee_per_gas),
                or_dash(&self.fees.gas_price)
            )?;
        }
        let send = match (self.loading, self.send_enabled) {
            (true, _) => "sending...",
            (false, true) => "ready",
            (false, false) => "disabled",
        };
        writeln!(f, "  Send: {send}")?;
        if let Some(banner) = &self.error_banner {
            writeln!(f, "  ! {banner}")?;
        }
        Ok(())
    }
}

impl fmt::Display for NetworkDialogView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = &self.form;
        writeln!(f)?;
        writeln!(f, "Add / Switch Network")?;
        writeln!(f, "  Chain Name:        {}", form.chain_name)?;
        writeln!(f, "  RPC URL:           {}", form.rpc_url)?;
        if let Some(message) = &self.rpc_url_message {
            writeln!(f, "    {message}")?;
        }
        writeln!(f, "  Chain ID:          {}", form.chain_id)?;
        writeln!(f, "  Currency Decimals: {}", form.currency_decimals)?;
        if let Some(message) = &self.decimals_message {
            writeln!(f, "    {message}")?;
        }
        writeln!(f, "  Currency Symbol:   {}", form.currency_symbol)?;
        if let Some(message) = &self.error_message {
            writeln!(f, "  ! {message}")?;
        }
        let switch = match (self.switching, self.switch_enabled) {
            (true, _) => "switching...",
            (false, true) => "ready",
            (false, false) => "disabled",
        };
        writeln!(f, "  Switch: {switch}")
    }
}
