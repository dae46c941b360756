use dapp_traits::{Address, ChainEnvironment, ProviderResult, WalletProvider};
use tracing::{debug, error, info, warn};

use crate::network::{NetworkDialog, NetworkForm};
use crate::session::{fetch_session, RefreshRequest, SessionSnapshot, WalletSession};
use crate::switch::{run_switch, SwitchFailure, SwitchOutcome, SwitchRequest};
use crate::transfer::{execute_transfer, TransferTicket};
use crate::{DappError, DappView, Notice, TransactionHistory, TransactionRecord, TransferForm};

type SignerOf<E> = <<E as ChainEnvironment>::Provider as WalletProvider>::Signer;

/// Page-level state of the dApp and the user actions that change it.
pub struct DappController<E: ChainEnvironment> {
    environment: E,
    session: WalletSession<E::Provider>,
    form: TransferForm,
    network: NetworkDialog,
    history: TransactionHistory,
    loading: bool,
    transaction_error: bool,
    notices: Vec<Notice>,
}

impl<E: ChainEnvironment> DappController<E> {
    /// Creates a disconnected controller for `environment`.
    pub fn new(environment: E) -> Self {
        Self {
            environment,
            session: WalletSession::new(),
            form: TransferForm::new(),
            network: NetworkDialog::default(),
            history: TransactionHistory::new(),
            loading: false,
            transaction_error: false,
            notices: Vec::new(),
        }
    }

    /// The environment the controller was created with
    pub fn environment(&self) -> &E {
        &self.environment
    }

    /// Current wallet session
    pub fn session(&self) -> &WalletSession<E::Provider> {
        &self.session
    }

    /// Transfer form
    pub fn form(&self) -> &TransferForm {
        &self.form
    }

    /// Mutable transfer form, for input handlers
    pub fn form_mut(&mut self) -> &mut TransferForm {
        &mut self.form
    }

    /// Network dialog state
    pub fn network(&self) -> &NetworkDialog {
        &self.network
    }

    /// Mutable network dialog inputs, for input handlers
    pub fn network_form_mut(&mut self) -> &mut NetworkForm {
        &mut self.network.form
    }

    /// Confirmed transfers
    pub fn history(&self) -> &TransactionHistory {
        &self.history
    }

    /// A transfer is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last transfer attempt failed
    pub fn has_transaction_error(&self) -> bool {
        self.transaction_error
    }

    /// Notices not yet shown to the user
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Removes and returns the pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Derived presentation state.
    pub fn view(&self) -> DappView {
        DappView::new(self)
    }

    /// Whether the send button is enabled.
    pub fn can_send(&self) -> bool {
        self.form.is_complete() && self.session.signer().is_some() && !self.loading
    }

    /// Whether the switch button of the network dialog is enabled.
    pub fn can_switch_network(&self) -> bool {
        self.network.form.can_confirm() && !self.network.in_flight
    }

    // Session

    /// Looks up the wallet. Raises [`Notice::WalletNotInstalled`] when there is none.
    pub fn prepare_connect(&mut self) -> Option<E::Provider> {
        let provider = self.environment.provider();
        if provider.is_none() {
            warn!("no wallet installed");
            self.notices.push(Notice::WalletNotInstalled);
        }
        provider
    }

    /// Starts a session for the first returned account.
    ///
    /// Returns `true` when a session was started and should be refreshed.
    pub fn finish_connect(
        &mut self,
        provider: E::Provider,
        accounts: ProviderResult<Vec<Address>>,
    ) -> bool {
        match accounts {
            Ok(accounts) => match accounts.first() {
                Some(&account) => {
                    info!(%account, "wallet connected");
                    self.session.begin(provider, account);
                    true
                }
                None => {
                    warn!("wallet returned no accounts");
                    false
                }
            },
            Err(error) => {
                warn!(code = ?error.code, %error, "account request failed");
                false
            }
        }
    }

    /// Requests account access and refreshes the session.
    pub async fn connect(&mut self) -> bool {
        let Some(provider) = self.prepare_connect() else {
            return false;
        };
        let accounts = provider.request_accounts().await;
        if !self.finish_connect(provider, accounts) {
            return false;
        }
        self.refresh().await;
        true
    }

    /// Clears the session, the typed nonce and both transfer flags.
    pub fn disconnect(&mut self) {
        info!(account = ?self.session.account(), "wallet disconnected");
        self.session.clear();
        self.form.set_nonce("");
        self.loading = false;
        self.transaction_error = false;
    }

    /// Snapshot for a refresh, or `None` when nothing is connected.
    pub fn prepare_refresh(&self) -> Option<RefreshRequest<E::Provider>> {
        self.session.refresh_request(!self.form.nonce().is_empty())
    }

    /// Commits a refresh result.
    ///
    /// Results from an earlier epoch and failures leave the state untouched.
    pub fn finish_refresh(
        &mut self,
        epoch: u64,
        result: ProviderResult<SessionSnapshot<SignerOf<E>>>,
    ) -> bool {
        if epoch != self.session.epoch() {
            debug!(
                epoch,
                current = self.session.epoch(),
                "discarding refresh from a previous session"
            );
            return false;
        }

        match result {
            Ok(snapshot) => {
                if let Some(nonce) = snapshot.nonce {
                    if self.form.nonce().is_empty() {
                        self.form.set_nonce(nonce.to_string());
                    }
                }
                self.session.apply(snapshot);
                true
            }
            Err(error) => {
                warn!(code = ?error.code, %error, "session refresh failed");
                false
            }
        }
    }

    /// Re-reads signer, balance, nonce, network and fees.
    pub async fn refresh(&mut self) -> bool {
        let Some(request) = self.prepare_refresh() else {
            return false;
        };
        let result = fetch_session(&request).await;
        self.finish_refresh(request.epoch, result)
    }

    // Network

    /// Shows the network dialog.
    pub fn open_network_dialog(&mut self) {
        self.network.open();
    }

    /// Hides the network dialog.
    pub fn cancel_network_dialog(&mut self) {
        self.network.cancel();
    }

    /// Validates the dialog and captures a switch request.
    ///
    /// Returns `None` when the confirmation gate is closed, no wallet is
    /// installed, or the inputs cannot be turned into a request (which sets
    /// the validation flag).
    pub fn prepare_switch(&mut self) -> Option<SwitchRequest<E::Provider>> {
        if !self.can_switch_network() {
            debug!("network switch not available");
            return None;
        }
        let Some(provider) = self.environment.provider() else {
            warn!("no wallet installed");
            self.notices.push(Notice::WalletNotInstalled);
            return None;
        };

        self.network.validation_error = false;
        let add_params = match self.network.form.add_chain_params() {
            Ok(params) => params,
            Err(error) => {
                info!(%error, "network inputs rejected");
                self.network.validation_error = true;
                return None;
            }
        };

        self.network.in_flight = true;
        Some(SwitchRequest {
            provider,
            chain_id: add_params.chain_id.clone(),
            add_params,
        })
    }

    /// Applies a switch outcome. Returns `true` when the session should be refreshed.
    pub fn finish_switch(&mut self, outcome: SwitchOutcome) -> bool {
        self.network.in_flight = false;
        match outcome {
            SwitchOutcome::Switched | SwitchOutcome::Added => {
                info!(?outcome, "network switched");
                self.network.open = false;
                true
            }
            SwitchOutcome::Failed(SwitchFailure::InvalidParams(error)) => {
                info!(%error, "wallet rejected network parameters");
                self.network.validation_error = true;
                false
            }
            SwitchOutcome::Failed(SwitchFailure::Other { error, .. }) => {
                self.notices
                    .push(Notice::NetworkSwitchFailed(error.to_string()));
                false
            }
        }
    }

    /// Switches the wallet to the network in the dialog, registering it if needed.
    pub async fn switch_network(&mut self) -> bool {
        let Some(request) = self.prepare_switch() else {
            return false;
        };
        let outcome = run_switch(&request).await;
        if !self.finish_switch(outcome) {
            return false;
        }
        self.refresh().await;
        true
    }

    // Transfer

    /// Captures a transfer, or raises [`Notice::ConnectWallet`] when there is
    /// no target or no signer. Returns `None` while a transfer is in flight.
    pub fn prepare_transfer(&mut self) -> Option<TransferTicket<SignerOf<E>>> {
        if self.loading {
            debug!("transfer already in flight");
            return None;
        }
        let signer = match self.session.signer() {
            Some(signer)
                if self.session.provider().is_some()
                    && !self.form.target_address().is_empty() =>
            {
                signer.clone()
            }
            _ => {
                warn!("transfer attempted without a connected wallet");
                self.notices.push(Notice::ConnectWallet);
                return None;
            }
        };

        self.loading = true;
        self.transaction_error = false;
        Some(TransferTicket {
            signer,
            form: self.form.clone(),
            epoch: self.session.epoch(),
        })
    }

    /// Records the outcome of a transfer.
    ///
    /// A confirmed transfer is always appended, even if the session it was
    /// sent from has ended since; the flags of a newer session are left alone.
    pub fn finish_transfer(
        &mut self,
        epoch: u64,
        result: Result<TransactionRecord, DappError>,
    ) -> bool {
        let current = epoch == self.session.epoch();
        match result {
            Ok(record) => {
                if current {
                    self.loading = false;
                } else {
                    warn!(
                        hash = %record.transaction_hash,
                        "transfer confirmed after the wallet was disconnected"
                    );
                    self.notices
                        .push(Notice::ConfirmedAfterDisconnect(record.transaction_hash));
                }
                self.history.push(record);
                true
            }
            Err(err) => {
                error!(error = %err, "transfer failed");
                self.notices.push(Notice::TransactionFailed(err.to_string()));
                if current {
                    self.transaction_error = true;
                    self.loading = false;
                }
                false
            }
        }
    }

    /// Sends the transfer described by the form and waits for confirmation.
    pub async fn send_transaction(&mut self) -> bool {
        let Some(ticket) = self.prepare_transfer() else {
            return false;
        };
        let result = execute_transfer(&ticket).await;
        self.finish_transfer(ticket.epoch, result)
    }
}
