//! Transfer submission: payload, broadcast and confirmation.

use dapp_traits::{PendingTransaction, TransactionSigner};
use tracing::{info, warn};

use crate::{DappError, TransactionRecord, TransferForm};

/// A submission captured before the first await.
///
/// The form is a copy, so edits made while the transfer is in flight do not
/// affect it.
#[derive(Debug, Clone)]
pub struct TransferTicket<S> {
    /// Signer the transfer is sent with
    pub signer: S,
    /// Form contents at submission time
    pub form: TransferForm,
    /// Session epoch the transfer was started in
    pub epoch: u64,
}

/// Builds the payload, sends it and waits for one confirmation.
pub async fn execute_transfer<S: TransactionSigner>(
    ticket: &TransferTicket<S>,
) -> Result<TransactionRecord, DappError> {
    let payload = ticket.form.build_payload()?;
    info!(
        from = %ticket.signer.address(),
        to = %payload.to,
        value = %payload.value,
        nonce = payload.nonce,
        extended = payload.is_extended(),
        "sending transfer"
    );

    let pending = ticket.signer.send_transaction(&payload).await?;
    let hash = pending.hash();
    info!(%hash, "transfer broadcast, waiting for confirmation");

    let receipt = pending
        .wait()
        .await
        .map_err(|source| DappError::Receipt { hash, source })?;
    if !receipt.status {
        warn!(%hash, block = receipt.block_number, "transfer reverted");
        return Err(DappError::Reverted {
            hash,
            block: receipt.block_number,
        });
    }
    info!(%hash, block = receipt.block_number, "transfer confirmed");

    Ok(TransactionRecord::from_receipt(&receipt, payload.to))
}
