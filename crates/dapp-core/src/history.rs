//! Append-only list of confirmed transfers.

use dapp_traits::{Address, TransactionReceipt, B256};
use serde::Serialize;

/// One confirmed transfer as shown in the history table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Sender
    pub from: Address,
    /// Recipient
    pub to: Address,
    /// Transaction hash
    pub transaction_hash: B256,
    /// Inclusion block
    pub block_number: u64,
}

impl TransactionRecord {
    /// Builds a record from a receipt. `to` falls back to `intended_to` when
    /// the receipt carries no recipient.
    pub fn from_receipt(receipt: &TransactionReceipt, intended_to: Address) -> Self {
        Self {
            from: receipt.from,
            to: receipt.to.unwrap_or(intended_to),
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
        }
    }
}

/// Insertion-ordered history. Records can only be appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TransactionHistory {
    records: Vec<TransactionRecord>,
}

impl TransactionHistory {
    /// Creates an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record at the end
    pub fn push(&mut self, record: TransactionRecord) {
        self.records.push(record);
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Iterates in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, TransactionRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a TransactionHistory {
    type Item = &'a TransactionRecord;
    type IntoIter = std::slice::Iter<'a, TransactionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt(block: u64, to: Option<Address>) -> TransactionReceipt {
        TransactionReceipt {
            transaction_hash: B256::with_last_byte(block as u8),
            block_number: block,
            from: Address::with_last_byte(1),
            to,
            status: true,
        }
    }

    #[test]
    fn test_push_preserves_order() {
        let mut history = TransactionHistory::new();
        for block in [7, 3, 9] {
            history.push(TransactionRecord::from_receipt(
                &receipt(block, Some(Address::with_last_byte(2))),
                Address::ZERO,
            ));
        }
        let blocks: Vec<u64> = history.iter().map(|r| r.block_number).collect();
        assert_eq!(blocks, vec![7, 3, 9]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_missing_recipient_falls_back() {
        let intended = Address::with_last_byte(5);
        let record = TransactionRecord::from_receipt(&receipt(1, None), intended);
        assert_eq!(record.to, intended);
    }

    #[test]
    fn test_serializes_as_list() {
        let mut history = TransactionHistory::new();
        history.push(TransactionRecord::from_receipt(&receipt(1, None), Address::ZERO));
        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["blockNumber"], 1);
    }
}
