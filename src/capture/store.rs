//! Immutable, stably identified transaction log

use thiserror::Error;

use super::transaction::{Transaction, TransactionRecord, TxnId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Transaction {id} not found (log holds {len} transactions)")]
pub struct NotFoundError {
    pub id: TxnId,
    pub len: usize,
}

/// Append-once collection of captured transactions.
///
/// Ids equal ingestion positions. Nothing hands out `&mut Transaction`, so a
/// transaction read through any view is always the one that was ingested.
#[derive(Debug, Clone, Default)]
pub struct LogStore {
    items: Vec<Transaction>,
}

impl LogStore {
    pub fn ingest<I>(records: I) -> Self
    where
        I: IntoIterator<Item = TransactionRecord>,
    {
        let items: Vec<Transaction> = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| Transaction::from_record(TxnId(index), record))
            .collect();
        tracing::debug!(count = items.len(), "Ingested transactions");
        Self { items }
    }

    pub fn get(&self, id: TxnId) -> Result<&Transaction, NotFoundError> {
        self.items.get(id.index()).ok_or(NotFoundError {
            id,
            len: self.items.len(),
        })
    }

    pub fn contains(&self, id: TxnId) -> bool {
        id.index() < self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
