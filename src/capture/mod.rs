//! Captured traffic: the transaction model, its store and ingestion sources

pub mod burp;
mod store;
mod transaction;

pub use burp::{load_burp_xml, parse_burp_xml, IngestError};
pub use store::{LogStore, NotFoundError};
pub use transaction::{Transaction, TransactionRecord, TxnId};
