//! Captured HTTP transaction model

use std::fmt;

/// Stable identifier of a captured transaction.
///
/// Assigned once at ingestion (the record's position in the source log) and
/// never reused, so it stays valid no matter how the log is filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TxnId(pub usize);

impl TxnId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TxnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One record as produced by an ingestion source, before it has an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionRecord {
    pub url: String,
    pub host: String,
    pub method: String,
    pub mime: String,
    /// Base64-encoded raw HTTP request
    pub request: String,
    /// Base64-encoded raw HTTP response
    pub response: String,
}

/// A captured request/response pair owned by the [`LogStore`](super::LogStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: TxnId,
    pub url: String,
    pub host: String,
    pub method: String,
    pub mime: String,
    pub request: String,
    pub response: String,
}

impl Transaction {
    pub(crate) fn from_record(id: TxnId, record: TransactionRecord) -> Self {
        Self {
            id,
            url: record.url,
            host: record.host,
            method: record.method,
            mime: record.mime,
            request: record.request,
            response: record.response,
        }
    }

    /// Host-relative path of the request URL, as listed in a profile's URI set.
    ///
    /// The query string, scheme and authority are dropped; a URL without a
    /// path yields `/`.
    pub fn c2_uri(&self) -> String {
        let without_query = self.url.split('?').next().unwrap_or_default();
        let without_scheme = without_query
            .strip_prefix("https://")
            .or_else(|| without_query.strip_prefix("http://"));

        match without_scheme {
            Some(rest) => match rest.find('/') {
                Some(slash) => rest[slash..].to_string(),
                None => "/".to_string(),
            },
            None if without_query.starts_with('/') => without_query.to_string(),
            None => format!("/{}", without_query),
        }
    }

    /// Authority segment of the URL (`host[:port]`), used by the host facet.
    pub fn url_authority(&self) -> &str {
        self.url.split('/').nth(2).unwrap_or_default()
    }
}
