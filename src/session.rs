//! Operator session: the loaded log plus the filter and selection state

use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::capture::{LogStore, NotFoundError, Transaction, TransactionRecord, TxnId};
use crate::filter::{FacetKind, FilterEngine};
use crate::http::{Base64Codec, DecodeError, DecodedMessage, MessageCodec};
use crate::profile::{self, ExportError, ExportSummary, SynthesisError, SynthesizedProfile};
use crate::selection::SelectionState;

/// Which transcript of a transaction to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Request,
    Response,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Request => write!(f, "request"),
            Side::Response => write!(f, "response"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error("Failed to decode the {side} of transaction {id}: {source}")]
    Decode {
        id: TxnId,
        side: Side,
        #[source]
        source: DecodeError,
    },
}

/// Everything one profile-building session needs, owned by the caller.
#[derive(Debug, Clone)]
pub struct Session {
    store: LogStore,
    filters: FilterEngine,
    selection: SelectionState,
    codec: Base64Codec,
}

impl Session {
    pub fn new(store: LogStore) -> Self {
        let filters = FilterEngine::from_store(&store);
        Self {
            store,
            filters,
            selection: SelectionState::new(),
            codec: Base64Codec,
        }
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = TransactionRecord>,
    {
        Self::new(LogStore::ingest(records))
    }

    pub fn store(&self) -> &LogStore {
        &self.store
    }

    pub fn filters(&self) -> &FilterEngine {
        &self.filters
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn get(&self, id: TxnId) -> Result<&Transaction, NotFoundError> {
        self.store.get(id)
    }

    pub fn set_facet(&mut self, kind: FacetKind, value: impl Into<String>) {
        self.filters.set_facet(kind, value);
    }

    pub fn clear_facet(&mut self, kind: FacetKind) {
        self.filters.clear_facet(kind);
    }

    pub fn current_view(&self) -> Vec<&Transaction> {
        self.filters.current_view(&self.store)
    }

    pub fn selected_view(&self) -> Vec<&Transaction> {
        self.filters.selected_view(&self.store, &self.selection)
    }

    /// Toggle the URI of transaction `id` in the accepted set.
    pub fn toggle_accepted_uri(&mut self, id: TxnId) -> Result<bool, NotFoundError> {
        let uri = self.store.get(id)?.c2_uri();
        Ok(self.selection.toggle_accepted_uri(uri))
    }

    /// Accept the URI of transaction `id`, leaving it accepted if it already was.
    pub fn accept_uri(&mut self, id: TxnId) -> Result<(), NotFoundError> {
        let uri = self.store.get(id)?.c2_uri();
        if !self.selection.accepts_uri(&uri) {
            self.selection.toggle_accepted_uri(uri);
        }
        Ok(())
    }

    pub fn set_main_request(&mut self, id: TxnId, insert_at: usize) -> Result<(), NotFoundError> {
        self.store.get(id)?;
        self.selection.set_main_request(id, insert_at);
        Ok(())
    }

    pub fn set_main_response(&mut self, id: TxnId, insert_at: usize) -> Result<(), NotFoundError> {
        self.store.get(id)?;
        self.selection.set_main_response(id, insert_at);
        Ok(())
    }

    pub fn set_blank_response(&mut self, id: TxnId) -> Result<(), NotFoundError> {
        self.store.get(id)?;
        self.selection.set_blank_response(id);
        Ok(())
    }

    pub fn set_request_offset(&mut self, insert_at: usize) -> bool {
        self.selection.set_request_offset(insert_at)
    }

    pub fn set_response_offset(&mut self, insert_at: usize) -> bool {
        self.selection.set_response_offset(insert_at)
    }

    /// Decode one side of a transaction for display.
    pub fn decode(&self, id: TxnId, side: Side) -> Result<DecodedMessage, TranscriptError> {
        let txn = self.store.get(id)?;
        let transcript = match side {
            Side::Request => &txn.request,
            Side::Response => &txn.response,
        };
        self.codec
            .decode(transcript)
            .map_err(|source| TranscriptError::Decode { id, side, source })
    }

    pub fn synthesize(&self) -> Result<SynthesizedProfile, SynthesisError> {
        profile::build(&self.selection, &self.store, &self.codec)
    }

    pub fn export(
        &self,
        template_path: &Path,
        output_path: &Path,
    ) -> Result<ExportSummary, ExportError> {
        profile::export_profile(
            &self.store,
            &self.selection,
            &self.codec,
            template_path,
            output_path,
        )
    }
}
