//! Facet filters over the transaction log
//!
//! Each facet (method, host, mime) is an independent filter dimension with
//! one selected value. Active facets combine with AND. Views borrow from the
//! [`LogStore`] and keep ingestion order and ids, so anything that remembers
//! a [`TxnId`](crate::capture::TxnId) stays valid across filter changes.

use std::collections::BTreeSet;
use std::fmt;

use crate::capture::{LogStore, Transaction};
use crate::selection::SelectionState;

/// One filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetKind {
    Method,
    Host,
    Mime,
}

impl FacetKind {
    pub const ALL: [FacetKind; 3] = [FacetKind::Method, FacetKind::Host, FacetKind::Mime];

    /// Position in [`FacetKind::ALL`]
    fn slot(self) -> usize {
        match self {
            FacetKind::Method => 0,
            FacetKind::Host => 1,
            FacetKind::Mime => 2,
        }
    }

    /// The reserved "match everything" value, always the first candidate.
    pub fn sentinel(self) -> &'static str {
        match self {
            FacetKind::Method | FacetKind::Host => "All",
            FacetKind::Mime => "[All MimeTypes]",
        }
    }

    /// Candidate value a transaction contributes to this facet, if any.
    fn extract(self, txn: &Transaction) -> Option<&str> {
        let value = match self {
            FacetKind::Method => txn.method.as_str(),
            FacetKind::Host => txn.url_authority(),
            FacetKind::Mime => {
                if txn.mime.eq_ignore_ascii_case("null") {
                    return None;
                }
                txn.mime.as_str()
            }
        };
        (!value.is_empty()).then_some(value)
    }

    fn matches(self, txn: &Transaction, value: &str) -> bool {
        match self {
            FacetKind::Method => txn.method == value,
            FacetKind::Host => txn.url.contains(value),
            FacetKind::Mime => txn.mime.contains(value),
        }
    }
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetKind::Method => write!(f, "method"),
            FacetKind::Host => write!(f, "host"),
            FacetKind::Mime => write!(f, "mime"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterFacet {
    pub kind: FacetKind,
    pub enabled: bool,
    pub selected: String,
    /// Deduplicated candidates, sentinel first
    pub values: Vec<String>,
}

impl FilterFacet {
    fn from_store(kind: FacetKind, store: &LogStore) -> Self {
        let distinct: BTreeSet<&str> = store.iter().filter_map(|t| kind.extract(t)).collect();

        let mut values = Vec::with_capacity(distinct.len() + 1);
        values.push(kind.sentinel().to_string());
        values.extend(
            distinct
                .into_iter()
                .filter(|v| *v != kind.sentinel())
                .map(str::to_string),
        );

        Self {
            kind,
            enabled: false,
            selected: kind.sentinel().to_string(),
            values,
        }
    }

    pub fn name(&self) -> String {
        self.kind.to_string()
    }

    fn is_inert_value(&self, value: &str) -> bool {
        value.is_empty() || value == self.kind.sentinel()
    }

    /// The value currently narrowing the view, if the facet is active.
    pub fn active_value(&self) -> Option<&str> {
        (self.enabled && !self.is_inert_value(&self.selected)).then_some(self.selected.as_str())
    }

    fn admits(&self, txn: &Transaction) -> bool {
        match self.active_value() {
            Some(value) => self.kind.matches(txn, value),
            None => true,
        }
    }
}

/// Composes the facet filters into a view over a [`LogStore`].
#[derive(Debug, Clone)]
pub struct FilterEngine {
    facets: Vec<FilterFacet>,
}

impl FilterEngine {
    /// Derive every facet's candidate values from the store.
    pub fn from_store(store: &LogStore) -> Self {
        let facets = FacetKind::ALL
            .iter()
            .map(|kind| FilterFacet::from_store(*kind, store))
            .collect();
        Self { facets }
    }

    pub fn facet(&self, kind: FacetKind) -> &FilterFacet {
        &self.facets[kind.slot()]
    }

    fn facet_mut(&mut self, kind: FacetKind) -> &mut FilterFacet {
        &mut self.facets[kind.slot()]
    }

    pub fn facets(&self) -> &[FilterFacet] {
        &self.facets
    }

    /// Select a value for a facet. The sentinel or an empty value disables it.
    pub fn set_facet(&mut self, kind: FacetKind, value: impl Into<String>) {
        let facet = self.facet_mut(kind);
        let value = value.into();
        if !facet.is_inert_value(&value) && !facet.values.contains(&value) {
            tracing::debug!(facet = %kind, value = %value, "Facet value is not a known candidate");
        }
        facet.enabled = !facet.is_inert_value(&value);
        facet.selected = value;
        tracing::debug!(facet = %kind, value = %facet.selected, enabled = facet.enabled, "Facet set");
    }

    pub fn clear_facet(&mut self, kind: FacetKind) {
        let facet = self.facet_mut(kind);
        facet.enabled = false;
        facet.selected = kind.sentinel().to_string();
        tracing::debug!(facet = %kind, "Facet cleared");
    }

    /// Active facets and their values, for status lines.
    pub fn active(&self) -> Vec<(FacetKind, &str)> {
        self.facets
            .iter()
            .filter_map(|f| f.active_value().map(|v| (f.kind, v)))
            .collect()
    }

    /// Transactions admitted by every active facet, in log order.
    pub fn current_view<'a>(&self, store: &'a LogStore) -> Vec<&'a Transaction> {
        store
            .iter()
            .filter(|txn| self.facets.iter().all(|f| f.admits(txn)))
            .collect()
    }

    /// Transactions that are marked in `selection`: those whose URI is
    /// accepted, plus the main request, main response and blank response.
    pub fn selected_view<'a>(
        &self,
        store: &'a LogStore,
        selection: &SelectionState,
    ) -> Vec<&'a Transaction> {
        store
            .iter()
            .filter(|txn| selection.is_marked(txn.id) || selection.accepts_uri(&txn.c2_uri()))
            .collect()
    }
}
