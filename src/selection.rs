//! Operator selections that drive profile synthesis
//!
//! Every slot refers to transactions by [`TxnId`], never by position in a
//! filtered view, so selections survive any filter change.

use crate::capture::TxnId;

/// A transaction marked as the main request or main response, with the body
/// offset at which beacon data is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainMark {
    pub id: TxnId,
    pub insert_at: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    accepted_uris: Vec<String>,
    main_request: Option<MainMark>,
    main_response: Option<MainMark>,
    blank_response: Option<TxnId>,
}

/// Toggle a mark: same id clears, any other id replaces.
fn toggle_mark(slot: &mut Option<MainMark>, id: TxnId, insert_at: usize) {
    *slot = match *slot {
        Some(mark) if mark.id == id => None,
        _ => Some(MainMark { id, insert_at }),
    };
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the URI if absent, remove it if present. Returns whether the URI
    /// is accepted afterwards.
    pub fn toggle_accepted_uri(&mut self, uri: impl Into<String>) -> bool {
        let uri = uri.into();
        let accepted = match self.accepted_uris.iter().position(|u| *u == uri) {
            Some(pos) => {
                self.accepted_uris.remove(pos);
                false
            }
            None => {
                self.accepted_uris.push(uri.clone());
                true
            }
        };
        tracing::debug!(uri = %uri, accepted, "Toggled accepted URI");
        accepted
    }

    pub fn set_main_request(&mut self, id: TxnId, insert_at: usize) {
        toggle_mark(&mut self.main_request, id, insert_at);
        tracing::debug!(mark = ?self.main_request, "Main request changed");
    }

    pub fn set_main_response(&mut self, id: TxnId, insert_at: usize) {
        toggle_mark(&mut self.main_response, id, insert_at);
        tracing::debug!(mark = ?self.main_response, "Main response changed");
    }

    pub fn set_blank_response(&mut self, id: TxnId) {
        self.blank_response = match self.blank_response {
            Some(current) if current == id => None,
            _ => Some(id),
        };
        tracing::debug!(id = ?self.blank_response, "Blank response changed");
    }

    /// Move the insertion point of the main request without toggling it.
    /// Returns false when no main request is marked.
    pub fn set_request_offset(&mut self, insert_at: usize) -> bool {
        match self.main_request.as_mut() {
            Some(mark) => {
                mark.insert_at = insert_at;
                true
            }
            None => false,
        }
    }

    /// Move the insertion point of the main response without toggling it.
    /// Returns false when no main response is marked.
    pub fn set_response_offset(&mut self, insert_at: usize) -> bool {
        match self.main_response.as_mut() {
            Some(mark) => {
                mark.insert_at = insert_at;
                true
            }
            None => false,
        }
    }

    pub fn accepted_uris(&self) -> &[String] {
        &self.accepted_uris
    }

    pub fn accepts_uri(&self, uri: &str) -> bool {
        self.accepted_uris.iter().any(|u| u == uri)
    }

    pub fn main_request(&self) -> Option<MainMark> {
        self.main_request
    }

    pub fn main_response(&self) -> Option<MainMark> {
        self.main_response
    }

    pub fn blank_response(&self) -> Option<TxnId> {
        self.blank_response
    }

    /// Whether `id` holds any of the three role marks.
    pub fn is_marked(&self, id: TxnId) -> bool {
        self.main_request.is_some_and(|m| m.id == id)
            || self.main_response.is_some_and(|m| m.id == id)
            || self.blank_response == Some(id)
    }

    /// Every id referenced by a role mark.
    pub fn marked_ids(&self) -> impl Iterator<Item = TxnId> + '_ {
        self.main_request
            .map(|m| m.id)
            .into_iter()
            .chain(self.main_response.map(|m| m.id))
            .chain(self.blank_response)
    }
}
