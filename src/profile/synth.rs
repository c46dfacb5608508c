//! Builds the profile fields contributed by the marked transactions

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::capture::{LogStore, NotFoundError, TxnId};
use crate::http::{DecodeError, DecodedMessage, MessageCodec};
use crate::selection::SelectionState;

/// Listener keys written by the synthesizer.
pub mod keys {
    pub const REQUEST_HEADERS: &str = "request_headers";
    pub const RESPONSE_HEADERS: &str = "response_headers";
    pub const PREPEND: &str = "prepend";
    pub const APPEND: &str = "append";
    pub const PREPEND_RESPONSE: &str = "prepend_response";
    pub const APPEND_RESPONSE: &str = "append_response";
    pub const EMPTY_RESPONSE: &str = "empty_response";
    pub const C2_URI: &str = "c2_uri";
}

/// The part a marked transaction plays in the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Request,
    Response,
    Blank,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Request => write!(f, "main request"),
            Role::Response => write!(f, "main response"),
            Role::Blank => write!(f, "blank response"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("Failed to decode the {role} (transaction {id}): {source}")]
    Decode {
        role: Role,
        id: TxnId,
        #[source]
        source: DecodeError,
    },
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}

impl SynthesisError {
    /// The role whose transcript failed, if this is a decode failure.
    pub fn role(&self) -> Option<Role> {
        match self {
            SynthesisError::Decode { role, .. } => Some(*role),
            SynthesisError::NotFound(_) => None,
        }
    }
}

/// Profile fields derived from the selection.
///
/// `None` means the role behind the field was not marked, which is different
/// from a marked role that produced an empty value: only populated fields are
/// written over the template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesizedProfile {
    pub request_headers: Option<BTreeMap<String, String>>,
    pub response_headers: Option<BTreeMap<String, String>>,
    pub prepend: Option<Vec<u8>>,
    pub append: Option<Vec<u8>>,
    pub prepend_response: Option<Vec<u8>>,
    pub append_response: Option<Vec<u8>>,
    pub empty_response: Option<Vec<u8>>,
    pub accepted_uris: Option<Vec<String>>,
}

fn headers_value(headers: &BTreeMap<String, String>) -> Value {
    Value::Object(
        headers
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect(),
    )
}

fn bytes_value(bytes: &[u8]) -> Value {
    Value::String(String::from_utf8_lossy(bytes).into_owned())
}

impl SynthesizedProfile {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Populated fields as listener keys and JSON values.
    pub fn overlay(&self) -> Map<String, Value> {
        let mut out = Map::new();
        if let Some(headers) = &self.request_headers {
            out.insert(keys::REQUEST_HEADERS.into(), headers_value(headers));
        }
        if let Some(headers) = &self.response_headers {
            out.insert(keys::RESPONSE_HEADERS.into(), headers_value(headers));
        }
        let byte_fields = [
            (keys::PREPEND, &self.prepend),
            (keys::APPEND, &self.append),
            (keys::PREPEND_RESPONSE, &self.prepend_response),
            (keys::APPEND_RESPONSE, &self.append_response),
            (keys::EMPTY_RESPONSE, &self.empty_response),
        ];
        for (key, field) in byte_fields {
            if let Some(bytes) = field {
                out.insert(key.into(), bytes_value(bytes));
            }
        }
        if let Some(uris) = &self.accepted_uris {
            out.insert(
                keys::C2_URI.into(),
                Value::Array(uris.iter().cloned().map(Value::String).collect()),
            );
        }
        out
    }
}

fn decode_role(
    store: &LogStore,
    codec: &impl MessageCodec,
    role: Role,
    id: TxnId,
) -> Result<DecodedMessage, SynthesisError> {
    let txn = store.get(id)?;
    let transcript = match role {
        Role::Request => &txn.request,
        Role::Response | Role::Blank => &txn.response,
    };
    codec
        .decode(transcript)
        .map_err(|source| SynthesisError::Decode { role, id, source })
}

/// Derive the profile fields for every marked role.
///
/// Fails on the first role whose transcript cannot be decoded; no partial
/// profile is returned.
pub fn build(
    selection: &SelectionState,
    store: &LogStore,
    codec: &impl MessageCodec,
) -> Result<SynthesizedProfile, SynthesisError> {
    let mut profile = SynthesizedProfile::default();

    if let Some(mark) = selection.main_request() {
        let message = decode_role(store, codec, Role::Request, mark.id)?;
        let (prepend, append) = message.split_body(mark.insert_at);
        profile.prepend = Some(prepend.to_vec());
        profile.append = Some(append.to_vec());
        profile.request_headers = Some(message.header_map());
    }

    if let Some(mark) = selection.main_response() {
        let message = decode_role(store, codec, Role::Response, mark.id)?;
        let (prepend, append) = message.split_body(mark.insert_at);
        profile.prepend_response = Some(prepend.to_vec());
        profile.append_response = Some(append.to_vec());
        profile.response_headers = Some(message.header_map());
    }

    if let Some(id) = selection.blank_response() {
        let message = decode_role(store, codec, Role::Blank, id)?;
        profile.empty_response = Some(message.body);
    }

    if !selection.accepted_uris().is_empty() {
        profile.accepted_uris = Some(selection.accepted_uris().to_vec());
    }

    tracing::info!(
        fields = profile.overlay().len(),
        "Synthesized profile fields"
    );
    Ok(profile)
}
