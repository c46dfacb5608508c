pub mod capture;
pub mod cli;
pub mod config;
pub mod filter;
pub mod http;
pub mod profile;
pub mod selection;
pub mod session;
pub mod util;

pub use capture::{LogStore, NotFoundError, Transaction, TransactionRecord, TxnId};
pub use config::Config;
pub use filter::{FacetKind, FilterEngine, FilterFacet};
pub use http::{resolve_offset, Base64Codec, DecodeError, DecodedMessage, MessageCodec};
pub use profile::{
    ExportError, ExportSummary, SynthesisError, SynthesizedProfile, TemplateDocument,
    TemplateShapeError,
};
pub use selection::{MainMark, SelectionState};
pub use session::{Session, Side, TranscriptError};
