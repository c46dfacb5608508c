//! HTTP transcript handling

pub mod codec;
pub mod offset;

pub use codec::{Base64Codec, DecodeError, DecodedMessage, MessageCodec};
pub use offset::resolve_offset;
