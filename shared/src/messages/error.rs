use thiserror::Error;

use tilesync_serde::{BitPackError, NibbleError, SerdeErr};

/// Errors that can occur while encoding or decoding a message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// The leading type tag does not name a message kind
    #[error("Unknown message tag {tag}. Tags must be in [0, 16)")]
    UnknownTag {
        tag: i32,
    },

    /// A field decoded to a value outside its allowed range
    #[error("Field '{field}' holds {value}, which is out of range")]
    FieldOutOfRange {
        field: &'static str,
        value: i64,
    },

    /// A variable-length field had the wrong number of entries
    #[error("Field '{field}' has {found} entries, expected {expected}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    /// Bytes left over after the message was fully decoded
    #[error("{remaining} unexpected bytes after the end of a {kind} message")]
    TrailingBytes {
        kind: &'static str,
        remaining: usize,
    },

    #[error("Serde error: {0}")]
    Serde(#[from] SerdeErr),

    #[error("Nibble compression error: {0}")]
    Nibble(#[from] NibbleError),

    #[error("Bit packing error: {0}")]
    BitPack(#[from] BitPackError),
}
