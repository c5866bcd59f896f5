//! # Tilesync Serde
//! Byte-level reader/writer, bit packing and nibble compression used by the
//! tilesync wire protocol.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod bit_pack;
mod error;
mod nibble;
mod reader;
mod serde;
mod stream_writer;

pub use bit_pack::{pack_bits, unpack_bits, BitPacker, BitUnpacker, WORD_BITS};
pub use error::{BitPackError, NibbleError, SerdeErr};
pub use nibble::{crunch, uncrunch, NIBBLE_MAX};
pub use reader::ByteReader;
pub use serde::Serde;
pub use stream_writer::StreamWriter;

/// Largest payload a length-prefixed field can carry.
pub const MAX_FIELD_LENGTH: usize = u16::MAX as usize;
