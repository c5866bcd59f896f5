use thiserror::Error;

/// Errors that can occur while reading or writing wire fields
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The buffer ended before the field could be read
    #[error("Unexpected end of buffer: needed {needed} bytes but only {remaining} remain")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// A length-prefixed field is longer than its u16 prefix can express
    #[error("Field of {length} bytes exceeds the length-prefix limit of {limit} bytes")]
    LengthOverflow { length: usize, limit: usize },

    /// A string field did not contain valid UTF-8
    #[error("String field of {length} bytes is not valid UTF-8")]
    InvalidUtf8 { length: usize },

    /// A boolean field held something other than 0 or 1
    #[error("Invalid boolean byte {value}, expected 0 or 1")]
    InvalidBool { value: u8 },
}

/// Errors that can occur while packing fields into a 32-bit word
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitPackError {
    /// The fields' widths add up to more than one word
    #[error("Packing {requested} more bits at offset {offset} would overflow the 32-bit word")]
    WordOverflow { offset: u8, requested: u8 },

    /// A value does not fit in the width it was given
    #[error("Value {value} does not fit in {width} bits")]
    ValueTooWide { value: u32, width: u8 },
}

/// Errors that can occur during nibble compression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NibbleError {
    /// A palette index was too large to fit in a nibble
    #[error("Value {value} at position {position} does not fit in a nibble (max 15)")]
    ValueTooLarge { position: usize, value: u8 },

    /// Nibble compression needs pairs of values
    #[error("Cannot nibble-compress an odd number of values ({length})")]
    OddLength { length: usize },
}
