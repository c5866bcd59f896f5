use crate::error::BitPackError;

/// Number of bits in a packed word
pub const WORD_BITS: u8 = 32;

fn mask(width: u8) -> u32 {
    ((1u64 << width) - 1) as u32
}

/// Packs variable-width fields into a single u32, first field at bit 0
#[derive(Debug, Default, Clone, Copy)]
pub struct BitPacker {
    word: u32,
    offset: u8,
}

impl BitPacker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, width: u8, value: u32) -> Result<(), BitPackError> {
        if width > WORD_BITS - self.offset {
            return Err(BitPackError::WordOverflow {
                offset: self.offset,
                requested: width,
            });
        }
        if value & !mask(width) != 0 {
            return Err(BitPackError::ValueTooWide { value, width });
        }

        if width > 0 {
            self.word |= value << self.offset;
        }
        self.offset += width;

        Ok(())
    }

    pub fn bits_used(&self) -> u8 {
        self.offset
    }

    pub fn finish(self) -> u32 {
        self.word
    }
}

/// Reads fields back out of a word written by [`BitPacker`]
#[derive(Debug, Clone, Copy)]
pub struct BitUnpacker {
    word: u32,
    offset: u8,
}

impl BitUnpacker {
    pub fn new(word: u32) -> Self {
        Self { word, offset: 0 }
    }

    pub fn take(&mut self, width: u8) -> Result<u32, BitPackError> {
        if width > WORD_BITS - self.offset {
            return Err(BitPackError::WordOverflow {
                offset: self.offset,
                requested: width,
            });
        }
        if width == 0 {
            return Ok(0);
        }

        let value = (self.word >> self.offset) & mask(width);
        self.offset += width;

        Ok(value)
    }
}

/// Packs `(width, value)` pairs into one word
pub fn pack_bits(fields: &[(u8, u32)]) -> Result<u32, BitPackError> {
    let mut packer = BitPacker::new();
    for &(width, value) in fields {
        packer.push(width, value)?;
    }
    Ok(packer.finish())
}

/// Unpacks one value per width, in order
pub fn unpack_bits(word: u32, widths: &[u8]) -> Result<Vec<u32>, BitPackError> {
    let mut unpacker = BitUnpacker::new(word);
    widths.iter().map(|&width| unpacker.take(width)).collect()
}
