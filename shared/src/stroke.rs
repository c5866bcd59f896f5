use tilesync_serde::{BitPackError, BitPacker, BitUnpacker};

use crate::{
    color::Palette,
    constants::STROKE_FIELD_WIDTHS,
    messages::MessageError,
    types::TileId,
    world::{Bitmap, World, WorldError},
};

/// A single line segment drawn onto a tile bitmap.
/// Coordinates are pixels within the tile, `color` is a palette index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Stroke {
    pub start: (u8, u8),
    pub end: (u8, u8),
    pub color: u8,
    pub thickness: u8,
}

impl Stroke {
    pub fn new(start: (u8, u8), end: (u8, u8), color: u8, thickness: u8) -> Self {
        Self {
            start,
            end,
            color,
            thickness,
        }
    }

    fn fields(&self) -> [u8; 6] {
        [
            self.start.0,
            self.start.1,
            self.end.0,
            self.end.1,
            self.color,
            self.thickness,
        ]
    }

    /// Packs the stroke into the low 28 bits of a word
    pub fn pack(&self) -> Result<u32, BitPackError> {
        let mut packer = BitPacker::new();
        for (width, value) in STROKE_FIELD_WIDTHS.iter().zip(self.fields()) {
            packer.push(*width, u32::from(value))?;
        }
        Ok(packer.finish())
    }

    /// Reads a stroke back out of a word. Bits above the packed fields must be clear.
    pub fn unpack(word: u32) -> Result<Self, MessageError> {
        let used_bits: u32 = STROKE_FIELD_WIDTHS.iter().map(|width| u32::from(*width)).sum();
        if word >> used_bits != 0 {
            return Err(MessageError::FieldOutOfRange {
                field: "stroke",
                value: i64::from(word),
            });
        }

        let mut unpacker = BitUnpacker::new(word);
        let mut fields = [0u8; 6];
        for (field, width) in fields.iter_mut().zip(STROKE_FIELD_WIDTHS) {
            // every width is at most 5 bits
            *field = unpacker.take(width)? as u8;
        }
        let [start_x, start_y, end_x, end_y, color, thickness] = fields;

        Ok(Self::new(
            (start_x, start_y),
            (end_x, end_y),
            color,
            thickness,
        ))
    }

    pub fn apply(&self, bitmap: &mut Bitmap, palette: &Palette) {
        bitmap.draw_line(
            (i32::from(self.start.0), i32::from(self.start.1)),
            (i32::from(self.end.0), i32::from(self.end.1)),
            self.thickness,
            self.color,
            palette,
        );
    }

    /// Draws onto tile-type `tile` of `world` using the world's palette
    pub fn apply_to_tile(&self, world: &mut World, tile: TileId) -> Result<(), WorldError> {
        let palette = world.palette().clone();
        self.apply(world.tile_bitmap_mut(tile)?, &palette);
        Ok(())
    }
}
