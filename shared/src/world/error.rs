use thiserror::Error;

use crate::types::{AvatarId, TileId};

/// Errors that can occur while reading or mutating world state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    /// A message referenced an avatar the world does not contain
    #[error("Avatar {id} not found in world. It may have been destroyed, or its ReplicateAvatar message has not arrived yet")]
    AvatarNotFound {
        id: AvatarId,
    },

    /// An avatar with this id already exists
    #[error("Avatar {id} already exists in world. Avatar ids must be unique")]
    DuplicateAvatar {
        id: AvatarId,
    },

    /// Tilemap location outside the grid
    #[error("Tilemap location {location} is out of range. Locations must be in [0, {limit})")]
    CellOutOfRange {
        location: i32,
        limit: usize,
    },

    /// Tile-type index outside the atlas
    #[error("Tile-type {tile} is out of range. Tile-types must be in [0, {limit})")]
    TileOutOfRange {
        tile: TileId,
        limit: usize,
    },

    /// Palette entry outside the palette
    #[error("Palette index {index} is out of range. Indices must be in [0, {limit})")]
    PaletteIndexOutOfRange {
        index: u8,
        limit: usize,
    },

    /// Pixel value that is not a palette index
    #[error("Pixel {position} holds {value}, which is not a palette index. Indices must be in [0, {limit})")]
    PixelOutOfRange {
        position: usize,
        value: u8,
        limit: usize,
    },

    /// Chunk would write past the end of a bitmap
    #[error("Chunk of {length} pixels at offset {offset} does not fit in a {limit}-pixel bitmap")]
    ChunkOutOfBounds {
        offset: i32,
        length: usize,
        limit: usize,
    },

    /// Atlas page that does not hold a whole number of tiles
    #[error("Tileset page of {length} pixels is not a whole number of {tile_pixels}-pixel tiles")]
    PartialTile {
        length: usize,
        tile_pixels: usize,
    },

    /// A whole-payload replacement had the wrong size
    #[error("{what} payload has {found} entries, expected {expected}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}
