use crate::{constants::MAX_TILES, types::TileId, world::error::WorldError};

/// Set of tile-types that avatars cannot walk onto
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WallSet {
    bits: u32,
}

impl WallSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from a list of tile-types, rejecting any outside the atlas
    pub fn from_tiles(tiles: &[TileId]) -> Result<Self, WorldError> {
        let mut walls = Self::new();
        for &tile in tiles {
            walls.set(tile, true)?;
        }
        Ok(walls)
    }

    pub fn contains(&self, tile: TileId) -> bool {
        usize::from(tile) < MAX_TILES && self.bits & (1 << tile) != 0
    }

    /// Returns `true` if membership changed
    pub fn set(&mut self, tile: TileId, is_wall: bool) -> Result<bool, WorldError> {
        if usize::from(tile) >= MAX_TILES {
            return Err(WorldError::TileOutOfRange {
                tile,
                limit: MAX_TILES,
            });
        }

        let before = self.bits;
        if is_wall {
            self.bits |= 1 << tile;
        } else {
            self.bits &= !(1 << tile);
        }
        Ok(before != self.bits)
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Members in ascending order
    pub fn tiles(&self) -> Vec<TileId> {
        (0..MAX_TILES as TileId)
            .filter(|&tile| self.contains(tile))
            .collect()
    }
}
