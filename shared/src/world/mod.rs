mod avatar;
mod bitmap;
mod error;
mod walls;

pub use avatar::{Avatar, Direction, GridPos};
pub use bitmap::Bitmap;
pub use error::WorldError;
pub use walls::WallSet;

use std::collections::BTreeMap;

use crate::{
    color::{Color32, Palette},
    constants::{MAP_CELLS, MAX_TILES, PALETTE_SIZE, TILE_PIXELS},
    types::{AvatarId, TileId},
};

/// The shared world: tile grid, wall set, palette, tile bitmaps and avatars
#[derive(Clone, Debug)]
pub struct World {
    tilemap: [TileId; MAP_CELLS],
    walls: WallSet,
    palette: Palette,
    tileset: Vec<Bitmap>,
    avatars: BTreeMap<AvatarId, Avatar>,
}

impl World {
    pub fn new(palette: Palette) -> Self {
        Self {
            tilemap: [0; MAP_CELLS],
            walls: WallSet::new(),
            palette,
            tileset: vec![Bitmap::new(); MAX_TILES],
            avatars: BTreeMap::new(),
        }
    }

    // Tilemap

    pub fn tilemap(&self) -> &[TileId] {
        &self.tilemap
    }

    pub fn tile(&self, location: usize) -> Option<TileId> {
        self.tilemap.get(location).copied()
    }

    /// Returns `true` if the cell changed
    pub fn set_tile(&mut self, location: i32, tile: TileId) -> Result<bool, WorldError> {
        let cell = check_location(location)?;
        check_tile(tile)?;

        let changed = self.tilemap[cell] != tile;
        self.tilemap[cell] = tile;
        Ok(changed)
    }

    /// Replaces every cell; nothing is written unless the whole payload is valid
    pub fn replace_tilemap(&mut self, tiles: &[TileId]) -> Result<(), WorldError> {
        if tiles.len() != MAP_CELLS {
            return Err(WorldError::InvalidLength {
                what: "Tilemap",
                expected: MAP_CELLS,
                found: tiles.len(),
            });
        }
        for &tile in tiles {
            check_tile(tile)?;
        }

        self.tilemap.copy_from_slice(tiles);
        Ok(())
    }

    // Walls

    pub fn walls(&self) -> &WallSet {
        &self.walls
    }

    pub fn is_wall(&self, tile: TileId) -> bool {
        self.walls.contains(tile)
    }

    pub fn set_wall(&mut self, tile: TileId, is_wall: bool) -> Result<bool, WorldError> {
        self.walls.set(tile, is_wall)
    }

    pub fn replace_walls(&mut self, tiles: &[TileId]) -> Result<(), WorldError> {
        self.walls = WallSet::from_tiles(tiles)?;
        Ok(())
    }

    // Palette

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette_entry(&mut self, index: u8, color: Color32) -> Result<bool, WorldError> {
        self.palette
            .set(index, color)
            .ok_or(WorldError::PaletteIndexOutOfRange {
                index,
                limit: PALETTE_SIZE,
            })
    }

    pub fn replace_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    // Tileset

    pub fn tile_bitmap(&self, tile: TileId) -> Result<&Bitmap, WorldError> {
        check_tile(tile)?;
        Ok(&self.tileset[usize::from(tile)])
    }

    pub fn tile_bitmap_mut(&mut self, tile: TileId) -> Result<&mut Bitmap, WorldError> {
        check_tile(tile)?;
        Ok(&mut self.tileset[usize::from(tile)])
    }

    /// Applies an atlas page of whole tile bitmaps starting at tile-type `first`.
    /// Returns the number of tiles written.
    pub fn apply_tileset(&mut self, first: i32, pixels: &[u8]) -> Result<usize, WorldError> {
        if pixels.len() % TILE_PIXELS != 0 {
            return Err(WorldError::PartialTile {
                length: pixels.len(),
                tile_pixels: TILE_PIXELS,
            });
        }
        let count = pixels.len() / TILE_PIXELS;
        let start = usize::try_from(first)
            .ok()
            .filter(|&start| start + count <= MAX_TILES)
            .ok_or(WorldError::TileOutOfRange {
                tile: u8::try_from(first).unwrap_or(u8::MAX),
                limit: MAX_TILES,
            })?;

        let bitmaps = pixels
            .chunks_exact(TILE_PIXELS)
            .map(Bitmap::from_pixels)
            .collect::<Result<Vec<_>, _>>()?;
        for (index, bitmap) in bitmaps.into_iter().enumerate() {
            self.tileset[start + index] = bitmap;
        }

        Ok(count)
    }

    // Avatars

    pub fn avatar(&self, id: AvatarId) -> Result<&Avatar, WorldError> {
        self.avatars
            .get(&id)
            .ok_or(WorldError::AvatarNotFound { id })
    }

    pub fn avatar_mut(&mut self, id: AvatarId) -> Result<&mut Avatar, WorldError> {
        self.avatars
            .get_mut(&id)
            .ok_or(WorldError::AvatarNotFound { id })
    }

    pub fn has_avatar(&self, id: AvatarId) -> bool {
        self.avatars.contains_key(&id)
    }

    pub fn add_avatar(&mut self, avatar: Avatar) -> Result<(), WorldError> {
        if self.avatars.contains_key(&avatar.id) {
            return Err(WorldError::DuplicateAvatar { id: avatar.id });
        }
        self.avatars.insert(avatar.id, avatar);
        Ok(())
    }

    pub fn remove_avatar(&mut self, id: AvatarId) -> Result<Avatar, WorldError> {
        self.avatars
            .remove(&id)
            .ok_or(WorldError::AvatarNotFound { id })
    }

    /// Avatars in ascending id order
    pub fn avatars(&self) -> impl Iterator<Item = &Avatar> {
        self.avatars.values()
    }

    pub fn avatars_mut(&mut self) -> impl Iterator<Item = &mut Avatar> {
        self.avatars.values_mut()
    }

    pub fn avatar_count(&self) -> usize {
        self.avatars.len()
    }

    /// Tile-type under a grid position, `None` off the playfield
    pub fn tile_at(&self, position: GridPos) -> Option<TileId> {
        position.cell().and_then(|cell| self.tile(cell))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

fn check_location(location: i32) -> Result<usize, WorldError> {
    usize::try_from(location)
        .ok()
        .filter(|&cell| cell < MAP_CELLS)
        .ok_or(WorldError::CellOutOfRange {
            location,
            limit: MAP_CELLS,
        })
}

fn check_tile(tile: TileId) -> Result<(), WorldError> {
    if usize::from(tile) >= MAX_TILES {
        return Err(WorldError::TileOutOfRange {
            tile,
            limit: MAX_TILES,
        });
    }
    Ok(())
}
