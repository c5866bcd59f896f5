/// Width of the tile grid, in cells
pub const MAP_WIDTH: usize = 32;
/// Height of the tile grid, in cells
pub const MAP_HEIGHT: usize = 32;
/// Number of cells in the tilemap
pub const MAP_CELLS: usize = MAP_WIDTH * MAP_HEIGHT;

/// Largest number of tile-types the atlas can hold
pub const MAX_TILES: usize = 32;
/// Number of palette entries
pub const PALETTE_SIZE: usize = 16;

/// Side length of a tile or avatar bitmap, in pixels
pub const TILE_SIZE: usize = 32;
/// Pixels per bitmap
pub const TILE_PIXELS: usize = TILE_SIZE * TILE_SIZE;

/// Playfield spans `[PLAYFIELD_MIN, PLAYFIELD_MAX)` on both axes
pub const PLAYFIELD_MIN: i32 = -16;
pub const PLAYFIELD_MAX: i32 = 16;

/// Default number of source pixels carried by one chunk message
pub const DEFAULT_CHUNK_PIXELS: usize = 128;

/// Largest channel distance accepted by fast palette matching
pub const FAST_MATCH_THRESHOLD: u32 = 3;

/// Bit widths of a packed stroke: start x/y, end x/y, palette index, thickness
pub const STROKE_FIELD_WIDTHS: [u8; 6] = [5, 5, 5, 5, 4, 4];

/// Chat line appended when an avatar joins
pub const ENTERED_LINE: &str = "[ENTERED]";
/// Chat line appended when an avatar leaves
pub const EXITED_LINE: &str = "[EXITED]";
