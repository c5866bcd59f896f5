use tilesync_shared::{Palette, TileId, World, MAP_CELLS, MAX_TILES};

/// Tile-types a generated cell is drawn from
pub const GENERATED_TILE_TYPES: TileId = 23;

/// A world whose cells are drawn uniformly from the first
/// [`GENERATED_TILE_TYPES`] tile-types and whose tile-types are each a wall
/// with probability ½.
pub fn random_world(palette: Palette) -> World {
    random_world_with(&mut fastrand::Rng::new(), palette)
}

pub fn random_world_with(rng: &mut fastrand::Rng, palette: Palette) -> World {
    let mut world = World::new(palette);

    let tiles: Vec<TileId> = (0..MAP_CELLS)
        .map(|_| rng.u8(0..GENERATED_TILE_TYPES))
        .collect();
    let walls: Vec<TileId> = (0..MAX_TILES as TileId).filter(|_| rng.bool()).collect();

    // both payloads are generated in range
    if let Err(error) = world.replace_tilemap(&tiles) {
        log::warn!("Generated tilemap rejected: {}", error);
    }
    if let Err(error) = world.replace_walls(&walls) {
        log::warn!("Generated walls rejected: {}", error);
    }

    world
}
