use crate::{
    constants::MAX_TILES,
    messages::Message,
    types::{AvatarId, TileId},
    world::{Avatar, Bitmap, World, WorldError},
};

/// Chunks carry an even number of pixels so they nibble-pack cleanly
pub fn chunk_size(chunk_pixels: usize) -> usize {
    chunk_pixels.max(2) & !1
}

fn bitmap_chunks(bitmap: &Bitmap, chunk_pixels: usize) -> impl Iterator<Item = (i32, Vec<u8>)> + '_ {
    bitmap
        .chunks(chunk_size(chunk_pixels))
        .map(|(offset, pixels)| (offset, pixels.to_vec()))
}

/// Splits one tile bitmap into `TileChunk` messages
pub fn tile_chunk_messages(
    world: &World,
    tile: TileId,
    chunk_pixels: usize,
) -> Result<Vec<Message>, WorldError> {
    let bitmap = world.tile_bitmap(tile)?;
    Ok(bitmap_chunks(bitmap, chunk_pixels)
        .map(|(offset, pixels)| Message::TileChunk {
            tile,
            offset,
            pixels,
        })
        .collect())
}

/// Splits an avatar's appearance into `AvatarChunk` messages
pub fn avatar_chunk_messages(avatar: &Avatar, chunk_pixels: usize) -> Vec<Message> {
    bitmap_chunks(&avatar.appearance, chunk_pixels)
        .map(|(offset, pixels)| Message::AvatarChunk {
            id: avatar.id,
            offset,
            pixels,
        })
        .collect()
}

pub fn replicate_avatar_message(avatar: &Avatar) -> Message {
    Message::ReplicateAvatar {
        id: avatar.id,
        destination: avatar.destination,
        source: avatar.source,
    }
}

/// Everything a newly connected peer needs, in send order: tilemap, palette,
/// walls, then each avatar (with a handoff for the recipient's own avatar and
/// appearance chunks for the rest), then every tile bitmap.
pub fn snapshot(world: &World, recipient: AvatarId, chunk_pixels: usize) -> Vec<Message> {
    let mut messages = vec![
        Message::Tilemap {
            tiles: world.tilemap().to_vec(),
        },
        Message::Palette {
            palette: world.palette().clone(),
        },
        Message::Walls {
            walls: world.walls().tiles(),
        },
    ];

    for avatar in world.avatars() {
        messages.push(replicate_avatar_message(avatar));
        if avatar.id == recipient {
            messages.push(Message::GiveAvatar { id: avatar.id });
        } else {
            messages.extend(avatar_chunk_messages(avatar, chunk_pixels));
        }
    }

    for tile in 0..MAX_TILES as TileId {
        if let Ok(chunks) = tile_chunk_messages(world, tile, chunk_pixels) {
            messages.extend(chunks);
        }
    }

    messages
}

pub fn apply_tile_chunk(
    world: &mut World,
    tile: TileId,
    offset: i32,
    pixels: &[u8],
) -> Result<(), WorldError> {
    world.tile_bitmap_mut(tile)?.write_chunk(offset, pixels)
}

pub fn apply_avatar_chunk(
    world: &mut World,
    id: AvatarId,
    offset: i32,
    pixels: &[u8],
) -> Result<(), WorldError> {
    world.avatar_mut(id)?.appearance.write_chunk(offset, pixels)
}

pub fn apply_tile_image(world: &mut World, tile: TileId, pixels: &[u8]) -> Result<(), WorldError> {
    let bitmap = Bitmap::from_pixels(pixels)?;
    *world.tile_bitmap_mut(tile)? = bitmap;
    Ok(())
}
