use tilesync_serde::{crunch, uncrunch, ByteReader, Serde, SerdeErr, StreamWriter};

use crate::{
    color::{Color32, Palette},
    constants::{MAP_CELLS, MAX_TILES, PALETTE_SIZE, TILE_PIXELS},
    messages::{error::MessageError, message_kind::MessageKind},
    stroke::Stroke,
    types::{AvatarId, ChannelKind, TileId},
    world::GridPos,
};

/// Every message exchanged between host and peers.
///
/// Chunk pixels are held uncompressed; nibble compression happens on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    /// Atlas page of whole tile bitmaps starting at tile-type `id`
    Tileset { id: i32, pixels: Vec<u8> },
    Tilemap { tiles: Vec<TileId> },
    Walls { walls: Vec<TileId> },
    Palette { palette: Palette },
    /// Replaces one tile bitmap wholesale
    TileImage { tile: TileId, pixels: Vec<u8> },
    TileChunk { tile: TileId, offset: i32, pixels: Vec<u8> },
    TileStroke { tile: TileId, stroke: Stroke },
    ReplicateAvatar { id: AvatarId, destination: GridPos, source: GridPos },
    DestroyAvatar { id: AvatarId },
    MoveAvatar { id: AvatarId, destination: GridPos },
    /// Hands control of avatar `id` to the receiving peer
    GiveAvatar { id: AvatarId },
    AvatarChunk { id: AvatarId, offset: i32, pixels: Vec<u8> },
    Chat { id: AvatarId, text: String },
    SetTile { location: i32, tile: TileId },
    SetWall { tile: TileId, is_wall: bool },
    /// `owner == None` unlocks the tile
    LockTile { owner: Option<AvatarId>, tile: TileId },
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Tileset { .. } => MessageKind::Tileset,
            Message::Tilemap { .. } => MessageKind::Tilemap,
            Message::Walls { .. } => MessageKind::Walls,
            Message::Palette { .. } => MessageKind::Palette,
            Message::TileImage { .. } => MessageKind::TileImage,
            Message::TileChunk { .. } => MessageKind::TileChunk,
            Message::TileStroke { .. } => MessageKind::TileStroke,
            Message::ReplicateAvatar { .. } => MessageKind::ReplicateAvatar,
            Message::DestroyAvatar { .. } => MessageKind::DestroyAvatar,
            Message::MoveAvatar { .. } => MessageKind::MoveAvatar,
            Message::GiveAvatar { .. } => MessageKind::GiveAvatar,
            Message::AvatarChunk { .. } => MessageKind::AvatarChunk,
            Message::Chat { .. } => MessageKind::Chat,
            Message::SetTile { .. } => MessageKind::SetTile,
            Message::SetWall { .. } => MessageKind::SetWall,
            Message::LockTile { .. } => MessageKind::LockTile,
        }
    }

    pub fn channel(&self) -> ChannelKind {
        self.kind().channel()
    }

    pub fn encode(&self) -> Result<Vec<u8>, MessageError> {
        let mut writer = StreamWriter::new();
        writer.write_i32(self.kind().tag());

        match self {
            Message::Tileset { id, pixels } => {
                writer.write_i32(*id);
                writer.write_bytes_and_size(pixels)?;
            }
            Message::Tilemap { tiles } => {
                writer.write_bytes_and_size(tiles)?;
            }
            Message::Walls { walls } => {
                writer.write_bytes_and_size(walls)?;
            }
            Message::Palette { palette } => {
                for color in palette.colors() {
                    color.ser(&mut writer)?;
                }
            }
            Message::TileImage { tile, pixels } => {
                writer.write_u8(*tile);
                writer.write_bytes_and_size(pixels)?;
            }
            Message::TileChunk {
                tile,
                offset,
                pixels,
            } => {
                writer.write_u8(*tile);
                writer.write_i32(*offset);
                writer.write_bytes_and_size(&crunch(pixels)?)?;
            }
            Message::TileStroke { tile, stroke } => {
                writer.write_u8(*tile);
                writer.write_u32(stroke.pack()?);
            }
            Message::ReplicateAvatar {
                id,
                destination,
                source,
            } => {
                writer.write_i32(*id);
                destination.ser(&mut writer)?;
                source.ser(&mut writer)?;
            }
            Message::DestroyAvatar { id } | Message::GiveAvatar { id } => {
                writer.write_i32(*id);
            }
            Message::MoveAvatar { id, destination } => {
                writer.write_i32(*id);
                destination.ser(&mut writer)?;
            }
            Message::AvatarChunk { id, offset, pixels } => {
                writer.write_i32(*id);
                writer.write_i32(*offset);
                writer.write_bytes_and_size(&crunch(pixels)?)?;
            }
            Message::Chat { id, text } => {
                writer.write_i32(*id);
                writer.write_string(text)?;
            }
            Message::SetTile { location, tile } => {
                writer.write_i32(*location);
                writer.write_u8(*tile);
            }
            Message::SetWall { tile, is_wall } => {
                writer.write_u8(*tile);
                writer.write_bool(*is_wall);
            }
            Message::LockTile { owner, tile } => {
                writer.write_i32(owner.unwrap_or(-1));
                writer.write_u8(*tile);
            }
        }

        Ok(writer.to_bytes())
    }

    /// Decodes one message, validating every range-limited field
    pub fn decode(payload: &[u8]) -> Result<Self, MessageError> {
        let mut reader = ByteReader::new(payload);
        let tag = reader.read_i32()?;
        let kind = MessageKind::from_tag(tag).ok_or(MessageError::UnknownTag { tag })?;

        let message = match kind {
            MessageKind::Tileset => Message::Tileset {
                id: reader.read_i32()?,
                pixels: reader.read_bytes_and_size()?,
            },
            MessageKind::Tilemap => {
                let tiles = reader.read_bytes_and_size()?;
                check_length("tiles", &tiles, MAP_CELLS)?;
                check_values("tiles", &tiles, MAX_TILES)?;
                Message::Tilemap { tiles }
            }
            MessageKind::Walls => {
                let walls = reader.read_bytes_and_size()?;
                check_values("walls", &walls, MAX_TILES)?;
                Message::Walls { walls }
            }
            MessageKind::Palette => {
                let mut colors = [Color32::TRANSPARENT; PALETTE_SIZE];
                for color in colors.iter_mut() {
                    *color = Color32::de(&mut reader)?;
                }
                Message::Palette {
                    palette: Palette::new(colors),
                }
            }
            MessageKind::TileImage => {
                let tile = read_tile(&mut reader)?;
                let pixels = reader.read_bytes_and_size()?;
                check_length("pixels", &pixels, TILE_PIXELS)?;
                check_values("pixels", &pixels, PALETTE_SIZE)?;
                Message::TileImage { tile, pixels }
            }
            MessageKind::TileChunk => Message::TileChunk {
                tile: read_tile(&mut reader)?,
                offset: reader.read_i32()?,
                pixels: uncrunch(&reader.read_bytes_and_size()?),
            },
            MessageKind::TileStroke => Message::TileStroke {
                tile: read_tile(&mut reader)?,
                stroke: Stroke::unpack(reader.read_u32()?)?,
            },
            MessageKind::ReplicateAvatar => Message::ReplicateAvatar {
                id: reader.read_i32()?,
                destination: GridPos::de(&mut reader)?,
                source: GridPos::de(&mut reader)?,
            },
            MessageKind::DestroyAvatar => Message::DestroyAvatar {
                id: reader.read_i32()?,
            },
            MessageKind::MoveAvatar => Message::MoveAvatar {
                id: reader.read_i32()?,
                destination: GridPos::de(&mut reader)?,
            },
            MessageKind::GiveAvatar => Message::GiveAvatar {
                id: reader.read_i32()?,
            },
            MessageKind::AvatarChunk => Message::AvatarChunk {
                id: reader.read_i32()?,
                offset: reader.read_i32()?,
                pixels: uncrunch(&reader.read_bytes_and_size()?),
            },
            MessageKind::Chat => Message::Chat {
                id: reader.read_i32()?,
                text: reader.read_string()?,
            },
            MessageKind::SetTile => {
                let location = reader.read_i32()?;
                if !(0..MAP_CELLS as i32).contains(&location) {
                    return Err(MessageError::FieldOutOfRange {
                        field: "location",
                        value: i64::from(location),
                    });
                }
                Message::SetTile {
                    location,
                    tile: read_tile(&mut reader)?,
                }
            }
            MessageKind::SetWall => Message::SetWall {
                tile: read_tile(&mut reader)?,
                is_wall: reader.read_bool()?,
            },
            MessageKind::LockTile => {
                let owner = match reader.read_i32()? {
                    -1 => None,
                    id if id >= 0 => Some(id),
                    id => {
                        return Err(MessageError::FieldOutOfRange {
                            field: "owner",
                            value: i64::from(id),
                        })
                    }
                };
                Message::LockTile {
                    owner,
                    tile: read_tile(&mut reader)?,
                }
            }
        };

        if !reader.is_empty() {
            return Err(MessageError::TrailingBytes {
                kind: kind.name(),
                remaining: reader.remaining(),
            });
        }

        Ok(message)
    }
}

fn read_tile(reader: &mut ByteReader) -> Result<TileId, MessageError> {
    let tile = reader.read_u8()?;
    if usize::from(tile) >= MAX_TILES {
        return Err(MessageError::FieldOutOfRange {
            field: "tile",
            value: i64::from(tile),
        });
    }
    Ok(tile)
}

fn check_length(field: &'static str, values: &[u8], expected: usize) -> Result<(), MessageError> {
    if values.len() != expected {
        return Err(MessageError::InvalidLength {
            field,
            expected,
            found: values.len(),
        });
    }
    Ok(())
}

fn check_values(field: &'static str, values: &[u8], limit: usize) -> Result<(), MessageError> {
    match values.iter().find(|&&value| usize::from(value) >= limit) {
        Some(&value) => Err(MessageError::FieldOutOfRange {
            field,
            value: i64::from(value),
        }),
        None => Ok(()),
    }
}

impl Serde for GridPos {
    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
        writer.write_i32(self.x);
        writer.write_i32(self.y);
        Ok(())
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(GridPos::new(reader.read_i32()?, reader.read_i32()?))
    }
}

impl Serde for Color32 {
    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
        writer.write_raw(&[self.r, self.g, self.b, self.a]);
        Ok(())
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Color32::new(
            reader.read_u8()?,
            reader.read_u8()?,
            reader.read_u8()?,
            reader.read_u8()?,
        ))
    }
}
