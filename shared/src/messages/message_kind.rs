use crate::types::ChannelKind;

/// The leading type tag of every message. Tags are the declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    Tileset,
    Tilemap,
    Walls,
    Palette,
    TileImage,
    TileChunk,
    TileStroke,
    ReplicateAvatar,
    DestroyAvatar,
    MoveAvatar,
    GiveAvatar,
    AvatarChunk,
    Chat,
    SetTile,
    SetWall,
    LockTile,
}

impl MessageKind {
    pub const ALL: [MessageKind; 16] = [
        MessageKind::Tileset,
        MessageKind::Tilemap,
        MessageKind::Walls,
        MessageKind::Palette,
        MessageKind::TileImage,
        MessageKind::TileChunk,
        MessageKind::TileStroke,
        MessageKind::ReplicateAvatar,
        MessageKind::DestroyAvatar,
        MessageKind::MoveAvatar,
        MessageKind::GiveAvatar,
        MessageKind::AvatarChunk,
        MessageKind::Chat,
        MessageKind::SetTile,
        MessageKind::SetWall,
        MessageKind::LockTile,
    ];

    pub fn tag(self) -> i32 {
        self as i32
    }

    pub fn from_tag(tag: i32) -> Option<Self> {
        usize::try_from(tag)
            .ok()
            .and_then(|index| Self::ALL.get(index))
            .copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageKind::Tileset => "Tileset",
            MessageKind::Tilemap => "Tilemap",
            MessageKind::Walls => "Walls",
            MessageKind::Palette => "Palette",
            MessageKind::TileImage => "TileImage",
            MessageKind::TileChunk => "TileChunk",
            MessageKind::TileStroke => "TileStroke",
            MessageKind::ReplicateAvatar => "ReplicateAvatar",
            MessageKind::DestroyAvatar => "DestroyAvatar",
            MessageKind::MoveAvatar => "MoveAvatar",
            MessageKind::GiveAvatar => "GiveAvatar",
            MessageKind::AvatarChunk => "AvatarChunk",
            MessageKind::Chat => "Chat",
            MessageKind::SetTile => "SetTile",
            MessageKind::SetWall => "SetWall",
            MessageKind::LockTile => "LockTile",
        }
    }

    /// Snapshot-only bulk payloads go on the reliable channel so they never
    /// hold up gameplay. Tile edits stay on the sequenced channel with the
    /// `LockTile` that gates them, so a release never overtakes its edits.
    pub fn channel(self) -> ChannelKind {
        match self {
            MessageKind::Tilemap
            | MessageKind::Palette
            | MessageKind::Walls
            | MessageKind::Tileset => ChannelKind::Reliable,
            _ => ChannelKind::ReliableSequenced,
        }
    }

    /// Kinds only the host may originate
    pub fn is_host_only(self) -> bool {
        matches!(
            self,
            MessageKind::Tileset
                | MessageKind::Tilemap
                | MessageKind::Walls
                | MessageKind::Palette
                | MessageKind::ReplicateAvatar
                | MessageKind::DestroyAvatar
                | MessageKind::GiveAvatar
        )
    }
}
