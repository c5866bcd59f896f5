pub type ConnectionId = i32;
pub type AvatarId = i32;
pub type TileId = u8;

/// The host's own avatar always has this id
pub const HOST_AVATAR_ID: AvatarId = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Host,
    Peer,
}

impl Role {
    pub fn is_host(self) -> bool {
        self == Role::Host
    }
}

/// Transport channel a message travels on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelKind {
    /// Gameplay and chat traffic, delivered in order
    ReliableSequenced,
    /// Bulk snapshot and bitmap traffic
    Reliable,
    Unreliable,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 3] = [
        ChannelKind::ReliableSequenced,
        ChannelKind::Reliable,
        ChannelKind::Unreliable,
    ];

    pub fn index(self) -> u8 {
        match self {
            ChannelKind::ReliableSequenced => 0,
            ChannelKind::Reliable => 1,
            ChannelKind::Unreliable => 2,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }
}
