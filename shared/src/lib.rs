//! # Tilesync Shared
//! World state, wire messages and the role-agnostic session shared between
//! tilesync hosts & peers.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

pub use tilesync_serde::{
    crunch, pack_bits, uncrunch, unpack_bits, BitPackError, BitPacker, BitUnpacker, ByteReader,
    NibbleError, Serde, SerdeErr, StreamWriter,
};

mod asset;
mod color;
mod config;
mod constants;
mod events;
mod locks;
mod messages;
mod session;
mod stroke;
mod types;

pub mod movement;
pub mod outbound;
pub mod replication;
pub mod transport;
pub mod world;

cfg_if! {
    if #[cfg(feature = "runtime")] {
        mod runtime;
        pub use runtime::run;
    }
}

pub use asset::{AssetError, AvatarAsset, AVATAR_MAGIC};
pub use color::{Color32, Palette};
pub use config::SessionConfig;
pub use constants::*;
pub use events::{
    ChatEvent, ConnectEvent, DisconnectEvent, EditClosedEvent, EditOpenedEvent,
    NotificationEvent, SessionEndedEvent, SessionEvent, SessionEvents,
};
pub use locks::{LockError, LockMap};
pub use messages::{Message, MessageError, MessageKind};
pub use session::{Authority, DispatchError, Session, SessionContext};
pub use stroke::Stroke;
pub use types::{AvatarId, ChannelKind, ConnectionId, Role, TileId, HOST_AVATAR_ID};
pub use world::{Avatar, Bitmap, Direction, GridPos, WallSet, World, WorldError};
