//! # Tilesync Peer
//! The mirroring side of a tilesync session: applies host-broadcast state and
//! forwards local edits, moves and lock requests to the host.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

mod peer;
mod peer_config;

pub use peer::Peer;
pub use peer_config::PeerConfig;
