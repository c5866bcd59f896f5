//! # Tilesync Host
//! The authoritative side of a tilesync session: arbitrates tile locks,
//! validates movement and fans edits out to every connected peer.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

mod host;
mod host_config;
mod world_gen;

pub use host::Host;
pub use host_config::HostConfig;
pub use world_gen::{random_world, random_world_with, GENERATED_TILE_TYPES};
