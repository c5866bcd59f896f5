use std::default::Default;

use tilesync_shared::SessionConfig;

/// Contains Config properties which will be used by the Host
#[derive(Clone, Debug)]
pub struct HostConfig {
    /// Port the host listens on
    pub port: u16,
    /// Peers accepted at once; further connections are refused
    pub max_connections: usize,
    /// Determines whether the world starts from random tiles and walls
    /// instead of an empty tilemap.
    pub randomize_world: bool,
    /// Tick, chunking and queue settings shared with peers
    pub session: SessionConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            port: 9001,
            max_connections: 8,
            randomize_world: true,
            session: SessionConfig::default(),
        }
    }
}
