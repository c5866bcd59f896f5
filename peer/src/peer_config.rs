use tilesync_shared::SessionConfig;

/// Contains Config properties which will be used by a Peer
#[derive(Clone, Debug, Default)]
pub struct PeerConfig {
    /// Tick, chunking and queue settings. Should match the host's
    pub session: SessionConfig,
}
