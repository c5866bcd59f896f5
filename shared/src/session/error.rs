use thiserror::Error;

use crate::{messages::MessageError, types::ConnectionId, world::WorldError};

/// Errors that can occur while handling a message, inbound or local
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The payload could not be decoded, or a message could not be encoded
    #[error("Message error: {0}")]
    Message(#[from] MessageError),

    /// The message referenced state the world does not have
    #[error("World error: {0}")]
    World(#[from] WorldError),

    /// The sender is not allowed to do this. Discarded without penalty
    #[error("Protocol violation from connection {origin}: {kind} {reason}")]
    Violation {
        origin: ConnectionId,
        kind: &'static str,
        reason: &'static str,
    },
}

impl DispatchError {
    pub fn violation(origin: ConnectionId, kind: &'static str, reason: &'static str) -> Self {
        DispatchError::Violation {
            origin,
            kind,
            reason,
        }
    }
}
