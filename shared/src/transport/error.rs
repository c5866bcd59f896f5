use thiserror::Error;

use crate::types::ConnectionId;

/// Errors that can occur while sending a payload to one connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// The transport could not take the payload right now; retry later
    #[error("Transient send failure (code {code}). The same payload should be retried")]
    Transient {
        code: i32,
    },

    /// The connection is stale or was never valid
    #[error("Connection {connection} is not valid. Delivery to it is abandoned")]
    WrongConnection {
        connection: ConnectionId,
    },

    /// Any other failure; delivery to this connection is abandoned
    #[error("Fatal send failure (code {code})")]
    Fatal {
        code: i32,
    },
}

impl SendError {
    pub fn is_transient(&self) -> bool {
        matches!(self, SendError::Transient { .. })
    }
}

/// The transport failed while polling for events
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Transport receive failure (code {code})")]
pub struct RecvError {
    pub code: i32,
}

/// Errors that can occur while opening a socket
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SocketError {
    /// Could not start accepting peers
    #[error("Failed to listen on port {port} (code {code})")]
    ListenFailed {
        port: u16,
        code: i32,
    },

    /// Could not reach the host
    #[error("Failed to connect to host (code {code})")]
    ConnectFailed {
        code: i32,
    },

    /// This socket only supports the other side of the connection
    #[error("Socket does not support '{operation}'")]
    Unsupported {
        operation: &'static str,
    },
}
