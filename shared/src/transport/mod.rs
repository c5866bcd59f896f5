mod error;

pub use error::{RecvError, SendError, SocketError};

use crate::types::{ChannelKind, ConnectionId};

/// Something that happened on the transport since the last poll
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    Connect(ConnectionId),
    Disconnect(ConnectionId),
    Data {
        connection: ConnectionId,
        channel: ChannelKind,
        payload: Box<[u8]>,
    },
}

pub type SocketHalves = (Box<dyn PacketSender>, Box<dyn PacketReceiver>);

pub trait Socket {
    /// Starts accepting peers on `port`
    fn listen(self: Box<Self>, port: u16) -> Result<SocketHalves, SocketError>;
    /// Connects to a listening host
    fn connect(self: Box<Self>) -> Result<SocketHalves, SocketError>;
}

pub trait PacketSender: Send + Sync {
    /// Sends a payload to one connection on the given channel
    fn send(
        &self,
        connection: ConnectionId,
        channel: ChannelKind,
        payload: &[u8],
    ) -> Result<(), SendError>;
    /// Drops a connection
    fn disconnect(&self, connection: ConnectionId);
}

pub trait PacketReceiver: Send {
    /// Polls for the next event, `None` when nothing is pending
    fn receive(&mut self) -> Result<Option<TransportEvent>, RecvError>;
}
