//! In-memory transport for end-to-end tests.
//! Routes payloads between one host and any number of peers without network I/O.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
};

use tilesync_shared::{
    transport::{
        PacketReceiver, PacketSender, RecvError, SendError, Socket, SocketError, SocketHalves,
        TransportEvent,
    },
    ChannelKind, ConnectionId,
};

/// The id peers see the host under
pub const HOST_CONNECTION: ConnectionId = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Host,
    Peer(ConnectionId),
}

#[derive(Default)]
struct Inbox {
    closed: bool,
    control: VecDeque<TransportEvent>,
    channels: [VecDeque<TransportEvent>; 3],
    receive_errors: VecDeque<RecvError>,
}

impl Inbox {
    /// Connects and disconnects first, then channels in priority order.
    /// Within a channel payloads keep their send order; across channels they do not.
    fn pop(&mut self) -> Result<Option<TransportEvent>, RecvError> {
        if let Some(error) = self.receive_errors.pop_front() {
            return Err(error);
        }
        if let Some(event) = self.control.pop_front() {
            return Ok(Some(event));
        }
        Ok(self
            .channels
            .iter_mut()
            .find_map(|channel| channel.pop_front()))
    }

    fn is_empty(&self) -> bool {
        self.control.is_empty() && self.channels.iter().all(VecDeque::is_empty)
    }
}

#[derive(Default)]
struct HubState {
    next_connection: ConnectionId,
    listening: bool,
    inboxes: HashMap<Endpoint, Inbox>,
    failures: HashMap<Endpoint, VecDeque<SendError>>,
    sent: HashMap<Endpoint, usize>,
}

impl HubState {
    fn inbox(&mut self, endpoint: Endpoint) -> &mut Inbox {
        self.inboxes.entry(endpoint).or_default()
    }

    fn is_connected(&self, connection: ConnectionId) -> bool {
        self.inboxes
            .get(&Endpoint::Peer(connection))
            .is_some_and(|inbox| !inbox.closed)
    }

    fn deliver(
        &mut self,
        to: Endpoint,
        from: ConnectionId,
        channel: ChannelKind,
        payload: &[u8],
    ) -> Result<(), SendError> {
        if let Some(error) = self.failures.get_mut(&to).and_then(VecDeque::pop_front) {
            return Err(error);
        }
        *self.sent.entry(to).or_default() += 1;

        let event = TransportEvent::Data {
            connection: from,
            channel,
            payload: payload.into(),
        };
        self.inbox(to).channels[usize::from(channel.index())].push_back(event);
        Ok(())
    }

    fn drop_peer(&mut self, connection: ConnectionId) {
        if !self.is_connected(connection) {
            return;
        }
        let inbox = self.inbox(Endpoint::Peer(connection));
        inbox.closed = true;
        inbox.control.push_back(TransportEvent::Disconnect(HOST_CONNECTION));
        self.inbox(Endpoint::Host)
            .control
            .push_back(TransportEvent::Disconnect(connection));
    }
}

/// Shared switchboard between a host socket and its peer sockets
#[derive(Clone, Default)]
pub struct LocalHub {
    state: Arc<Mutex<HubState>>,
}

impl LocalHub {
    pub fn new() -> Self {
        let hub = Self::default();
        hub.lock().next_connection = 1;
        hub
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        self.state.lock().expect("hub state poisoned")
    }

    pub fn host_socket(&self) -> LocalHostSocket {
        LocalHostSocket { hub: self.clone() }
    }

    /// A socket for a new peer, with the connection id the host will see
    pub fn peer_socket(&self) -> LocalPeerSocket {
        let mut state = self.lock();
        let connection = state.next_connection;
        state.next_connection += 1;
        LocalPeerSocket {
            hub: self.clone(),
            connection,
        }
    }

    /// The next sends towards `endpoint` fail with `errors`, in order
    pub fn inject_send_failures(&self, endpoint: Endpoint, errors: impl IntoIterator<Item = SendError>) {
        self.lock()
            .failures
            .entry(endpoint)
            .or_default()
            .extend(errors);
    }

    /// The next poll on `endpoint` fails with `error`
    pub fn inject_receive_error(&self, endpoint: Endpoint, error: RecvError) {
        self.lock().inbox(endpoint).receive_errors.push_back(error);
    }

    /// Simulates a peer dropping off the network
    pub fn drop_peer(&self, connection: ConnectionId) {
        self.lock().drop_peer(connection);
    }

    /// Payloads successfully delivered towards `endpoint`
    pub fn delivered_to(&self, endpoint: Endpoint) -> usize {
        self.lock().sent.get(&endpoint).copied().unwrap_or(0)
    }

    /// `true` when nothing is waiting to be received anywhere
    pub fn is_idle(&self) -> bool {
        self.lock().inboxes.values().all(Inbox::is_empty)
    }
}

// Host side

pub struct LocalHostSocket {
    hub: LocalHub,
}

impl Socket for LocalHostSocket {
    fn listen(self: Box<Self>, port: u16) -> Result<SocketHalves, SocketError> {
        let mut state = self.hub.lock();
        if state.listening {
            return Err(SocketError::ListenFailed { port, code: -1 });
        }
        state.listening = true;
        state.inbox(Endpoint::Host);
        drop(state);

        Ok((
            Box::new(LocalHostSender {
                hub: self.hub.clone(),
            }),
            Box::new(LocalReceiver {
                hub: self.hub,
                endpoint: Endpoint::Host,
            }),
        ))
    }

    fn connect(self: Box<Self>) -> Result<SocketHalves, SocketError> {
        Err(SocketError::Unsupported {
            operation: "connect",
        })
    }
}

struct LocalHostSender {
    hub: LocalHub,
}

impl PacketSender for LocalHostSender {
    fn send(
        &self,
        connection: ConnectionId,
        channel: ChannelKind,
        payload: &[u8],
    ) -> Result<(), SendError> {
        let mut state = self.hub.lock();
        if !state.is_connected(connection) {
            return Err(SendError::WrongConnection { connection });
        }
        state.deliver(Endpoint::Peer(connection), HOST_CONNECTION, channel, payload)
    }

    fn disconnect(&self, connection: ConnectionId) {
        self.hub.lock().drop_peer(connection);
    }
}

// Peer side

pub struct LocalPeerSocket {
    hub: LocalHub,
    connection: ConnectionId,
}

impl LocalPeerSocket {
    /// The id the host sees this peer under
    pub fn connection(&self) -> ConnectionId {
        self.connection
    }
}

impl Socket for LocalPeerSocket {
    fn listen(self: Box<Self>, _port: u16) -> Result<SocketHalves, SocketError> {
        Err(SocketError::Unsupported {
            operation: "listen",
        })
    }

    fn connect(self: Box<Self>) -> Result<SocketHalves, SocketError> {
        let mut state = self.hub.lock();
        if !state.listening {
            return Err(SocketError::ConnectFailed { code: -1 });
        }
        state
            .inbox(Endpoint::Peer(self.connection))
            .control
            .push_back(TransportEvent::Connect(HOST_CONNECTION));
        state
            .inbox(Endpoint::Host)
            .control
            .push_back(TransportEvent::Connect(self.connection));
        drop(state);

        Ok((
            Box::new(LocalPeerSender {
                hub: self.hub.clone(),
                connection: self.connection,
            }),
            Box::new(LocalReceiver {
                hub: self.hub,
                endpoint: Endpoint::Peer(self.connection),
            }),
        ))
    }
}

struct LocalPeerSender {
    hub: LocalHub,
    connection: ConnectionId,
}

impl PacketSender for LocalPeerSender {
    fn send(
        &self,
        connection: ConnectionId,
        channel: ChannelKind,
        payload: &[u8],
    ) -> Result<(), SendError> {
        let mut state = self.hub.lock();
        if connection != HOST_CONNECTION || !state.is_connected(self.connection) {
            return Err(SendError::WrongConnection { connection });
        }
        state.deliver(Endpoint::Host, self.connection, channel, payload)
    }

    fn disconnect(&self, _connection: ConnectionId) {
        self.hub.lock().drop_peer(self.connection);
    }
}

struct LocalReceiver {
    hub: LocalHub,
    endpoint: Endpoint,
}

impl PacketReceiver for LocalReceiver {
    fn receive(&mut self) -> Result<Option<TransportEvent>, RecvError> {
        let mut state = self.hub.lock();
        match state.inboxes.get_mut(&self.endpoint) {
            Some(inbox) => inbox.pop(),
            None => Ok(None),
        }
    }
}
