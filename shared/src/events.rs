use std::{mem, vec::IntoIter};

use crate::types::{AvatarId, ConnectionId, TileId};

/// Everything that happened in a session since the events were last taken.
/// Read a kind at a time with [`SessionEvents::read`].
#[derive(Debug)]
pub struct SessionEvents {
    connections: Vec<ConnectionId>,
    disconnections: Vec<ConnectionId>,
    chats: Vec<(AvatarId, String)>,
    edits_opened: Vec<TileId>,
    edits_closed: Vec<TileId>,
    notifications: Vec<String>,
    session_ended: bool,
    empty: bool,
}

impl SessionEvents {
    pub fn new() -> Self {
        Self {
            connections: Vec::new(),
            disconnections: Vec::new(),
            chats: Vec::new(),
            edits_opened: Vec::new(),
            edits_closed: Vec::new(),
            notifications: Vec::new(),
            session_ended: false,
            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: SessionEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: SessionEvent>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_connection(&mut self, connection: ConnectionId) {
        self.connections.push(connection);
        self.empty = false;
    }

    pub(crate) fn push_disconnection(&mut self, connection: ConnectionId) {
        self.disconnections.push(connection);
        self.empty = false;
    }

    pub(crate) fn push_chat(&mut self, id: AvatarId, text: String) {
        self.chats.push((id, text));
        self.empty = false;
    }

    pub(crate) fn push_edit_opened(&mut self, tile: TileId) {
        self.edits_opened.push(tile);
        self.empty = false;
    }

    pub(crate) fn push_edit_closed(&mut self, tile: TileId) {
        self.edits_closed.push(tile);
        self.empty = false;
    }

    pub(crate) fn push_notification(&mut self, text: String) {
        self.notifications.push(text);
        self.empty = false;
    }

    pub(crate) fn push_session_ended(&mut self) {
        self.session_ended = true;
        self.empty = false;
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

// Event Trait
pub trait SessionEvent {
    type Iter;

    fn iter(events: &mut SessionEvents) -> Self::Iter;

    fn has(events: &SessionEvents) -> bool;
}

// ConnectEvent
pub struct ConnectEvent;
impl SessionEvent for ConnectEvent {
    type Iter = IntoIter<ConnectionId>;

    fn iter(events: &mut SessionEvents) -> Self::Iter {
        mem::take(&mut events.connections).into_iter()
    }

    fn has(events: &SessionEvents) -> bool {
        !events.connections.is_empty()
    }
}

// DisconnectEvent
pub struct DisconnectEvent;
impl SessionEvent for DisconnectEvent {
    type Iter = IntoIter<ConnectionId>;

    fn iter(events: &mut SessionEvents) -> Self::Iter {
        mem::take(&mut events.disconnections).into_iter()
    }

    fn has(events: &SessionEvents) -> bool {
        !events.disconnections.is_empty()
    }
}

// ChatEvent
pub struct ChatEvent;
impl SessionEvent for ChatEvent {
    type Iter = IntoIter<(AvatarId, String)>;

    fn iter(events: &mut SessionEvents) -> Self::Iter {
        mem::take(&mut events.chats).into_iter()
    }

    fn has(events: &SessionEvents) -> bool {
        !events.chats.is_empty()
    }
}

// EditOpenedEvent
pub struct EditOpenedEvent;
impl SessionEvent for EditOpenedEvent {
    type Iter = IntoIter<TileId>;

    fn iter(events: &mut SessionEvents) -> Self::Iter {
        mem::take(&mut events.edits_opened).into_iter()
    }

    fn has(events: &SessionEvents) -> bool {
        !events.edits_opened.is_empty()
    }
}

// EditClosedEvent
pub struct EditClosedEvent;
impl SessionEvent for EditClosedEvent {
    type Iter = IntoIter<TileId>;

    fn iter(events: &mut SessionEvents) -> Self::Iter {
        mem::take(&mut events.edits_closed).into_iter()
    }

    fn has(events: &SessionEvents) -> bool {
        !events.edits_closed.is_empty()
    }
}

// NotificationEvent
pub struct NotificationEvent;
impl SessionEvent for NotificationEvent {
    type Iter = IntoIter<String>;

    fn iter(events: &mut SessionEvents) -> Self::Iter {
        mem::take(&mut events.notifications).into_iter()
    }

    fn has(events: &SessionEvents) -> bool {
        !events.notifications.is_empty()
    }
}

// SessionEndedEvent
pub struct SessionEndedEvent;
impl SessionEvent for SessionEndedEvent {
    type Iter = std::option::IntoIter<()>;

    fn iter(events: &mut SessionEvents) -> Self::Iter {
        mem::take(&mut events.session_ended).then_some(()).into_iter()
    }

    fn has(events: &SessionEvents) -> bool {
        events.session_ended
    }
}
