use std::collections::{BTreeSet, VecDeque};

use log::{error, info, warn};

use crate::{
    config::SessionConfig,
    events::SessionEvents,
    locks::LockMap,
    messages::{Message, MessageError, MessageKind},
    outbound::{OutboundQueue, Outgoing},
    types::{AvatarId, ConnectionId, TileId},
    world::World,
};

/// All mutable state of one session, owned by the session loop and handed
/// to whichever [`crate::Authority`] is handling the current event.
pub struct SessionContext {
    world: World,
    locks: LockMap,
    config: SessionConfig,
    connections: Vec<ConnectionId>,
    local_avatar: Option<AvatarId>,
    edit_sessions: BTreeSet<TileId>,
    chat_log: VecDeque<(AvatarId, String)>,
    outbound: OutboundQueue,
    events: SessionEvents,
    pending_disconnects: Vec<ConnectionId>,
    dropped_lookups: u64,
    ended: bool,
}

impl SessionContext {
    pub fn new(world: World, config: SessionConfig) -> Self {
        Self {
            world,
            locks: LockMap::new(),
            config,
            connections: Vec::new(),
            local_avatar: None,
            edit_sessions: BTreeSet::new(),
            chat_log: VecDeque::new(),
            outbound: OutboundQueue::new(),
            events: SessionEvents::new(),
            pending_disconnects: Vec::new(),
            dropped_lookups: 0,
            ended: false,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn locks(&self) -> &LockMap {
        &self.locks
    }

    pub fn locks_mut(&mut self) -> &mut LockMap {
        &mut self.locks
    }

    // Connections

    pub fn connections(&self) -> &[ConnectionId] {
        &self.connections
    }

    pub fn is_connected(&self, connection: ConnectionId) -> bool {
        self.connections.contains(&connection)
    }

    /// Returns `false` if the connection was already known
    pub fn add_connection(&mut self, connection: ConnectionId) -> bool {
        if self.is_connected(connection) {
            return false;
        }
        self.connections.push(connection);
        self.events.push_connection(connection);
        true
    }

    /// Returns `false` if the connection was not known
    pub fn remove_connection(&mut self, connection: ConnectionId) -> bool {
        let Some(index) = self.connections.iter().position(|&c| c == connection) else {
            return false;
        };
        self.connections.remove(index);
        self.events.push_disconnection(connection);
        true
    }

    /// Asks the transport to drop a connection on the next flush
    pub fn request_disconnect(&mut self, connection: ConnectionId) {
        self.pending_disconnects.push(connection);
    }

    pub fn take_disconnects(&mut self) -> Vec<ConnectionId> {
        std::mem::take(&mut self.pending_disconnects)
    }

    // Local avatar & edit sessions

    pub fn local_avatar(&self) -> Option<AvatarId> {
        self.local_avatar
    }

    pub fn set_local_avatar(&mut self, avatar: Option<AvatarId>) {
        self.local_avatar = avatar;
    }

    pub fn is_editing(&self, tile: TileId) -> bool {
        self.edit_sessions.contains(&tile)
    }

    pub fn edit_sessions(&self) -> impl Iterator<Item = TileId> + '_ {
        self.edit_sessions.iter().copied()
    }

    pub fn open_edit(&mut self, tile: TileId) {
        if self.edit_sessions.insert(tile) {
            info!("Edit session opened on tile {}", tile);
            self.events.push_edit_opened(tile);
        }
    }

    pub fn close_edit(&mut self, tile: TileId) {
        if self.edit_sessions.remove(&tile) {
            info!("Edit session closed on tile {}", tile);
            self.events.push_edit_closed(tile);
        }
    }

    // Chat

    pub fn chat_log(&self) -> impl Iterator<Item = &(AvatarId, String)> {
        self.chat_log.iter()
    }

    pub fn push_chat(&mut self, id: AvatarId, text: impl Into<String>) {
        let text = text.into();
        if self.config.chat_history == 0 {
            self.events.push_chat(id, text);
            return;
        }
        while self.chat_log.len() >= self.config.chat_history {
            self.chat_log.pop_front();
        }
        self.chat_log.push_back((id, text.clone()));
        self.events.push_chat(id, text);
    }

    // Notifications

    pub fn notify(&mut self, text: impl Into<String>) {
        self.events.push_notification(text.into());
    }

    pub fn end_session(&mut self) {
        if !self.ended {
            self.ended = true;
            self.events.push_session_ended();
        }
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn take_events(&mut self) -> SessionEvents {
        std::mem::take(&mut self.events)
    }

    pub fn record_dropped_lookup(&mut self, id: AvatarId, kind: MessageKind, origin: ConnectionId) {
        self.dropped_lookups += 1;
        warn!(
            "Dropped {} from connection {}: avatar {} not found",
            kind.name(),
            origin,
            id
        );
    }

    pub fn dropped_lookups(&self) -> u64 {
        self.dropped_lookups
    }

    // Outbound

    /// Queues `message` for one connection
    pub fn send_to(&mut self, connection: ConnectionId, message: &Message) -> Result<(), MessageError> {
        self.enqueue(vec![connection], message)
    }

    /// Queues `message` for every connection except `except`. On a peer the
    /// only connection is the host, which fans it out.
    pub fn send_all(&mut self, message: &Message, except: Option<ConnectionId>) -> Result<(), MessageError> {
        let targets = self
            .connections
            .iter()
            .copied()
            .filter(|&connection| Some(connection) != except)
            .collect();
        self.enqueue(targets, message)
    }

    pub fn send_all_batch(
        &mut self,
        messages: &[Message],
        except: Option<ConnectionId>,
    ) -> Result<(), MessageError> {
        for message in messages {
            self.send_all(message, except)?;
        }
        Ok(())
    }

    fn enqueue(&mut self, targets: Vec<ConnectionId>, message: &Message) -> Result<(), MessageError> {
        if targets.is_empty() {
            return Ok(());
        }
        let payload = message.encode().map_err(|error| {
            error!("Failed to encode {}: {}", message.kind().name(), error);
            error
        })?;
        self.outbound.push(Outgoing::new(
            targets,
            message.channel(),
            payload.into_boxed_slice(),
        ));
        Ok(())
    }

    pub fn outbound(&self) -> &OutboundQueue {
        &self.outbound
    }

    pub fn outbound_mut(&mut self) -> &mut OutboundQueue {
        &mut self.outbound
    }
}
