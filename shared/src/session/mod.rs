mod authority;
mod context;
mod error;

pub use authority::Authority;
pub use context::SessionContext;
pub use error::DispatchError;

use log::{debug, error, info, warn};
use tilesync_serde::NibbleError;

use crate::{
    color::Color32,
    config::SessionConfig,
    events::SessionEvents,
    locks::LockMap,
    messages::{Message, MessageError},
    movement::{advance_all, try_step},
    outbound::{OutboundQueue, Outgoing},
    replication::{apply_tile_chunk, tile_chunk_messages},
    stroke::Stroke,
    transport::{RecvError, TransportEvent},
    types::{AvatarId, ConnectionId, Role, TileId},
    world::{Direction, GridPos, World, WorldError},
};

/// One participant's view of a tilesync session.
///
/// Everything role-agnostic lives here: decoding inbound payloads, local
/// edits, movement and the outbound queue. What differs between host and
/// peer is delegated to the [`Authority`].
pub struct Session<A: Authority> {
    context: SessionContext,
    authority: A,
}

impl<A: Authority> Session<A> {
    /// Creates a session over `world` and lets the authority set it up
    pub fn new(mut authority: A, world: World, config: SessionConfig) -> Self {
        let mut context = SessionContext::new(world, config);
        authority.start(&mut context);
        info!("{:?} session started", authority.role());

        Self { context, authority }
    }

    pub fn role(&self) -> Role {
        self.authority.role()
    }

    pub fn authority(&self) -> &A {
        &self.authority
    }

    pub fn authority_mut(&mut self) -> &mut A {
        &mut self.authority
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SessionContext {
        &mut self.context
    }

    pub fn world(&self) -> &World {
        self.context.world()
    }

    pub fn locks(&self) -> &LockMap {
        self.context.locks()
    }

    pub fn config(&self) -> &SessionConfig {
        self.context.config()
    }

    pub fn local_avatar(&self) -> Option<AvatarId> {
        self.context.local_avatar()
    }

    pub fn is_editing(&self, tile: TileId) -> bool {
        self.context.is_editing(tile)
    }

    pub fn is_ended(&self) -> bool {
        self.context.is_ended()
    }

    /// Number of inbound messages dropped because they named an unknown avatar
    pub fn dropped_lookups(&self) -> u64 {
        self.context.dropped_lookups()
    }

    pub fn chat_log(&self) -> impl Iterator<Item = &(AvatarId, String)> {
        self.context.chat_log()
    }

    // Inbound

    /// Feeds one transport event into the session
    pub fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connect(connection) => {
                info!("Connection {} established", connection);
                self.authority.connected(&mut self.context, connection);
            }
            TransportEvent::Disconnect(connection) => {
                info!("Connection {} lost", connection);
                self.authority.disconnected(&mut self.context, connection);
            }
            TransportEvent::Data {
                connection,
                payload,
                ..
            } => {
                self.receive_payload(connection, &payload);
            }
        }
    }

    /// Decodes and dispatches one payload. Failures are logged and the
    /// message is dropped; they never end the session.
    pub fn receive_payload(&mut self, origin: ConnectionId, payload: &[u8]) {
        let message = match Message::decode(payload) {
            Ok(message) => message,
            Err(error) => {
                warn!("Discarding undecodable payload from connection {}: {}", origin, error);
                return;
            }
        };

        let kind = message.kind();
        match self.authority.receive(&mut self.context, origin, message) {
            Ok(()) => {}
            Err(DispatchError::World(WorldError::AvatarNotFound { id })) => {
                self.context.record_dropped_lookup(id, kind, origin);
            }
            Err(error @ DispatchError::Violation { .. }) => {
                debug!("{}", error);
            }
            Err(error) => {
                warn!(
                    "Dropped {} from connection {}: {}",
                    kind.name(),
                    origin,
                    error
                );
            }
        }
    }

    /// Surfaces a transport receive failure to the embedding application
    pub fn notify_receive_error(&mut self, error: RecvError) {
        error!("{}", error);
        self.context.notify(format!("Network error: {}", error.code));
    }

    // Locks

    pub fn request_lock(&mut self, tile: TileId) -> Result<(), DispatchError> {
        self.authority.request_lock(&mut self.context, tile)
    }

    pub fn release_lock(&mut self, tile: TileId) -> Result<(), DispatchError> {
        self.authority.release_lock(&mut self.context, tile)
    }

    // Drawing

    /// Draws `stroke` on a tile this participant is editing, then broadcasts it.
    /// Returns `false` without drawing when no edit session is open on `tile`.
    pub fn stroke(&mut self, tile: TileId, stroke: Stroke) -> Result<bool, DispatchError> {
        if !self.context.is_editing(tile) {
            return Ok(false);
        }
        // rejects coordinates that would not survive packing
        stroke.pack().map_err(MessageError::from)?;

        stroke.apply_to_tile(self.context.world_mut(), tile)?;

        self.context
            .send_all(&Message::TileStroke { tile, stroke }, None)?;
        Ok(true)
    }

    /// Like [`Session::stroke`], picking the palette entry for `color` with fast match
    pub fn draw_line(
        &mut self,
        tile: TileId,
        start: (u8, u8),
        end: (u8, u8),
        color: Color32,
        thickness: u8,
    ) -> Result<bool, DispatchError> {
        let index = self.context.world().palette().nearest_fast(&color, true);
        self.stroke(tile, Stroke::new(start, end, index, thickness))
    }

    /// Writes a run of pixels into a tile being edited and broadcasts it as a chunk
    pub fn send_tile_chunk(
        &mut self,
        tile: TileId,
        offset: i32,
        pixels: Vec<u8>,
    ) -> Result<bool, DispatchError> {
        if !self.context.is_editing(tile) {
            return Ok(false);
        }
        // chunks are nibble-packed on the wire
        if pixels.len() % 2 != 0 {
            let error = NibbleError::OddLength {
                length: pixels.len(),
            };
            return Err(MessageError::from(error).into());
        }
        apply_tile_chunk(self.context.world_mut(), tile, offset, &pixels)?;

        self.context.send_all(
            &Message::TileChunk {
                tile,
                offset,
                pixels,
            },
            None,
        )?;
        Ok(true)
    }

    /// Sends the whole of a tile being edited as chunks
    pub fn save_tile(&mut self, tile: TileId) -> Result<bool, DispatchError> {
        if !self.context.is_editing(tile) {
            return Ok(false);
        }
        let chunk_pixels = self.context.config().chunk_pixels;
        let chunks = tile_chunk_messages(self.context.world(), tile, chunk_pixels)?;
        self.context.send_all_batch(&chunks, None)?;
        Ok(true)
    }

    // World edits

    /// Returns `true` if the cell changed and the edit was broadcast
    pub fn set_tile(&mut self, location: i32, tile: TileId) -> Result<bool, DispatchError> {
        if !self.context.world_mut().set_tile(location, tile)? {
            return Ok(false);
        }
        self.context
            .send_all(&Message::SetTile { location, tile }, None)?;
        Ok(true)
    }

    /// Returns `true` if the wall flag changed and the edit was broadcast
    pub fn set_wall(&mut self, tile: TileId, is_wall: bool) -> Result<bool, DispatchError> {
        if !self.context.world_mut().set_wall(tile, is_wall)? {
            return Ok(false);
        }
        self.context
            .send_all(&Message::SetWall { tile, is_wall }, None)?;
        Ok(true)
    }

    // Movement

    /// Steps the local avatar one cell. The move is applied immediately;
    /// `None` means the avatar was mid-step or the cell is blocked.
    pub fn move_avatar(&mut self, direction: Direction) -> Result<Option<GridPos>, DispatchError> {
        let Some(id) = self.context.local_avatar() else {
            return Ok(None);
        };
        let Some(destination) = try_step(self.context.world_mut(), id, direction)? else {
            return Ok(None);
        };

        self.context
            .send_all(&Message::MoveAvatar { id, destination }, None)?;
        Ok(Some(destination))
    }

    // Chat

    /// Returns `false` if there is no local avatar to speak for
    pub fn chat(&mut self, text: impl Into<String>) -> Result<bool, DispatchError> {
        let Some(id) = self.context.local_avatar() else {
            return Ok(false);
        };
        let text = text.into();
        self.context.push_chat(id, text.clone());
        self.context.send_all(&Message::Chat { id, text }, None)?;
        Ok(true)
    }

    // Tick

    /// Advances every avatar's step by one tick
    pub fn tick(&mut self) {
        let amount = self.context.config().step_per_tick();
        advance_all(self.context.world_mut(), amount);
    }

    pub fn outbound_mut(&mut self) -> &mut OutboundQueue {
        self.context.outbound_mut()
    }

    pub fn take_outgoing(&mut self) -> Vec<Outgoing> {
        self.context.outbound_mut().drain()
    }

    pub fn take_events(&mut self) -> SessionEvents {
        self.context.take_events()
    }

    /// Connections the authority asked to drop since the last call
    pub fn take_disconnects(&mut self) -> Vec<ConnectionId> {
        self.context.take_disconnects()
    }
}
