use log::{info, warn};

use tilesync_shared::{
    movement::{validate_remote_move, MoveVerdict},
    replication::{
        apply_avatar_chunk, apply_tile_chunk, apply_tile_image, replicate_avatar_message,
        snapshot,
    },
    Authority, Avatar, AvatarAsset, ConnectionId, DispatchError, GridPos, LockError, Message,
    Palette, Role, Session, SessionContext, TileId, World, ENTERED_LINE, EXITED_LINE,
    HOST_AVATAR_ID,
};

use crate::{world_gen::random_world, HostConfig};

/// The authoritative role. Holds the canonical world, arbitrates tile locks,
/// validates peer movement and fans every accepted edit out to the other peers.
pub struct Host {
    config: HostConfig,
    asset: AvatarAsset,
}

impl Host {
    pub fn new(config: HostConfig, asset: AvatarAsset) -> Self {
        Self { config, asset }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Starts a session over a fresh world, randomized if the config asks for it
    pub fn into_session(self) -> Session<Host> {
        let world = if self.config.randomize_world {
            random_world(Palette::default())
        } else {
            World::default()
        };
        self.into_session_with(world)
    }

    pub fn into_session_with(self, world: World) -> Session<Host> {
        let session_config = self.config.session.clone();
        Session::new(self, world, session_config)
    }

    fn accept(&mut self, context: &mut SessionContext, connection: ConnectionId) -> Result<(), DispatchError> {
        context.add_connection(connection);

        let avatar = Avatar::new(connection, GridPos::ORIGIN);
        let replicate = replicate_avatar_message(&avatar);
        context.world_mut().add_avatar(avatar)?;
        context.push_chat(connection, ENTERED_LINE);

        context.send_all(&replicate, Some(connection))?;

        let chunk_pixels = context.config().chunk_pixels;
        for message in snapshot(context.world(), connection, chunk_pixels) {
            context.send_to(connection, &message)?;
        }
        let locks: Vec<_> = context.locks().iter().collect();
        for (tile, owner) in locks {
            context.send_to(
                connection,
                &Message::LockTile {
                    owner: Some(owner),
                    tile,
                },
            )?;
        }

        info!("Connection {} joined with avatar {}", connection, connection);
        Ok(())
    }

    fn remove(&mut self, context: &mut SessionContext, connection: ConnectionId) -> Result<(), DispatchError> {
        for tile in context.locks_mut().release_all(connection) {
            info!("Lock on tile {} released: owner {} left", tile, connection);
            context.send_all(&Message::LockTile { owner: None, tile }, None)?;
        }

        context.world_mut().remove_avatar(connection)?;
        context.send_all(&Message::DestroyAvatar { id: connection }, None)?;
        context.push_chat(connection, EXITED_LINE);
        Ok(())
    }

    fn lock_requested(
        &mut self,
        context: &mut SessionContext,
        origin: ConnectionId,
        tile: TileId,
    ) -> Result<(), DispatchError> {
        match context.locks_mut().try_grant(tile, origin) {
            Ok(()) => {
                info!("Lock on tile {} granted to {}", tile, origin);
                context.send_all(
                    &Message::LockTile {
                        owner: Some(origin),
                        tile,
                    },
                    None,
                )?;
            }
            Err(LockError::AlreadyLocked { owner, .. }) => {
                context.send_to(
                    origin,
                    &Message::LockTile {
                        owner: Some(owner),
                        tile,
                    },
                )?;
            }
            Err(_) => {}
        }
        Ok(())
    }

    fn require_lock(
        context: &SessionContext,
        origin: ConnectionId,
        tile: TileId,
        kind: &'static str,
    ) -> Result<(), DispatchError> {
        if context.locks().is_owned_by(tile, origin) {
            Ok(())
        } else {
            Err(DispatchError::violation(origin, kind, "sent without holding the tile lock"))
        }
    }
}

impl Authority for Host {
    fn role(&self) -> Role {
        Role::Host
    }

    fn start(&mut self, context: &mut SessionContext) {
        let mut avatar = Avatar::new(HOST_AVATAR_ID, GridPos::ORIGIN);
        avatar.appearance = self.asset.to_appearance(context.world().palette());
        if let Err(error) = context.world_mut().add_avatar(avatar) {
            warn!("Host avatar not added: {}", error);
            return;
        }
        context.set_local_avatar(Some(HOST_AVATAR_ID));
        context.push_chat(HOST_AVATAR_ID, ENTERED_LINE);
    }

    fn connected(&mut self, context: &mut SessionContext, connection: ConnectionId) {
        if connection == HOST_AVATAR_ID || context.is_connected(connection) {
            warn!("Refusing connection {}: id already in use", connection);
            context.request_disconnect(connection);
            return;
        }
        if context.connections().len() >= self.config.max_connections {
            warn!(
                "Refusing connection {}: {} peers already connected",
                connection, self.config.max_connections
            );
            context.request_disconnect(connection);
            return;
        }

        if let Err(error) = self.accept(context, connection) {
            warn!("Failed to set up connection {}: {}", connection, error);
        }
    }

    fn disconnected(&mut self, context: &mut SessionContext, connection: ConnectionId) {
        if !context.remove_connection(connection) {
            return;
        }
        if let Err(error) = self.remove(context, connection) {
            warn!("Failed to tear down connection {}: {}", connection, error);
        }
    }

    fn receive(
        &mut self,
        context: &mut SessionContext,
        origin: ConnectionId,
        message: Message,
    ) -> Result<(), DispatchError> {
        let kind = message.kind().name();
        if !context.is_connected(origin) {
            return Err(DispatchError::violation(origin, kind, "from an unknown connection"));
        }

        match message {
            Message::LockTile {
                owner: Some(owner),
                tile,
            } => {
                if owner != origin {
                    return Err(DispatchError::violation(origin, kind, "names another owner"));
                }
                self.lock_requested(context, origin, tile)
            }
            Message::LockTile { owner: None, tile } => {
                if context.locks_mut().try_release(tile, origin).is_err() {
                    return Err(DispatchError::violation(origin, kind, "releases a lock it does not hold"));
                }
                info!("Lock on tile {} released by {}", tile, origin);
                context.send_all(&Message::LockTile { owner: None, tile }, None)?;
                Ok(())
            }
            Message::TileStroke { tile, stroke } => {
                Self::require_lock(context, origin, tile, kind)?;
                stroke.apply_to_tile(context.world_mut(), tile)?;
                context.send_all(&Message::TileStroke { tile, stroke }, Some(origin))?;
                Ok(())
            }
            Message::TileChunk {
                tile,
                offset,
                pixels,
            } => {
                Self::require_lock(context, origin, tile, kind)?;
                apply_tile_chunk(context.world_mut(), tile, offset, &pixels)?;
                context.send_all(
                    &Message::TileChunk {
                        tile,
                        offset,
                        pixels,
                    },
                    Some(origin),
                )?;
                Ok(())
            }
            Message::TileImage { tile, pixels } => {
                Self::require_lock(context, origin, tile, kind)?;
                apply_tile_image(context.world_mut(), tile, &pixels)?;
                context.send_all(&Message::TileImage { tile, pixels }, Some(origin))?;
                Ok(())
            }
            Message::AvatarChunk { id, offset, pixels } => {
                if id != origin {
                    return Err(DispatchError::violation(origin, kind, "targets another avatar"));
                }
                apply_avatar_chunk(context.world_mut(), id, offset, &pixels)?;
                context.send_all(&Message::AvatarChunk { id, offset, pixels }, Some(origin))?;
                Ok(())
            }
            Message::MoveAvatar { id, destination } => {
                if id != origin {
                    // put the sender's copy of that avatar back where it belongs
                    let current = context.world().avatar(id)?.destination;
                    context.send_to(
                        origin,
                        &Message::MoveAvatar {
                            id,
                            destination: current,
                        },
                    )?;
                    return Err(DispatchError::violation(origin, kind, "moves another avatar"));
                }

                match validate_remote_move(context.world_mut(), id, destination)? {
                    MoveVerdict::Committed(destination) => {
                        context.send_all(&Message::MoveAvatar { id, destination }, Some(origin))?;
                    }
                    MoveVerdict::Corrected(destination) => {
                        info!("Correcting avatar {} back to {:?}", id, destination);
                        context.send_to(origin, &Message::MoveAvatar { id, destination })?;
                    }
                }
                Ok(())
            }
            Message::Chat { id, text } => {
                if id != origin {
                    return Err(DispatchError::violation(origin, kind, "speaks for another avatar"));
                }
                context.push_chat(id, text.clone());
                context.send_all(&Message::Chat { id, text }, Some(origin))?;
                Ok(())
            }
            Message::SetTile { location, tile } => {
                if context.world_mut().set_tile(location, tile)? {
                    context.send_all(&Message::SetTile { location, tile }, Some(origin))?;
                }
                Ok(())
            }
            Message::SetWall { tile, is_wall } => {
                if context.world_mut().set_wall(tile, is_wall)? {
                    context.send_all(&Message::SetWall { tile, is_wall }, Some(origin))?;
                }
                Ok(())
            }
            Message::Tileset { .. }
            | Message::Tilemap { .. }
            | Message::Walls { .. }
            | Message::Palette { .. }
            | Message::ReplicateAvatar { .. }
            | Message::DestroyAvatar { .. }
            | Message::GiveAvatar { .. } => {
                Err(DispatchError::violation(origin, kind, "is host-originated"))
            }
        }
    }

    fn request_lock(&mut self, context: &mut SessionContext, tile: TileId) -> Result<(), DispatchError> {
        context.world().tile_bitmap(tile)?;
        if context.locks_mut().try_grant(tile, HOST_AVATAR_ID).is_err() {
            return Ok(());
        }

        info!("Lock on tile {} taken by the host", tile);
        context.open_edit(tile);
        context.send_all(
            &Message::LockTile {
                owner: Some(HOST_AVATAR_ID),
                tile,
            },
            None,
        )?;
        Ok(())
    }

    fn release_lock(&mut self, context: &mut SessionContext, tile: TileId) -> Result<(), DispatchError> {
        if context.locks_mut().try_release(tile, HOST_AVATAR_ID).is_err() {
            return Ok(());
        }

        info!("Lock on tile {} released by the host", tile);
        context.close_edit(tile);
        context.send_all(&Message::LockTile { owner: None, tile }, None)?;
        Ok(())
    }
}
