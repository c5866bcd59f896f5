use log::{debug, info, warn};

use tilesync_shared::{
    replication::{apply_avatar_chunk, apply_tile_chunk, apply_tile_image, avatar_chunk_messages},
    Authority, Avatar, AvatarAsset, AvatarId, ConnectionId, DispatchError, Message, Role, Session,
    SessionContext, TileId, World, ENTERED_LINE, EXITED_LINE,
};

use crate::PeerConfig;

/// The mirroring role. Applies whatever the host sends and treats its own
/// lock requests as advisory until the host names it as owner.
pub struct Peer {
    config: PeerConfig,
    asset: AvatarAsset,
    host: Option<ConnectionId>,
}

impl Peer {
    pub fn new(config: PeerConfig, asset: AvatarAsset) -> Self {
        Self {
            config,
            asset,
            host: None,
        }
    }

    /// The host's connection, once connected
    pub fn host(&self) -> Option<ConnectionId> {
        self.host
    }

    /// Starts a session over an empty world, filled in by the host's snapshot
    pub fn into_session(self) -> Session<Peer> {
        let session_config = self.config.session.clone();
        Session::new(self, World::default(), session_config)
    }

    fn take_avatar(&mut self, context: &mut SessionContext, id: AvatarId) -> Result<(), DispatchError> {
        context.world().avatar(id)?;
        context.set_local_avatar(Some(id));
        info!("Took control of avatar {}", id);
        self.upload_appearance(context, id)
    }

    /// Quantizes the asset against the current palette and sends it to the host
    fn upload_appearance(&self, context: &mut SessionContext, id: AvatarId) -> Result<(), DispatchError> {
        let appearance = self.asset.to_appearance(context.world().palette());
        let chunk_pixels = context.config().chunk_pixels;
        let avatar = context.world_mut().avatar_mut(id)?;
        avatar.appearance = appearance;
        let chunks = avatar_chunk_messages(avatar, chunk_pixels);

        context.send_all_batch(&chunks, None)?;
        Ok(())
    }

    fn mirror_lock(context: &mut SessionContext, owner: Option<AvatarId>, tile: TileId) {
        context.locks_mut().mirror(tile, owner);

        let local = context.local_avatar();
        if owner.is_some() && owner == local {
            context.open_edit(tile);
        } else {
            context.close_edit(tile);
        }
    }
}

impl Authority for Peer {
    fn role(&self) -> Role {
        Role::Peer
    }

    fn start(&mut self, _context: &mut SessionContext) {}

    fn connected(&mut self, context: &mut SessionContext, connection: ConnectionId) {
        if let Some(host) = self.host {
            warn!(
                "Ignoring connection {}: already connected to host {}",
                connection, host
            );
            return;
        }
        self.host = Some(connection);
        context.add_connection(connection);
    }

    fn disconnected(&mut self, context: &mut SessionContext, connection: ConnectionId) {
        if self.host != Some(connection) {
            return;
        }
        self.host = None;
        context.remove_connection(connection);
        context.notify("Disconnected from host.");
        context.end_session();
    }

    fn receive(
        &mut self,
        context: &mut SessionContext,
        origin: ConnectionId,
        message: Message,
    ) -> Result<(), DispatchError> {
        let kind = message.kind().name();
        if self.host != Some(origin) {
            return Err(DispatchError::violation(origin, kind, "did not come from the host"));
        }

        match message {
            Message::Tileset { id, pixels } => {
                context.world_mut().apply_tileset(id, &pixels)?;
            }
            Message::Tilemap { tiles } => {
                context.world_mut().replace_tilemap(&tiles)?;
            }
            Message::Walls { walls } => {
                context.world_mut().replace_walls(&walls)?;
            }
            Message::Palette { palette } => {
                if context.world().palette() == &palette {
                    return Ok(());
                }
                context.world_mut().replace_palette(palette);
                // a handoff handled before the palette was quantized against the old one
                if let Some(local) = context.local_avatar() {
                    debug!("Palette changed, re-uploading avatar {}", local);
                    self.upload_appearance(context, local)?;
                }
            }
            Message::TileImage { tile, pixels } => {
                if context.is_editing(tile) {
                    debug!("Dropped {} for tile {} under local edit", kind, tile);
                    return Ok(());
                }
                apply_tile_image(context.world_mut(), tile, &pixels)?;
            }
            Message::TileChunk {
                tile,
                offset,
                pixels,
            } => {
                if context.is_editing(tile) {
                    debug!("Dropped {} for tile {} under local edit", kind, tile);
                    return Ok(());
                }
                apply_tile_chunk(context.world_mut(), tile, offset, &pixels)?;
            }
            Message::TileStroke { tile, stroke } => {
                stroke.apply_to_tile(context.world_mut(), tile)?;
            }
            Message::ReplicateAvatar {
                id,
                destination,
                source,
            } => {
                if context.world().has_avatar(id) {
                    let avatar = context.world_mut().avatar_mut(id)?;
                    avatar.source = source;
                    avatar.destination = destination;
                } else {
                    let mut avatar = Avatar::new(id, destination);
                    avatar.source = source;
                    context.world_mut().add_avatar(avatar)?;
                    context.push_chat(id, ENTERED_LINE);
                }
            }
            Message::DestroyAvatar { id } => {
                context.world_mut().remove_avatar(id)?;
                if context.local_avatar() == Some(id) {
                    context.set_local_avatar(None);
                }
                context.push_chat(id, EXITED_LINE);
            }
            Message::MoveAvatar { id, destination } => {
                context.world_mut().avatar_mut(id)?.begin_step(destination);
            }
            Message::GiveAvatar { id } => {
                self.take_avatar(context, id)?;
            }
            Message::AvatarChunk { id, offset, pixels } => {
                apply_avatar_chunk(context.world_mut(), id, offset, &pixels)?;
            }
            Message::Chat { id, text } => {
                context.world().avatar(id)?;
                context.push_chat(id, text);
            }
            Message::SetTile { location, tile } => {
                context.world_mut().set_tile(location, tile)?;
            }
            Message::SetWall { tile, is_wall } => {
                context.world_mut().set_wall(tile, is_wall)?;
            }
            Message::LockTile { owner, tile } => {
                Self::mirror_lock(context, owner, tile);
            }
        }
        Ok(())
    }

    fn request_lock(&mut self, context: &mut SessionContext, tile: TileId) -> Result<(), DispatchError> {
        context.world().tile_bitmap(tile)?;
        let Some(local) = context.local_avatar() else {
            return Ok(());
        };
        if context.locks().is_locked(tile) {
            return Ok(());
        }

        // advisory: the edit session opens when the host's grant arrives
        context.send_all(
            &Message::LockTile {
                owner: Some(local),
                tile,
            },
            None,
        )?;
        Ok(())
    }

    fn release_lock(&mut self, context: &mut SessionContext, tile: TileId) -> Result<(), DispatchError> {
        let Some(local) = context.local_avatar() else {
            return Ok(());
        };
        if !context.locks().is_owned_by(tile, local) {
            return Ok(());
        }

        context.close_edit(tile);
        context.send_all(&Message::LockTile { owner: None, tile }, None)?;
        Ok(())
    }
}
