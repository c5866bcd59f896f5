use crate::{
    messages::Message,
    session::{context::SessionContext, error::DispatchError},
    types::{ConnectionId, Role, TileId},
};

/// The role-specific half of a session: how connections, inbound messages
/// and lock requests are arbitrated. Implemented once for the host and once
/// for peers; everything role-agnostic lives in [`crate::Session`].
pub trait Authority {
    fn role(&self) -> Role;

    /// Called once, before any event is handled
    fn start(&mut self, context: &mut SessionContext);

    fn connected(&mut self, context: &mut SessionContext, connection: ConnectionId);

    fn disconnected(&mut self, context: &mut SessionContext, connection: ConnectionId);

    /// Applies a decoded message from `origin`
    fn receive(
        &mut self,
        context: &mut SessionContext,
        origin: ConnectionId,
        message: Message,
    ) -> Result<(), DispatchError>;

    /// Local request for the edit lock on `tile`
    fn request_lock(&mut self, context: &mut SessionContext, tile: TileId)
        -> Result<(), DispatchError>;

    /// Local release of the edit lock on `tile`
    fn release_lock(&mut self, context: &mut SessionContext, tile: TileId)
        -> Result<(), DispatchError>;
}
