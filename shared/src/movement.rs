use crate::{
    types::AvatarId,
    world::{Direction, GridPos, World, WorldError},
};

/// Whether a step from `from` to `to` is illegal: more than one cell away,
/// off the playfield, or onto a wall tile.
pub fn is_blocked(world: &World, from: GridPos, to: GridPos) -> bool {
    if from.distance_squared(&to) > 1 {
        return true;
    }

    match world.tile_at(to) {
        Some(tile) => world.is_wall(tile),
        None => true,
    }
}

/// Client-side step for a local avatar. Applies the move optimistically and
/// returns the new destination, or `None` if the avatar is mid-step or the
/// target cell is blocked.
pub fn try_step(
    world: &mut World,
    id: AvatarId,
    direction: Direction,
) -> Result<Option<GridPos>, WorldError> {
    let avatar = world.avatar(id)?;
    if !avatar.at_rest() {
        return Ok(None);
    }

    let from = avatar.destination;
    let to = from.offset(direction);
    if is_blocked(world, from, to) {
        return Ok(None);
    }

    world.avatar_mut(id)?.begin_step(to);
    Ok(Some(to))
}

/// Outcome of checking a peer's move request on the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveVerdict {
    /// The move was committed to this destination
    Committed(GridPos),
    /// The move was refused; the sender must be corrected to this destination
    Corrected(GridPos),
}

/// Host-side check of a peer's move against canonical state
pub fn validate_remote_move(
    world: &mut World,
    id: AvatarId,
    requested: GridPos,
) -> Result<MoveVerdict, WorldError> {
    let current = world.avatar(id)?.destination;
    if is_blocked(world, current, requested) {
        return Ok(MoveVerdict::Corrected(current));
    }

    world.avatar_mut(id)?.begin_step(requested);
    Ok(MoveVerdict::Committed(requested))
}

/// Advances every avatar's step animation by `amount`
pub fn advance_all(world: &mut World, amount: f32) {
    for avatar in world.avatars_mut() {
        avatar.advance(amount);
    }
}
