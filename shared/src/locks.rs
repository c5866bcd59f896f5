use std::collections::BTreeMap;

use thiserror::Error;

use crate::types::{AvatarId, TileId};

/// Errors that can occur while taking or releasing a tile lock
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    /// The tile is already locked
    #[error("Tile {tile} is already locked by avatar {owner}")]
    AlreadyLocked {
        tile: TileId,
        owner: AvatarId,
    },

    /// The tile is not locked at all
    #[error("Tile {tile} is not locked")]
    NotLocked {
        tile: TileId,
    },

    /// Someone other than the owner tried to release the lock
    #[error("Avatar {requester} cannot release tile {tile}, which is locked by avatar {owner}")]
    NotOwner {
        tile: TileId,
        owner: AvatarId,
        requester: AvatarId,
    },
}

/// Per-tile exclusive edit locks: tile-type → owning avatar.
///
/// On the host this is the authoritative copy. Peers mirror whatever the
/// host broadcasts via [`LockMap::mirror`].
#[derive(Clone, Debug, Default)]
pub struct LockMap {
    owners: BTreeMap<TileId, AvatarId>,
}

impl LockMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self, tile: TileId) -> Option<AvatarId> {
        self.owners.get(&tile).copied()
    }

    pub fn is_locked(&self, tile: TileId) -> bool {
        self.owners.contains_key(&tile)
    }

    pub fn is_owned_by(&self, tile: TileId, avatar: AvatarId) -> bool {
        self.owner(tile) == Some(avatar)
    }

    /// Grants `tile` to `owner` if nobody holds it.
    ///
    /// Returns an error naming the current owner otherwise.
    pub fn try_grant(&mut self, tile: TileId, owner: AvatarId) -> Result<(), LockError> {
        if let Some(current) = self.owner(tile) {
            return Err(LockError::AlreadyLocked {
                tile,
                owner: current,
            });
        }

        self.owners.insert(tile, owner);
        Ok(())
    }

    /// Releases `tile` if `requester` owns it
    pub fn try_release(&mut self, tile: TileId, requester: AvatarId) -> Result<(), LockError> {
        let owner = self.owner(tile).ok_or(LockError::NotLocked { tile })?;
        if owner != requester {
            return Err(LockError::NotOwner {
                tile,
                owner,
                requester,
            });
        }

        self.owners.remove(&tile);
        Ok(())
    }

    /// Overwrites the entry for `tile` with the host's view of it
    pub fn mirror(&mut self, tile: TileId, owner: Option<AvatarId>) {
        match owner {
            Some(owner) => {
                self.owners.insert(tile, owner);
            }
            None => {
                self.owners.remove(&tile);
            }
        }
    }

    /// Removes every lock held by `owner`, returning the tiles in ascending order
    pub fn release_all(&mut self, owner: AvatarId) -> Vec<TileId> {
        let tiles = self.held_by(owner);
        for tile in &tiles {
            self.owners.remove(tile);
        }
        tiles
    }

    pub fn held_by(&self, owner: AvatarId) -> Vec<TileId> {
        self.owners
            .iter()
            .filter(|(_, &holder)| holder == owner)
            .map(|(&tile, _)| tile)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileId, AvatarId)> + '_ {
        self.owners.iter().map(|(&tile, &owner)| (tile, owner))
    }
}
