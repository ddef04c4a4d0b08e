//! The action router: process-wide bookkeeping of which rooms exist and
//! which room each player is in.
//!
//! Two maps — player-id → room handle and room-name → room handle — live
//! under a single reader-writer lock. The lock guards only the maps;
//! room state is never touched under it. Anything that must edit both
//! maps consistently (create, the join reassignment, leave cleanup) takes
//! the write side; lookups and counts take the read side.
//!
//! Lock ordering rule: the router lock may be taken *inside* an actor
//! closure (the join/leave bookkeeping does exactly that), but nothing
//! ever holds the lock while waiting on an actor, and no closure ever
//! enqueues back into its own room. That combination is what keeps the
//! two maps and the per-room player sets consistent without deadlocks.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use wordspy_protocol::GameState;

use crate::{spawn_room, Room, RoomAction, RoomError, RoomHandle, WordPools};

#[derive(Default)]
struct Maps {
    player_rooms: HashMap<String, RoomHandle>,
    name_rooms: HashMap<String, RoomHandle>,
}

impl Maps {
    fn counts(&self) -> (usize, usize) {
        (self.player_rooms.len(), self.name_rooms.len())
    }
}

type SharedMaps = Arc<RwLock<Maps>>;

fn read(maps: &SharedMaps) -> RwLockReadGuard<'_, Maps> {
    maps.read().unwrap_or_else(|e| e.into_inner())
}

fn write(maps: &SharedMaps) -> RwLockWriteGuard<'_, Maps> {
    maps.write().unwrap_or_else(|e| e.into_inner())
}

/// Cheap to clone: one shared map pair and the word pools.
#[derive(Clone)]
pub struct ActionRouter {
    maps: SharedMaps,
    pools: Arc<WordPools>,
}

impl ActionRouter {
    pub fn new(pools: Arc<WordPools>) -> Self {
        Self {
            maps: Arc::default(),
            pools,
        }
    }

    /// Creates a room and joins the creator to it.
    ///
    /// The duplicate-name check, the implicit leave of any previous room
    /// and the installation of both map entries happen atomically under
    /// the write lock, so concurrent creates of the same name serialize:
    /// exactly one wins. `respond` fires synchronously either way.
    /// Returns whether the room came into being.
    pub fn create_room(
        &self,
        player_id: &str,
        nick: &str,
        name: &str,
        password: &str,
        respond: impl FnOnce(String, bool),
    ) -> bool {
        if nick.is_empty() {
            respond(RoomError::EmptyNickname.to_string(), false);
            return false;
        }
        if password.is_empty() {
            respond(RoomError::EmptyPassword.to_string(), false);
            return false;
        }

        {
            let mut maps = write(&self.maps);

            if maps.name_rooms.contains_key(name) {
                drop(maps);
                respond(RoomError::RoomExists(name.to_string()).to_string(), false);
                return false;
            }

            // Moving in from another room: that room gets a fire-and-forget
            // leave. Its cleanup re-checks both maps under this same lock,
            // so it cannot clobber the entries installed below.
            if let Some(old) = maps.player_rooms.get(player_id).cloned() {
                old.enqueue(cleanup_action(
                    Arc::clone(&self.maps),
                    player_id,
                    old.clone(),
                ));
            }

            let handle = spawn_room(Room::new(name, password, Arc::clone(&self.pools)));

            let pid = player_id.to_string();
            let nick = nick.to_string();
            handle.enqueue(Box::new(move |room| room.join(&pid, &nick)));

            maps.player_rooms
                .insert(player_id.to_string(), handle.clone());
            maps.name_rooms.insert(name.to_string(), handle);
        }

        tracing::info!(player_id, room = name, "room created");
        respond("created the room".to_string(), true);
        true
    }

    /// Joins an existing room.
    ///
    /// Returns `false` immediately when no such room exists. Otherwise
    /// the password check, the join and the player-map reassignment run
    /// on the room's actor, and `continuation` receives the joined room
    /// (or `None` on a password mismatch).
    pub fn join_room(
        &self,
        player_id: &str,
        nick: &str,
        name: &str,
        password: &str,
        continuation: Box<dyn FnOnce(Option<&Room>) + Send + 'static>,
    ) -> bool {
        let Some(handle) = read(&self.maps).name_rooms.get(name).cloned() else {
            tracing::info!(player_id, nick, room = name, "tried to join a nonexistent room");
            return false;
        };

        let maps = Arc::clone(&self.maps);
        let pid = player_id.to_string();
        let nick = nick.to_string();
        let password = password.to_string();
        let own_handle = handle.clone();

        handle.enqueue(Box::new(move |room| {
            if !room.password_matches(&password) {
                continuation(None);
                return;
            }

            room.join(&pid, &nick);

            let previous = write(&maps)
                .player_rooms
                .insert(pid.clone(), own_handle.clone());
            // An implicit leave of the old room — but never of this one:
            // enqueueing back into the room we are running on would undo
            // the join we just performed.
            if let Some(previous) = previous {
                if !previous.same_room(&own_handle) {
                    previous.enqueue(cleanup_action(
                        Arc::clone(&maps),
                        &pid,
                        previous.clone(),
                    ));
                }
            }

            tracing::info!(player_id = %pid, nick = %nick, room = %room.name(), "player joined room");
            continuation(Some(&*room));
        }));
        true
    }

    /// Routes an action to the room the player is in, if any.
    pub fn room_for_player(&self, player_id: &str, action: RoomAction) -> bool {
        match read(&self.maps).player_rooms.get(player_id) {
            Some(handle) => {
                handle.enqueue(action);
                true
            }
            None => {
                tracing::warn!(player_id, "player not in any room, dropping action");
                false
            }
        }
    }

    /// Routes an action to a room by name, if it exists.
    pub fn room_by_name(&self, name: &str, action: RoomAction) -> bool {
        match read(&self.maps).name_rooms.get(name) {
            Some(handle) => {
                handle.enqueue(action);
                true
            }
            None => {
                tracing::warn!(room = name, "room not found, dropping action");
                false
            }
        }
    }

    /// Removes the player from their room: `action` runs first (while the
    /// player is still a member), then the cleanup drops the player-map
    /// entry and — when the room emptied — the room itself, freeing its
    /// name for reuse.
    pub fn leave_room(&self, player_id: &str, action: RoomAction) -> bool {
        let Some(handle) = read(&self.maps).player_rooms.get(player_id).cloned() else {
            tracing::warn!(player_id, "tried to leave while not in a room");
            return false;
        };

        handle.enqueue(action);
        handle.enqueue(cleanup_action(
            Arc::clone(&self.maps),
            player_id,
            handle.clone(),
        ));
        true
    }

    /// Answers whether the player is currently known, with live counts
    /// and — when they are in a room — its snapshot. The callback fires
    /// immediately for unknown players, otherwise via the room's actor.
    pub fn check_player(
        &self,
        player_id: &str,
        callback: Box<dyn FnOnce(usize, usize, String, bool, Option<GameState>) + Send + 'static>,
    ) {
        let handle = read(&self.maps).player_rooms.get(player_id).cloned();
        match handle {
            None => {
                let (players, rooms) = read(&self.maps).counts();
                callback(players, rooms, player_id.to_string(), false, None);
            }
            Some(handle) => {
                let maps = Arc::clone(&self.maps);
                let pid = player_id.to_string();
                handle.enqueue(Box::new(move |room| {
                    let (players, rooms) = read(&maps).counts();
                    callback(players, rooms, pid, true, Some(room.game_state()));
                }));
            }
        }
    }

    /// The name of the room the player is in, if any.
    pub fn player_room_name(&self, player_id: &str) -> Option<String> {
        read(&self.maps)
            .player_rooms
            .get(player_id)
            .map(|h| h.name().to_string())
    }

    /// Number of players currently mapped to a room.
    pub fn players(&self) -> usize {
        read(&self.maps).player_rooms.len()
    }

    /// Number of live rooms.
    pub fn rooms(&self) -> usize {
        read(&self.maps).name_rooms.len()
    }
}

/// The leave bookkeeping that runs on a room's own actor: remove the
/// player, then fix up both router maps under the write lock.
///
/// Both map edits are guarded by an identity check on the handle, because
/// by the time this closure runs the player may have been reassigned to a
/// new room, or the name rebound to a new room. Stale entries must not be
/// clobbered; matching ones must go, so an emptied room frees its name.
fn cleanup_action(maps: SharedMaps, player_id: &str, own: RoomHandle) -> RoomAction {
    let pid = player_id.to_string();
    Box::new(move |room| {
        let mut maps = write(&maps);
        room.leave(&pid);
        if maps
            .player_rooms
            .get(&pid)
            .is_some_and(|h| h.same_room(&own))
        {
            maps.player_rooms.remove(&pid);
        }
        if room.player_count() == 0
            && maps
                .name_rooms
                .get(room.name())
                .is_some_and(|h| h.same_room(&own))
        {
            maps.name_rooms.remove(room.name());
            tracing::info!(room = %room.name(), "room emptied and removed");
        }
    })
}
