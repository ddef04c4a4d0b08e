//! Room actor: one task owns each room, and every mutation reaches it as
//! a closure through an unbounded mailbox.
//!
//! Actions execute strictly in enqueue order, which is what makes room
//! state linearizable without a lock around it. Enqueueing never blocks,
//! so actions against different rooms proceed in parallel.

use tokio::sync::mpsc;

use crate::Room;

/// A deferred mutation of (or read against) a room.
pub type RoomAction = Box<dyn FnOnce(&mut Room) + Send + 'static>;

/// Handle to a running room actor. Cheap to clone; the actor stops once
/// every handle is gone and the mailbox drains.
#[derive(Clone)]
pub struct RoomHandle {
    name: String,
    sender: mpsc::UnboundedSender<RoomAction>,
}

impl RoomHandle {
    /// The room's name (unique process-wide while the room lives).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queues an action. The send only fails after the actor has stopped,
    /// which the router prevents by removing the room from its maps before
    /// dropping the last handle.
    pub fn enqueue(&self, action: RoomAction) {
        if self.sender.send(action).is_err() {
            tracing::warn!(room = %self.name, "action dropped, room actor is gone");
        }
    }

    /// Whether both handles reach the same actor. Names alone are not
    /// enough: a name can be reused by a later room.
    pub fn same_room(&self, other: &RoomHandle) -> bool {
        self.sender.same_channel(&other.sender)
    }
}

/// Moves `room` into its own task and returns the handle to reach it.
pub fn spawn_room(room: Room) -> RoomHandle {
    let name = room.name().to_string();
    let (sender, mut receiver) = mpsc::unbounded_channel::<RoomAction>();

    tokio::spawn(async move {
        let mut room = room;
        tracing::info!(room = %room.name(), "room actor started");
        while let Some(action) = receiver.recv().await {
            action(&mut room);
        }
        tracing::info!(room = %room.name(), "room actor stopped");
    });

    RoomHandle { name, sender }
}
