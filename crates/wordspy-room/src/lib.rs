//! Rooms and everything inside them: word pools, board generation, the
//! rules engine, the per-room actor and the cross-room action router.
//!
//! Concurrency model: each room is owned by exactly one actor task and
//! is only ever touched through closures delivered to its mailbox, so
//! all mutations of a room serialize. The [`ActionRouter`] keeps the
//! process-wide player→room and name→room maps under a reader-writer
//! lock and brokers create/join/leave so both views stay consistent.

mod actor;
mod board;
mod error;
mod game;
mod room;
mod router;
mod words;

pub use actor::{spawn_room, RoomAction, RoomHandle};
pub use board::{generate_board, BoardType};
pub use error::RoomError;
pub use game::{new_game, DEFAULT_TIMER_SECS};
pub use room::Room;
pub use router::ActionRouter;
pub use words::WordPools;

/// A registry with deterministic contents, big enough for any mask.
#[cfg(test)]
pub(crate) fn test_pools() -> WordPools {
    let make = |prefix: &str, n: usize| -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    };
    WordPools::from_lists(
        make("word", 40),
        make("duet", 30),
        make("duet", 30),
        make("custom", 30),
        make("nsfw", 30),
    )
    .expect("test pools are valid")
}
