//! Wire protocol for the wordspy server.
//!
//! Defines the language clients and the server speak:
//!
//! - **Data types** ([`Game`], [`GameState`], [`Tile`], [`Player`], …) —
//!   the game model as it appears on the wire.
//! - **Events** ([`ClientEvent`], [`ServerEvent`]) — the tagged frames
//!   exchanged over a socket.
//! - **Codec** ([`Codec`], [`JsonCodec`]) — how frames become bytes.
//!
//! The protocol layer knows nothing about rooms, sockets or concurrency;
//! it only defines shapes and their serialization.

mod codec;
mod error;
mod events;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use events::{ClientEvent, ServerEvent};
pub use types::{
    Clue, Consensus, Difficulty, Game, GameLog, GameState, LogEvent, Mode, Player, Role, Team,
    Tile, TileType,
};
