//! Error types for the room layer.
//!
//! The `Display` strings of the user-visible variants double as the
//! `message` field of create/join responses, so their wording is part of
//! the client contract.

use std::io;
use std::path::PathBuf;

/// Errors that can occur during room operations or startup.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// A room with this name already exists.
    #[error("room {0} already exists.")]
    RoomExists(String),

    /// No room with this name.
    #[error("could not find room: {0}")]
    RoomNotFound(String),

    /// The supplied password does not match the room's.
    #[error("invalid password")]
    WrongPassword,

    /// An empty nickname was supplied.
    #[error("invalid nickname")]
    EmptyNickname,

    /// An empty password was supplied.
    #[error("invalid password")]
    EmptyPassword,

    /// A word-list file could not be read at startup. Fatal.
    #[error("unable to read word list {path}")]
    WordList {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A word list is too small to ever fill a board. Fatal.
    #[error("word list {name} has {len} words, need at least {min}")]
    WordListTooSmall {
        name: &'static str,
        len: usize,
        min: usize,
    },
}
