//! # wordspy
//!
//! Server core of a real-time multiplayer word-association game. Browser
//! clients connect over a WebSocket, gather in password-protected rooms,
//! and every state-mutating action is serialized through the room's
//! actor before the new snapshot is broadcast to the whole room.
//!
//! The layers, bottom up: `wordspy-protocol` (wire shapes and codec),
//! `wordspy-room` (rules engine, actors, action router),
//! `wordspy-transport` (sockets and broadcast groups), and this crate
//! (the per-connection handler gluing them together, plus the binary).

mod error;
mod handler;
mod server;
pub mod session;

pub use error::WordspyError;
pub use server::{WordspyServer, WordspyServerBuilder};
