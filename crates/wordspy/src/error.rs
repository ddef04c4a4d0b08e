//! Unified error type for the server crate.

use wordspy_protocol::ProtocolError;
use wordspy_room::RoomError;
use wordspy_transport::TransportError;

/// Top-level error wrapping every layer's failures.
#[derive(Debug, thiserror::Error)]
pub enum WordspyError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (word lists, user-visible room failures).
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_errors_convert() {
        let err: WordspyError = RoomError::RoomNotFound("den".into()).into();
        assert!(matches!(err, WordspyError::Room(_)));
        assert!(err.to_string().contains("den"));
    }

    #[test]
    fn test_transport_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "taken");
        let err: WordspyError = TransportError::Bind(io).into();
        assert!(matches!(err, WordspyError::Transport(_)));
    }
}
