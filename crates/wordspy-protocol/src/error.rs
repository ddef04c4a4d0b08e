//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The frame was malformed, truncated, or of an unexpected shape.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}
