//! # Error Types
//!
//! Error handling for the binary codec and the message layer built on it.
//!
//! This module defines every error variant the crate can produce, from
//! schema problems found while sizing a value to framing violations found
//! while reading a stream.
//!
//! ## Error Categories
//! - **Codec Errors**: unsupported shapes, short input, short destination buffers
//! - **Registry Errors**: duplicate or unknown codecs and messages
//! - **Framing Errors**: invalid headers and oversized packets
//! - **Configuration Errors**: unreadable or invalid configuration
//!
//! None of these errors are retried by the crate. Callers are expected to
//! treat a codec error as "this message is malformed or unsupported" and
//! drop it.
//!
//! ## Example Usage
//! ```rust
//! use packwire::core::serial::decode_value;
//! use packwire::error::ProtocolError;
//!
//! let mut target = 0u32;
//! match decode_value(&[0x01, 0x02], &mut target, 4) {
//!     Err(ProtocolError::OutOfData { needed, available }) => {
//!         assert_eq!((needed, available), (4, 2));
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Registry lock errors
    pub const ERR_CODEC_REGISTRY_WRITE_LOCK: &str = "Failed to acquire write lock on codec registry";
    pub const ERR_CODEC_REGISTRY_READ_LOCK: &str = "Failed to acquire read lock on codec registry";
    pub const ERR_MESSAGE_REGISTRY_WRITE_LOCK: &str =
        "Failed to acquire write lock on message registry";
    pub const ERR_DISPATCHER_WRITE_LOCK: &str = "Failed to acquire write lock on dispatcher";
    pub const ERR_DISPATCHER_READ_LOCK: &str = "Failed to acquire read lock on dispatcher";

    /// Shape errors
    pub const ERR_SHAPE_MISMATCH: &str = "Value does not match its shape";
    pub const ERR_SIZE_OVERFLOW: &str = "Encoded size overflows usize";

    /// Framing errors
    pub const ERR_MIN_PACKET: &str = "Packet shorter than message ID header";
}

/// The primary error type for all codec and message operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid type: {0}")]
    InvalidType(String),

    #[error("Out of data: need {needed} bytes, have {available}")]
    OutOfData { needed: usize, available: usize },

    #[error("Destination buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("Codec already registered: {0}")]
    DuplicateCodec(String),

    #[error("Codec not found: {0}")]
    UnknownCodec(String),

    #[error("Message already registered: {0}")]
    DuplicateMessage(String),

    #[error("Message not registered: {0}")]
    UnregisteredMessage(String),

    #[error("No handler for message id {0}")]
    UnexpectedMessage(u16),

    #[error("Invalid packet header")]
    InvalidHeader,

    #[error("Packet too large: {0} bytes")]
    OversizedPacket(usize),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Custom error: {0}")]
    Custom(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
