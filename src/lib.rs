//! # packwire
//!
//! Aligned binary struct codec and message layer.
//!
//! Structs are laid out the way a C compiler would lay them out (each field
//! aligned to its own width, capped at a maximum alignment), written
//! little-endian with no self-describing header. Variable-length slices get
//! their element count from a sibling or enclosing integer field.
//!
//! ## Layers
//! - [`core`]: shapes, values and the aligned encode/decode engine
//! - [`codec`]: the `Codec` contract, the `"binary"` codec and the codec registry
//! - [`protocol`]: message registration, IDs, encoding by type, dispatch
//! - [`transport`]: datagram and stream framing, tokio transmitter
//! - [`config`], [`error`], [`utils`]: configuration, errors, buffers and logging
//!
//! ## Example
//! ```rust
//! use packwire::binary_struct;
//! use packwire::codec::{CodecContext, CodecRegistry};
//! use packwire::protocol::registry::MessageRegistry;
//! use packwire::transport::packet::{decode_packet, pack_message};
//!
//! binary_struct! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct Move {
//!         pub unit: u8,
//!         pub x: i32,
//!         pub y: i32,
//!     }
//! }
//!
//! # fn main() -> packwire::error::Result<()> {
//! let codecs = CodecRegistry::with_defaults();
//! let registry = MessageRegistry::new();
//! registry.register::<Move>("game.Move", codecs.require("binary")?)?;
//!
//! let packet = pack_message(&registry, &Move { unit: 1, x: -3, y: 4 }, &CodecContext::new())?;
//! // 2-byte ID, then unit, 3 bytes of padding, x and y
//! assert_eq!(packet.len(), 2 + 12);
//!
//! let decoded = decode_packet(&registry, &packet)?;
//! assert_eq!(decoded.downcast_ref::<Move>(), Some(&Move { unit: 1, x: -3, y: 4 }));
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod utils;

pub use crate::codec::{BinaryCodec, Codec, CodecContext, CodecRegistry};
pub use crate::core::serial::{
    binary_read, binary_size, binary_write, binary_write_into, decode_value, encode_value,
    encode_value_into, size_of_value,
};
pub use crate::core::shape::{Kind, Shape, StructShape};
pub use crate::core::value::Value;
pub use crate::core::wire::Wire;
pub use crate::error::{ProtocolError, Result};
pub use crate::protocol::message::Message;
pub use crate::protocol::registry::{string_hash, MessageId, MessageRegistry};
