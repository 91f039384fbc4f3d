//! # Message Layer
//!
//! Typed messages on top of the codecs: registration, ID lookup, encoding
//! and dispatch.
//!
//! ## Components
//! - **Message**: object-safe view of any [`Wire`](crate::core::wire::Wire) type
//! - **Registry**: message ID and type → metadata (codec, constructor)
//! - **Msgcodec**: encode by type, decode by ID, raw pass-through for unknown IDs
//! - **Sysmsg**: session lifecycle events
//! - **Dispatcher**: ID → handler routing
//!
//! ## Message IDs
//! 16-bit, usually `string_hash` of a dotted name such as `"game.Move"`.

pub mod dispatcher;
pub mod message;
pub mod msgcodec;
pub mod registry;
pub mod sysmsg;

#[cfg(test)]
mod tests;
