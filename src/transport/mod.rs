//! # Transport Framing
//!
//! Message framing for the two transport families. Sockets, sessions and
//! peers are left to the application; these helpers only turn messages into
//! framed bytes and back.
//!
//! ## Components
//! - **Packet**: datagram framing, `[MsgID(2)] [Payload]`
//! - **LTV**: stream framing for tokio, `[Size(2)] [MsgID(2)] [Payload]`
//! - **Transmitter**: send/receive registered messages over any async stream
//!
//! All header fields are little-endian.

pub mod ltv;
pub mod packet;
pub mod transmitter;

pub use ltv::{Frame, LtvCodec};
pub use transmitter::MessageTransmitter;
