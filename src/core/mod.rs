//! # Core Binary Codec
//!
//! Alignment-aware binary encoding of structured values, compatible with a
//! C-style aligned struct layout.
//!
//! This module is the engine the codec adapter and the message layer sit
//! on. It has no I/O and no process-wide state: every call works only on
//! its own arguments and may run concurrently with any other.
//!
//! ## Components
//! - **Shape**: static type description (primitive, array, slice, struct)
//! - **Value**: dynamic value tree walked by the engine
//! - **Wire**: per-type schema trait and the `binary_struct!` macro
//! - **Layout**: alignment and size computation
//! - **Length**: slice element counts from length-source fields
//! - **Encoder / Decoder**: the depth-first walks
//! - **Serial**: public encode/decode/size entry points
//!
//! ## Primitive Widths
//! ```text
//! bool i8 u8: 1   i16 u16: 2   i32 u32 f32: 4   i64 u64 f64 complex64: 8   complex128: 16
//! ```

pub(crate) mod decoder;
pub(crate) mod encoder;
pub mod layout;
pub mod length;
pub mod serial;
pub mod shape;
pub mod value;
pub mod wire;
