//! # Binary Serialization
//!
//! Public entry points of the aligned binary struct codec.
//!
//! ## Wire Layout
//! A contiguous little-endian byte sequence with no self-describing header.
//! Each value starts at an offset rounded up to its alignment (its own width
//! for primitives, the widest member for composites, capped at `max_align`).
//! Framing, such as a message-ID prefix, is the caller's job.
//!
//! ## Functions
//! - Dynamic: [`binary_size`], [`binary_write`], [`binary_write_into`],
//!   [`binary_read`] operate on a `(Shape, Value)` pair
//! - Typed: [`size_of_value`], [`encode_value`], [`encode_value_into`],
//!   [`decode_value`] operate on any [`Wire`] type
//!
//! ## Failure Model
//! - `InvalidType`: the shape contains an unsupported type anywhere
//! - `OutOfData`: input shorter than the computed size (checked up front,
//!   and again on every read)
//! - `BufferTooSmall`: caller-provided destination shorter than the computed size
//!
//! Decoding works on a copy of the target that is only committed once the
//! whole input has been read, so a failed decode leaves the target unchanged.

pub use crate::core::layout::binary_size;

use crate::core::decoder::Decoder;
use crate::core::encoder::Encoder;
use crate::core::layout::zero_element_size;
use crate::core::length::LengthScope;
use crate::core::shape::Shape;
use crate::core::value::Value;
use crate::core::wire::Wire;
use crate::error::{ProtocolError, Result};
use tracing::trace;

/// Length of the buffer [`binary_write`] allocates for `value`.
///
/// Equal to [`binary_size`] except for a bare repeated-record payload (a
/// struct whose only field is a slice), which has no count field: its
/// buffer is sized to hold exactly the live elements.
pub fn encoded_len(shape: &Shape, value: &Value, max_align: usize) -> Result<usize> {
    let size = binary_size(shape, value, max_align)?;

    if let (Shape::Struct(st), Value::Struct(fields)) = (shape, value) {
        if let (Some(only), [Value::Slice(items)]) = (st.bare_slice(), fields.as_slice()) {
            if let (Shape::Slice { elem }, false) = (&only.shape, only.skip) {
                let elem_size =
                    zero_element_size(elem, only.name, &mut LengthScope::new(), max_align)?;
                return Ok(elem_size * items.len());
            }
        }
    }

    Ok(size)
}

/// Encode `value` into a freshly allocated, zero-initialized buffer
pub fn binary_write(shape: &Shape, value: &Value, max_align: usize) -> Result<Vec<u8>> {
    let len = encoded_len(shape, value, max_align)?;
    let mut buf = vec![0u8; len];
    binary_write_into(shape, value, &mut buf, max_align)?;
    Ok(buf)
}

/// Encode `value` into a caller-provided destination.
///
/// Returns the number of bytes the layout occupies. Padding bytes in `dst`
/// are left untouched. A bare repeated-record payload writes as many whole
/// elements as fit in `dst`, substituting zero elements past the live ones.
pub fn binary_write_into(
    shape: &Shape,
    value: &Value,
    dst: &mut [u8],
    max_align: usize,
) -> Result<usize> {
    let size = binary_size(shape, value, max_align)?;
    if dst.len() < size {
        return Err(ProtocolError::BufferTooSmall {
            needed: size,
            available: dst.len(),
        });
    }

    let mut encoder = Encoder::new(dst, max_align);
    encoder.write(shape, value)?;
    trace!(size, written = encoder.offset(), "binary value encoded");
    Ok(encoder.offset())
}

/// Decode `data` into `target`.
///
/// Empty input is a successful no-op. Otherwise `data` must hold at least
/// the size computed from the target's current state.
pub fn binary_read(data: &[u8], shape: &Shape, target: &mut Value, max_align: usize) -> Result<()> {
    if data.is_empty() {
        return Ok(());
    }

    let mut work = target.clone();
    read_into(data, shape, &mut work, max_align)?;
    *target = work;
    Ok(())
}

fn read_into(data: &[u8], shape: &Shape, work: &mut Value, max_align: usize) -> Result<()> {
    let size = binary_size(shape, work, max_align)?;
    if data.len() < size {
        return Err(ProtocolError::OutOfData {
            needed: size,
            available: data.len(),
        });
    }

    Decoder::new(data, max_align).read(shape, work)?;
    trace!(size, available = data.len(), "binary value decoded");
    Ok(())
}

/// Encoded size of a typed value
pub fn size_of_value<T: Wire>(value: &T, max_align: usize) -> Result<usize> {
    binary_size(&T::shape(), &value.to_value(), max_align)
}

/// Encode a typed value into a freshly allocated buffer
pub fn encode_value<T: Wire>(value: &T, max_align: usize) -> Result<Vec<u8>> {
    binary_write(&T::shape(), &value.to_value(), max_align)
}

/// Encode a typed value into a caller-provided destination
pub fn encode_value_into<T: Wire>(value: &T, dst: &mut [u8], max_align: usize) -> Result<usize> {
    binary_write_into(&T::shape(), &value.to_value(), dst, max_align)
}

/// Decode `data` into a typed value in place
pub fn decode_value<T: Wire>(data: &[u8], target: &mut T, max_align: usize) -> Result<()> {
    if data.is_empty() {
        return Ok(());
    }

    let mut work = target.to_value();
    read_into(data, &T::shape(), &mut work, max_align)?;
    target.apply_value(&work)
}
