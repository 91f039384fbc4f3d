//! # Type Layout Resolver
//!
//! Computes alignment and encoded size for any `(Shape, Value)` pair.
//!
//! ## Rules
//! - Primitives are as wide as their kind and aligned to that width
//! - Arrays and slices align like their element; structs like their widest field
//! - Every alignment is capped at the caller's `max_align`
//! - A struct's size is the sum of each field's padding and size, padded
//!   again to the struct's own alignment
//! - A slice contributes `resolved_len * padded_element_size`, measured on
//!   its first live element or on a zero element when it is empty
//!
//! Layout is recomputed on every call. Nothing is cached.

use crate::core::length::LengthScope;
use crate::core::shape::{Kind, Shape, StructShape};
use crate::core::value::Value;
use crate::error::{constants, ProtocolError, Result};

/// Round `offset` up to the next multiple of `align`
#[inline]
pub fn align_up(offset: usize, align: usize) -> usize {
    if align <= 1 {
        return offset;
    }
    match offset % align {
        0 => offset,
        rem => offset + (align - rem),
    }
}

impl Shape {
    /// Alignment of this shape in bytes, capped at `max_align`
    pub fn alignment(&self, max_align: usize) -> usize {
        let natural = match self {
            Shape::Primitive(kind) => kind.width(),
            Shape::Array { elem, .. } | Shape::Slice { elem } => elem.alignment(max_align),
            Shape::Struct(st) => st
                .fields
                .iter()
                .map(|f| f.shape.alignment(max_align))
                .max()
                .unwrap_or(1),
            Shape::Unsupported(_) => 1,
        };
        natural.min(max_align.max(1))
    }
}

pub(crate) fn mismatch(expected: &str, found: &Value) -> ProtocolError {
    ProtocolError::InvalidType(format!(
        "{}: expected {expected}, found {}",
        constants::ERR_SHAPE_MISMATCH,
        found.kind_name()
    ))
}

pub(crate) fn unsupported(name: &str) -> ProtocolError {
    ProtocolError::InvalidType(format!("unsupported type {name}"))
}

pub(crate) fn check_arity(shape: &StructShape, fields: &[Value]) -> Result<()> {
    if shape.fields.len() == fields.len() {
        Ok(())
    } else {
        Err(ProtocolError::InvalidType(format!(
            "{}: struct {} has {} fields, value has {}",
            constants::ERR_SHAPE_MISMATCH,
            shape.name,
            shape.fields.len(),
            fields.len()
        )))
    }
}

fn check_kind(kind: Kind, value: &Value) -> Result<()> {
    let matches = matches!(
        (kind, value),
        (Kind::Bool, Value::Bool(_))
            | (Kind::I8, Value::I8(_))
            | (Kind::I16, Value::I16(_))
            | (Kind::I32, Value::I32(_))
            | (Kind::I64, Value::I64(_))
            | (Kind::U8, Value::U8(_))
            | (Kind::U16, Value::U16(_))
            | (Kind::U32, Value::U32(_))
            | (Kind::U64, Value::U64(_))
            | (Kind::F32, Value::F32(_))
            | (Kind::F64, Value::F64(_))
            | (Kind::C64, Value::C64(_))
            | (Kind::C128, Value::C128(_))
    );
    if matches {
        Ok(())
    } else {
        Err(mismatch(kind.name(), value))
    }
}

/// Size walk shared by the public sizing entry point, the encoder and the decoder.
///
/// `key` is the name of the field being measured; slices use it to find
/// their length source. `merge_up` is set when a struct is reached directly
/// as a field of its parent.
pub(crate) fn measure(
    shape: &Shape,
    value: &Value,
    key: &'static str,
    scope: &mut LengthScope,
    max_align: usize,
    merge_up: bool,
) -> Result<usize> {
    match (shape, value) {
        (Shape::Primitive(kind), value) => {
            check_kind(*kind, value)?;
            Ok(kind.width())
        }
        (Shape::Array { elem, len }, Value::Array(items)) => {
            let size = if *len > 0 {
                measure_representative(elem, items, key, scope, max_align)?
            } else {
                0
            };
            repeat(size, shape.alignment(max_align), *len, key)
        }
        (Shape::Slice { elem }, Value::Slice(items)) => {
            let len = scope.resolve(key);
            let size = if len > 0 {
                measure_representative(elem, items, key, scope, max_align)?
            } else {
                0
            };
            repeat(size, shape.alignment(max_align), len, key)
        }
        (Shape::Struct(st), Value::Struct(fields)) => {
            check_arity(st, fields)?;
            scope.enter(st, fields);
            let mut size = 0;
            for (field, value) in st.fields.iter().zip(fields) {
                let field_size = measure(&field.shape, value, field.name, scope, max_align, true)?;
                size = checked_align_up(size, field.shape.alignment(max_align))
                    .and_then(|offset| offset.checked_add(field_size))
                    .ok_or_else(|| size_overflow(field.name))?;
            }
            scope.exit(merge_up.then_some(key));
            checked_align_up(size, shape.alignment(max_align))
                .ok_or_else(|| size_overflow(st.name))
        }
        (Shape::Unsupported(name), _) => Err(unsupported(name)),
        (Shape::Array { .. }, other) => Err(mismatch("array", other)),
        (Shape::Slice { .. }, other) => Err(mismatch("slice", other)),
        (Shape::Struct(st), other) => Err(mismatch(st.name, other)),
    }
}

/// Size of `len` elements of `size` bytes, each padded to `align`
fn repeat(size: usize, align: usize, len: usize, key: &str) -> Result<usize> {
    checked_align_up(size, align)
        .and_then(|unit| unit.checked_mul(len))
        .ok_or_else(|| size_overflow(key))
}

/// [`align_up`] that reports overflow instead of wrapping
pub(crate) fn checked_align_up(offset: usize, align: usize) -> Option<usize> {
    if align <= 1 {
        return Some(offset);
    }
    match offset % align {
        0 => Some(offset),
        rem => offset.checked_add(align - rem),
    }
}

fn size_overflow(name: &str) -> ProtocolError {
    ProtocolError::InvalidType(format!("{}: {name}", constants::ERR_SIZE_OVERFLOW))
}

/// Measure one element: the first live one, or a zero element if there is none
fn measure_representative(
    elem: &Shape,
    items: &[Value],
    key: &'static str,
    scope: &mut LengthScope,
    max_align: usize,
) -> Result<usize> {
    match items.first() {
        Some(first) => measure(elem, first, key, scope, max_align, false),
        None => measure(elem, &elem.zero_value(), key, scope, max_align, false),
    }
}

/// Size of one zero-valued element, the unit of a bare repeated-record payload
pub(crate) fn zero_element_size(
    elem: &Shape,
    key: &'static str,
    scope: &mut LengthScope,
    max_align: usize,
) -> Result<usize> {
    measure(elem, &elem.zero_value(), key, scope, max_align, false)
}

/// Encoded size of `value` laid out as `shape`.
///
/// Fails with `InvalidType` if the shape contains an unsupported type
/// anywhere, even inside a slice that currently resolves to zero elements.
pub fn binary_size(shape: &Shape, value: &Value, max_align: usize) -> Result<usize> {
    shape.check_supported()?;
    measure(shape, value, "", &mut LengthScope::new(), max_align, false)
}
