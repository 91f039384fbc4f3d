//! # Shapes
//!
//! Static description of a value's structure for binary encoding.
//!
//! A [`Shape`] is produced per type by [`Wire::shape`](crate::core::wire::Wire::shape)
//! and carries everything the layout resolver, encoder and decoder need:
//! primitive widths, array lengths, struct field order, which fields are
//! skipped, and which integer fields supply the element count of a sibling
//! slice.

use crate::core::value::Value;
use crate::error::{ProtocolError, Result};
use num_complex::{Complex32, Complex64};
use tracing::warn;

/// Primitive kinds supported by the binary codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// Two sequential `f32` (real, imaginary)
    C64,
    /// Two sequential `f64` (real, imaginary)
    C128,
}

impl Kind {
    /// Encoded width in bytes, which is also the natural alignment
    pub const fn width(self) -> usize {
        match self {
            Kind::Bool | Kind::I8 | Kind::U8 => 1,
            Kind::I16 | Kind::U16 => 2,
            Kind::I32 | Kind::U32 | Kind::F32 => 4,
            Kind::I64 | Kind::U64 | Kind::F64 | Kind::C64 => 8,
            Kind::C128 => 16,
        }
    }

    /// Zero value of this kind
    pub fn zero(self) -> Value {
        match self {
            Kind::Bool => Value::Bool(false),
            Kind::I8 => Value::I8(0),
            Kind::I16 => Value::I16(0),
            Kind::I32 => Value::I32(0),
            Kind::I64 => Value::I64(0),
            Kind::U8 => Value::U8(0),
            Kind::U16 => Value::U16(0),
            Kind::U32 => Value::U32(0),
            Kind::U64 => Value::U64(0),
            Kind::F32 => Value::F32(0.0),
            Kind::F64 => Value::F64(0.0),
            Kind::C64 => Value::C64(Complex32::new(0.0, 0.0)),
            Kind::C128 => Value::C128(Complex64::new(0.0, 0.0)),
        }
    }

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::C64 => "complex64",
            Kind::C128 => "complex128",
        }
    }
}

/// Structure of a value as seen by the codec
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Primitive(Kind),
    /// Fixed-length array; every element shares `elem`
    Array { elem: Box<Shape>, len: usize },
    /// Variable-length slice whose count comes from a length-source field
    Slice { elem: Box<Shape> },
    Struct(StructShape),
    /// A type the codec cannot lay out; carries the type name for errors
    Unsupported(&'static str),
}

impl Shape {
    pub fn array(elem: Shape, len: usize) -> Self {
        Shape::Array {
            elem: Box::new(elem),
            len,
        }
    }

    pub fn slice(elem: Shape) -> Self {
        Shape::Slice {
            elem: Box::new(elem),
        }
    }

    /// Build the zero value for this shape.
    ///
    /// Slices start empty, arrays are filled with zeroed elements and
    /// unsupported fields become [`Value::Opaque`].
    pub fn zero_value(&self) -> Value {
        match self {
            Shape::Primitive(kind) => kind.zero(),
            Shape::Array { elem, len } => Value::Array(vec![elem.zero_value(); *len]),
            Shape::Slice { .. } => Value::Slice(Vec::new()),
            Shape::Struct(st) => {
                Value::Struct(st.fields.iter().map(|f| f.shape.zero_value()).collect())
            }
            Shape::Unsupported(_) => Value::Opaque,
        }
    }

    /// Fail with `InvalidType` if any node of this shape is unsupported
    pub fn check_supported(&self) -> Result<()> {
        match self {
            Shape::Primitive(_) => Ok(()),
            Shape::Array { elem, .. } | Shape::Slice { elem } => elem.check_supported(),
            Shape::Struct(st) => st.fields.iter().try_for_each(|f| {
                f.shape.check_supported().map_err(|e| match e {
                    ProtocolError::InvalidType(inner) => {
                        ProtocolError::InvalidType(format!("{}.{}: {inner}", st.name, f.name))
                    }
                    other => other,
                })
            }),
            Shape::Unsupported(name) => Err(ProtocolError::InvalidType(format!(
                "unsupported type {name}"
            ))),
        }
    }

    pub fn is_slice(&self) -> bool {
        matches!(self, Shape::Slice { .. })
    }
}

/// One named field of a struct shape
#[derive(Debug, Clone, PartialEq)]
pub struct FieldShape {
    pub name: &'static str,
    pub shape: Shape,
    /// Name of the sibling slice field whose element count this field supplies
    pub length_of: Option<&'static str>,
    /// Skipped fields are zero-filled on encode and left untouched on decode
    pub skip: bool,
}

impl FieldShape {
    pub fn new(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            length_of: None,
            skip: false,
        }
    }
}

/// Ordered field list of a struct
#[derive(Debug, Clone, PartialEq)]
pub struct StructShape {
    pub name: &'static str,
    pub fields: Vec<FieldShape>,
}

impl StructShape {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Append a field in declaration order
    pub fn field(mut self, name: &'static str, shape: Shape) -> Self {
        self.fields.push(FieldShape::new(name, shape));
        self
    }

    /// Declare `source` as the element count of the slice field `slice`
    pub fn length_of(mut self, source: &'static str, slice: &'static str) -> Self {
        match self.fields.iter_mut().find(|f| f.name == source) {
            Some(field) => field.length_of = Some(slice),
            None => warn!(shape = self.name, field = source, "length source field not found"),
        }
        self
    }

    /// Mark a field as skipped
    pub fn skip(mut self, name: &'static str) -> Self {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.skip = true,
            None => warn!(shape = self.name, field = name, "skipped field not found"),
        }
        self
    }

    /// A struct whose only field is a slice is a bare repeated-record payload
    pub fn bare_slice(&self) -> Option<&FieldShape> {
        match self.fields.as_slice() {
            [only] if only.shape.is_slice() => Some(only),
            _ => None,
        }
    }
}
