//! Dynamic value tree walked by the encoder and decoder.
//!
//! Typed messages convert to and from [`Value`] through
//! [`Wire`](crate::core::wire::Wire); the engine itself only ever sees a
//! `(Shape, Value)` pair.

use num_complex::{Complex32, Complex64};

/// A value laid out according to a [`Shape`](crate::core::shape::Shape)
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    C64(Complex32),
    C128(Complex64),
    Array(Vec<Value>),
    Slice(Vec<Value>),
    /// Field values in declaration order
    Struct(Vec<Value>),
    /// Placeholder for a field of an unsupported type
    Opaque,
}

impl Value {
    /// Integer payload of this value, if it is an integer.
    ///
    /// Used to read length-source fields; `u64` values above `i64::MAX`
    /// saturate.
    pub fn as_count(&self) -> Option<i64> {
        match *self {
            Value::I8(v) => Some(i64::from(v)),
            Value::I16(v) => Some(i64::from(v)),
            Value::I32(v) => Some(i64::from(v)),
            Value::I64(v) => Some(v),
            Value::U8(v) => Some(i64::from(v)),
            Value::U16(v) => Some(i64::from(v)),
            Value::U32(v) => Some(i64::from(v)),
            Value::U64(v) => Some(i64::try_from(v).unwrap_or(i64::MAX)),
            _ => None,
        }
    }

    /// Short variant name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::C64(_) => "complex64",
            Value::C128(_) => "complex128",
            Value::Array(_) => "array",
            Value::Slice(_) => "slice",
            Value::Struct(_) => "struct",
            Value::Opaque => "opaque",
        }
    }
}
