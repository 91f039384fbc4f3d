//! # Encoder
//!
//! Walks a value depth-first and writes it into a destination buffer.
//!
//! Every value is written at an offset rounded up to its alignment.
//! Primitives are little-endian; complex numbers are written as two floats,
//! real part first. Padding bytes are never written, so they keep whatever
//! the destination held (zero for buffers allocated by this crate).

use crate::core::layout::{align_up, check_arity, measure, mismatch, unsupported, zero_element_size};
use crate::core::length::LengthScope;
use crate::core::shape::{FieldShape, Kind, Shape};
use crate::core::value::Value;
use crate::error::{ProtocolError, Result};
use bytes::BufMut;

pub(crate) struct Encoder<'a> {
    buf: &'a mut [u8],
    offset: usize,
    max_align: usize,
    scope: LengthScope,
}

impl<'a> Encoder<'a> {
    pub(crate) fn new(buf: &'a mut [u8], max_align: usize) -> Self {
        Self {
            buf,
            offset: 0,
            max_align,
            scope: LengthScope::new(),
        }
    }

    /// Bytes consumed so far, padding included
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    /// Encode a top-level value
    pub(crate) fn write(&mut self, shape: &Shape, value: &Value) -> Result<()> {
        self.value(shape, value, "", true, false)
    }

    fn value(
        &mut self,
        shape: &Shape,
        value: &Value,
        key: &'static str,
        top: bool,
        merge_up: bool,
    ) -> Result<()> {
        self.offset = align_up(self.offset, shape.alignment(self.max_align));

        match (shape, value) {
            (Shape::Primitive(kind), value) => self.primitive(*kind, value),
            (Shape::Array { elem, len }, Value::Array(items)) => {
                self.elements(elem, items, *len, key)
            }
            (Shape::Slice { elem }, Value::Slice(items)) => {
                let len = self.scope.resolve(key);
                self.elements(elem, items, len, key)
            }
            (Shape::Struct(st), Value::Struct(fields)) => {
                check_arity(st, fields)?;
                if top {
                    if let (Some(only), [Value::Slice(items)]) = (st.bare_slice(), fields.as_slice())
                    {
                        return self.bare_slice(only, items);
                    }
                }

                self.scope.enter(st, fields);
                for (field, value) in st.fields.iter().zip(fields) {
                    if field.skip {
                        self.zero_fill(field, value)?;
                    } else {
                        self.value(&field.shape, value, field.name, false, true)?;
                    }
                }
                self.scope.exit(merge_up.then_some(key));
                self.offset = align_up(self.offset, shape.alignment(self.max_align));
                Ok(())
            }
            (Shape::Unsupported(name), _) => Err(unsupported(name)),
            (Shape::Array { .. }, other) => Err(mismatch("array", other)),
            (Shape::Slice { .. }, other) => Err(mismatch("slice", other)),
            (Shape::Struct(st), other) => Err(mismatch(st.name, other)),
        }
    }

    /// Write `len` elements; positions past the live items are written as zero elements
    fn elements(
        &mut self,
        elem: &Shape,
        items: &[Value],
        len: usize,
        key: &'static str,
    ) -> Result<()> {
        let zero = elem.zero_value();
        for i in 0..len {
            let item = items.get(i).unwrap_or(&zero);
            self.value(elem, item, key, false, false)?;
        }
        Ok(())
    }

    /// A top-level struct whose only field is a slice writes as many whole
    /// elements as fit in the remaining destination space.
    fn bare_slice(&mut self, field: &FieldShape, items: &[Value]) -> Result<()> {
        let Shape::Slice { elem } = &field.shape else {
            return Ok(());
        };
        if field.skip {
            return Ok(());
        }

        let elem_size = zero_element_size(elem, field.name, &mut self.scope, self.max_align)?;
        let remaining = self.buf.len().saturating_sub(self.offset);
        let count = remaining.checked_div(elem_size).unwrap_or(0);
        self.elements(elem, items, count, field.name)
    }

    /// Skipped fields occupy their computed size and are written as zeros
    fn zero_fill(&mut self, field: &FieldShape, value: &Value) -> Result<()> {
        self.offset = align_up(self.offset, field.shape.alignment(self.max_align));
        let size = measure(
            &field.shape,
            value,
            field.name,
            &mut self.scope,
            self.max_align,
            true,
        )?;
        self.slot(size)?.fill(0);
        Ok(())
    }

    /// Reserve the next `n` bytes of the destination
    fn slot(&mut self, n: usize) -> Result<&mut [u8]> {
        let end = self.offset + n;
        if end > self.buf.len() {
            return Err(ProtocolError::BufferTooSmall {
                needed: end,
                available: self.buf.len(),
            });
        }
        let start = self.offset;
        self.offset = end;
        Ok(&mut self.buf[start..end])
    }

    fn primitive(&mut self, kind: Kind, value: &Value) -> Result<()> {
        let mut dst = self.slot(kind.width())?;
        match (kind, value) {
            (Kind::Bool, Value::Bool(v)) => dst.put_u8(u8::from(*v)),
            (Kind::I8, Value::I8(v)) => dst.put_i8(*v),
            (Kind::I16, Value::I16(v)) => dst.put_i16_le(*v),
            (Kind::I32, Value::I32(v)) => dst.put_i32_le(*v),
            (Kind::I64, Value::I64(v)) => dst.put_i64_le(*v),
            (Kind::U8, Value::U8(v)) => dst.put_u8(*v),
            (Kind::U16, Value::U16(v)) => dst.put_u16_le(*v),
            (Kind::U32, Value::U32(v)) => dst.put_u32_le(*v),
            (Kind::U64, Value::U64(v)) => dst.put_u64_le(*v),
            (Kind::F32, Value::F32(v)) => dst.put_f32_le(*v),
            (Kind::F64, Value::F64(v)) => dst.put_f64_le(*v),
            (Kind::C64, Value::C64(v)) => {
                dst.put_f32_le(v.re);
                dst.put_f32_le(v.im);
            }
            (Kind::C128, Value::C128(v)) => {
                dst.put_f64_le(v.re);
                dst.put_f64_le(v.im);
            }
            (kind, other) => return Err(mismatch(kind.name(), other)),
        }
        Ok(())
    }
}
