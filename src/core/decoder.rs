//! # Decoder
//!
//! Mirror of the [encoder](crate::core::encoder): same alignment, same field
//! order, same bare-slice rule. Slices are grown with zero elements up to
//! their resolved count and never truncated. Skipped fields advance the
//! cursor without touching the target.

use crate::core::layout::{align_up, check_arity, measure, mismatch, unsupported, zero_element_size};
use crate::core::length::LengthScope;
use crate::core::shape::{FieldShape, Kind, Shape};
use crate::core::value::Value;
use crate::error::{ProtocolError, Result};
use bytes::Buf;
use num_complex::{Complex32, Complex64};

pub(crate) struct Decoder<'a> {
    buf: &'a [u8],
    offset: usize,
    max_align: usize,
    scope: LengthScope,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(buf: &'a [u8], max_align: usize) -> Self {
        Self {
            buf,
            offset: 0,
            max_align,
            scope: LengthScope::new(),
        }
    }

    /// Decode a top-level value in place
    pub(crate) fn read(&mut self, shape: &Shape, target: &mut Value) -> Result<()> {
        self.value(shape, target, "", true, false)
    }

    fn value(
        &mut self,
        shape: &Shape,
        target: &mut Value,
        key: &'static str,
        top: bool,
        merge_up: bool,
    ) -> Result<()> {
        self.offset = align_up(self.offset, shape.alignment(self.max_align));

        match (shape, target) {
            (Shape::Primitive(kind), target) => {
                *target = self.primitive(*kind)?;
                Ok(())
            }
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
                    if let (Some(only), [Value::Slice(items)]) =
                        (st.bare_slice(), fields.as_mut_slice())
                    {
                        return self.bare_slice(only, items);
                    }
                }

                self.scope.enter(st, fields);
                for (field, target) in st.fields.iter().zip(fields.iter_mut()) {
                    if field.skip {
                        self.skip(field, target)?;
                        continue;
                    }
                    self.value(&field.shape, target, field.name, false, true)?;
                    if let (Some(slice), Some(count)) = (field.length_of, target.as_count()) {
                        self.scope.record(field.name, slice, count);
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

    /// Grow `items` to `len` with zero elements, then decode each in place
    fn elements(
        &mut self,
        elem: &Shape,
        items: &mut Vec<Value>,
        len: usize,
        key: &'static str,
    ) -> Result<()> {
        if items.len() < len {
            self.ensure_room(elem, len, key)?;
            items.resize(len, elem.zero_value());
        }
        for item in items.iter_mut().take(len) {
            self.value(elem, item, key, false, false)?;
        }
        Ok(())
    }

    /// A top-level struct whose only field is a slice consumes the whole
    /// remaining input as repeated elements.
    /// Fail with `OutOfData` unless `len` elements can fit in the rest of the input.
    ///
    /// Counts come off the wire, so this runs before the target grows.
    /// Zero-sized elements are bounded as if they took one byte each.
    fn ensure_room(&mut self, elem: &Shape, len: usize, key: &'static str) -> Result<()> {
        let unit = zero_element_size(elem, key, &mut self.scope, self.max_align)?;
        let unit = align_up(unit, elem.alignment(self.max_align)).max(1);
        let available = self.buf.len();
        match len.checked_mul(unit).and_then(|n| n.checked_add(self.offset)) {
            Some(end) if end <= available => Ok(()),
            end => Err(ProtocolError::OutOfData {
                needed: end.unwrap_or(usize::MAX),
                available,
            }),
        }
    }

    fn bare_slice(&mut self, field: &FieldShape, items: &mut Vec<Value>) -> Result<()> {
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

    fn skip(&mut self, field: &FieldShape, target: &Value) -> Result<()> {
        self.offset = align_up(self.offset, field.shape.alignment(self.max_align));
        let size = measure(
            &field.shape,
            target,
            field.name,
            &mut self.scope,
            self.max_align,
            true,
        )?;
        self.take(size)?;
        Ok(())
    }

    /// Consume the next `n` bytes of input
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.offset + n;
        if end > self.buf.len() {
            return Err(ProtocolError::OutOfData {
                needed: end,
                available: self.buf.len(),
            });
        }
        let buf: &'a [u8] = self.buf;
        let src = &buf[self.offset..end];
        self.offset = end;
        Ok(src)
    }

    fn primitive(&mut self, kind: Kind) -> Result<Value> {
        let mut src = self.take(kind.width())?;
        let value = match kind {
            Kind::Bool => Value::Bool(src.get_u8() != 0),
            Kind::I8 => Value::I8(src.get_i8()),
            Kind::I16 => Value::I16(src.get_i16_le()),
            Kind::I32 => Value::I32(src.get_i32_le()),
            Kind::I64 => Value::I64(src.get_i64_le()),
            Kind::U8 => Value::U8(src.get_u8()),
            Kind::U16 => Value::U16(src.get_u16_le()),
            Kind::U32 => Value::U32(src.get_u32_le()),
            Kind::U64 => Value::U64(src.get_u64_le()),
            Kind::F32 => Value::F32(src.get_f32_le()),
            Kind::F64 => Value::F64(src.get_f64_le()),
            Kind::C64 => {
                let re = src.get_f32_le();
                Value::C64(Complex32::new(re, src.get_f32_le()))
            }
            Kind::C128 => {
                let re = src.get_f64_le();
                Value::C128(Complex64::new(re, src.get_f64_le()))
            }
        };
        Ok(value)
    }
}
