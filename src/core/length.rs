//! # Slice-Length Resolver
//!
//! Finds the element count of a variable-length slice.
//!
//! A slice field carries no count of its own on the wire. Its count comes
//! from an integer field declared with
//! [`StructShape::length_of`](crate::core::shape::StructShape::length_of),
//! either in the same struct, in an embedded sub-struct, or in any enclosing
//! struct up to the top-level value.
//!
//! Every struct walked by the layout resolver, encoder or decoder opens a
//! frame. The frame is filled by scanning the struct's current field values
//! (recursing into nested struct fields, first declaration wins). Lookups go
//! from the innermost frame outward. A slice with no resolvable count has
//! length 0; this is never an error.
//!
//! Each entry remembers which field of its struct owns it: the count field
//! itself, or the nested struct field it was found under. Decoded counts and
//! counts merged up from a nested struct only replace an entry they own, so
//! the first declaration keeps winning after its value changes.

use crate::core::shape::{Shape, StructShape};
use crate::core::value::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
struct Source {
    count: i64,
    /// Field of the frame's struct that declares this count
    owner: &'static str,
}

type Frame = HashMap<&'static str, Source>;

/// Stack of length-source frames for one encode, decode or size call
#[derive(Debug, Default)]
pub(crate) struct LengthScope {
    frames: Vec<Frame>,
}

impl LengthScope {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Open a frame for a struct and pre-populate it from the struct's values
    pub(crate) fn enter(&mut self, shape: &StructShape, fields: &[Value]) {
        let mut frame = Frame::new();
        scan(shape, fields, None, &mut frame);
        self.frames.push(frame);
    }

    /// Close the current frame.
    ///
    /// `field` is the closed struct's field name in its parent, given only
    /// when the struct was reached directly as a field. Its counts then
    /// update parent entries it owns or the parent lacks. Array and slice
    /// elements keep their counts to themselves.
    pub(crate) fn exit(&mut self, field: Option<&'static str>) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let (Some(field), Some(parent)) = (field, self.frames.last_mut()) else {
            return;
        };
        for (slice, source) in frame {
            update(parent, slice, source.count, field);
        }
    }

    /// Record a freshly decoded value of the length-source field `field`
    pub(crate) fn record(&mut self, field: &'static str, slice: &'static str, count: i64) {
        if let Some(frame) = self.frames.last_mut() {
            update(frame, slice, count, field);
        }
    }

    /// Element count for the slice field `slice`; 0 when unresolved or negative
    pub(crate) fn resolve(&self, slice: &str) -> usize {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(slice))
            .and_then(|source| usize::try_from(source.count).ok())
            .unwrap_or(0)
    }
}

fn update(frame: &mut Frame, slice: &'static str, count: i64, owner: &'static str) {
    match frame.entry(slice) {
        Entry::Occupied(mut entry) => {
            if entry.get().owner == owner {
                entry.get_mut().count = count;
            }
        }
        Entry::Vacant(entry) => {
            entry.insert(Source { count, owner });
        }
    }
}

fn scan(shape: &StructShape, fields: &[Value], owner: Option<&'static str>, frame: &mut Frame) {
    for (field, value) in shape.fields.iter().zip(fields) {
        let owner = owner.unwrap_or(field.name);
        if let (Some(slice), Some(count)) = (field.length_of, value.as_count()) {
            frame.entry(slice).or_insert(Source { count, owner });
        }
        if let (Shape::Struct(inner), Value::Struct(values)) = (&field.shape, value) {
            scan(inner, values, Some(owner), frame);
        }
    }
}

/// Resolve the count of `slice` against a single container value.
///
/// Convenience for callers that hold a struct value and want to know how
/// many elements its slice will encode.
pub fn slice_len(shape: &Shape, value: &Value, slice: &str) -> usize {
    match (shape, value) {
        (Shape::Struct(st), Value::Struct(fields)) => {
            let mut scope = LengthScope::new();
            scope.enter(st, fields);
            scope.resolve(slice)
        }
        _ => 0,
    }
}
