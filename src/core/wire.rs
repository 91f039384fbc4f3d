//! # Wire Schema
//!
//! The [`Wire`] trait is the static schema description of a type: its
//! [`Shape`], and conversions to and from the dynamic [`Value`] tree the
//! engine walks.
//!
//! Implementations are provided for every supported primitive, for
//! `num_complex` complex numbers, fixed arrays and `Vec`. `String`, `isize`
//! and `usize` implement `Wire` as unsupported types, so a message carrying
//! one is rejected with `InvalidType` at encode/decode time.
//!
//! User structs implement `Wire` through [`binary_struct!`](crate::binary_struct):
//!
//! ```rust
//! use packwire::binary_struct;
//! use packwire::core::serial::{decode_value, encode_value};
//!
//! binary_struct! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct Inventory {
//!         pub count: i32,
//!         pub items: Vec<i16>,
//!     }
//!     length_of { count => items }
//! }
//!
//! let inv = Inventory { count: 3, items: vec![1, 2, 3] };
//! let bytes = encode_value(&inv, 4).unwrap();
//! // 4 bytes of count, 3 * 2 bytes of items, padded to the struct alignment of 4
//! assert_eq!(bytes.len(), 12);
//!
//! let mut decoded = Inventory::default();
//! decode_value(&bytes, &mut decoded, 4).unwrap();
//! assert_eq!(decoded, inv);
//! ```

use crate::core::layout::mismatch;
use crate::core::shape::{Kind, Shape};
use crate::core::value::Value;
use crate::error::Result;
use num_complex::{Complex32, Complex64};

/// Static schema of a type encodable by the binary codec
pub trait Wire {
    /// Shape of every value of this type
    fn shape() -> Shape;

    /// Snapshot this value as a dynamic value tree
    fn to_value(&self) -> Value;

    /// Copy a decoded value tree back into `self`
    fn apply_value(&mut self, value: &Value) -> Result<()>;
}

macro_rules! impl_wire_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Wire for $ty {
                fn shape() -> Shape {
                    Shape::Primitive(Kind::$variant)
                }

                fn to_value(&self) -> Value {
                    Value::$variant(*self)
                }

                fn apply_value(&mut self, value: &Value) -> Result<()> {
                    match value {
                        Value::$variant(v) => {
                            *self = *v;
                            Ok(())
                        }
                        other => Err(mismatch(Kind::$variant.name(), other)),
                    }
                }
            }
        )*
    };
}

impl_wire_primitive! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Complex32 => C64,
    Complex64 => C128,
}

macro_rules! impl_wire_unsupported {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Wire for $ty {
                fn shape() -> Shape {
                    Shape::Unsupported(stringify!($ty))
                }

                fn to_value(&self) -> Value {
                    Value::Opaque
                }

                fn apply_value(&mut self, _value: &Value) -> Result<()> {
                    Ok(())
                }
            }
        )*
    };
}

// Variable-width and platform-width types have no fixed layout.
impl_wire_unsupported!(String, isize, usize);

impl<T: Wire, const N: usize> Wire for [T; N] {
    fn shape() -> Shape {
        Shape::array(T::shape(), N)
    }

    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(Wire::to_value).collect())
    }

    fn apply_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Array(items) => {
                for (slot, item) in self.iter_mut().zip(items) {
                    slot.apply_value(item)?;
                }
                Ok(())
            }
            other => Err(mismatch("array", other)),
        }
    }
}

impl<T: Wire + Default> Wire for Vec<T> {
    fn shape() -> Shape {
        Shape::slice(T::shape())
    }

    fn to_value(&self) -> Value {
        Value::Slice(self.iter().map(Wire::to_value).collect())
    }

    /// Applies element-wise, appending fresh elements as needed; never truncates
    fn apply_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Slice(items) => {
                for (i, item) in items.iter().enumerate() {
                    match self.get_mut(i) {
                        Some(slot) => slot.apply_value(item)?,
                        None => {
                            let mut fresh = T::default();
                            fresh.apply_value(item)?;
                            self.push(fresh);
                        }
                    }
                }
                Ok(())
            }
            other => Err(mismatch("slice", other)),
        }
    }
}

/// Field values of a struct value; used by [`binary_struct!`](crate::binary_struct)
#[doc(hidden)]
pub fn struct_fields<'v>(value: &'v Value, name: &'static str) -> Result<&'v [Value]> {
    match value {
        Value::Struct(fields) => Ok(fields),
        other => Err(mismatch(name, other)),
    }
}

/// Declare a struct and implement [`Wire`] for it.
///
/// Fields are encoded in declaration order. Two optional clauses follow the
/// struct body:
///
/// - `length_of { count => items }` declares the integer field `count` as
///   the element count of the `Vec` field `items`. The count field may also
///   live in an embedded struct or in any enclosing struct.
/// - `skip { field, ... }` excludes fields from the wire: they are
///   zero-filled on encode and keep their value on decode.
///
/// ```rust
/// use packwire::binary_struct;
///
/// binary_struct! {
///     #[derive(Debug, Default)]
///     pub struct Position {
///         pub x: f32,
///         pub y: f32,
///         pub cache: u32,
///     }
///     skip { cache }
/// }
/// ```
#[macro_export]
macro_rules! binary_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
        $(length_of { $($source:ident => $slice:ident),* $(,)? })?
        $(skip { $($skipped:ident),* $(,)? })?
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field : $ty,
            )*
        }

        impl $crate::core::wire::Wire for $name {
            fn shape() -> $crate::core::shape::Shape {
                let shape = $crate::core::shape::StructShape::new(stringify!($name))
                    $(.field(
                        stringify!($field),
                        <$ty as $crate::core::wire::Wire>::shape(),
                    ))*
                    $($(.length_of(stringify!($source), stringify!($slice)))*)?
                    $($(.skip(stringify!($skipped)))*)?;
                $crate::core::shape::Shape::Struct(shape)
            }

            fn to_value(&self) -> $crate::core::value::Value {
                $crate::core::value::Value::Struct(vec![
                    $($crate::core::wire::Wire::to_value(&self.$field)),*
                ])
            }

            #[allow(unused_mut, unused_variables)]
            fn apply_value(
                &mut self,
                value: &$crate::core::value::Value,
            ) -> $crate::error::Result<()> {
                let mut fields =
                    $crate::core::wire::struct_fields(value, stringify!($name))?.iter();
                $(
                    if let Some(field) = fields.next() {
                        $crate::core::wire::Wire::apply_value(&mut self.$field, field)?;
                    }
                )*
                Ok(())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shape::StructShape;

    crate::binary_struct! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Sample {
            count: u16,
            grid: [u8; 2],
            items: Vec<i16>,
            label: String,
        }
        length_of { count => items }
        skip { label }
    }

    #[test]
    fn test_macro_shape() {
        let expected = Shape::Struct(
            StructShape::new("Sample")
                .field("count", Shape::Primitive(Kind::U16))
                .field("grid", Shape::array(Shape::Primitive(Kind::U8), 2))
                .field("items", Shape::slice(Shape::Primitive(Kind::I16)))
                .field("label", Shape::Unsupported("String"))
                .length_of("count", "items")
                .skip("label"),
        );
        assert_eq!(Sample::shape(), expected);
    }

    #[test]
    fn test_value_roundtrip_through_tree() {
        let sample = Sample {
            count: 2,
            grid: [1, 2],
            items: vec![-1, 1],
            label: "kept".to_string(),
        };
        let mut copy = Sample {
            label: "kept".to_string(),
            ..Sample::default()
        };
        copy.apply_value(&sample.to_value()).expect("apply");
        assert_eq!(copy, sample);
    }

    #[test]
    fn test_vec_apply_never_truncates() {
        let mut items = vec![1u8, 2, 3];
        items
            .apply_value(&Value::Slice(vec![Value::U8(9)]))
            .expect("apply");
        assert_eq!(items, vec![9, 2, 3]);
    }

    #[test]
    fn test_apply_rejects_wrong_kind() {
        let mut x = 0u32;
        assert!(x.apply_value(&Value::I32(1)).is_err());
    }
}
