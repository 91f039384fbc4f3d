//! # Message Trait
//!
//! [`Message`] is the object-safe face of a [`Wire`] type. Registries,
//! codecs and transports handle messages as `&dyn Message` or
//! `Box<dyn Message>` and downcast back to the concrete type when needed.
//!
//! Every `Wire + Debug + Send + Sync + 'static` type is a message; there is
//! nothing to implement by hand.

use crate::core::shape::Shape;
use crate::core::value::Value;
use crate::core::wire::Wire;
use crate::error::Result;
use std::any::{Any, TypeId};
use std::fmt::Debug;

/// A value that can travel as a message payload
pub trait Message: Any + Debug + Send + Sync {
    /// Shape of this message's type
    fn wire_shape(&self) -> Shape;

    /// Snapshot of this message as a value tree
    fn wire_value(&self) -> Value;

    /// Copy a decoded value tree back into this message
    fn apply_wire_value(&mut self, value: &Value) -> Result<()>;

    /// Rust type name, for diagnostics
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> Message for T
where
    T: Wire + Any + Debug + Send + Sync,
{
    fn wire_shape(&self) -> Shape {
        T::shape()
    }

    fn wire_value(&self) -> Value {
        self.to_value()
    }

    fn apply_wire_value(&mut self, value: &Value) -> Result<()> {
        self.apply_value(value)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl dyn Message {
    /// `TypeId` of the concrete message type
    pub fn message_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    pub fn is<T: Message>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Message>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}
