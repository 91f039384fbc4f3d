//! # Message Registry
//!
//! Maps message IDs and Rust types to their [`MessageMeta`]: the codec that
//! encodes them and a constructor for decoding into a fresh instance.
//!
//! IDs are normally derived from a dotted message name with
//! [`string_hash`], so both peers agree on them without a shared table.
//!
//! ```rust
//! use packwire::binary_struct;
//! use packwire::codec::CodecRegistry;
//! use packwire::protocol::registry::{string_hash, MessageRegistry};
//!
//! binary_struct! {
//!     #[derive(Debug, Default)]
//!     pub struct Heartbeat {
//!         pub tick: u32,
//!     }
//! }
//!
//! let codecs = CodecRegistry::with_defaults();
//! let registry = MessageRegistry::new();
//! let meta = registry
//!     .register::<Heartbeat>("game.Heartbeat", codecs.require("binary").unwrap())
//!     .unwrap();
//! assert_eq!(meta.id, string_hash("game.Heartbeat"));
//! assert!(registry.by_type::<Heartbeat>().is_some());
//! ```

use crate::codec::{Codec, CodecRegistry};
use crate::error::{constants, ProtocolError, Result};
use crate::protocol::message::Message;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Message identifier carried in every packet header
pub type MessageId = u16;

/// Creates an empty instance of a registered message type
pub type MessageConstructor = fn() -> Box<dyn Message>;

/// 16-bit hash of a message name.
///
/// `h = h + (h << 5) + c + (c << 7)` over the name's characters, with
/// wrapping 16-bit arithmetic.
pub fn string_hash(name: &str) -> MessageId {
    name.chars().fold(0u16, |hash, c| {
        let ch = c as u32 as u16;
        hash.wrapping_add(hash << 5)
            .wrapping_add(ch)
            .wrapping_add(ch << 7)
    })
}

/// Registration record of one message type
#[derive(Debug, Clone)]
pub struct MessageMeta {
    pub id: MessageId,
    pub name: String,
    pub type_id: TypeId,
    pub codec: Arc<dyn Codec>,
    constructor: MessageConstructor,
}

impl MessageMeta {
    /// A default-initialized instance of the message type
    pub fn new_message(&self) -> Box<dyn Message> {
        (self.constructor)()
    }
}

fn construct<T: Message + Default>() -> Box<dyn Message> {
    Box::new(T::default())
}

#[derive(Debug, Default)]
struct Tables {
    by_id: HashMap<MessageId, Arc<MessageMeta>>,
    by_type: HashMap<TypeId, Arc<MessageMeta>>,
}

/// Shared registry of message types
#[derive(Debug, Clone, Default)]
pub struct MessageRegistry {
    tables: Arc<RwLock<Tables>>,
}

impl MessageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under `name`, with its ID derived by [`string_hash`]
    pub fn register<T>(&self, name: &str, codec: Arc<dyn Codec>) -> Result<Arc<MessageMeta>>
    where
        T: Message + Default,
    {
        self.register_with_id::<T>(string_hash(name), name, codec)
    }

    /// Register `T` under `name` with the codec registry's default codec
    pub fn register_default<T>(
        &self,
        name: &str,
        codecs: &CodecRegistry,
    ) -> Result<Arc<MessageMeta>>
    where
        T: Message + Default,
    {
        self.register::<T>(name, codecs.default_codec()?)
    }

    /// Register `T` under an explicit message ID
    pub fn register_with_id<T>(
        &self,
        id: MessageId,
        name: &str,
        codec: Arc<dyn Codec>,
    ) -> Result<Arc<MessageMeta>>
    where
        T: Message + Default,
    {
        let mut tables = self.tables.write().map_err(|_| {
            ProtocolError::Custom(constants::ERR_MESSAGE_REGISTRY_WRITE_LOCK.to_string())
        })?;

        let type_id = TypeId::of::<T>();
        if let Some(existing) = tables.by_id.get(&id) {
            return Err(ProtocolError::DuplicateMessage(format!(
                "{name} (id {id} already used by {})",
                existing.name
            )));
        }
        if let Some(existing) = tables.by_type.get(&type_id) {
            return Err(ProtocolError::DuplicateMessage(format!(
                "{name} (type already registered as {})",
                existing.name
            )));
        }

        let meta = Arc::new(MessageMeta {
            id,
            name: name.to_string(),
            type_id,
            codec,
            constructor: construct::<T>,
        });
        tables.by_id.insert(id, meta.clone());
        tables.by_type.insert(type_id, meta.clone());

        debug!(id, name, codec = meta.codec.name(), "message registered");
        Ok(meta)
    }

    pub fn by_id(&self, id: MessageId) -> Option<Arc<MessageMeta>> {
        self.tables
            .read()
            .ok()
            .and_then(|tables| tables.by_id.get(&id).cloned())
    }

    pub fn by_type<T: Message>(&self) -> Option<Arc<MessageMeta>> {
        self.by_type_id(TypeId::of::<T>())
    }

    /// Metadata of the concrete type behind `msg`
    pub fn by_message(&self, msg: &dyn Message) -> Option<Arc<MessageMeta>> {
        self.by_type_id(msg.message_type_id())
    }

    fn by_type_id(&self, type_id: TypeId) -> Option<Arc<MessageMeta>> {
        self.tables
            .read()
            .ok()
            .and_then(|tables| tables.by_type.get(&type_id).cloned())
    }

    /// Number of registered message types
    pub fn len(&self) -> usize {
        self.tables.read().map(|t| t.by_id.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
