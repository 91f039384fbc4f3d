//! # Codec Adapter
//!
//! A [`Codec`] turns a [`Message`] into bytes and back. Codecs are looked up
//! by name through a [`CodecRegistry`], which the message registry consults
//! when a message type is declared.
//!
//! ## Components
//! - **Codec**: the encode/decode contract, with an optional `free` hook for
//!   codecs that hand out pooled buffers
//! - **CodecContext**: per-session resources passed to `encode`
//! - **CodecRegistry**: shared name → codec map
//! - **BinaryCodec**: the aligned binary struct codec (`"binary"`)

pub mod binary;

pub use binary::BinaryCodec;

use crate::config::{CodecConfig, DEFAULT_CODEC};
use crate::error::{constants, ProtocolError, Result};
use crate::protocol::message::Message;
use crate::utils::buffer_pool::BufferPool;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Encode/decode contract for message payloads
pub trait Codec: Send + Sync + Debug {
    /// Registry name of the codec
    fn name(&self) -> &'static str;

    /// MIME type advertised for payloads of this codec
    fn mime_type(&self) -> &'static str;

    /// Encode a message payload
    fn encode(&self, msg: &dyn Message, ctx: &CodecContext) -> Result<Vec<u8>>;

    /// Decode `data` into `msg` in place
    fn decode(&self, data: &[u8], msg: &mut dyn Message) -> Result<()>;

    /// Release resources `encode` allocated for `data`
    fn free(&self, _data: Vec<u8>, _ctx: &CodecContext) {}
}

/// Resources shared by the codecs of one session or peer
#[derive(Debug, Clone, Default)]
pub struct CodecContext {
    pool: Option<BufferPool>,
}

impl CodecContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context whose encode buffers are drawn from `pool`
    pub fn with_pool(pool: BufferPool) -> Self {
        Self { pool: Some(pool) }
    }

    /// Context configured from [`CodecConfig::buffer_pool_size`]
    pub fn from_config(config: &CodecConfig) -> Self {
        match config.buffer_pool_size {
            0 => Self::new(),
            size => Self::with_pool(BufferPool::new(size)),
        }
    }

    pub fn pool(&self) -> Option<&BufferPool> {
        self.pool.as_ref()
    }

    /// A zero-filled buffer of `len` bytes, pooled when a pool is present
    pub fn acquire(&self, len: usize) -> Vec<u8> {
        match &self.pool {
            Some(pool) => pool.acquire(len),
            None => vec![0u8; len],
        }
    }
}

/// Hand an encoded buffer back to the codec that produced it
pub fn free_codec_resource(codec: Option<&dyn Codec>, data: Vec<u8>, ctx: &CodecContext) {
    if let Some(codec) = codec {
        codec.free(data, ctx);
    }
}

/// Shared registry of codecs by name
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    codecs: Arc<RwLock<HashMap<&'static str, Arc<dyn Codec>>>>,
    default_name: Arc<str>,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self {
            codecs: Arc::default(),
            default_name: Arc::from(DEFAULT_CODEC),
        }
    }
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in codecs with default settings
    pub fn with_defaults() -> Self {
        Self::from_config(&CodecConfig::default())
    }

    /// Registry holding the built-in codecs configured from `config`
    pub fn from_config(config: &CodecConfig) -> Self {
        let binary: Arc<dyn Codec> = Arc::new(BinaryCodec::from_config(config));
        let codecs = HashMap::from([(binary.name(), binary)]);
        Self {
            codecs: Arc::new(RwLock::new(codecs)),
            default_name: Arc::from(config.default_codec.as_str()),
        }
    }

    /// Name of the codec handed out by [`default_codec`](Self::default_codec)
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// The configured default codec, failing with `UnknownCodec` when it is not registered
    pub fn default_codec(&self) -> Result<Arc<dyn Codec>> {
        self.require(&self.default_name)
    }

    /// Register a codec under its own name
    pub fn register(&self, codec: Arc<dyn Codec>) -> Result<()> {
        let mut codecs = self.codecs.write().map_err(|_| {
            ProtocolError::Custom(constants::ERR_CODEC_REGISTRY_WRITE_LOCK.to_string())
        })?;

        let name = codec.name();
        if codecs.contains_key(name) {
            return Err(ProtocolError::DuplicateCodec(name.to_string()));
        }

        debug!(codec = name, mime = codec.mime_type(), "codec registered");
        codecs.insert(name, codec);
        Ok(())
    }

    /// Look up a codec by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Codec>> {
        self.require(name).ok()
    }

    /// Look up a codec by name, failing with `UnknownCodec` when absent
    pub fn require(&self, name: &str) -> Result<Arc<dyn Codec>> {
        let codecs = self.codecs.read().map_err(|_| {
            ProtocolError::Custom(constants::ERR_CODEC_REGISTRY_READ_LOCK.to_string())
        })?;

        codecs
            .get(name)
            .cloned()
            .ok_or_else(|| ProtocolError::UnknownCodec(name.to_string()))
    }

    /// Names of all registered codecs
    pub fn names(&self) -> Vec<&'static str> {
        self.codecs
            .read()
            .map(|codecs| codecs.keys().copied().collect())
            .unwrap_or_default()
    }
}
