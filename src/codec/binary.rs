//! # Binary Codec
//!
//! Adapter exposing the aligned binary struct engine as a [`Codec`] named
//! `"binary"`. Payloads carry no header; the message ID travels in the
//! transport framing.

use crate::codec::{Codec, CodecContext};
use crate::config::{CodecConfig, DEFAULT_MAX_ALIGN};
use crate::core::serial::{binary_read, binary_write_into, encoded_len};
use crate::error::Result;
use crate::protocol::message::Message;
use tracing::trace;

/// Aligned binary struct codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryCodec {
    max_align: usize,
}

impl BinaryCodec {
    pub const NAME: &'static str = "binary";
    pub const MIME_TYPE: &'static str = "application/binary";

    pub fn new(max_align: usize) -> Self {
        Self { max_align }
    }

    pub fn from_config(config: &CodecConfig) -> Self {
        Self::new(config.max_align)
    }

    pub fn max_align(&self) -> usize {
        self.max_align
    }
}

impl Default for BinaryCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ALIGN)
    }
}

impl Codec for BinaryCodec {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn mime_type(&self) -> &'static str {
        Self::MIME_TYPE
    }

    fn encode(&self, msg: &dyn Message, ctx: &CodecContext) -> Result<Vec<u8>> {
        let shape = msg.wire_shape();
        let value = msg.wire_value();

        let len = encoded_len(&shape, &value, self.max_align)?;
        let mut buf = ctx.acquire(len);
        if let Err(e) = binary_write_into(&shape, &value, &mut buf, self.max_align) {
            self.free(buf, ctx);
            return Err(e);
        }

        trace!(message = msg.type_name(), len, "binary payload encoded");
        Ok(buf)
    }

    fn decode(&self, data: &[u8], msg: &mut dyn Message) -> Result<()> {
        let shape = msg.wire_shape();
        let mut value = msg.wire_value();
        binary_read(data, &shape, &mut value, self.max_align)?;
        msg.apply_wire_value(&value)
    }

    fn free(&self, data: Vec<u8>, ctx: &CodecContext) {
        if let Some(pool) = ctx.pool() {
            pool.release(data);
        }
    }
}
