//! # Stream Framing
//!
//! Length-type-value framing for byte streams (TCP). Each frame carries its
//! own size so the decoder can find message boundaries.
//!
//! ## Wire Format
//! ```text
//! [Size(2, LE)] [MsgID(2, LE)] [Payload(N)]      Size = 2 + N
//! ```
//!
//! ## Limits
//! - Size must cover at least the message ID
//! - Size above the configured maximum is rejected before any payload is buffered

use crate::config::{TransportConfig, MAX_PACKET_SIZE, MSG_ID_SIZE};
use crate::error::{ProtocolError, Result};
use crate::protocol::registry::MessageId;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// Length of the size prefix
pub const SIZE_FIELD_LEN: usize = 2;

/// One framed message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub msg_id: MessageId,
    pub payload: Bytes,
}

impl Frame {
    pub fn new(msg_id: MessageId, payload: impl Into<Bytes>) -> Self {
        Self {
            msg_id,
            payload: payload.into(),
        }
    }
}

/// Tokio codec for LTV frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LtvCodec {
    max_packet_size: usize,
}

impl LtvCodec {
    /// Codec accepting frame bodies (ID + payload) up to `max_packet_size` bytes
    pub fn new(max_packet_size: usize) -> Self {
        Self {
            max_packet_size: max_packet_size.min(MAX_PACKET_SIZE),
        }
    }

    pub fn from_config(config: &TransportConfig) -> Self {
        Self::new(config.max_packet_size)
    }

    pub fn max_packet_size(&self) -> usize {
        self.max_packet_size
    }
}

impl Default for LtvCodec {
    fn default() -> Self {
        Self::new(MAX_PACKET_SIZE)
    }
}

impl Decoder for LtvCodec {
    type Item = Frame;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        if src.len() < SIZE_FIELD_LEN {
            return Ok(None);
        }

        let size = usize::from(u16::from_le_bytes([src[0], src[1]]));
        if size < MSG_ID_SIZE {
            return Err(ProtocolError::InvalidHeader);
        }
        if size > self.max_packet_size {
            return Err(ProtocolError::OversizedPacket(size));
        }

        let total = SIZE_FIELD_LEN + size;
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }

        src.advance(SIZE_FIELD_LEN);
        let mut body = src.split_to(size);
        let msg_id = body.get_u16_le();

        Ok(Some(Frame {
            msg_id,
            payload: body.freeze(),
        }))
    }
}

impl Encoder<Frame> for LtvCodec {
    type Error = ProtocolError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<()> {
        let size = MSG_ID_SIZE + frame.payload.len();
        if size > self.max_packet_size {
            return Err(ProtocolError::OversizedPacket(size));
        }
        let size_field = u16::try_from(size).map_err(|_| ProtocolError::OversizedPacket(size))?;

        dst.reserve(SIZE_FIELD_LEN + size);
        dst.put_u16_le(size_field);
        dst.put_u16_le(frame.msg_id);
        dst.put_slice(&frame.payload);
        Ok(())
    }
}
