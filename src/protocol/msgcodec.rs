//! # Message Encoding
//!
//! Bridges registered messages and their codecs. Encoding looks the
//! message's metadata up by type; decoding looks it up by the ID read from
//! the transport header.
//!
//! A packet whose ID is not registered is not an error: it decodes to a
//! [`RawPacket`] so relays and proxies can forward traffic they do not
//! understand.

use crate::codec::CodecContext;
use crate::error::{ProtocolError, Result};
use crate::protocol::message::Message;
use crate::protocol::registry::{MessageId, MessageMeta, MessageRegistry};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{instrument, trace};

/// Payload of a message ID with no registered type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPacket {
    pub msg_id: MessageId,
    pub data: Bytes,
}

/// Result of decoding one packet
#[derive(Debug)]
pub enum DecodedMessage {
    /// A registered message and its metadata
    Message {
        msg: Box<dyn Message>,
        meta: Arc<MessageMeta>,
    },
    /// An unregistered ID, passed through untouched
    Raw(RawPacket),
}

impl DecodedMessage {
    pub fn msg_id(&self) -> MessageId {
        match self {
            Self::Message { meta, .. } => meta.id,
            Self::Raw(raw) => raw.msg_id,
        }
    }

    pub fn message(&self) -> Option<&dyn Message> {
        match self {
            Self::Message { msg, .. } => Some(msg.as_ref()),
            Self::Raw(_) => None,
        }
    }

    /// The decoded message as a concrete type
    pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
        self.message().and_then(|msg| msg.downcast_ref::<T>())
    }

    pub fn into_message(self) -> Option<Box<dyn Message>> {
        match self {
            Self::Message { msg, .. } => Some(msg),
            Self::Raw(_) => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}

/// Encode a registered message with its codec
#[instrument(skip_all, fields(message = msg.type_name()))]
pub fn encode_message(
    registry: &MessageRegistry,
    msg: &dyn Message,
    ctx: &CodecContext,
) -> Result<(Vec<u8>, Arc<MessageMeta>)> {
    let meta = registry
        .by_message(msg)
        .ok_or_else(|| ProtocolError::UnregisteredMessage(msg.type_name().to_string()))?;

    let data = meta.codec.encode(msg, ctx)?;
    trace!(id = meta.id, len = data.len(), "message encoded");
    Ok((data, meta))
}

/// Decode the payload of message `msg_id`
#[instrument(skip(registry, data), fields(len = data.len()))]
pub fn decode_message(
    registry: &MessageRegistry,
    msg_id: MessageId,
    data: &[u8],
) -> Result<DecodedMessage> {
    let Some(meta) = registry.by_id(msg_id) else {
        trace!("unregistered id, passing raw packet through");
        return Ok(DecodedMessage::Raw(RawPacket {
            msg_id,
            data: Bytes::copy_from_slice(data),
        }));
    };

    let mut msg = meta.new_message();
    meta.codec.decode(data, &mut *msg)?;
    trace!(name = %meta.name, "message decoded");
    Ok(DecodedMessage::Message { msg, meta })
}

/// Decode `data` into an existing message of a registered type
pub fn decode_message_by_type(
    registry: &MessageRegistry,
    data: &[u8],
    msg: &mut dyn Message,
) -> Result<Arc<MessageMeta>> {
    let meta = registry
        .by_message(msg)
        .ok_or_else(|| ProtocolError::UnregisteredMessage(msg.type_name().to_string()))?;

    meta.codec.decode(data, msg)?;
    Ok(meta)
}
