//! # Datagram Packets
//!
//! Framing for transports that preserve message boundaries (UDP datagrams,
//! WebSocket binary frames). The packet is the message ID followed by the
//! payload; its length comes from the transport.
//!
//! ## Wire Format
//! ```text
//! plain:    [MsgID(2, LE)] [Payload(N)]
//! headered: [Identity(1)=0x05] [Encode(1)=0] [Length(2)=0] [Version(1)=0x03]
//!           [Reserve(1)=0] [MsgID(2, LE)] [Payload(N)]
//! ```
//!
//! The headered form is used by WebSocket peers that expect the 8-byte
//! header. Only the message ID is read back; the other header bytes are
//! written as constants and ignored on receive.

use crate::codec::{free_codec_resource, CodecContext};
use crate::config::MSG_ID_SIZE;
use crate::error::{constants, ProtocolError, Result};
use crate::protocol::message::Message;
use crate::protocol::msgcodec::{decode_message, encode_message, DecodedMessage};
use crate::protocol::registry::{MessageId, MessageRegistry};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::debug;

/// Size of the fixed header in the headered packet form
pub const HEADER_SIZE: usize = 8;

const HEADER_IDENTITY: u8 = 0x05;
const HEADER_VERSION: u8 = 0x03;
const HEADER_MSG_ID_OFFSET: usize = 6;

/// Frame an already-encoded payload
pub fn pack_raw(msg_id: MessageId, payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(MSG_ID_SIZE + payload.len());
    buf.put_u16_le(msg_id);
    buf.put_slice(payload);
    buf.freeze()
}

/// Encode a registered message and frame it
pub fn pack_message(
    registry: &MessageRegistry,
    msg: &dyn Message,
    ctx: &CodecContext,
) -> Result<Bytes> {
    let (data, meta) = encode_message(registry, msg, ctx)?;
    let packet = pack_raw(meta.id, &data);
    free_codec_resource(Some(meta.codec.as_ref()), data, ctx);
    Ok(packet)
}

/// Split a packet into its message ID and payload
pub fn unpack(packet: &[u8]) -> Result<(MessageId, &[u8])> {
    if packet.len() < MSG_ID_SIZE {
        debug!(len = packet.len(), "{}", constants::ERR_MIN_PACKET);
        return Err(ProtocolError::InvalidHeader);
    }

    let (mut header, payload) = packet.split_at(MSG_ID_SIZE);
    Ok((header.get_u16_le(), payload))
}

/// Unpack and decode a packet in one step
pub fn decode_packet(registry: &MessageRegistry, packet: &[u8]) -> Result<DecodedMessage> {
    let (msg_id, payload) = unpack(packet)?;
    decode_message(registry, msg_id, payload)
}

/// Frame an already-encoded payload behind the 8-byte header
pub fn pack_with_header(msg_id: MessageId, payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    buf.put_u8(HEADER_IDENTITY);
    buf.put_u8(0); // encode
    buf.put_u16_le(0); // length
    buf.put_u8(HEADER_VERSION);
    buf.put_u8(0); // reserve
    buf.put_u16_le(msg_id);
    buf.put_slice(payload);
    buf.freeze()
}

/// Encode a registered message and frame it behind the 8-byte header
pub fn pack_message_with_header(
    registry: &MessageRegistry,
    msg: &dyn Message,
    ctx: &CodecContext,
) -> Result<Bytes> {
    let (data, meta) = encode_message(registry, msg, ctx)?;
    let packet = pack_with_header(meta.id, &data);
    free_codec_resource(Some(meta.codec.as_ref()), data, ctx);
    Ok(packet)
}

/// Split a headered packet into its message ID and payload
pub fn unpack_with_header(packet: &[u8]) -> Result<(MessageId, &[u8])> {
    if packet.len() < HEADER_SIZE {
        debug!(len = packet.len(), "{}", constants::ERR_MIN_PACKET);
        return Err(ProtocolError::InvalidHeader);
    }

    let (header, payload) = packet.split_at(HEADER_SIZE);
    let mut id = &header[HEADER_MSG_ID_OFFSET..];
    Ok((id.get_u16_le(), payload))
}

/// Unpack and decode a headered packet in one step
pub fn decode_packet_with_header(
    registry: &MessageRegistry,
    packet: &[u8],
) -> Result<DecodedMessage> {
    let (msg_id, payload) = unpack_with_header(packet)?;
    decode_message(registry, msg_id, payload)
}
