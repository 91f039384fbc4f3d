//! # Message Transmitter
//!
//! Sends and receives registered messages over any tokio byte stream using
//! the LTV framing from [`ltv`](crate::transport::ltv).
//!
//! Encoded buffers drawn from a configured pool are copied into the frame
//! and returned to the pool right after the send.

use crate::codec::{free_codec_resource, CodecContext};
use crate::config::NetworkConfig;
use crate::error::Result;
use crate::protocol::message::Message;
use crate::protocol::msgcodec::{decode_message, encode_message, DecodedMessage, RawPacket};
use crate::protocol::registry::MessageRegistry;
use crate::transport::ltv::{Frame, LtvCodec};

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;
use tracing::{debug, instrument};

/// Sends and receives registered messages over an LTV-framed byte stream
pub struct MessageTransmitter<T> {
    framed: Framed<T, LtvCodec>,
    registry: MessageRegistry,
    ctx: CodecContext,
}

impl<T> MessageTransmitter<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(io: T, registry: MessageRegistry) -> Self {
        Self {
            framed: Framed::new(io, LtvCodec::default()),
            registry,
            ctx: CodecContext::new(),
        }
    }

    /// Transmitter using the configured frame limit and buffer pool
    pub fn with_config(io: T, registry: MessageRegistry, config: &NetworkConfig) -> Self {
        Self {
            framed: Framed::new(io, LtvCodec::from_config(&config.transport)),
            registry,
            ctx: CodecContext::from_config(&config.codec),
        }
    }

    pub fn codec_context(&self) -> &CodecContext {
        &self.ctx
    }

    /// Encode and send a registered message
    #[instrument(skip_all, level = "debug", fields(message = msg.type_name()))]
    pub async fn send(&mut self, msg: &dyn Message) -> Result<()> {
        let (data, meta) = encode_message(&self.registry, msg, &self.ctx)?;

        let payload = match self.ctx.pool() {
            Some(_) => {
                let payload = Bytes::copy_from_slice(&data);
                free_codec_resource(Some(meta.codec.as_ref()), data, &self.ctx);
                payload
            }
            None => Bytes::from(data),
        };

        debug!(msg_id = meta.id, len = payload.len(), "sending message");
        self.framed.send(Frame::new(meta.id, payload)).await
    }

    /// Send a pre-encoded payload as-is
    #[instrument(skip_all, level = "debug", fields(msg_id = packet.msg_id))]
    pub async fn send_raw(&mut self, packet: RawPacket) -> Result<()> {
        debug!(len = packet.data.len(), "sending raw packet");
        self.framed.send(Frame::new(packet.msg_id, packet.data)).await
    }

    /// Receive the next message, or `None` once the stream has ended
    #[instrument(skip_all, level = "debug")]
    pub async fn recv(&mut self) -> Result<Option<DecodedMessage>> {
        let Some(frame) = self.framed.next().await else {
            debug!("stream closed");
            return Ok(None);
        };
        let frame = frame?;

        debug!(msg_id = frame.msg_id, len = frame.payload.len(), "received message");
        decode_message(&self.registry, frame.msg_id, &frame.payload).map(Some)
    }

    /// Consume the transmitter, returning the underlying stream
    pub fn into_inner(self) -> T {
        self.framed.into_inner()
    }
}
