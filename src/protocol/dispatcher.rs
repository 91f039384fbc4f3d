//! # Message Dispatcher
//!
//! Routes decoded messages to handlers registered per message ID.

use crate::error::{constants, ProtocolError, Result};
use crate::protocol::message::Message;
use crate::protocol::msgcodec::DecodedMessage;
use crate::protocol::registry::{MessageId, MessageRegistry};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::trace;

type HandlerFn = dyn Fn(&DecodedMessage) -> Result<()> + Send + Sync + 'static;

/// Routes decoded messages to handlers by message ID.
///
/// Raw packets route the same way, so a handler registered on an ID with no
/// message type receives the untouched payload.
pub struct Dispatcher {
    registry: MessageRegistry,
    handlers: Arc<RwLock<HashMap<MessageId, Box<HandlerFn>>>>,
}

impl Dispatcher {
    pub fn new(registry: MessageRegistry) -> Self {
        Self {
            registry,
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Route message ID `msg_id` to `handler`, replacing any previous handler
    pub fn register<F>(&self, msg_id: MessageId, handler: F) -> Result<()>
    where
        F: Fn(&DecodedMessage) -> Result<()> + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.write().map_err(|_| {
            ProtocolError::Custom(constants::ERR_DISPATCHER_WRITE_LOCK.to_string())
        })?;

        handlers.insert(msg_id, Box::new(handler));
        Ok(())
    }

    /// Route the registered message type `T` to a typed handler
    pub fn on<T, F>(&self, handler: F) -> Result<()>
    where
        T: Message,
        F: Fn(&T) -> Result<()> + Send + Sync + 'static,
    {
        let meta = self
            .registry
            .by_type::<T>()
            .ok_or_else(|| ProtocolError::UnregisteredMessage(std::any::type_name::<T>().into()))?;

        self.register(meta.id, move |decoded| match decoded.downcast_ref::<T>() {
            Some(msg) => handler(msg),
            None => Err(ProtocolError::UnexpectedMessage(decoded.msg_id())),
        })
    }

    pub fn dispatch(&self, msg: &DecodedMessage) -> Result<()> {
        let msg_id = msg.msg_id();

        let handlers = self.handlers.read().map_err(|_| {
            ProtocolError::Custom(constants::ERR_DISPATCHER_READ_LOCK.to_string())
        })?;

        trace!(msg_id, raw = msg.is_raw(), "dispatching message");
        handlers
            .get(&msg_id)
            .ok_or(ProtocolError::UnexpectedMessage(msg_id))
            .and_then(|handler| handler(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecContext, CodecRegistry};
    use crate::protocol::msgcodec::{decode_message, encode_message};
    use std::sync::atomic::{AtomicU32, Ordering};

    crate::binary_struct! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Chat {
            channel: u8,
            seq: u32,
        }
    }

    fn setup() -> (MessageRegistry, Dispatcher) {
        let codecs = CodecRegistry::with_defaults();
        let registry = MessageRegistry::new();
        registry
            .register::<Chat>("test.Chat", codecs.require("binary").expect("binary"))
            .expect("register");
        let dispatcher = Dispatcher::new(registry.clone());
        (registry, dispatcher)
    }

    #[test]
    fn test_typed_handler_receives_message() {
        let (registry, dispatcher) = setup();
        let seen = Arc::new(AtomicU32::new(0));

        let sink = seen.clone();
        dispatcher
            .on::<Chat, _>(move |chat| {
                sink.store(chat.seq, Ordering::SeqCst);
                Ok(())
            })
            .expect("handler");

        let (data, meta) =
            encode_message(&registry, &Chat { channel: 1, seq: 77 }, &CodecContext::new())
                .expect("encode");
        let decoded = decode_message(&registry, meta.id, &data).expect("decode");

        dispatcher.dispatch(&decoded).expect("dispatch");
        assert_eq!(seen.load(Ordering::SeqCst), 77);
    }

    #[test]
    fn test_raw_packets_route_by_id() {
        let (registry, dispatcher) = setup();
        dispatcher
            .register(500, |msg| match msg {
                DecodedMessage::Raw(raw) if raw.data.len() == 2 => Ok(()),
                _ => Err(ProtocolError::Custom("unexpected payload".into())),
            })
            .expect("handler");

        let decoded = decode_message(&registry, 500, &[1, 2]).expect("decode");
        assert!(dispatcher.dispatch(&decoded).is_ok());
    }

    #[test]
    fn test_unhandled_id_is_unexpected() {
        let (registry, dispatcher) = setup();
        let decoded = decode_message(&registry, 9, &[]).expect("decode");
        assert!(matches!(
            dispatcher.dispatch(&decoded),
            Err(ProtocolError::UnexpectedMessage(9))
        ));
    }

    #[test]
    fn test_typed_handler_requires_registration() {
        let (_, dispatcher) = setup();
        let result = dispatcher.on::<u32, _>(|_| Ok(()));
        assert!(matches!(result, Err(ProtocolError::UnregisteredMessage(_))));
    }
}
