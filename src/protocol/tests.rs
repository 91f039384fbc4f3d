// test-only module included via protocol/mod.rs
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::codec::{CodecContext, CodecRegistry};
use crate::protocol::dispatcher::Dispatcher;
use crate::protocol::msgcodec::DecodedMessage;
use crate::protocol::registry::MessageRegistry;
use crate::protocol::sysmsg::{register_system_messages, SessionAccepted, SessionClosed};
use crate::transport::packet::{decode_packet, pack_message, pack_raw};
use std::sync::{Arc, Mutex};

crate::binary_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Inventory {
        owner: u32,
        count: u16,
        slots: Vec<u16>,
    }
    length_of { count => slots }
}

#[test]
fn test_session_flow() {
    // =================== Setup: both peers share the registry ===================
    let codecs = CodecRegistry::with_defaults();
    let registry = MessageRegistry::new();
    register_system_messages(&registry, &codecs).expect("system messages");
    registry
        .register::<Inventory>("game.Inventory", codecs.require("binary").unwrap())
        .expect("register inventory");

    let log = Arc::new(Mutex::new(Vec::new()));
    let dispatcher = Dispatcher::new(registry.clone());

    let sink = log.clone();
    dispatcher
        .on::<SessionAccepted, _>(move |_| {
            sink.lock().unwrap().push("accepted".to_string());
            Ok(())
        })
        .unwrap();
    let sink = log.clone();
    dispatcher
        .on::<Inventory, _>(move |inv| {
            sink.lock().unwrap().push(format!("inventory {:?}", inv.slots));
            Ok(())
        })
        .unwrap();
    let sink = log.clone();
    dispatcher
        .on::<SessionClosed, _>(move |closed| {
            sink.lock().unwrap().push(format!("closed {}", closed.reason));
            Ok(())
        })
        .unwrap();

    // =================== Sender side: encode and frame ===================
    let ctx = CodecContext::new();
    let packets = vec![
        pack_message(&registry, &SessionAccepted {}, &ctx).unwrap(),
        pack_message(
            &registry,
            &Inventory {
                owner: 1,
                count: 3,
                slots: vec![10, 20, 30],
            },
            &ctx,
        )
        .unwrap(),
        pack_message(
            &registry,
            &SessionClosed {
                reason: SessionClosed::REASON_MANUAL,
            },
            &ctx,
        )
        .unwrap(),
    ];

    // =================== Receiver side: decode and dispatch ===================
    for packet in &packets {
        let decoded = decode_packet(&registry, packet).expect("decode");
        dispatcher.dispatch(&decoded).expect("dispatch");
    }

    assert_eq!(
        *log.lock().unwrap(),
        vec!["accepted", "inventory [10, 20, 30]", "closed 1"]
    );
}

#[test]
fn test_relay_forwards_unknown_ids_untouched() {
    let relay = MessageRegistry::new();
    let original = pack_raw(0xBEEF, &[1, 2, 3, 4]);

    let decoded = decode_packet(&relay, &original).expect("decode");
    let DecodedMessage::Raw(raw) = decoded else {
        panic!("relay has no registered types");
    };

    assert_eq!(pack_raw(raw.msg_id, &raw.data), original);
}
