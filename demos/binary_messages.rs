//! Example: Exchanging binary messages over a stream
//!
//! Two peers share a message registry and talk over an in-memory duplex
//! pipe. The same code works for any tokio `AsyncRead + AsyncWrite`, such
//! as a `TcpStream`.
//!
//! Run with: `cargo run --example binary_messages`

#![allow(clippy::uninlined_format_args)]

use packwire::binary_struct;
use packwire::codec::CodecRegistry;
use packwire::config::NetworkConfig;
use packwire::core::serial::encode_value;
use packwire::protocol::dispatcher::Dispatcher;
use packwire::protocol::msgcodec::RawPacket;
use packwire::protocol::registry::MessageRegistry;
use packwire::protocol::sysmsg::{register_system_messages, SessionClosed, SessionInit};
use packwire::transport::MessageTransmitter;
use packwire::utils::logging::init_logging;
use tracing::info;

binary_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Inventory {
        pub owner: u32,
        pub count: u16,
        pub slots: Vec<u32>,
    }
    length_of { count => slots }
}

binary_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Move {
        pub dir: u8,
        pub x: i32,
        pub y: i32,
    }
}

fn build_registry(codecs: &CodecRegistry) -> packwire::Result<MessageRegistry> {
    let registry = MessageRegistry::new();
    register_system_messages(&registry, codecs)?;
    registry.register_default::<Inventory>("demo.Inventory", codecs)?;
    registry.register_default::<Move>("demo.Move", codecs)?;
    Ok(registry)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = NetworkConfig::default_with_overrides(|c| c.codec.buffer_pool_size = 8);
    config.validate_strict()?;
    init_logging(&config.logging)?;

    let codecs = CodecRegistry::from_config(&config.codec);
    let registry = build_registry(&codecs)?;

    println!("=== Binary Messages Demo ===\n");

    let inventory = Inventory {
        owner: 7,
        count: 3,
        slots: vec![101, 102, 103],
    };
    let bytes = encode_value(&inventory, config.codec.max_align)?;
    println!("Inventory layout ({} bytes): {:02X?}\n", bytes.len(), bytes);

    let (client_io, server_io) = tokio::io::duplex(64 * 1024);
    let mut client = MessageTransmitter::with_config(client_io, registry.clone(), &config);
    let mut server = MessageTransmitter::with_config(server_io, registry.clone(), &config);

    let dispatcher = Dispatcher::new(registry.clone());
    dispatcher.on::<SessionInit, _>(|_| {
        info!("peer initialized session");
        Ok(())
    })?;
    dispatcher.on::<Inventory, _>(|inv| {
        println!("Inventory of {}: {:?}", inv.owner, inv.slots);
        Ok(())
    })?;
    dispatcher.on::<Move, _>(|mv| {
        println!("Move dir={} to ({}, {})", mv.dir, mv.x, mv.y);
        Ok(())
    })?;
    dispatcher.on::<SessionClosed, _>(|closed| {
        println!("Session closed, reason {}", closed.reason);
        Ok(())
    })?;

    let sender = tokio::spawn(async move {
        client.send(&SessionInit {}).await?;
        client.send(&inventory).await?;
        client.send(&Move { dir: 2, x: -4, y: 9 }).await?;
        client
            .send_raw(RawPacket {
                msg_id: 0xBEEF,
                data: bytes::Bytes::from_static(b"opaque"),
            })
            .await?;
        client
            .send(&SessionClosed {
                reason: SessionClosed::REASON_MANUAL,
            })
            .await?;
        packwire::Result::Ok(())
    });

    while let Some(msg) = server.recv().await? {
        if msg.is_raw() {
            println!("Relaying unknown message id {:#06X}", msg.msg_id());
            continue;
        }
        dispatcher.dispatch(&msg)?;
        if msg.downcast_ref::<SessionClosed>().is_some() {
            break;
        }
    }

    sender.await??;
    println!("\nDone.");
    Ok(())
}
