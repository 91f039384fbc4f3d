use bytes::BytesMut;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use packwire::binary_struct;
use packwire::codec::{CodecContext, CodecRegistry};
use packwire::core::serial::{decode_value, encode_value, encode_value_into, size_of_value};
use packwire::protocol::registry::MessageRegistry;
use packwire::transport::ltv::{Frame, LtvCodec};
use packwire::transport::packet::{decode_packet, pack_message};
use tokio_util::codec::{Decoder, Encoder};

binary_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Snapshot {
        tick: u32,
        flags: u8,
        count: u16,
        positions: Vec<[f32; 3]>,
    }
    length_of { count => positions }
}

fn snapshot(count: usize) -> Snapshot {
    Snapshot {
        tick: 42,
        flags: 1,
        count: count as u16,
        positions: (0..count).map(|i| [i as f32, 0.5, -1.0]).collect(),
    }
}

#[allow(clippy::unwrap_used)]
fn bench_binary_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary_layout");
    let counts = [0usize, 16, 256, 4096];

    for &count in &counts {
        let msg = snapshot(count);
        let size = size_of_value(&msg, 4).unwrap();
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_function(format!("encode_{count}"), |b| {
            b.iter(|| encode_value(&msg, 4).unwrap())
        });
        group.bench_function(format!("encode_into_{count}"), |b| {
            let mut dst = vec![0u8; size];
            b.iter(|| encode_value_into(&msg, &mut dst, 4).unwrap())
        });
        group.bench_function(format!("decode_{count}"), |b| {
            let bytes = encode_value(&msg, 4).unwrap();
            b.iter_batched(
                Snapshot::default,
                |mut target| decode_value(&bytes, &mut target, 4).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_message_packet(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_packet");
    let codecs = CodecRegistry::with_defaults();
    let registry = MessageRegistry::new();
    registry
        .register::<Snapshot>("bench.Snapshot", codecs.require("binary").unwrap())
        .unwrap();
    let plain = CodecContext::new();
    let pooled = CodecContext::with_pool(packwire::utils::BufferPool::new(16));
    let msg = snapshot(64);

    group.bench_function("pack_message", |b| {
        b.iter(|| pack_message(&registry, &msg, &plain).unwrap())
    });
    group.bench_function("pack_message_pooled", |b| {
        b.iter(|| pack_message(&registry, &msg, &pooled).unwrap())
    });
    group.bench_function("decode_packet", |b| {
        let packet = pack_message(&registry, &msg, &plain).unwrap();
        b.iter(|| decode_packet(&registry, &packet).unwrap())
    });

    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_ltv_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("ltv_framing");
    let payload_sizes = [64usize, 512, 4096, 65000];

    for &size in &payload_sizes {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("encode_{size}b"), |b| {
            b.iter_batched(
                || Frame::new(7, vec![0u8; size]),
                |frame| {
                    let mut buf = BytesMut::with_capacity(size + 4);
                    LtvCodec::default().encode(frame, &mut buf).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("decode_{size}b"), |b| {
            let mut wire = BytesMut::new();
            LtvCodec::default()
                .encode(Frame::new(7, vec![0u8; size]), &mut wire)
                .unwrap();
            b.iter_batched(
                || wire.clone(),
                |mut buf| {
                    let frame = LtvCodec::default().decode(&mut buf).unwrap();
                    assert!(frame.is_some());
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_binary_layout, bench_message_packet, bench_ltv_framing);
criterion_main!(benches);
