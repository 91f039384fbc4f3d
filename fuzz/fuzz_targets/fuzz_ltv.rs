#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use packwire::transport::ltv::LtvCodec;
use packwire::transport::packet::unpack;
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    let _ = unpack(data);

    let mut codec = LtvCodec::default();
    let mut buf = BytesMut::from(data);
    while let Ok(Some(_)) = codec.decode(&mut buf) {}
});
