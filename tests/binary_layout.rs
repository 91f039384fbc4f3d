//! Integration tests for the aligned binary layout
//!
//! These tests pin down the byte-level layout: alignment padding, slice
//! length coupling, bare-slice payloads, boundary inputs and rejection of
//! types with no fixed layout.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use num_complex::Complex32;
use packwire::binary_struct;
use packwire::core::serial::{
    binary_read, binary_size, binary_write, binary_write_into, decode_value, encode_value,
    encode_value_into, size_of_value,
};
use packwire::core::shape::{Kind, Shape, StructShape};
use packwire::core::value::Value;
use packwire::core::wire::Wire;
use packwire::error::ProtocolError;

binary_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Padded {
        a: u8,
        b: u32,
    }
}

binary_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counted {
        count: i32,
        items: Vec<i16>,
    }
    length_of { count => items }
}

binary_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Payload {
        data: Vec<u8>,
    }
}

binary_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Header {
        kind: u8,
        len: u16,
    }
    length_of { len => body }
}

// `body` takes its count from the embedded header
binary_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Packet {
        header: Header,
        body: Vec<u32>,
    }
}

binary_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Trailer {
        n: u16,
    }
    length_of { n => items }
}

// `count` is declared before the trailer's `n`, so it sizes `items`
binary_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Layered {
        count: u16,
        trailer: Trailer,
        items: Vec<u8>,
    }
    length_of { count => items }
}

binary_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Chat {
        channel: u8,
        text: String,
    }
}

binary_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Cached {
        id: u16,
        scratch: u64,
        flag: bool,
    }
    skip { scratch }
}

binary_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Wide {
        count: i64,
        items: Vec<u16>,
    }
    length_of { count => items }
}

binary_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Signal {
        gain: f64,
        sample: Complex32,
        taps: [i8; 3],
    }
}

#[test]
fn test_alignment_padding() {
    let msg = Padded {
        a: 0xAB,
        b: 0x0403_0201,
    };

    assert_eq!(size_of_value(&msg, 4).unwrap(), 8);
    let bytes = encode_value(&msg, 4).unwrap();
    assert_eq!(bytes, vec![0xAB, 0, 0, 0, 1, 2, 3, 4]);
    assert_eq!(&bytes[4..8], &0x0403_0201u32.to_le_bytes());
}

#[test]
fn test_max_align_caps_padding() {
    let msg = Padded { a: 1, b: 2 };
    assert_eq!(size_of_value(&msg, 1).unwrap(), 5);
    assert_eq!(size_of_value(&msg, 2).unwrap(), 6);

    // 8-byte fields align to 8 only when the cap allows it
    let signal = Signal::default();
    assert_eq!(size_of_value(&signal, 4).unwrap(), 8 + 8 + 3 + 1);
    assert_eq!(size_of_value(&signal, 8).unwrap(), 8 + 8 + 3 + 5);
}

#[test]
fn test_slice_length_coupling() {
    let msg = Counted {
        count: 3,
        items: vec![1, 2, 3],
    };

    // 4 bytes of count, 6 bytes of items, 2 bytes of trailing struct padding
    let bytes = encode_value(&msg, 4).unwrap();
    assert_eq!(bytes, vec![3, 0, 0, 0, 1, 0, 2, 0, 3, 0, 0, 0]);

    let mut decoded = Counted::default();
    decode_value(&bytes, &mut decoded, 4).unwrap();
    assert_eq!(decoded, msg);
}

#[test]
fn test_zero_count_ignores_items() {
    let msg = Counted {
        count: 0,
        items: vec![9, 9, 9, 9],
    };
    assert_eq!(encode_value(&msg, 4).unwrap(), vec![0, 0, 0, 0]);
}

#[test]
fn test_size_depends_on_count_not_live_length() {
    let short = Counted {
        count: 3,
        items: vec![5],
    };
    let long = Counted {
        count: 3,
        items: vec![5; 40],
    };
    assert_eq!(size_of_value(&short, 4).unwrap(), 12);
    assert_eq!(size_of_value(&long, 4).unwrap(), 12);

    // missing elements encode as zero
    let bytes = encode_value(&short, 4).unwrap();
    assert_eq!(&bytes[4..10], &[5, 0, 0, 0, 0, 0]);
}

#[test]
fn test_negative_count_is_empty() {
    let msg = Counted {
        count: -2,
        items: vec![1, 2],
    };
    assert_eq!(size_of_value(&msg, 4).unwrap(), 4);
}

#[test]
fn test_huge_wire_count_is_out_of_data() {
    let mut input = i64::MAX.to_le_bytes().to_vec();
    input.extend_from_slice(&[1, 0]);

    let mut target = Wide::default();
    assert!(matches!(
        decode_value(&input, &mut target, 4),
        Err(ProtocolError::OutOfData { available: 10, .. })
    ));
    assert_eq!(target, Wide::default());

    // a count one past what the input holds fails the same way
    let mut input = 2i64.to_le_bytes().to_vec();
    input.extend_from_slice(&[1, 0]);
    assert!(matches!(
        decode_value(&input, &mut target, 4),
        Err(ProtocolError::OutOfData {
            needed: 12,
            available: 10
        })
    ));
}

#[test]
fn test_huge_count_fails_sizing() {
    let msg = Wide {
        count: i64::MAX,
        items: vec![],
    };

    assert!(matches!(
        size_of_value(&msg, 4),
        Err(ProtocolError::InvalidType(_))
    ));
    assert!(matches!(
        encode_value(&msg, 4),
        Err(ProtocolError::InvalidType(_))
    ));
    let mut dst = [0u8; 16];
    assert!(matches!(
        encode_value_into(&msg, &mut dst, 4),
        Err(ProtocolError::InvalidType(_))
    ));
}

#[test]
fn test_count_in_nested_struct() {
    let msg = Packet {
        header: Header { kind: 1, len: 2 },
        body: vec![0xAABB_CCDD, 7],
    };

    // header: kind, pad, len (4 bytes) | body: 2 x 4 bytes
    let bytes = encode_value(&msg, 4).unwrap();
    assert_eq!(
        bytes,
        vec![1, 0, 2, 0, 0xDD, 0xCC, 0xBB, 0xAA, 7, 0, 0, 0]
    );

    let mut decoded = Packet::default();
    decode_value(&bytes, &mut decoded, 4).unwrap();
    assert_eq!(decoded, msg);
}

#[test]
fn test_first_declared_count_wins_over_nested() {
    let msg = Layered {
        count: 1,
        trailer: Trailer { n: 3 },
        items: vec![7, 8, 9],
    };

    let bytes = encode_value(&msg, 4).unwrap();
    assert_eq!(bytes, vec![1, 0, 3, 0, 7, 0]);

    let mut decoded = Layered::default();
    decode_value(&bytes, &mut decoded, 4).unwrap();
    assert_eq!(
        decoded,
        Layered {
            count: 1,
            trailer: Trailer { n: 3 },
            items: vec![7],
        }
    );
}

#[test]
fn test_bare_slice_decode_takes_all_input() {
    let input: Vec<u8> = (0..13).collect();
    let mut decoded = Payload::default();
    decode_value(&input, &mut decoded, 4).unwrap();
    assert_eq!(decoded.data, input);
}

#[test]
fn test_bare_slice_encode_fills_destination() {
    let msg = Payload {
        data: vec![1, 2, 3, 4, 5],
    };

    let bytes = encode_value(&msg, 4).unwrap();
    assert_eq!(bytes, vec![1, 2, 3, 4, 5]);

    let mut dst = [0xFFu8; 5];
    assert_eq!(encode_value_into(&msg, &mut dst, 4).unwrap(), 5);
    assert_eq!(dst, [1, 2, 3, 4, 5]);
}

#[test]
fn test_empty_input_is_noop() {
    let mut target = Counted {
        count: 2,
        items: vec![4, 5],
    };
    let before = target.clone();
    decode_value(&[], &mut target, 4).unwrap();
    assert_eq!(target, before);

    let shape = Padded::shape();
    let mut value = Padded { a: 1, b: 2 }.to_value();
    let expected = value.clone();
    binary_read(&[], &shape, &mut value, 4).unwrap();
    assert_eq!(value, expected);
}

#[test]
fn test_short_input_leaves_target_unchanged() {
    let mut target = Padded { a: 7, b: 8 };
    let result = decode_value(&[1, 0, 0, 0, 2], &mut target, 4);

    assert!(matches!(
        result,
        Err(ProtocolError::OutOfData {
            needed: 8,
            available: 5
        })
    ));
    assert_eq!(target, Padded { a: 7, b: 8 });
}

#[test]
fn test_unsupported_field_rejected_everywhere() {
    let msg = Chat {
        channel: 1,
        text: "hello".into(),
    };

    assert!(matches!(
        size_of_value(&msg, 4),
        Err(ProtocolError::InvalidType(_))
    ));
    assert!(matches!(
        encode_value(&msg, 4),
        Err(ProtocolError::InvalidType(_))
    ));

    let mut dst = [0xEEu8; 16];
    assert!(matches!(
        encode_value_into(&msg, &mut dst, 4),
        Err(ProtocolError::InvalidType(_))
    ));
    assert_eq!(dst, [0xEE; 16]);

    let mut target = Chat::default();
    assert!(matches!(
        decode_value(&[1, 2, 3, 4], &mut target, 4),
        Err(ProtocolError::InvalidType(_))
    ));
    assert_eq!(target, Chat::default());
}

#[test]
fn test_unsupported_error_names_the_field() {
    let err = size_of_value(&Chat::default(), 4).unwrap_err();
    assert!(err.to_string().contains("Chat.text"), "got: {err}");
}

#[test]
fn test_skipped_field_zero_filled() {
    let msg = Cached {
        id: 5,
        scratch: u64::MAX,
        flag: true,
    };

    // id(2) pad(2) scratch(8, zeroed) flag(1) pad(3)
    let bytes = encode_value(&msg, 4).unwrap();
    assert_eq!(bytes.len(), 16);
    assert!(bytes[4..12].iter().all(|&b| b == 0));

    let mut decoded = Cached::default();
    decode_value(&bytes, &mut decoded, 4).unwrap();
    assert_eq!(
        decoded,
        Cached {
            id: 5,
            scratch: 0,
            flag: true
        }
    );
}

#[test]
fn test_float_complex_and_array_fields() {
    let msg = Signal {
        gain: -1.5,
        sample: Complex32::new(0.25, -4.0),
        taps: [-1, 0, 1],
    };

    let bytes = encode_value(&msg, 4).unwrap();
    assert_eq!(&bytes[0..8], &(-1.5f64).to_le_bytes());
    assert_eq!(&bytes[8..12], &0.25f32.to_le_bytes());
    assert_eq!(&bytes[12..16], &(-4.0f32).to_le_bytes());
    assert_eq!(&bytes[16..19], &[0xFF, 0x00, 0x01]);

    let mut decoded = Signal::default();
    decode_value(&bytes, &mut decoded, 4).unwrap();
    assert_eq!(decoded, msg);
}

#[test]
fn test_dynamic_shape_api() {
    let shape = Shape::Struct(
        StructShape::new("Reading")
            .field("sensor", Shape::Primitive(Kind::U16))
            .field("values", Shape::array(Shape::Primitive(Kind::I32), 2)),
    );
    let value = Value::Struct(vec![
        Value::U16(3),
        Value::Array(vec![Value::I32(-1), Value::I32(1)]),
    ]);

    assert_eq!(binary_size(&shape, &value, 4).unwrap(), 12);
    let bytes = binary_write(&shape, &value, 4).unwrap();
    assert_eq!(
        bytes,
        vec![3, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF, 1, 0, 0, 0]
    );

    let mut dst = vec![0u8; 11];
    assert!(matches!(
        binary_write_into(&shape, &value, &mut dst, 4),
        Err(ProtocolError::BufferTooSmall {
            needed: 12,
            available: 11
        })
    ));

    let mut decoded = shape.zero_value();
    binary_read(&bytes, &shape, &mut decoded, 4).unwrap();
    assert_eq!(decoded, value);
}
