#![no_main]

use libfuzzer_sys::fuzz_target;
use packwire::binary_struct;
use packwire::core::serial::decode_value;

binary_struct! {
    #[derive(Debug, Clone, Default)]
    struct Nested {
        kind: u8,
        len: u16,
    }
    length_of { len => values }
}

binary_struct! {
    #[derive(Debug, Clone, Default)]
    struct Target {
        header: Nested,
        values: Vec<u32>,
        count: i8,
        pairs: Vec<[u16; 2]>,
        wide: f64,
    }
    length_of { count => pairs }
}

binary_struct! {
    #[derive(Debug, Clone, Default)]
    struct Bare {
        items: Vec<Nested>,
    }
}

binary_struct! {
    #[derive(Debug, Clone, Default)]
    struct WideCounts {
        long: i64,
        pairs: Vec<u16>,
        word: u32,
        quads: Vec<[u8; 4]>,
        huge: u64,
        tail: Vec<Nested>,
    }
    length_of { long => pairs, word => quads, huge => tail }
}

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must never panic
    let mut target = Target::default();
    let _ = decode_value(data, &mut target, 4);
    let _ = decode_value(data, &mut target, 8);

    let mut wide = WideCounts::default();
    let _ = decode_value(data, &mut wide, 4);

    let mut bare = Bare::default();
    let _ = decode_value(data, &mut bare, 4);
});
