//! Re-encodes decoded readings with a test-only encoder and checks that the
//! original payload comes back byte for byte.

use cayenne_lpp_core::{Number, ReadingSet, ReadingValue, codec::registry, lookup, payload};

fn encode_int(value: i128, width: usize, out: &mut Vec<u8>) {
    let modulus = 1i128 << (8 * width);
    let wrapped = value.rem_euclid(modulus);
    for shift in (0..width).rev() {
        out.push(((wrapped >> (8 * shift)) & 0xFF) as u8);
    }
}

fn unscale(value: Number, exponent: u32, multiplier: Option<f64>) -> i128 {
    let mut value = value.as_f64();
    if let Some(multiplier) = multiplier {
        value /= multiplier;
    }
    (value * 10f64.powi(exponent as i32)).round() as i128
}

fn encode(readings: &ReadingSet) -> Vec<u8> {
    let mut out = Vec::new();
    for (channel, reading) in readings.iter() {
        let descriptor = lookup(reading.tag).expect("known tag");
        out.push(channel);
        out.push(reading.tag);
        for span in descriptor.spans {
            let value = match (&reading.value, span.name) {
                (ReadingValue::Scalar(value), None) => *value,
                (value, Some(name)) => value.field(name).expect("field present"),
                (value, None) => panic!("unexpected value shape {value:?}"),
            };
            let raw = unscale(value, span.exponent, descriptor.post_multiplier);
            encode_int(raw, span.width, &mut out);
        }
    }
    out
}

fn assert_roundtrip(hex: &str) {
    let input = payload::from_hex(hex).expect("hex");
    let readings = cayenne_lpp_core::decode(&input).expect("decode");
    assert_eq!(encode(&readings), input, "roundtrip mismatch for {hex}");
}

#[test]
fn roundtrip_scalar_types() {
    assert_roundtrip("01 00 2a 02 01 00 03 02 80 00 04 03 7f ff");
    assert_roundtrip("05 65 ff ff 06 66 01 07 67 ff 9c 08 68 c8 09 73 27 7f");
}

#[test]
fn roundtrip_composite_types() {
    assert_roundtrip("06 71 04 d2 fb 2e 00 00");
    assert_roundtrip("08 86 00 64 ff 9c 27 10");
    assert_roundtrip("01 88 06 76 5f f2 96 0a 00 03 e8");
    assert_roundtrip("01 88 80 00 00 7f ff ff ff ff ff");
}

#[test]
fn roundtrip_every_registered_type_at_extremes() {
    for descriptor in registry::descriptors() {
        for fill in [0x00u8, 0x7F, 0x80, 0xFF] {
            let mut input = vec![0x10, descriptor.tag];
            input.extend(std::iter::repeat_n(fill, descriptor.width));
            let readings = cayenne_lpp_core::decode(&input).expect("decode");
            assert_eq!(encode(&readings), input, "tag {}", descriptor.tag);
        }
    }
}
