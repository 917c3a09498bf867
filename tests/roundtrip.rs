// Copyright 2020 The Wirepack Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Round-trip and wire-layout tests over the whole codec surface.

use pretty_assertions::assert_eq;
use proptest::{
    collection::vec,
    prop_assert_eq, prop_oneof, proptest,
    strategy::{Just, Strategy},
};

use wirepack::{Decoder, Encoder, Value};

/// Floats are drawn from finite ranges: NaN is encodable but breaks the
/// equality this suite relies on.
fn generate_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Nil),
        proptest::bool::ANY.prop_map(Value::Bool),
        proptest::num::i64::ANY.prop_map(Value::Int),
        (i64::max_value() as u64 + 1..=u64::max_value()).prop_map(Value::Uint),
        (-1.0e6_f32..1.0e6).prop_map(Value::F32),
        (-1.0e12_f64..1.0e12).prop_map(Value::F64),
        "[a-zA-Z0-9 ]{0,40}".prop_map(Value::Str),
        vec(proptest::num::u8::ANY, 0..48).prop_map(Value::Bin),
    ];
    leaf.prop_recursive(3, 64, 8, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..8).prop_map(Value::Array),
            vec((inner.clone(), inner), 0..6).prop_map(Value::Map),
        ]
    })
}

fn encode(value: &Value) -> Vec<u8> {
    let mut encoder = Encoder::new();
    encoder.write_value(value).unwrap();
    encoder.into_bytes()
}

proptest! {
    #[test]
    fn any_value_tree_round_trips(value in generate_value()) {
        let bytes = encode(&value);
        let mut decoder = Decoder::new(&bytes);
        let decoded = decoder.read_value()?;
        decoder.finish()?;
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn unsigned_integers_round_trip_at_any_magnitude(value in proptest::num::u64::ANY) {
        let mut encoder = Encoder::new();
        encoder.write_u64(value).unwrap();
        let bytes = encoder.into_bytes();
        let mut decoder = Decoder::new(&bytes);
        prop_assert_eq!(decoder.read_u64()?, value);
    }

    #[test]
    fn signed_integers_round_trip_at_any_magnitude(value in proptest::num::i64::ANY) {
        let mut encoder = Encoder::new();
        encoder.write_i64(value).unwrap();
        let bytes = encoder.into_bytes();
        let mut decoder = Decoder::new(&bytes);
        prop_assert_eq!(decoder.read_i64()?, value);
    }
}

#[test]
fn unsigned_boundaries_use_minimal_widths() {
    let cases: &[(u64, &str)] = &[
        (0, "00"),
        (0x7f, "7f"),
        (0x80, "cc80"),
        (0xff, "ccff"),
        (0x100, "cd0100"),
        (0xffff, "cdffff"),
        (0x1_0000, "ce00010000"),
        (0xffff_ffff, "ceffffffff"),
        (0x1_0000_0000, "cf0000000100000000"),
        (u64::max_value(), "cfffffffffffffffff"),
    ];
    for &(value, expected) in cases {
        let mut encoder = Encoder::new();
        encoder.write_u64(value).unwrap();
        assert_eq!(hex::encode(encoder.as_slice()), expected, "value {}", value);
    }
}

#[test]
fn signed_boundaries_use_minimal_widths() {
    let cases: &[(i64, &str)] = &[
        (-1, "ff"),
        (-32, "e0"),
        (-33, "d0df"),
        (-128, "d080"),
        (-129, "d1ff7f"),
        (-32768, "d18000"),
        (-32769, "d2ffff7fff"),
        (i64::from(i32::min_value()), "d280000000"),
        (i64::from(i32::min_value()) - 1, "d3ffffffff7fffffff"),
        (i64::min_value(), "d38000000000000000"),
        // Non-negative signed values take the unsigned forms.
        (127, "7f"),
        (128, "cc80"),
    ];
    for &(value, expected) in cases {
        let mut encoder = Encoder::new();
        encoder.write_i64(value).unwrap();
        assert_eq!(hex::encode(encoder.as_slice()), expected, "value {}", value);
    }
}

#[test]
fn string_length_boundaries_use_minimal_widths() {
    let cases: &[(usize, &str)] = &[
        (0, "a0"),
        (31, "bf"),
        (32, "d920"),
        (255, "d9ff"),
        (256, "da0100"),
        (65535, "daffff"),
        (65536, "db00010000"),
    ];
    for &(len, expected_header) in cases {
        let text = "x".repeat(len);
        let mut encoder = Encoder::new();
        encoder.write_str(&text).unwrap();
        let header_len = expected_header.len() / 2;
        assert_eq!(
            hex::encode(&encoder.as_slice()[..header_len]),
            expected_header,
            "length {}",
            len
        );
        assert_eq!(encoder.len(), header_len + len);
    }
}

#[test]
fn container_length_boundaries_use_minimal_widths() {
    let mut encoder = Encoder::new();
    encoder.write_array_begin(15).unwrap();
    assert_eq!(encoder.as_slice(), &[0x9f]);

    let mut encoder = Encoder::new();
    encoder.write_array_begin(16).unwrap();
    assert_eq!(encoder.as_slice(), &[0xdc, 0x00, 0x10]);

    let mut encoder = Encoder::new();
    encoder.write_map_begin(15).unwrap();
    assert_eq!(encoder.as_slice(), &[0x8f]);

    let mut encoder = Encoder::new();
    encoder.write_map_begin(16).unwrap();
    assert_eq!(encoder.as_slice(), &[0xde, 0x00, 0x10]);

    let mut encoder = Encoder::new();
    encoder.write_map_begin(65536).unwrap();
    assert_eq!(encoder.as_slice(), &[0xdf, 0x00, 0x01, 0x00, 0x00]);
}

#[test]
fn decoder_accepts_any_valid_width() {
    // 1 encoded five ways, all read back as the same u64.
    let encodings: &[&str] = &[
        "01",
        "cc01",
        "cd0001",
        "ce00000001",
        "cf0000000000000001",
    ];
    for encoding in encodings {
        let bytes = hex::decode(encoding).unwrap();
        let mut decoder = Decoder::new(&bytes);
        assert_eq!(decoder.read_u64().unwrap(), 1, "encoding {}", encoding);
        decoder.finish().unwrap();
    }
}

#[test]
fn floats_preserve_exact_bits() {
    for &value in &[0.0_f64, -0.0, 1.5, f64::MIN_POSITIVE, f64::MAX] {
        let mut encoder = Encoder::new();
        encoder.write_f64(value).unwrap();
        let bytes = encoder.into_bytes();
        let mut decoder = Decoder::new(&bytes);
        assert_eq!(decoder.read_f64().unwrap().to_bits(), value.to_bits());
    }
}
