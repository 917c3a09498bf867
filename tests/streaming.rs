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

//! Equivalence of chunked and whole-input decoding.

use assert_matches::assert_matches;
use proptest::{
    collection::vec,
    prop_assert, prop_assert_eq, prop_oneof, proptest,
    strategy::{Just, Strategy},
};

use wirepack::{DecodeError, Encoder, StreamDecoder, Value};

fn generate_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Nil),
        proptest::bool::ANY.prop_map(Value::Bool),
        proptest::num::i64::ANY.prop_map(Value::Int),
        "[a-z]{0,20}".prop_map(Value::Str),
        vec(proptest::num::u8::ANY, 0..32).prop_map(Value::Bin),
    ];
    leaf.prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..6).prop_map(Value::Array),
            vec((inner.clone(), inner), 0..4).prop_map(Value::Map),
        ]
    })
}

fn encode_all(values: &[Value]) -> Vec<u8> {
    let mut encoder = Encoder::new();
    for value in values {
        encoder.write_value(value).unwrap();
    }
    encoder.into_bytes()
}

/// Feeds `bytes` in chunks whose sizes cycle through `chunk_sizes`,
/// draining completed values after every chunk.
fn decode_chunked(bytes: &[u8], chunk_sizes: &[usize]) -> Result<Vec<Value>, DecodeError> {
    let mut decoder = StreamDecoder::new();
    let mut decoded = Vec::new();
    let mut rest = bytes;
    let mut sizes = chunk_sizes.iter().cycle();
    while !rest.is_empty() {
        let take = (*sizes.next().unwrap()).min(rest.len());
        let (chunk, tail) = rest.split_at(take);
        decoder.feed(chunk);
        rest = tail;
        while let Some(value) = decoder.next_value()? {
            decoded.push(value);
        }
    }
    decoder.finish()?;
    Ok(decoded)
}

proptest! {
    #[test]
    fn chunked_decoding_matches_whole_input(
        values in vec(generate_value(), 1..4),
        chunk_sizes in vec(1_usize..16, 1..5),
    ) {
        let bytes = encode_all(&values);
        let decoded = decode_chunked(&bytes, &chunk_sizes)?;
        prop_assert_eq!(decoded, values);
    }

    #[test]
    fn truncation_at_any_point_suspends_instead_of_failing(
        value in generate_value(),
    ) {
        let bytes = encode_all(&[value]);
        // Valid encodings are prefix-free, so every proper prefix must
        // leave the decoder suspended, never completed and never in error.
        for cut in 0..bytes.len() {
            let mut decoder = StreamDecoder::new();
            decoder.feed(&bytes[..cut]);
            prop_assert!(decoder.next_value()?.is_none());
            if cut > 0 {
                prop_assert!(!decoder.is_idle());
            }
        }
    }
}

#[test]
fn deep_nesting_closes_in_one_cascade() {
    let value = Value::Array(vec![Value::Map(vec![(
        Value::from("k"),
        Value::Array(vec![Value::Int(7)]),
    )])]);
    let bytes = encode_all(&[value.clone()]);

    let mut decoder = StreamDecoder::new();
    let (head, tail) = bytes.split_at(bytes.len() - 1);
    decoder.feed(head);
    assert_eq!(decoder.next_value().unwrap(), None);
    // The final byte completes the innermost array, which must pop all
    // three enclosing frames at once.
    decoder.feed(tail);
    assert_eq!(decoder.next_value().unwrap(), Some(value));
    decoder.finish().unwrap();
}

#[test]
fn finish_reports_mid_value_cutoff() {
    let mut encoder = Encoder::new();
    encoder.write_array_begin(3).unwrap();
    encoder.write_u64(1).unwrap();
    let bytes = encoder.into_bytes();

    let mut decoder = StreamDecoder::new();
    decoder.feed(&bytes);
    assert_eq!(decoder.next_value().unwrap(), None);
    assert_matches!(
        decoder.finish().unwrap_err(),
        DecodeError::UnexpectedEof { .. }
    );
}

#[test]
fn finish_reports_partial_trailing_scalar() {
    let mut decoder = StreamDecoder::new();
    decoder.feed(&[0x01, 0xcd, 0x12]); // complete fixint, then half a u16
    assert_eq!(decoder.next_value().unwrap(), Some(Value::Int(1)));
    assert_eq!(decoder.next_value().unwrap(), None);
    assert_matches!(
        decoder.finish().unwrap_err(),
        DecodeError::UnexpectedEof { .. }
    );
}

#[test]
fn interleaved_feeding_and_draining() {
    let values: Vec<_> = (0..100).map(Value::Int).collect();
    let bytes = encode_all(&values);

    let mut decoder = StreamDecoder::new();
    let mut decoded = Vec::new();
    for chunk in bytes.chunks(7) {
        decoder.feed(chunk);
        while let Some(value) = decoder.next_value().unwrap() {
            decoded.push(value);
        }
    }
    assert_eq!(decoded, values);
    decoder.finish().unwrap();
}
