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

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use wirepack::{Decoder, Encoder, StreamDecoder, Value};

const RECORDS: usize = 256;

/// An array of small map records, the shape most message payloads take.
fn sample_value() -> Value {
    let records = (0..RECORDS as i64)
        .map(|i| {
            Value::Map(vec![
                (Value::from("id"), Value::Int(i)),
                (Value::from("name"), Value::Str(format!("record-{}", i))),
                (Value::from("score"), Value::F64(i as f64 * 0.5)),
                (
                    Value::from("payload"),
                    Value::Bin(vec![i as u8; 32]),
                ),
            ])
        })
        .collect();
    Value::Array(records)
}

fn encode(value: &Value) -> Vec<u8> {
    let mut encoder = Encoder::new();
    encoder.write_value(value).unwrap();
    encoder.into_bytes()
}

fn bench_encode(c: &mut Criterion) {
    let value = sample_value();
    c.bench_function("encode/value_tree", move |b| {
        b.iter(|| black_box(encode(&value)))
    });
}

fn bench_decode(c: &mut Criterion) {
    let bytes = encode(&sample_value());
    c.bench_function("decode/value_tree", move |b| {
        b.iter(|| {
            let mut decoder = Decoder::new(&bytes);
            black_box(decoder.read_value().unwrap())
        })
    });
}

fn bench_stream_decode(c: &mut Criterion) {
    let bytes = encode(&sample_value());
    c.bench_function("decode/streamed_1k_chunks", move |b| {
        b.iter(|| {
            let mut decoder = StreamDecoder::new();
            let mut last = None;
            for chunk in bytes.chunks(1024) {
                decoder.feed(chunk);
                while let Some(value) = decoder.next_value().unwrap() {
                    last = Some(value);
                }
            }
            black_box(last)
        })
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_stream_decode);
criterion_main!(benches);
