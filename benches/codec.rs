use std::collections::BTreeMap;

use bencodec::{decode, encode, to_bytes, Value};
use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn sample_metainfo() -> Value {
    let mut info = BTreeMap::new();
    info.insert(Bytes::from_static(b"name"), Value::string("example.iso"));
    info.insert(Bytes::from_static(b"length"), Value::Integer(734_003_200));
    info.insert(Bytes::from_static(b"piece length"), Value::Integer(262_144));
    info.insert(Bytes::from_static(b"pieces"), Value::bytes(&[0x5a; 20 * 2800]));

    let tiers = (0..16)
        .map(|i| Value::List(vec![Value::from(format!("udp://tracker{i}.example.com:6969"))]))
        .collect();

    let mut torrent = BTreeMap::new();
    torrent.insert(Bytes::from_static(b"announce-list"), Value::List(tiers));
    torrent.insert(Bytes::from_static(b"creation date"), Value::Integer(1_700_000_000));
    torrent.insert(Bytes::from_static(b"info"), Value::Dict(info));
    Value::Dict(torrent)
}

fn bench_codec(c: &mut Criterion) {
    let value = sample_metainfo();
    let encoded = encode(&value).unwrap();

    let mut group = c.benchmark_group("metainfo");
    group.throughput(Throughput::Bytes(encoded.len() as u64));
    group.bench_function("encode", |b| b.iter(|| encode(black_box(&value)).unwrap()));
    group.bench_function("decode", |b| b.iter(|| decode(black_box(&encoded)).unwrap()));
    group.bench_function("serde_encode", |b| {
        b.iter(|| to_bytes(black_box(&value)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
