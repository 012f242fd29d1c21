use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use huffpack::config::{CodecConfig, DecodeStrategy};
use huffpack::frequency::FrequencyMap;
use huffpack::{CodeTable, HuffmanCodec, HuffmanTree};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn sample_text(len: usize) -> Vec<u8> {
    b"It was the best of times, it was the worst of times, it was the age of wisdom. "
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

fn sample_random(len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..len).map(|_| rng.gen()).collect()
}

fn bench_build(c: &mut Criterion) {
    let freq = FrequencyMap::from_bytes(&sample_random(1 << 16));
    c.bench_function("build_tree_and_codes_256", |b| {
        b.iter(|| {
            let tree = HuffmanTree::build(black_box(&freq)).unwrap();
            CodeTable::from_tree(&tree)
        })
    });
}

fn bench_encode(c: &mut Criterion) {
    let codec = HuffmanCodec::default();
    let mut group = c.benchmark_group("encode");
    for (name, data) in [
        ("text", sample_text(1 << 20)),
        ("random", sample_random(1 << 20)),
    ] {
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| codec.encode_to_vec(black_box(data)).unwrap())
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let data = sample_text(1 << 20);
    let encoded = HuffmanCodec::default().encode_to_vec(&data).unwrap();
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(data.len() as u64));
    for strategy in [DecodeStrategy::TreeWalk, DecodeStrategy::PrefixTable] {
        let codec = HuffmanCodec::new(CodecConfig {
            strategy,
            ..CodecConfig::default()
        });
        group.bench_function(format!("{:?}", strategy), |b| {
            b.iter(|| {
                codec
                    .decode_from_slice(black_box(&encoded.data), &encoded.freq_table)
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_encode, bench_decode);
criterion_main!(benches);
