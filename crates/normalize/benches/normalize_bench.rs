use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use normalize::Normalizer;

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for (label, normalizer) in [
        ("repair", Normalizer::new()),
        ("plain", Normalizer::without_repair()),
    ] {
        for size in [64, 512, 4096, 32768].iter() {
            let text = "word  \t text \r\n\r\n\r\n".repeat(*size / 20 + 1);
            group.throughput(Throughput::Bytes(text.len() as u64));
            group.bench_function(format!("{label}_bytes_{size}"), |b| {
                b.iter(|| normalizer.normalize(black_box(&text)))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
