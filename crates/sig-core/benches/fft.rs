use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sig_core::fft::rdft;

fn bench_rdft(c: &mut Criterion) {
    let mut group = c.benchmark_group("rdft");
    for &n in &[64usize, 256, 1024] {
        let input: Vec<i32> = (0..n).map(|i| (i as i32 * 31) % 5000 - 2500).collect();
        group.bench_function(format!("n={n}"), |b| {
            b.iter(|| {
                let mut buf = input.clone();
                rdft(n, 1, black_box(&mut buf)).unwrap();
                black_box(&buf);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rdft);
criterion_main!(benches);
