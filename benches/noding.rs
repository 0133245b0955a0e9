#[macro_use]
extern crate criterion;

use criterion::Criterion;
use geo_noding::{NodedSegmentString, Noder, PrecisionModel, SharedSegmentString, SnapRoundingNoder};
use geo_types::coord;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_segments(n: usize, extent: f64, seed: u64) -> Vec<SharedSegmentString<()>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let x0 = rng.gen_range(0..extent as i64) as f64;
            let y0 = rng.gen_range(0..extent as i64) as f64;
            let x1 = rng.gen_range(0..extent as i64) as f64;
            let y1 = rng.gen_range(0..extent as i64) as f64;
            let (x1, y1) = if x0 == x1 && y0 == y1 {
                (x1 + 1.0, y1)
            } else {
                (x1, y1)
            };
            NodedSegmentString::new(
                vec![coord! { x: x0, y: y0 }, coord! { x: x1, y: y1 }],
                (),
            )
            .into_shared()
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("snap round 200 random segments", |bencher| {
        bencher.iter(|| {
            let strings = random_segments(200, 100.0, 42);
            let mut noder = SnapRoundingNoder::new(PrecisionModel::fixed(1.0));
            noder.compute_nodes(&strings).unwrap();
            let noded = noder.noded_substrings();
            assert!(criterion::black_box(noded).len() >= 200);
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = criterion_benchmark
}
criterion_main!(benches);
