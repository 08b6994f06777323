use criterion::{criterion_group, criterion_main, Criterion};
use geo::coord;
use geofixture::algorithm::PolygonSynthesizer;
use geofixture::composer::{BulkBatch, ScenarioComposer};
use geofixture::config::GeneratorConfig;
use geofixture::sink::MemorySink;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn criterion_benchmark(c: &mut Criterion) {
    let synthesizer = PolygonSynthesizer::default();
    let mut rng = StdRng::seed_from_u64(0);

    c.bench_function("irregular polygon, 12 vertices", |b| {
        b.iter(|| {
            let _ = synthesizer.irregular(&mut rng, coord! { x: 2683000., y: 1248000. }, 500., 12);
        })
    });

    let config = GeneratorConfig {
        seed: Some(0),
        ..Default::default()
    };
    c.bench_function("bulk buildings into memory sink", |b| {
        b.iter(|| {
            let mut composer = ScenarioComposer::from_config(config.clone()).unwrap();
            let scenario = composer.bulk(BulkBatch::Buildings).unwrap();
            let mut sink = MemorySink::new();
            geofixture::composer::persist(&mut sink, &scenario, config.srid).unwrap();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
