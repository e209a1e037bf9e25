use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use worldsim_core::config::{TerrainConfig, WalkabilityConfig};
use worldsim_core::noise::PerlinNoise;
use worldsim_core::terrain::{ChunkedGenerator, TerrainGenerator, TerrainMap};
use worldsim_data::CellCoord;

fn generator(size: u16) -> TerrainGenerator {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    TerrainGenerator::from_config(size, size, &TerrainConfig::default(), &mut rng)
        .expect("default terrain config is valid")
}

fn bench_noise_sample(c: &mut Criterion) {
    let noise = PerlinNoise::new(42);

    c.bench_function("perlin_sample", |b| {
        b.iter(|| black_box(noise.sample(black_box(12.34), black_box(56.78))))
    });
}

fn bench_height_at(c: &mut Criterion) {
    let generator = generator(100);

    c.bench_function("terrain_height_at", |b| {
        b.iter(|| black_box(generator.height_at(black_box(CellCoord::new(37, 61)))))
    });
}

fn bench_generate_map(c: &mut Criterion) {
    let small = generator(100);
    let large = generator(400);

    c.bench_function("terrain_generate_100x100", |b| {
        b.iter(|| black_box(small.generate_map(WalkabilityConfig::default())))
    });
    c.bench_function("terrain_generate_400x400", |b| {
        b.iter(|| black_box(large.generate_map(WalkabilityConfig::default())))
    });
}

fn bench_chunked_generation(c: &mut Criterion) {
    let generator = generator(100);

    c.bench_function("terrain_chunked_100x100_chunk_10", |b| {
        b.iter(|| {
            let mut chunked = ChunkedGenerator::new(generator.clone(), 10);
            let mut map = TerrainMap::new(100, 100, WalkabilityConfig::default())
                .expect("non-empty grid");
            while !chunked.step(&mut map, &mut ()).is_complete() {}
            black_box(map)
        })
    });
}

criterion_group!(
    benches,
    bench_noise_sample,
    bench_height_at,
    bench_generate_map,
    bench_chunked_generation
);
criterion_main!(benches);
