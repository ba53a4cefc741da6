use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{Map, Value};

use relicforge::{
    ArtGenerator, ArtRequest, ForgeData, GenerationRequest, ItemForge, NullArtGenerator, PixelArtGenerator, Rarity,
    VisualFamily,
};

fn bench_item_generation(c: &mut Criterion) {
    let data = ForgeData::embedded().expect("embedded data loads");
    let plain = ItemForge::new(data.clone()).with_art_generator(NullArtGenerator);
    let drawn = ItemForge::new(data);

    c.bench_function("generate_item_no_art", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        let request = GenerationRequest::new();
        b.iter(|| plain.generate_with_rng(black_box(&request), &mut rng))
    });

    c.bench_function("generate_legendary_sword_no_art", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        let request = GenerationRequest::new().category("swords").rarity(Rarity::Legendary);
        b.iter(|| plain.generate_with_rng(black_box(&request), &mut rng))
    });

    c.bench_function("generate_item_with_art", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        let request = GenerationRequest::new();
        b.iter(|| drawn.generate_with_rng(black_box(&request), &mut rng))
    });
}

fn bench_pixel_art(c: &mut Criterion) {
    let request = ArtRequest {
        family: VisualFamily::Sword,
        sub_type: "longsword",
        material: "steel",
        palette: "steel",
        complexity: 5,
        hints: Map::from_iter([("subTypeId".to_string(), Value::from("longsword"))]),
    };

    for size in [16u32, 64] {
        let generator = PixelArtGenerator::new(size);
        c.bench_function(&format!("pixel_art_{}px", size), |b| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| generator.generate(black_box(&request), &mut rng))
        });
    }
}

fn bench_data_loading(c: &mut Criterion) {
    c.bench_function("load_embedded_data", |b| b.iter(|| ForgeData::embedded()));
}

criterion_group!(benches, bench_item_generation, bench_pixel_art, bench_data_loading);
criterion_main!(benches);
