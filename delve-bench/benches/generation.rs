//! Delve benchmark suite.
//!
//! Generation runs between player commands, so it has a soft real-time
//! budget: a full offline level (layout, naming, wiring, population) should
//! stay comfortably under a typical command round-trip.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use delve_core::config::{DelveConfig, LayoutConfig};
use delve_core::describe::StubDescriber;
use delve_core::dungeon::Dungeon;
use delve_core::layout::LayoutGenerator;
use delve_core::populate::{Catalogue, CataloguePopulator, ItemTemplate, MobTemplate};
use delve_core::types::Coordinate;
use delve_core::zone::Zone;

fn catalogue() -> Catalogue {
    let mut cat = Catalogue::new();
    cat.add_mob(MobTemplate {
        name: "barrow rat".to_string(),
        level: 1,
        aggressive: true,
    });
    cat.add_item(ItemTemplate {
        name: "rusted lantern".to_string(),
        value: 5,
    });
    cat
}

fn bench_zone() -> Zone {
    let mut zone = Zone::new("crypt", Coordinate::ORIGIN, 100, 20);
    zone.level = 2;
    zone.races = vec!["barrow rat".to_string()];
    zone.items = vec!["rusted lantern".to_string()];
    zone
}

/// Benchmark: raw layout growth at the default and a large room target.
fn bench_layout_generation(c: &mut Criterion) {
    for min_rooms in [10usize, 40] {
        c.bench_function(&format!("layout_generate_{min_rooms}_rooms"), |b| {
            let config = LayoutConfig {
                min_rooms,
                ..LayoutConfig::default()
            };
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                let mut generator = LayoutGenerator::new(config.clone(), seed);
                black_box(generator.generate(black_box(Coordinate::ORIGIN)));
            });
        });
    }
}

/// Benchmark: a full offline level, stub descriptions and all.
fn bench_level_generation(c: &mut Criterion) {
    c.bench_function("generate_level_offline", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut dungeon = Dungeon::new(
                DelveConfig::default(),
                seed,
                Box::new(StubDescriber),
                Box::new(CataloguePopulator::new(catalogue(), seed)),
            );
            let mut zone = bench_zone();
            black_box(dungeon.generate_level(&mut zone, 1));
            black_box(zone);
        });
    });
}

criterion_group!(benches, bench_layout_generation, bench_level_generation);
criterion_main!(benches);
