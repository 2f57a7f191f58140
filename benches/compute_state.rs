//! Evaluator throughput benchmark: full compute passes per second over a
//! roster built from the fixture package.
//!
//! Run with: `cargo bench`

use std::path::Path;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use muster::data::Repository;
use muster::roster::Roster;
use muster::Identifier;

const PICKS: [&str; 6] = [
    "e111-0000-0000-0001",
    "e111-0000-0000-0002",
    "e111-0000-0000-0003",
    "e111-0000-0000-0004",
    "e111-0000-0000-0005",
    "e111-0000-0000-0006",
];

fn fixture_roster() -> Roster {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/index.xml");
    let repository = Repository::from_file(&path).expect("fixture package should load");
    let catalog = Arc::clone(&repository.catalogs[0]);
    let linker = repository.linker_for(&catalog).expect("linker should build");
    let force_entry = repository
        .game_system
        .find_force_entry("Strike Team")
        .expect("force entry should exist")
        .clone();

    let mut roster = Roster::new(Arc::clone(&repository.game_system), linker, "Bench List");
    let force = roster.add_force(&force_entry);
    for id in PICKS {
        let handle = repository
            .find_entry(&catalog, &Identifier::new(id))
            .expect("root entry lookup should succeed")
            .expect("entry should exist");
        roster
            .add_selection(force, &handle)
            .expect("selection should instantiate");
    }
    roster
}

fn bench_compute_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluator");
    group.sample_size(100);

    let mut roster = fixture_roster();
    group.bench_function("compute_state_six_selections", |b| {
        b.iter(|| {
            roster.compute_state().expect("compute should succeed");
            black_box(roster.selected_total())
        })
    });

    group.bench_function("summary_snapshot", |b| {
        roster.compute_state().expect("compute should succeed");
        b.iter(|| black_box(roster.summary()))
    });

    group.finish();
}

criterion_group!(benches, bench_compute_state);
criterion_main!(benches);
