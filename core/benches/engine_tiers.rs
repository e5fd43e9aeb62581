use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sweeper_core::{Action, GameConfig, GameState, Vec2};

const TIERS: &[(&str, GameConfig)] = &[
    ("beginner", GameConfig::beginner()),
    ("intermediate", GameConfig::intermediate()),
    ("expert", GameConfig::expert()),
];

fn bench_first_reveal(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_reveal");
    for &(name, config) in TIERS {
        let state = GameState::new(config, 12345);
        let center = Vec2::new(config.width() / 2, config.height() / 2);
        group.bench_with_input(BenchmarkId::from_parameter(name), &state, |b, state| {
            b.iter(|| state.dispatch(black_box(Action::Reveal(center))).unwrap().into_owned())
        });
    }
    group.finish();
}

fn bench_flood_empty_board(c: &mut Criterion) {
    let state = GameState::new(GameConfig::new(50, 50, 0).unwrap(), 0);

    c.bench_function("flood_50x50_empty", |b| {
        b.iter(|| {
            state
                .dispatch(black_box(Action::Reveal(Vec2::new(0, 0))))
                .unwrap()
                .into_owned()
        })
    });
}

fn bench_toggle_flag(c: &mut Criterion) {
    let config = GameConfig::expert();
    let state = GameState::new(config, 7)
        .dispatch(Action::Reveal(Vec2::new(15, 8)))
        .unwrap()
        .into_owned();
    let hidden = state
        .minefield()
        .tiles()
        .find(|cell| !cell.is_revealed())
        .map(|cell| cell.position())
        .unwrap();

    c.bench_function("toggle_flag_expert", |b| {
        b.iter(|| {
            state
                .dispatch(black_box(Action::ToggleFlag(hidden)))
                .unwrap()
                .into_owned()
        })
    });
}

criterion_group!(
    benches,
    bench_first_reveal,
    bench_flood_empty_board,
    bench_toggle_flag
);
criterion_main!(benches);
