use criterion::{Criterion, black_box, criterion_group, criterion_main};
use war_core::game::event::Discard;
use war_core::game::match_state::MatchState;

fn play_seeded(seed: u64) {
    let mut state = MatchState::random_deal(["", ""], seed);
    let _ = black_box(state.play(&mut Discard));
}

fn full_game_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_game");
    for seed in [7u64, 1040, 20251017] {
        let id = format!("random_deal_{seed}");
        group.bench_function(id, |b| b.iter(|| play_seeded(seed)));
    }
    group.finish();
}

criterion_group!(benches, full_game_bench);
criterion_main!(benches);
