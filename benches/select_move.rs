//! Criterion benchmarks for the computer's move selection.
//!
//! Run with:
//!     cargo bench --bench select_move

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use lab_game_engine::engine::minimax::{minimax_search, MinimaxParams};
use lab_game_engine::engine::models::{Difficulty, Mark};
use lab_game_engine::engine::bot_strategy::select_move;
use lab_game_engine::games::tictactoe::Board;

/// Positions with the side to move, from the opening to a near-finished game.
const POSITIONS: [(&str, &str, Mark); 4] = [
    ("empty", "_________", Mark::X),
    ("reply_to_center", "____X____", Mark::O),
    ("midgame", "X___O___X", Mark::O),
    ("fork_threat", "XX_OO____", Mark::O),
];

fn bench_minimax_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimax_search");

    for (label, layout, mark) in POSITIONS {
        let board = Board::parse(layout).expect("valid layout");
        for depth_discount in [true, false] {
            let params = MinimaxParams { depth_discount };
            let id = format!("{}_discount_{}", label, depth_discount);
            group.bench_with_input(BenchmarkId::new("search", id), &board, |b, board| {
                b.iter(|| minimax_search(board, mark, &params));
            });
        }
    }

    group.finish();
}

fn bench_select_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_move");
    let board = Board::parse("____X____").expect("valid layout");

    for difficulty in Difficulty::ALL {
        group.bench_with_input(
            BenchmarkId::new("reply_to_center", difficulty.as_str()),
            &difficulty,
            |b, &difficulty| {
                let mut rng = StdRng::seed_from_u64(42);
                b.iter(|| select_move(&board, Mark::O, difficulty, &mut rng));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_minimax_search, bench_select_move);
criterion_main!(benches);
