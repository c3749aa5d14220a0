//! Criterion benchmarks measure time of capture detection, move making and
//! loading saved games.

use bitcheckers::checkers::core::{Move, Player};
use bitcheckers::checkers::persistence::{self, LoadMode};
use bitcheckers::checkers::position::Position;
use bitcheckers::checkers::rules;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const GAME: [&str; 8] = [
    "c3 d4", "f6 e5", "d4 f6", "g7 e5", "b2 c3", "h6 g5", "c3 d4", "e5 c3",
];

/// Positions reached after each move of a short game.
fn positions() -> Vec<Position> {
    let mut position = Position::starting();
    let mut positions = vec![position];
    for next_move in GAME {
        let next_move = Move::try_from(next_move).unwrap();
        assert!(position.make_move(next_move).is_ok(), "{next_move}");
        positions.push(position);
    }
    positions
}

/// Checks both players for available captures in every position of the game.
fn capture_detection(c: &mut Criterion) {
    let positions = positions();
    let mut group = c.benchmark_group("Capture detection");
    let _ = group.throughput(criterion::Throughput::Elements(positions.len() as u64));
    let _ = group.bench_with_input(
        BenchmarkId::new("any_capture_available", format!("{} positions", positions.len())),
        &positions,
        |b, positions| {
            b.iter(|| {
                let mut captures = 0;
                for position in positions {
                    for player in [Player::One, Player::Two] {
                        if std::hint::black_box(rules::any_capture_available(position, player)) {
                            captures += 1;
                        }
                    }
                }
                captures
            });
        },
    );
    group.finish();
}

/// Replays the whole game from the starting position.
fn make_moves(c: &mut Criterion) {
    let moves: Vec<Move> = GAME.iter().map(|m| Move::try_from(*m).unwrap()).collect();
    let _ = c.bench_function("make_move: short game", |b| {
        b.iter(|| {
            let mut position = Position::starting();
            let mut applied = 0;
            for next_move in &moves {
                if std::hint::black_box(position.make_move(*next_move)).is_ok() {
                    applied += 1;
                }
            }
            (position, applied)
        });
    });
}

/// Parses the saved form of every position of the game.
fn load(c: &mut Criterion) {
    let saved: Vec<String> = positions().iter().map(persistence::serialize).collect();
    let _ = c.bench_function("parse saved games", |b| {
        b.iter(|| {
            let mut loaded = 0;
            for input in &saved {
                if std::hint::black_box(persistence::parse(input, LoadMode::Strict)).is_ok() {
                    loaded += 1;
                }
            }
            loaded
        });
    });
}

criterion_group! {
    name = rules_benches;
    config = Criterion::default();
    targets = capture_detection, make_moves, load
}
criterion_main!(rules_benches);
