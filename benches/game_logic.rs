use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shiftris::core::trigger;
use shiftris::core::{Board, Stage, StageConfig};
use shiftris::types::{Cell, InputFrame, TriggerKind, Turn};

fn playing_stage() -> Stage {
    let mut stage = Stage::new(StageConfig::default().with_seed(12345));
    stage.launch();
    stage
}

fn bench_tick(c: &mut Criterion) {
    let mut stage = playing_stage();
    let idle = InputFrame::default();

    c.bench_function("stage_tick_16ms", |b| {
        b.iter(|| {
            if stage.game_over() {
                stage.launch();
            }
            stage.tick(black_box(16), &idle);
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    let full = "###########";
    c.bench_function("clear_4_rows", |b| {
        b.iter(|| {
            let mut board = Board::from_ascii(&["#....#.....", full, full, full, full]);
            let rows = board.full_rows();
            board.clear_rows(black_box(&rows));
        })
    });
}

fn bench_try_rotate(c: &mut Criterion) {
    let mut stage = playing_stage();

    c.bench_function("try_rotate", |b| {
        b.iter(|| {
            stage.try_rotate(black_box(Turn::Cw));
        })
    });
}

fn bench_try_shift(c: &mut Criterion) {
    let mut stage = playing_stage();
    let mut step = Cell::RIGHT;

    c.bench_function("try_shift", |b| {
        b.iter(|| {
            if !stage.try_shift(black_box(step)) {
                step = Cell::new(-step.x, 0);
            }
        })
    });
}

fn bench_bomb(c: &mut Criterion) {
    let row = "#.#.#.#.#.#";
    let rows = [row; 8];
    c.bench_function("bomb_on_placement", |b| {
        b.iter(|| {
            let mut board = Board::from_ascii(&rows);
            trigger::handler(TriggerKind::Bomb).on_placement(&mut board, black_box(Cell::new(5, 4)))
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_line_clear,
    bench_try_rotate,
    bench_try_shift,
    bench_bomb
);
criterion_main!(benches);
