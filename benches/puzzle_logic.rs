use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_jigsaw::core::grid::trapped_pieces;
use tui_jigsaw::core::shuffle::initialize;
use tui_jigsaw::core::{ensure_grid_integrity, select_hints, GameSettings, PuzzleGame, SimpleRng, Slot};
use tui_jigsaw::term::{PuzzleView, ViewState, Viewport};
use tui_jigsaw::types::Difficulty;

fn expert_game() -> PuzzleGame {
    let settings = GameSettings {
        difficulty: Difficulty::Expert,
        ..GameSettings::default()
    };
    let mut game = PuzzleGame::new(settings, 12345);
    game.start_new_puzzle();
    game
}

fn bench_tick(c: &mut Criterion) {
    let mut game = expert_game();

    c.bench_function("game_tick_16ms", |b| {
        b.iter(|| {
            game.tick(black_box(16));
        })
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let mut rng = SimpleRng::new(7);
    let mut pieces = initialize(6, false, &mut rng);
    // every other piece claims cell 0
    for piece in pieces.iter_mut().step_by(2) {
        piece.slot = Slot::Cell(0);
    }

    c.bench_function("ensure_grid_integrity_6x6", |b| {
        b.iter(|| {
            let mut work = pieces.clone();
            ensure_grid_integrity(black_box(&mut work), 6)
        })
    });
}

fn bench_queries(c: &mut Criterion) {
    let game = expert_game();
    let mut rng = SimpleRng::new(9);

    c.bench_function("trapped_pieces_6x6", |b| {
        b.iter(|| trapped_pieces(black_box(game.pieces()), false))
    });

    c.bench_function("select_hints_6x6", |b| {
        b.iter(|| select_hints(black_box(game.pieces()), 6, false, &mut rng))
    });

    c.bench_function("render_order_6x6", |b| b.iter(|| black_box(&game).render_order()));
}

fn bench_render(c: &mut Criterion) {
    let game = expert_game();
    let view = PuzzleView::default();
    let ui = ViewState::default();

    c.bench_function("render_expert_120x40", |b| {
        b.iter(|| view.render(black_box(&game), &ui, Viewport::new(120, 40)))
    });
}

criterion_group!(benches, bench_tick, bench_reconcile, bench_queries, bench_render);
criterion_main!(benches);
