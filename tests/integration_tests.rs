//! Integration tests for the session lifecycle and drop/lock scheduling

use streamer_tetris::core::{GameSession, Grid, ManualClock, PieceArbiter, ScriptedPieces};
use streamer_tetris::types::{GameAction, GameStatus, PieceKind, PieceOrigin, TICK_MS};

fn scripted(kinds: Vec<PieceKind>) -> GameSession {
    GameSession::with_sources(
        Box::new(ScriptedPieces::new(kinds)),
        Box::new(ManualClock::new(0)),
        PieceArbiter::local_only(),
    )
}

fn repeat(action: GameAction, times: usize, session: &mut GameSession) {
    for _ in 0..times {
        assert!(session.apply_action(action), "{:?} rejected", action);
    }
}

#[test]
fn test_game_lifecycle() {
    let mut session = GameSession::new(12345);
    assert_eq!(session.status(), GameStatus::Ready);
    assert!(session.active().is_none());

    assert!(session.apply_action(GameAction::Start));
    assert_eq!(session.status(), GameStatus::Playing);
    assert!(session.active().is_some());
    assert_eq!(session.active_origin(), PieceOrigin::Local);

    // Start again is a no-op.
    assert!(!session.apply_action(GameAction::Start));
}

#[test]
fn test_rejected_moves_leave_state_untouched() {
    let mut session = scripted(vec![PieceKind::I]);
    session.start();

    repeat(GameAction::MoveLeft, 3, &mut session);
    let at_wall = session.active();
    assert!(!session.apply_action(GameAction::MoveLeft));
    assert_eq!(session.active(), at_wall);

    repeat(GameAction::MoveRight, 11, &mut session);
    assert_eq!(session.active().unwrap().x, 11);
    assert!(!session.apply_action(GameAction::MoveRight));
}

#[test]
fn test_gravity_at_16ms_ticks() {
    let mut session = scripted(vec![PieceKind::T]);
    session.start();

    // 62 ticks = 992ms: no drop yet; the 63rd crosses 1000ms.
    for _ in 0..62 {
        assert!(!session.tick(TICK_MS));
    }
    assert_eq!(session.active().unwrap().y, 0);
    assert!(session.tick(TICK_MS));
    assert_eq!(session.active().unwrap().y, 1);
}

#[test]
fn test_pieces_lock_and_row_clears_on_standard_grid() {
    let mut session = scripted(vec![PieceKind::I, PieceKind::I, PieceKind::I, PieceKind::L]);
    session.start();

    // I at x = 0, 4, 8 and L at x = 12 fill the bottom row.
    repeat(GameAction::MoveLeft, 3, &mut session);
    session.apply_action(GameAction::HardDrop);
    repeat(GameAction::MoveRight, 1, &mut session);
    session.apply_action(GameAction::HardDrop);
    repeat(GameAction::MoveRight, 5, &mut session);
    session.apply_action(GameAction::HardDrop);
    assert_eq!(session.active().unwrap().kind, PieceKind::L);
    repeat(GameAction::MoveRight, 9, &mut session);
    session.apply_action(GameAction::HardDrop);

    let event = session.take_last_event().unwrap();
    assert_eq!(event.kind, PieceKind::L);
    assert_eq!(event.lines_cleared, 1);
    assert_eq!(session.lines(), 1);
    assert_eq!(session.score(), 80);

    // Only the L's top cell remains, shifted onto the floor.
    assert_eq!(session.grid().filled_count(), 1);
    assert_eq!(session.grid().get(14, 15), Some(Some(PieceKind::L)));
}

#[test]
fn test_ten_lines_reach_level_two() {
    let mut session = scripted(vec![PieceKind::I]).with_grid(Grid::new(8, 16));
    session.start();
    assert_eq!(session.level(), 1);
    assert_eq!(session.drop_interval_ms(), 1000);

    for _ in 0..10 {
        repeat(GameAction::MoveLeft, 3, &mut session);
        session.apply_action(GameAction::HardDrop);
        repeat(GameAction::MoveRight, 1, &mut session);
        session.apply_action(GameAction::HardDrop);
    }

    assert_eq!(session.lines(), 10);
    assert_eq!(session.level(), 2);
    assert_eq!(session.drop_interval_ms(), 950);
    assert_eq!(session.score(), 10 * 80);
    assert_eq!(session.grid().filled_count(), 0);
}

#[test]
fn test_soft_drop_and_hard_drop_scoring() {
    let mut session = scripted(vec![PieceKind::O]);
    session.start();

    repeat(GameAction::SoftDrop, 5, &mut session);
    assert_eq!(session.score(), 5);
    assert_eq!(session.active().unwrap().y, 5);

    session.apply_action(GameAction::HardDrop);
    assert_eq!(session.score(), 5);
    assert_eq!(session.grid().filled_count(), 4);
    assert_eq!(session.landing_y(), Some(12));
}

#[test]
fn test_stack_to_top_is_game_over_then_restart() {
    let mut session = scripted(vec![PieceKind::O]).with_grid(Grid::new(8, 4));
    session.start();

    session.apply_action(GameAction::HardDrop);
    assert_eq!(session.status(), GameStatus::Playing);
    session.apply_action(GameAction::HardDrop);
    assert_eq!(session.status(), GameStatus::GameOver);
    assert!(session.active().is_none());

    for action in [
        GameAction::MoveLeft,
        GameAction::Rotate,
        GameAction::HardDrop,
        GameAction::Pause,
        GameAction::Start,
    ] {
        assert!(!session.apply_action(action));
    }
    assert!(!session.tick(10_000));

    assert!(session.apply_action(GameAction::Restart));
    assert_eq!(session.status(), GameStatus::Playing);
    assert_eq!(session.grid().width(), 8);
    assert_eq!(session.grid().height(), 4);
    assert_eq!(session.grid().filled_count(), 0);
    assert_eq!((session.score(), session.lines(), session.level()), (0, 0, 1));
    assert_eq!(session.episode_id(), 1);
}

#[test]
fn test_pause_ignores_ticks_and_input() {
    let mut session = scripted(vec![PieceKind::T]);
    session.start();
    session.apply_action(GameAction::Pause);

    let snapshot = session.snapshot();
    assert!(!snapshot.playable());
    for _ in 0..200 {
        assert!(!session.tick(TICK_MS));
    }
    assert!(!session.apply_action(GameAction::SoftDrop));
    assert!(!session.apply_action(GameAction::Restart));
    assert_eq!(session.snapshot(), snapshot);

    assert!(session.apply_action(GameAction::Pause));
    assert!(session.snapshot().playable());
}

#[test]
fn test_same_seed_same_local_sequence() {
    let mut a = GameSession::new(99);
    let mut b = GameSession::new(99);
    a.start();
    b.start();
    for _ in 0..20 {
        assert_eq!(a.active().map(|p| p.kind), b.active().map(|p| p.kind));
        assert_eq!(a.next_piece(), b.next_piece());
        if a.status() != GameStatus::Playing {
            break;
        }
        a.apply_action(GameAction::HardDrop);
        b.apply_action(GameAction::HardDrop);
    }
}
