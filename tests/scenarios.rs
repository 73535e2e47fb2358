//! End-to-end scenarios exercised against the public `Engine` surface.

use mcu_chess::Engine;

#[test]
fn initial_position_has_twenty_legal_moves() {
    let engine = Engine::new();
    let mut buffer = [(0u8, 0u8); 64];
    let count = engine.enumerate_legal_moves(&mut buffer);
    assert_eq!(count, 20);
}

#[test]
fn lone_rook_check_is_not_checkmate() {
    let mut engine = Engine::new();
    engine.load_position("4k3/4R3/8/8/8/8/8/4K3 b - - 0 1");
    assert!(engine.in_check());
    assert!(!engine.is_checkmate());
    assert!(engine.find_best_move(0, 4).is_some());
}

#[test]
fn lone_queen_check_has_a_king_escape() {
    let mut engine = Engine::new();
    engine.load_position("4k3/4Q3/8/8/8/8/8/4K3 b - - 0 1");
    assert!(engine.in_check());
    let best = engine.find_best_move(0, 4).expect("a legal reply exists");
    assert!(engine.play_move(best.0, best.1));
}

#[test]
fn back_rank_mate_is_detected() {
    let mut engine = Engine::new();
    engine.load_position("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert!(engine.is_checkmate());
}

#[test]
fn cornered_king_with_no_moves_is_stalemate() {
    let mut engine = Engine::new();
    engine.load_position("k7/8/1K6/8/8/8/8/8 b - - 0 1");
    assert!(!engine.in_check());
    assert!(engine.is_stalemate());
}

#[test]
fn e2e4_then_e7e5_toggles_side_to_move_each_time() {
    let mut engine = Engine::new();
    assert!(engine.play_move(0x64, 0x44));
    assert_eq!(engine.side_to_move(), mcu_chess::piece::BLACK);
    assert!(engine.play_move(0x14, 0x34));
    assert_eq!(engine.side_to_move(), mcu_chess::piece::WHITE);
}
