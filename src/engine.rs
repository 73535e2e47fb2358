//! Public driver surface: the one `Engine` value a host holds, wired to
//! the position loader, the search, and the auxiliary probes.
//!
//! Nothing here returns `Result`: every operation signals failure through
//! a sentinel, an empty piece, or `false`. Reaching into an off-board
//! square or an empty source square is a caller mistake reported the same
//! way, not a panic.

use crate::board::Board;
use crate::movegen;
use crate::piece::{self, Piece};
use crate::position;
use crate::probes;
use crate::search;
use crate::square::{self, Square};

/// A single chess position plus whatever search state travels with it.
/// The crate supports exactly one of these at a time; concurrent
/// searches on the same `Engine` are not supported.
pub struct Engine {
    board: Board,
    callback: Option<Box<dyn FnMut() -> bool>>,
    stop_requested: bool,
}

impl Engine {
    pub fn new() -> Engine {
        let mut board = Board::empty();
        position::load(&mut board, position::STARTPOS);
        Engine {
            board,
            callback: None,
            stop_requested: false,
        }
    }

    pub fn load_position(&mut self, text: &str) {
        position::load(&mut self.board, text);
        self.stop_requested = false;
        log::debug!("position loaded: {text}");
    }

    pub fn to_position_string(&self) -> String {
        position::export(&self.board)
    }

    /// Piece at `sq`, empty if off-board. Color is normalised the way the
    /// rest of the public surface expects: see `piece::normalize_color_label`.
    pub fn piece_at(&self, sq: Square) -> Piece {
        if !square::is_on_board(sq) {
            piece::EMPTY
        } else {
            piece::normalize_color_label(self.board.raw_at(sq))
        }
    }

    pub fn side_to_move(&self) -> u8 {
        self.board.side
    }

    /// Fill `out` with up to `out.len()` pseudo-legal moves for the side
    /// to move; return the total count found, which may exceed
    /// `out.len()`. Callers compare the two to detect truncation, and are
    /// responsible for culling moves that leave their own king in check
    /// (via `in_check`) before treating a move as legal.
    pub fn enumerate_legal_moves(&self, out: &mut [(Square, Square)]) -> usize {
        let mut moves = Vec::new();
        movegen::generate_pseudo_legal(&self.board, self.board.side, &mut moves);
        for (slot, mv) in out.iter_mut().zip(moves.iter()) {
            *slot = *mv;
        }
        moves.len()
    }

    /// Search for a best move under the given node/depth budget. Returns
    /// `None` (the invalid-move sentinel) only if no legal move exists.
    pub fn find_best_move(&mut self, node_max: u64, depth_max: i32) -> Option<(Square, Square)> {
        let stop_requested = self.stop_requested;
        let callback = self.callback.as_mut();
        let mut relay = move |_node_count: u64| -> bool {
            if stop_requested {
                return true;
            }
            match callback {
                Some(cb) => cb(),
                None => false,
            }
        };
        search::find_best_move(&mut self.board, node_max, depth_max, Some(&mut relay))
    }

    /// Play `(from, to)` if it is a legal move for the side to move.
    /// Returns false, leaving the engine's position unchanged, if the
    /// squares are off-board, the source is empty or not the mover's
    /// piece, the move isn't even pseudo-legal, or it leaves the mover's
    /// own king in check.
    pub fn play_move(&mut self, from: Square, to: Square) -> bool {
        if !square::is_on_board(from) || !square::is_on_board(to) {
            return false;
        }
        let moving = self.board.raw_at(from);
        if piece::is_empty(moving) || piece::color(moving) != self.board.side {
            return false;
        }
        let side = self.board.side;
        let mut moves = Vec::new();
        movegen::generate_pseudo_legal(&self.board, side, &mut moves);
        if !moves.contains(&(from, to)) {
            return false;
        }

        let (undo, _material_delta) = self.board.make_move(from, to);
        if probes::in_check(&self.board, side) {
            self.board.unmake_move(undo);
            return false;
        }
        log::debug!("played {from:#x}->{to:#x}");
        true
    }

    pub fn in_check(&self) -> bool {
        probes::in_check(&self.board, self.board.side)
    }

    pub fn is_checkmate(&mut self) -> bool {
        probes::is_checkmate(&mut self.board, self.board.side)
    }

    pub fn is_stalemate(&mut self) -> bool {
        probes::is_stalemate(&mut self.board, self.board.side)
    }

    /// Install a periodic callback the search invokes at every node.
    /// Returning `true` requests an early stop, the same way
    /// `request_stop` does from outside.
    pub fn set_callback<F: FnMut() -> bool + 'static>(&mut self, callback: F) {
        self.callback = Some(Box::new(callback));
    }

    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_enumerates_twenty_moves() {
        let engine = Engine::new();
        let mut buffer = [(square::NONE, square::NONE); 32];
        let count = engine.enumerate_legal_moves(&mut buffer);
        assert_eq!(count, 20);
    }

    #[test]
    fn enumerate_reports_truncation_via_count_vs_capacity() {
        let engine = Engine::new();
        let mut buffer = [(square::NONE, square::NONE); 5];
        let count = engine.enumerate_legal_moves(&mut buffer);
        assert!(count > buffer.len());
    }

    #[test]
    fn play_e4_then_e5_toggles_side_to_move() {
        let mut engine = Engine::new();
        assert_eq!(engine.side_to_move(), piece::WHITE);
        assert!(engine.play_move(0x64, 0x44));
        assert_eq!(engine.side_to_move(), piece::BLACK);
        assert!(engine.play_move(0x14, 0x34));
        assert_eq!(engine.side_to_move(), piece::WHITE);
    }

    #[test]
    fn playing_from_empty_square_fails() {
        let mut engine = Engine::new();
        assert!(!engine.play_move(0x44, 0x34));
    }

    #[test]
    fn playing_off_board_square_fails() {
        let mut engine = Engine::new();
        assert!(!engine.play_move(0x08, 0x18));
    }

    #[test]
    fn request_stop_before_any_iteration_yields_no_move() {
        let mut engine = Engine::new();
        engine.request_stop();
        let best = engine.find_best_move(0, 10);
        assert!(best.is_none());
    }
}
