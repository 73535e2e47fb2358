//! Check, checkmate, and stalemate detection.
//!
//! These sit above the search core and are deliberately simple: a direct
//! ray scan for "is this king attacked right now", and legal-move
//! enumeration by trial-play plus a check re-probe for mate/stalemate.
//! Pins and discovered checks get no separate treatment; they only
//! matter insofar as trial-play already catches them by making the move,
//! checking the resulting position, and unmaking it.

use crate::board::Board;
use crate::movegen;
use crate::piece;
use crate::square;
use crate::tables;

/// Is `side`'s king currently attacked? This ignores whether the attacker
/// is itself pinned, which is fine for "is my king attacked right now"
/// but is not a full legality test on its own; `has_legal_move` covers
/// the rest by trial-playing each move and re-checking.
pub fn in_check(board: &Board, side: u8) -> bool {
    let king_sq = match board.king_square(side) {
        Some(sq) => sq,
        None => return false,
    };
    let enemy = piece::flip_side(side);

    for &d in tables::directions(piece::ROOK) {
        if ray_hits(board, king_sq, d, enemy, &[piece::ROOK, piece::QUEEN]) {
            return true;
        }
    }
    for &d in tables::directions(piece::BISHOP) {
        if ray_hits(board, king_sq, d, enemy, &[piece::BISHOP, piece::QUEEN]) {
            return true;
        }
    }
    for &d in tables::directions(piece::KNIGHT) {
        let to = square::step(king_sq, d);
        if square::is_on_board(to) {
            let p = board.raw_at(to);
            if piece::color(p) == enemy && piece::kind(p) == piece::KNIGHT {
                return true;
            }
        }
    }
    let pawn_dirs: [i8; 2] = if side == piece::WHITE { [-15, -17] } else { [15, 17] };
    let enemy_pawn_kind = if side == piece::WHITE { piece::PAWN_DOWN } else { piece::PAWN_UP };
    for &d in &pawn_dirs {
        let to = square::step(king_sq, d);
        if square::is_on_board(to) {
            let p = board.raw_at(to);
            if piece::color(p) == enemy && piece::kind(p) == enemy_pawn_kind {
                return true;
            }
        }
    }
    for &d in tables::directions(piece::KING) {
        let to = square::step(king_sq, d);
        if square::is_on_board(to) {
            let p = board.raw_at(to);
            if piece::color(p) == enemy && piece::kind(p) == piece::KING {
                return true;
            }
        }
    }
    false
}

fn ray_hits(board: &Board, from: square::Square, dir: i8, enemy: u8, kinds: &[u8]) -> bool {
    let mut to = square::step(from, dir);
    while square::is_on_board(to) {
        let p = board.raw_at(to);
        if !piece::is_empty(p) {
            return piece::color(p) == enemy && kinds.contains(&piece::kind(p));
        }
        to = square::step(to, dir);
    }
    false
}

/// Does `side` have any pseudo-legal move that does not leave its own
/// king in check? Used by both checkmate and stalemate, which differ
/// only in whether the side is currently in check.
fn has_legal_move(board: &mut Board, side: u8) -> bool {
    let mut moves = Vec::new();
    movegen::generate_pseudo_legal(board, side, &mut moves);
    for (from, to) in moves {
        let (undo, _delta) = board.make_move(from, to);
        let still_in_check = in_check(board, side);
        board.unmake_move(undo);
        if !still_in_check {
            return true;
        }
    }
    false
}

pub fn is_checkmate(board: &mut Board, side: u8) -> bool {
    in_check(board, side) && !has_legal_move(board, side)
}

pub fn is_stalemate(board: &mut Board, side: u8) -> bool {
    !in_check(board, side) && !has_legal_move(board, side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position;

    #[test]
    fn rook_gives_check_along_file() {
        let mut board = Board::empty();
        position::load(&mut board, "4k3/4R3/8/8/8/8/8/4K3 b - - 0 1");
        assert!(in_check(&board, piece::BLACK));
        assert!(!is_checkmate(&mut board, piece::BLACK));
    }

    #[test]
    fn back_rank_mate_is_detected() {
        let mut board = Board::empty();
        position::load(&mut board, "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(is_checkmate(&mut board, piece::BLACK));
    }

    #[test]
    fn king_vs_king_corner_is_stalemate() {
        let mut board = Board::empty();
        position::load(&mut board, "k7/8/1K6/8/8/8/8/8 b - - 0 1");
        assert!(!in_check(&board, piece::BLACK));
        assert!(is_stalemate(&mut board, piece::BLACK));
    }
}
