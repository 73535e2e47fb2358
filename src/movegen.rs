//! Pseudo-legal move generation shared by the auxiliary probes.
//!
//! The search routine in `search.rs` interleaves its own ray-walking with
//! evaluation and recursion (see the module doc there); this generator is
//! the plain, eval-free version used only by `probes`, which needs a flat
//! list of candidate moves to trial-play and re-check.

use crate::board::Board;
use crate::piece;
use crate::square::{self, Square};
use crate::tables;

pub type Move = (Square, Square);

pub fn generate_pseudo_legal(board: &Board, side: u8, moves: &mut Vec<Move>) {
    for rank in 0..8u8 {
        for file in 0..8u8 {
            let from = square::make(rank, file);
            let p = board.raw_at(from);
            if piece::is_empty(p) || piece::color(p) != side {
                continue;
            }
            generate_from(board, from, p, moves);
        }
    }
}

fn generate_from(board: &Board, from: Square, p: u8, moves: &mut Vec<Move>) {
    let kind = piece::kind(p);
    let side = piece::color(p);
    let dirs = tables::directions(kind);

    if piece::is_pawn(kind) {
        generate_pawn(board, from, side, dirs, moves);
        return;
    }

    for &offset in dirs {
        let mut to = square::step(from, offset);
        loop {
            if !square::is_on_board(to) {
                break;
            }
            let target = board.raw_at(to);
            if piece::is_empty(target) {
                moves.push((from, to));
            } else {
                if piece::color(target) != side {
                    moves.push((from, to));
                }
                break;
            }
            if !tables::slides(kind) {
                break;
            }
            to = square::step(to, offset);
        }
    }

    if kind == piece::KING {
        generate_castles(board, from, side, moves);
    }
}

fn generate_pawn(board: &Board, from: Square, side: u8, dirs: &[i8], moves: &mut Vec<Move>) {
    let push = dirs[tables::PAWN_PUSH_INDEX];

    let one_step = square::step(from, push);
    if square::is_on_board(one_step) && piece::is_empty(board.raw_at(one_step)) {
        moves.push((from, one_step));
        let start_rank_ok = !piece::has_moved(board.raw_at(from));
        let two_step = square::step(one_step, push);
        if start_rank_ok && square::is_on_board(two_step) && piece::is_empty(board.raw_at(two_step)) {
            moves.push((from, two_step));
        }
    }

    for &offset in &dirs[1..] {
        let to = square::step(from, offset);
        if !square::is_on_board(to) {
            continue;
        }
        if to == board.en_passant {
            moves.push((from, to));
            continue;
        }
        let target = board.raw_at(to);
        if !piece::is_empty(target) && piece::color(target) != side {
            moves.push((from, to));
        }
    }
}

fn generate_castles(board: &Board, from: Square, side: u8, moves: &mut Vec<Move>) {
    let king = board.raw_at(from);
    if piece::has_moved(king) {
        return;
    }
    let rank = square::rank(from);

    let kingside_rook = square::make(rank, 7);
    if path_clear_for_castle(board, from, kingside_rook) {
        moves.push((from, square::make(rank, 6)));
    }
    let queenside_rook = square::make(rank, 0);
    if path_clear_for_castle(board, from, queenside_rook) {
        moves.push((from, square::make(rank, 2)));
    }
}

fn path_clear_for_castle(board: &Board, king_from: Square, rook_from: Square) -> bool {
    let rook = board.raw_at(rook_from);
    if piece::kind(rook) != piece::ROOK || piece::has_moved(rook) {
        return false;
    }
    let king_file = square::file(king_from) as i32;
    let rook_file = square::file(rook_from) as i32;
    let rank = square::rank(king_from);
    let (lo, hi) = if rook_file < king_file { (rook_file + 1, king_file) } else { (king_file + 1, rook_file) };
    for file in lo..hi {
        if !piece::is_empty(board.raw_at(square::make(rank, file as u8))) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position;

    #[test]
    fn startpos_has_twenty_pseudo_legal_moves() {
        let mut board = Board::empty();
        position::load(&mut board, position::STARTPOS);
        let mut moves = Vec::new();
        generate_pseudo_legal(&board, piece::WHITE, &mut moves);
        assert_eq!(moves.len(), 20);
    }
}
