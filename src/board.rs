//! The 0x88 board: piece placement plus the running aggregates (side to
//! move, en-passant target, non-pawn material) that travel with it along
//! the search path.
//!
//! `make_move`/`unmake_move` assume the move they are given is at least
//! pseudo-legal. They do not generate or validate moves themselves; they
//! trust that whatever called them (the move generator in `search`, or a
//! caller-supplied move already checked against `enumerate_moves`) has
//! already done so.

use crate::piece::{self, Piece};
use crate::square::{self, Square};
use crate::tables;

/// Signed material weight used both for the `non_pawn_material` aggregate
/// and (scaled by 37 elsewhere) for MVV/LVA move ordering.
pub fn non_pawn_value(kind: u8) -> i32 {
    match kind {
        piece::KNIGHT | piece::BISHOP => 3,
        piece::ROOK => 5,
        piece::QUEEN => 9,
        _ => 0,
    }
}

pub struct Board {
    squares: [Piece; 128],
    pub side: u8,
    pub en_passant: Square,
    pub non_pawn_material: i32,
}

/// Everything needed to reverse one `make_move` call. The scalar
/// aggregates are snapshotted directly (rather than re-derived from
/// deltas on unmake), which keeps `unmake_move` a straight restore
/// instead of an inverse computation.
pub struct Undo {
    from: Square,
    to: Square,
    moving_piece_before: Piece,
    captured_square: Square,
    captured_piece_before: Piece,
    castle_rook: Option<(Square, Square, Piece)>,
    promoted: bool,
    prior_en_passant: Square,
    prior_non_pawn_material: i32,
}

impl Board {
    pub fn empty() -> Board {
        let mut squares = [piece::EMPTY; 128];
        tables::init_center_distance_table(&mut squares);
        Board {
            squares,
            side: piece::WHITE,
            en_passant: square::NONE,
            non_pawn_material: 0,
        }
    }

    #[inline]
    pub fn raw_at(&self, sq: Square) -> Piece {
        self.squares[sq as usize]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, p: Piece) {
        self.squares[sq as usize] = p;
    }

    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.squares[sq as usize] = piece::EMPTY;
    }

    /// Signed positional bonus baked into the off-board half of the array
    /// at load time (see `tables::init_center_distance_table`).
    #[inline]
    pub fn position_score(&self, sq: Square) -> i32 {
        self.squares[square::score_cell(sq) as usize] as i8 as i32
    }

    pub fn king_square(&self, side: u8) -> Option<Square> {
        for rank in 0..8u8 {
            for file in 0..8u8 {
                let sq = square::make(rank, file);
                let p = self.raw_at(sq);
                if piece::kind(p) == piece::KING && piece::color(p) == side {
                    return Some(sq);
                }
            }
        }
        None
    }

    /// Apply a pseudo-legal move in place, deriving en-passant, castling,
    /// and promotion from board geometry the same way the move loop in
    /// `search` derives them while generating the move. Returns the undo
    /// record and the signed material delta for the mover (used for move
    /// ordering and, at the root, for updating the caller-visible score).
    pub fn make_move(&mut self, from: Square, to: Square) -> (Undo, i32) {
        let moving = self.raw_at(from);
        let kind = piece::kind(moving);
        let side = piece::color(moving);

        let is_en_passant = piece::is_pawn(kind) && to == self.en_passant;
        let captured_square = if is_en_passant { to ^ 0x10 } else { to };
        let captured_before = self.raw_at(captured_square);

        let mut material_delta = 0i32;
        if !piece::is_empty(captured_before) {
            material_delta += non_pawn_value(piece::kind(captured_before));
        }

        let castle_rook = if kind == piece::KING {
            let df = square::file(to) as i8 - square::file(from) as i8;
            if df == 2 {
                let rank = square::rank(from);
                Some((square::make(rank, 7), square::make(rank, 5)))
            } else if df == -2 {
                let rank = square::rank(from);
                Some((square::make(rank, 0), square::make(rank, 3)))
            } else {
                None
            }
        } else {
            None
        };

        let undo = Undo {
            from,
            to,
            moving_piece_before: moving,
            captured_square,
            captured_piece_before: captured_before,
            castle_rook: castle_rook.map(|(rf, rt)| (rf, rt, self.raw_at(rf))),
            promoted: false,
            prior_en_passant: self.en_passant,
            prior_non_pawn_material: self.non_pawn_material,
        };

        // Clear source and any captured piece, then place the mover.
        self.clear(from);
        if captured_square != to {
            self.clear(captured_square);
        }
        let mut landing = piece::new(kind, side) | piece::MOVED;

        let mut undo = undo;
        if piece::is_pawn(kind) {
            let last_rank = if side == piece::WHITE { 0 } else { 7 };
            if square::rank(to) == last_rank {
                landing = piece::new(piece::QUEEN, side) | piece::MOVED;
                material_delta += non_pawn_value(piece::QUEEN);
                undo.promoted = true;
            }
        }
        self.set(to, landing);

        if let Some((rook_from, rook_to, rook_piece)) = castle_rook {
            self.clear(rook_from);
            self.set(rook_to, rook_piece | piece::MOVED);
        }

        // New en-passant target: only a pawn double push creates one.
        self.en_passant = if piece::is_pawn(kind) {
            let dr = square::rank(to) as i8 - square::rank(from) as i8;
            if dr == 2 || dr == -2 {
                to ^ 0x10
            } else {
                square::NONE
            }
        } else {
            square::NONE
        };

        self.non_pawn_material -= non_pawn_value(piece::kind(captured_before));
        self.non_pawn_material += if undo.promoted { non_pawn_value(piece::QUEEN) } else { 0 };

        self.side = piece::flip_side(self.side);

        (undo, material_delta)
    }

    pub fn unmake_move(&mut self, undo: Undo) {
        self.side = piece::flip_side(self.side);
        self.en_passant = undo.prior_en_passant;
        self.non_pawn_material = undo.prior_non_pawn_material;

        self.clear(undo.to);
        self.set(undo.from, undo.moving_piece_before);
        if undo.captured_square == undo.to {
            self.set(undo.to, undo.captured_piece_before);
        } else {
            self.set(undo.captured_square, undo.captured_piece_before);
        }

        if let Some((rook_from, rook_to, rook_piece_before)) = undo.castle_rook {
            self.clear(rook_to);
            self.set(rook_from, rook_piece_before);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position;

    #[test]
    fn make_unmake_restores_everything_but_moved_bits() {
        let mut board = Board::empty();
        position::load(&mut board, position::STARTPOS);
        let before_side = board.side;
        let before_ep = board.en_passant;
        let before_npm = board.non_pawn_material;
        let mut before_squares = [0u8; 128];
        for sq in 0..128u8 {
            before_squares[sq as usize] = board.raw_at(sq);
        }

        let (undo, _delta) = board.make_move(square::make(6, 4), square::make(4, 4));
        board.unmake_move(undo);

        assert_eq!(board.side, before_side);
        assert_eq!(board.en_passant, before_ep);
        assert_eq!(board.non_pawn_material, before_npm);
        for sq in 0..128u8 {
            if square::is_on_board(sq) {
                assert_eq!(board.raw_at(sq), before_squares[sq as usize], "square {sq:#x}");
            }
        }
    }

    #[test]
    fn double_push_sets_en_passant_between_from_and_to() {
        let mut board = Board::empty();
        position::load(&mut board, position::STARTPOS);
        let (_undo, _delta) = board.make_move(square::make(6, 4), square::make(4, 4));
        assert_eq!(board.en_passant, square::make(5, 4));
    }
}
