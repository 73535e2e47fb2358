//! Piece byte encoding.
//!
//! Each occupied square holds one byte: a 3-bit kind, a white/black color
//! bit pair, and a "has moved" bit used to forbid castling and double pawn
//! pushes once a king, rook, or pawn has left its home square. Two pawn
//! kinds (instead of one pawn kind plus a side-dependent branch everywhere)
//! let the move generator treat both colors identically.

pub type Piece = u8;

pub const KIND_MASK: u8 = 0x07;

pub const EMPTY: u8 = 0;
pub const PAWN_UP: u8 = 1;
pub const PAWN_DOWN: u8 = 2;
pub const KNIGHT: u8 = 3;
pub const KING: u8 = 4;
pub const BISHOP: u8 = 5;
pub const ROOK: u8 = 6;
pub const QUEEN: u8 = 7;

pub const WHITE: u8 = 0x08;
pub const BLACK: u8 = 0x10;
pub const COLOR_MASK: u8 = WHITE | BLACK;
pub const MOVED: u8 = 0x20;

#[inline]
pub fn kind(p: Piece) -> u8 {
    p & KIND_MASK
}

#[inline]
pub fn color(p: Piece) -> u8 {
    p & COLOR_MASK
}

#[inline]
pub fn has_moved(p: Piece) -> bool {
    p & MOVED != 0
}

#[inline]
pub fn is_empty(p: Piece) -> bool {
    kind(p) == EMPTY
}

#[inline]
pub fn new(k: u8, side: u8) -> Piece {
    k | side
}

/// The forward pawn kind for a given side: white moves toward rank 0
/// ("upstream"), black toward rank 7 ("downstream").
#[inline]
pub fn pawn_kind_for(side: u8) -> u8 {
    if side == WHITE {
        PAWN_UP
    } else {
        PAWN_DOWN
    }
}

#[inline]
pub fn is_pawn(k: u8) -> bool {
    k == PAWN_UP || k == PAWN_DOWN
}

/// Flip the white/black bit on a full `current_side` mask.
#[inline]
pub fn flip_side(side: u8) -> u8 {
    side ^ COLOR_MASK
}

/// Normalize a piece's color label the way `piece_at` does for callers:
/// XOR-ing `0x08` turns `WHITE` (`0x08`) into `0` and `BLACK` (`0x10`) into
/// `0x18`. This is a presentation detail of the public accessor, not
/// something the rest of the board representation relies on.
#[inline]
pub fn normalize_color_label(p: Piece) -> Piece {
    p ^ WHITE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_color_are_independent_bitfields() {
        let p = new(QUEEN, BLACK) | MOVED;
        assert_eq!(kind(p), QUEEN);
        assert_eq!(color(p), BLACK);
        assert!(has_moved(p));
    }

    #[test]
    fn pawn_kind_depends_on_side() {
        assert_eq!(pawn_kind_for(WHITE), PAWN_UP);
        assert_eq!(pawn_kind_for(BLACK), PAWN_DOWN);
    }
}
