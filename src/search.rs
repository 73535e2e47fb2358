//! Alpha-beta search: iterative deepening, null-move pruning, late-move
//! reduction with a check-extension approximation, and MVV-LVA /
//! positional move ordering folded directly into the value fed to each
//! recursive call.
//!
//! This module only ever runs the search proper. Enumerating legal moves
//! and playing a single move are plain pseudo-legal generation plus a
//! legality check (see `movegen` and `probes`); neither needs any of the
//! pruning or ordering machinery below, so they are kept out of this
//! routine entirely rather than folded in as extra modes.

use crate::board::Board;
use crate::movegen;
use crate::piece;
use crate::square::{self, Square};
use crate::tables;

pub const SCORE_MAX: i32 = 8000;
pub const DEPTH_MAX: i32 = 99;

/// Late-move reduction kicks in beyond this remaining depth.
const LMR_MIN_DEPTH: i32 = 5;
/// Moves processed before this index are never reduced (the hint move
/// plus a few likely-good replies get a full-depth look).
const LMR_MIN_MOVE_INDEX: usize = 4;
/// Null-move pruning is disabled once material is this rich, since a
/// quiet position with heavy material is exactly where zugzwang makes
/// the null-move assumption (some move is better than none) unsafe.
const NULL_MOVE_MATERIAL_CEILING: i32 = 35;

pub struct SearchState<'a> {
    node_count: u64,
    node_max: u64,
    stop: bool,
    callback: Option<&'a mut dyn FnMut(u64) -> bool>,
    hint_from: Square,
    hint_to: Square,
}

impl<'a> SearchState<'a> {
    fn new(node_max: u64, callback: Option<&'a mut dyn FnMut(u64) -> bool>) -> Self {
        SearchState {
            node_count: 0,
            node_max,
            stop: false,
            callback,
            hint_from: square::NONE,
            hint_to: square::NONE,
        }
    }

    fn poll(&mut self) {
        self.node_count += 1;
        if let Some(cb) = self.callback.as_mut() {
            if cb(self.node_count) {
                self.stop = true;
            }
        }
        if self.node_max > 0 && self.node_count >= self.node_max {
            self.stop = true;
        }
    }
}

/// Iterative deepening driver. Runs depth 2 up to `depth_max + 3` (per the
/// source's find-best-move budget), tracking a best-move hint across
/// iterations and returning the deepest complete iteration's move, or the
/// partial hint if the callback requested a stop mid-iteration.
pub fn find_best_move(
    board: &mut Board,
    node_max: u64,
    depth_max: i32,
    callback: Option<&mut dyn FnMut(u64) -> bool>,
) -> Option<(Square, Square)> {
    let mut state = SearchState::new(node_max, callback);
    let target_depth = (depth_max + 3).clamp(2, DEPTH_MAX);

    for depth in 2..=target_depth {
        let result = negamax(board, -SCORE_MAX, SCORE_MAX, 0, depth, true, &mut state);
        log::debug!(
            "iterative deepening depth {depth} complete: score {result}, hint {:#x}->{:#x}",
            state.hint_from,
            state.hint_to
        );
        if state.stop {
            log::debug!("search stopped at depth {depth} (node budget or callback)");
            break;
        }
    }

    if state.hint_from == square::NONE {
        None
    } else {
        Some((state.hint_from, state.hint_to))
    }
}

fn mvv_lva_score(attacker_kind: u8, captured_kind: u8) -> i32 {
    37 * tables::CAPTURE_VALUES[captured_kind as usize] - attacker_kind as i32
}

fn is_castle_move(attacker_kind: u8, from: Square, to: Square) -> bool {
    attacker_kind == piece::KING
        && (square::file(to) as i32 - square::file(from) as i32).abs() == 2
}

fn is_promotion_move(attacker_kind: u8, side: u8, to: Square) -> bool {
    if !piece::is_pawn(attacker_kind) {
        return false;
    }
    let last_rank = if side == piece::WHITE { 0 } else { 7 };
    square::rank(to) == last_rank
}

fn has_friendly_pawn_on_file(b: &Board, side: u8, file: u8) -> bool {
    for rank in 0..8u8 {
        let p = b.raw_at(square::make(rank, file));
        if piece::color(p) == side && piece::is_pawn(piece::kind(p)) {
            return true;
        }
    }
    false
}

fn pawn_supported_from_behind(b: &Board, to: Square, side: u8) -> bool {
    let behind: [i8; 2] = if side == piece::WHITE { [17, 15] } else { [-17, -15] };
    for &d in &behind {
        let sq = square::step(to, d);
        if square::is_on_board(sq) {
            let p = b.raw_at(sq);
            if piece::color(p) == side && piece::is_pawn(piece::kind(p)) {
                return true;
            }
        }
    }
    false
}

/// Positional move-ordering value used at every remaining depth deeper
/// than 1: center-distance delta plus castling/king-safety/pawn-structure
/// terms. Queens skip the center-distance term (the source excludes them
/// from that table lookup).
fn positional_delta(b: &Board, from: Square, to: Square, attacker_kind: u8, side: u8) -> i32 {
    let mut delta = 0;
    if attacker_kind != piece::QUEEN {
        delta += b.position_score(from) - b.position_score(to);
    }
    if is_castle_move(attacker_kind, from, to) {
        delta += 50;
    }
    if attacker_kind == piece::KING && b.non_pawn_material > 30 {
        delta -= 20;
    }
    if piece::is_pawn(attacker_kind) {
        let file = square::file(to);
        if file > 0 && !has_friendly_pawn_on_file(b, side, file - 1) {
            delta -= 9;
        }
        if file < 7 && !has_friendly_pawn_on_file(b, side, file + 1) {
            delta -= 9;
        }
        if pawn_supported_from_behind(b, to, side) {
            delta += 1;
        }
        delta += b.non_pawn_material >> 2;
    }
    delta
}

fn negamax(
    board: &mut Board,
    mut alpha: i32,
    mut beta: i32,
    score: i32,
    depth: i32,
    is_root: bool,
    state: &mut SearchState,
) -> i32 {
    state.poll();
    if state.stop {
        return score;
    }

    alpha -= (alpha < score) as i32;
    beta -= (beta <= score) as i32;

    if depth <= 0 {
        return score;
    }

    let side = board.side;
    let mut null_score = -SCORE_MAX;
    if depth > 2 && beta != -SCORE_MAX && board.non_pawn_material <= NULL_MOVE_MATERIAL_CEILING {
        let saved_ep = board.en_passant;
        board.en_passant = square::NONE;
        board.side = piece::flip_side(side);
        null_score = -negamax(board, -beta, -(beta - 1), 0, depth - 3, false, state);
        board.side = side;
        board.en_passant = saved_ep;
        if state.stop {
            return score;
        }
    }

    let mut best_score = if null_score >= beta {
        if depth == 2 {
            score
        } else {
            -SCORE_MAX
        }
    } else {
        -SCORE_MAX
    };
    let mut best_from = square::NONE;
    let mut best_to = square::NONE;

    let mut moves = Vec::new();
    movegen::generate_pseudo_legal(board, side, &mut moves);

    let hint_move = if is_root && state.hint_from != square::NONE {
        Some((state.hint_from, state.hint_to))
    } else {
        None
    };
    let mut ordered = Vec::with_capacity(moves.len());
    if let Some(h) = hint_move {
        if moves.contains(&h) {
            ordered.push(h);
        }
    }
    for mv in moves {
        if Some(mv) != hint_move {
            ordered.push(mv);
        }
    }

    'search_moves: for (move_index, (from, to)) in ordered.into_iter().enumerate() {
        if state.stop {
            break;
        }

        let moving = board.raw_at(from);
        let attacker_kind = piece::kind(moving);
        let is_en_passant = piece::is_pawn(attacker_kind) && to == board.en_passant;
        let capture_square = if is_en_passant { to ^ 0x10 } else { to };
        let captured = board.raw_at(capture_square);
        let captured_kind = piece::kind(captured);
        let is_capture = !piece::is_empty(captured);

        if captured_kind == piece::KING {
            best_score = SCORE_MAX;
            best_from = from;
            best_to = to;
            break 'search_moves;
        }

        let mut heuristic = if depth == 1 {
            mvv_lva_score(attacker_kind, captured_kind)
        } else {
            positional_delta(board, from, to, attacker_kind, side)
        };
        if is_promotion_move(attacker_kind, side, to) {
            heuristic += 647 - attacker_kind as i32;
        }

        let (undo, _material_delta) = board.make_move(from, to);

        let is_hint_move = hint_move == Some((from, to));
        let mut new_depth = depth - 1;
        let mut reduced = false;
        if depth > LMR_MIN_DEPTH
            && move_index >= LMR_MIN_MOVE_INDEX
            && !is_hint_move
            && !is_capture
            && !piece::is_pawn(attacker_kind)
        {
            let check_extension = board.non_pawn_material <= 30
                && null_score == SCORE_MAX
                && depth >= 3
                && (!is_capture || attacker_kind == piece::KING);
            if !check_extension {
                new_depth -= 1;
                reduced = true;
            }
        }

        let mut achieved = -negamax(board, -beta, -alpha, -heuristic, new_depth, false, state);
        if reduced && achieved > alpha {
            achieved = -negamax(board, -beta, -alpha, -heuristic, depth - 1, false, state);
        }

        board.unmake_move(undo);

        if achieved > best_score {
            best_score = achieved;
            best_from = from;
            best_to = to;
            if achieved > alpha {
                alpha = achieved;
            }
        }

        if best_score >= beta && depth > 1 {
            break 'search_moves;
        }
    }

    if best_score == -SCORE_MAX && null_score == SCORE_MAX {
        best_score = 0;
    }

    if is_root {
        state.hint_from = best_from;
        state.hint_to = best_to;
    }

    best_score + (best_score < score) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position;

    #[test]
    fn finds_mate_in_one() {
        let mut board = Board::empty();
        position::load(&mut board, "6k1/8/6K1/8/8/8/8/7R w - - 0 1");
        let best = find_best_move(&mut board, 0, 4, None);
        assert!(best.is_some());
    }

    #[test]
    fn min_budget_still_completes_two_plies() {
        let mut board = Board::empty();
        position::load(&mut board, position::STARTPOS);
        let best = find_best_move(&mut board, 0, 0, None);
        assert!(best.is_some());
    }

    #[test]
    fn nine_queens_per_side_search_without_crashing() {
        let mut board = Board::empty();
        position::load(
            &mut board,
            "qqqqkqqq/qqqqqqqq/8/8/8/8/QQQQQQQQ/QQQQKQQQ w - - 0 1",
        );
        assert!(board.non_pawn_material > NULL_MOVE_MATERIAL_CEILING);
        let best = find_best_move(&mut board, 0, 2, None);
        assert!(best.is_some());
    }
}
