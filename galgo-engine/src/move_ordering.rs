use std::cmp::Reverse;

use galgo_core::{Move, PieceType, Position};

// Heuristic values of different kinds of moves.
// The priorities are as follows:
// Move stored in the transposition table: Max
// Checking moves
// Captures, rated by MVV-LVA
// Pawn promotions
// Castling
// Everything else, in generation order
//
// A move that matches several predicates is rated by the first one
// only. The sort is stable, so moves with equal ratings keep their
// generation order.

pub type MoveScore = i64;

const TT_MOVE: MoveScore = MoveScore::MAX;
const GIVES_CHECK: MoveScore = 1_000_000;
const CAPTURE_BASE: MoveScore = 100_000; // plus the MVV-LVA value, in [-9, 9]
const PROMOTION: MoveScore = 10_000;
const CASTLE: MoveScore = 1_000;

// Struct to hold a pair of (Move, move heuristical value)
struct RatedMove {
    mv: Move,
    score: MoveScore,
}

// Returns every legal move in the current position, best candidates
// first. `tt_move` is the best move the transposition table remembers
// for this position, or the null move when there is none.
pub fn order_moves<P: Position>(pos: &P, tt_move: Move) -> Vec<Move> {
    let mut rated: Vec<RatedMove> = pos.legal_moves()
        .into_iter()
        .map(|mv| rate_move(pos, mv, tt_move))
        .collect();

    rated.sort_by_key(|rated| Reverse(rated.score));
    rated.into_iter().map(|rated| rated.mv).collect()
}

// The quiescence variant: only the captures, best victims first
pub fn capture_order<P: Position>(pos: &P) -> Vec<Move> {
    let mut rated: Vec<RatedMove> = pos.legal_moves()
        .into_iter()
        .filter(|&mv| pos.is_capture(mv))
        .map(|mv| RatedMove { mv, score: capture_score(pos, mv) })
        .collect();

    rated.sort_by_key(|rated| Reverse(rated.score));
    rated.into_iter().map(|rated| rated.mv).collect()
}

fn rate_move<P: Position>(pos: &P, mv: Move, tt_move: Move) -> RatedMove {
    let score = if !tt_move.is_null() && mv == tt_move {
        TT_MOVE
    } else if pos.gives_check(mv) {
        GIVES_CHECK
    } else if pos.is_capture(mv) {
        CAPTURE_BASE + capture_score(pos, mv)
    } else if mv.promotion().is_some() {
        PROMOTION
    } else if pos.is_castling(mv) {
        CASTLE
    } else {
        0
    };

    RatedMove { mv, score }
}

// Most Valuable Victim - Least Valuable Attacker: the difference
// between what the move wins and what it risks. En passant captures
// trade pawn for pawn and are rated 0 directly, since the captured
// pawn is not sitting on the destination square.
fn capture_score<P: Position>(pos: &P, mv: Move) -> MoveScore {
    if pos.is_en_passant(mv) {
        return 0;
    }

    let victim = pos.piece_at(mv.to_square())
        .map_or(0, |piece| exchange_value(piece.piece_type));
    let attacker = pos.piece_at(mv.from_square())
        .map_or(0, |piece| exchange_value(piece.piece_type));

    victim - attacker
}

// Exchange values are a separate scale from the evaluation's piece
// values; the king rates 0 since it is never captured
const fn exchange_value(piece: PieceType) -> MoveScore {
    match piece {
        PieceType::Pawn => 1,
        PieceType::Knight => 3,
        PieceType::Bishop => 3,
        PieceType::Rook => 5,
        PieceType::Queen => 9,
        PieceType::King => 0,
    }
}

///////////////////////////////////////////////////////////////////////////////
