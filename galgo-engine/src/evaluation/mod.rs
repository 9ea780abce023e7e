mod tables;

use galgo_core::{Piece, Position, Square, SquareSet};
use galgo_core::Color::*;
use galgo_core::PieceType::*;

use crate::transposition::{EvalCache, EvalEntry};
use tables::{KING_MAP, KNIGHT_MAP};

pub type Score = i64;

// Sentinel score for a forced checkmate, kept far away from the type
// limits so it survives negamax sign flips
pub const MATE: Score = 9_999_999;

// Auxiliary struct holding the piece sets and king squares that the
// individual evaluation terms share, to avoid querying them repeatedly
struct EvalData<'a, P: Position> {
    pos: &'a P,
    wp: SquareSet, bp: SquareSet,
    wn: SquareSet, bn: SquareSet,
    wb: SquareSet, bb: SquareSet,
    wr: SquareSet, br: SquareSet,
    wq: SquareSet, bq: SquareSet,
    white_king: Square,
    black_king: Square,
}

impl<'a, P: Position> EvalData<'a, P> {
    fn new(pos: &'a P) -> Self {
        Self {
            pos,
            wp: pos.pieces(Pawn, White), bp: pos.pieces(Pawn, Black),
            wn: pos.pieces(Knight, White), bn: pos.pieces(Knight, Black),
            wb: pos.pieces(Bishop, White), bb: pos.pieces(Bishop, Black),
            wr: pos.pieces(Rook, White), br: pos.pieces(Rook, Black),
            wq: pos.pieces(Queen, White), bq: pos.pieces(Queen, Black),
            white_king: pos.king(White),
            black_king: pos.king(Black),
        }
    }

    // Minor and major pieces across both sides, queens counted triple.
    // Decides the middlegame/endgame split of the king term.
    fn piece_count(&self) -> Score {
        (self.wn.count() + self.bn.count()
            + self.wb.count() + self.bb.count()
            + self.wr.count() + self.br.count()
            + 3 * (self.wq.count() + self.bq.count())) as Score
    }
}

// Evaluate how favorable a position is for the current side to move.
// A positive score favors the current side, while a negative one
// favors the rival. Results are cached by Zobrist key and the cache is
// consulted unconditionally; terminal scores are never cached.
pub(crate) fn evaluate<P: Position>(pos: &P, cache: &EvalCache, move_number: u32) -> Score {
    let hash = pos.zobrist_hash();

    if let Some(entry) = cache.probe(hash) {
        return entry.score;
    }

    if pos.legal_moves().is_empty() {
        return if pos.is_checkmate() { -MATE } else { 0 };
    }
    if pos.can_claim_threefold_repetition() {
        return 0;
    }

    // Every term below is summed from White's point of view; flip the
    // total when it is Black who is asking
    let data = EvalData::new(pos);
    let white_score = pawn_score(&data)
        + knight_score(&data)
        + bishop_score(&data)
        + rook_score(&data)
        + queen_score(&data)
        + king_score(&data);
    let score = match pos.turn() {
        White => white_score,
        Black => -white_score,
    };

    cache.store(hash, EvalEntry { score, age: move_number });
    score
}

// Pawns: material, a quadratic passed-pawn bonus, a shelter bonus near
// the own king, and a penalty for own pawns stacked on a file. The
// passed-pawn scan only looks at the pawn's own file and stops short
// of the promotion rank.
fn pawn_score<P: Position>(data: &EvalData<P>) -> Score {
    let pos = data.pos;
    let mut score = 0;

    for pawn in data.wp.iter() {
        score += 100;
        let rank = pawn.rank() as Score;
        let mut passed = true;

        let mut ahead = pawn.index() + 8;
        while ahead < 56 {
            match pos.piece_at(Square::new(ahead as u8)) {
                Some(p) if p == Piece::new(Pawn, Black) => passed = false,
                Some(p) if p == Piece::new(Pawn, White) => score -= 40,
                _ => {}
            }
            ahead += 8;
        }

        if passed {
            score += 40 + 2 * rank * rank;
        }
        if pawn.chebyshev_distance(data.white_king) < 3 {
            score += 30;
        }
    }

    for pawn in data.bp.iter() {
        score -= 100;
        let rank = pawn.rank() as Score;
        let mut passed = true;

        let mut ahead = pawn.index() as i32 - 8;
        while ahead > 7 {
            match pos.piece_at(Square::new(ahead as u8)) {
                Some(p) if p == Piece::new(Pawn, White) => passed = false,
                Some(p) if p == Piece::new(Pawn, Black) => score += 40,
                _ => {}
            }
            ahead -= 8;
        }

        if passed {
            let advance = 8 - rank;
            score -= 40 + 2 * advance * advance;
        }
        if pawn.chebyshev_distance(data.black_king) < 3 {
            score -= 30;
        }
    }

    score
}

// Knights: material, the piece-square table, and a mobility term that
// also pulls the knight towards its own king
fn knight_score<P: Position>(data: &EvalData<P>) -> Score {
    let pos = data.pos;
    let mut score = 0;

    for knight in data.wn.iter() {
        let distance = knight.chebyshev_distance(data.white_king) as Score;
        let mobility = pos.attacks(knight).count() as Score;
        score += 300 + KNIGHT_MAP[knight.index()] - 2 * (distance - mobility);
    }

    for knight in data.bn.iter() {
        let distance = knight.chebyshev_distance(data.black_king) as Score;
        let mobility = pos.attacks(knight).count() as Score;
        score -= 300 + KNIGHT_MAP[knight.index()] - 2 * (distance - mobility);
    }

    score
}

// Bishops: the pair is worth 350 each, a lone bishop 315 with a
// penalty for every own pawn sitting on its color complex, plus
// mobility either way
fn bishop_score<P: Position>(data: &EvalData<P>) -> Score {
    let pos = data.pos;
    let mut score = 0;

    if data.wb.count() == 2 {
        for bishop in data.wb.iter() {
            score += 2 * pos.attacks(bishop).count() as Score + 350;
        }
    } else {
        for bishop in data.wb.iter() {
            score += 2 * pos.attacks(bishop).count() as Score + 315;
            for pawn in data.wp.iter() {
                if pawn.index() % 2 == bishop.index() % 2 {
                    score -= 14;
                }
            }
        }
    }

    if data.bb.count() == 2 {
        for bishop in data.bb.iter() {
            score -= 2 * pos.attacks(bishop).count() as Score + 350;
        }
    } else {
        for bishop in data.bb.iter() {
            score -= 2 * pos.attacks(bishop).count() as Score + 315;
            for pawn in data.bp.iter() {
                if pawn.index() % 2 == bishop.index() % 2 {
                    score += 14;
                }
            }
        }
    }

    score
}

fn rook_score<P: Position>(data: &EvalData<P>) -> Score {
    let pos = data.pos;
    let mut score = 0;

    for rook in data.wr.iter() {
        score += pos.attacks(rook).count() as Score + 500;
    }
    for rook in data.br.iter() {
        score -= pos.attacks(rook).count() as Score + 500;
    }

    score
}

fn queen_score<P: Position>(data: &EvalData<P>) -> Score {
    let pos = data.pos;
    let mut score = 0;

    for queen in data.wq.iter() {
        score += 900 + pos.attacks(queen).count() as Score / 2;
    }
    for queen in data.bq.iter() {
        score -= 900 + pos.attacks(queen).count() as Score / 2;
    }

    score
}

// King placement. In the middlegame, the piece-square table plus a
// penalty for every square around the king that the opponent attacks.
// In the endgame, kings are pulled towards the central files and up
// the board; the rank term is not color-mirrored.
fn king_score<P: Position>(data: &EvalData<P>) -> Score {
    let pos = data.pos;

    if data.piece_count() > 10 {
        let mut safety = 0;
        for square in pos.attacks(data.white_king) {
            if pos.is_attacked_by(Black, square) {
                safety -= 20;
            }
        }
        for square in pos.attacks(data.black_king) {
            if pos.is_attacked_by(White, square) {
                safety += 20;
            }
        }
        KING_MAP[data.white_king.index()] + KING_MAP[data.black_king.index()] + safety
    } else {
        let white_center = (data.white_king.file() as Score - 4).pow(2);
        let black_center = (data.black_king.file() as Score - 4).pow(2);
        -white_center + 3 * data.white_king.rank() as Score
            + black_center + 3 * data.black_king.rank() as Score
    }
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use galgo_core::{Color, Move, Piece, Square, SquareSet};
    use galgo_core::Color::*;
    use galgo_core::PieceType::*;

    use crate::testkit::{FakePosition, ScriptedMove, StateDef};
    use crate::transposition::{EvalCache, EvalEntry};
    use super::{evaluate, MATE};

    fn sq(notation: &str) -> Square {
        Square::from_notation(notation).unwrap()
    }

    // A single-state position with at least one legal move, so that the
    // evaluator does not mistake it for a terminal state
    fn board(hash: u64, turn: Color) -> StateDef {
        let mut state = StateDef::new(hash, turn);
        state.moves.push(ScriptedMove::quiet(Move::from_notation("a2a3").unwrap(), 0));
        state
    }

    fn attack_set(squares: &[&str]) -> SquareSet {
        squares.iter().map(|s| sq(s)).collect()
    }

    #[test]
    fn rook_material_and_mobility() {
        let mut state = board(1, White);
        state.board.push((sq("a1"), Piece::new(Rook, White)));
        state.attacks.push((sq("a1"), attack_set(&["a2", "a3", "a4", "b1", "c1"])));
        let pos = FakePosition::new(vec![state]);

        // 500 + 5 mobility, plus the endgame king term for the default
        // e1/e8 kings: -0 + 0 + 0 + 3*7 = 21
        assert_eq!(evaluate(&pos, &EvalCache::new(), 1), 526);
    }

    #[test]
    fn score_is_negated_for_black_to_move() {
        let mut white_view = board(1, White);
        white_view.board.push((sq("a1"), Piece::new(Rook, White)));
        let mut black_view = board(2, Black);
        black_view.board.push((sq("a1"), Piece::new(Rook, White)));

        let w = evaluate(&FakePosition::new(vec![white_view]), &EvalCache::new(), 1);
        let b = evaluate(&FakePosition::new(vec![black_view]), &EvalCache::new(), 1);
        assert_eq!(w, -b);
        assert_eq!(w, 500 + 21);
    }

    #[test]
    fn passed_pawn_and_shelter() {
        // A lone pawn on e4: passed (+40 + 2*3^2), no shelter since the
        // king on e1 is exactly 3 away
        let mut state = board(1, White);
        state.board.push((sq("e4"), Piece::new(Pawn, White)));
        let pos = FakePosition::new(vec![state]);
        assert_eq!(evaluate(&pos, &EvalCache::new(), 1), 100 + 40 + 18 + 21);
    }

    #[test]
    fn doubled_pawns_are_penalized() {
        // Pawns on e2 and e4: e2 sees its file blocked by an own pawn
        // (-40) but still counts as passed (only enemy pawns clear the
        // flag), and sits next to the king (+30)
        let mut state = board(1, White);
        state.board.push((sq("e2"), Piece::new(Pawn, White)));
        state.board.push((sq("e4"), Piece::new(Pawn, White)));
        let pos = FakePosition::new(vec![state]);

        let e2 = 100 - 40 + (40 + 2) + 30;
        let e4 = 100 + (40 + 18);
        assert_eq!(evaluate(&pos, &EvalCache::new(), 1), e2 + e4 + 21);
    }

    #[test]
    fn blocked_pawn_is_not_passed() {
        // White pawn e4 blocked by a black pawn on e6; the black pawn
        // is blocked in turn and shelters its own king (-30)
        let mut state = board(1, White);
        state.board.push((sq("e4"), Piece::new(Pawn, White)));
        state.board.push((sq("e6"), Piece::new(Pawn, Black)));
        let pos = FakePosition::new(vec![state]);

        assert_eq!(evaluate(&pos, &EvalCache::new(), 1), 100 - (100 + 30) + 21);
    }

    #[test]
    fn knight_tropism_and_mobility() {
        // Knight on d4: map value 20, distance 3 to the e1 king, 8
        // attacked squares: 300 + 20 - 2*(3 - 8) = 330
        let mut state = board(1, White);
        state.board.push((sq("d4"), Piece::new(Knight, White)));
        state.attacks.push((
            sq("d4"),
            attack_set(&["b3", "b5", "c2", "c6", "e2", "e6", "f3", "f5"]),
        ));
        let pos = FakePosition::new(vec![state]);
        assert_eq!(evaluate(&pos, &EvalCache::new(), 1), 330 + 21);
    }

    #[test]
    fn bishop_pair_bonus() {
        let mut state = board(1, White);
        state.board.push((sq("c1"), Piece::new(Bishop, White)));
        state.board.push((sq("f4"), Piece::new(Bishop, White)));
        state.attacks.push((sq("c1"), attack_set(&["b2", "d2", "e3"])));
        state.attacks.push((sq("f4"), attack_set(&["e3", "e5", "d6", "g3", "g5"])));
        let pos = FakePosition::new(vec![state]);

        // (2*3 + 350) + (2*5 + 350), piece count 2 keeps the endgame
        // king term
        assert_eq!(evaluate(&pos, &EvalCache::new(), 1), 356 + 360 + 21);
    }

    #[test]
    fn lone_bishop_color_complex_penalty() {
        // Bishop on c1 (index 2), pawns on e4 (index 28, same parity,
        // -14) and d2 (index 11, other parity)
        let mut state = board(1, White);
        state.board.push((sq("c1"), Piece::new(Bishop, White)));
        state.board.push((sq("e4"), Piece::new(Pawn, White)));
        state.board.push((sq("d2"), Piece::new(Pawn, White)));
        state.attacks.push((sq("c1"), attack_set(&["b2", "d2", "e3", "f4"])));
        let pos = FakePosition::new(vec![state]);

        let bishop = 2 * 4 + 315 - 14;
        let e4 = 100 + (40 + 18);
        let d2 = 100 + (40 + 2) + 30;
        assert_eq!(evaluate(&pos, &EvalCache::new(), 1), bishop + e4 + d2 + 21);
    }

    #[test]
    fn middlegame_king_uses_map_and_safety() {
        // Four queens push the piece count past the middlegame
        // threshold; their attack sets are empty so they contribute
        // plain material which cancels out
        let mut state = board(1, White);
        state.board.push((sq("d1"), Piece::new(Queen, White)));
        state.board.push((sq("h5"), Piece::new(Queen, White)));
        state.board.push((sq("d8"), Piece::new(Queen, Black)));
        state.board.push((sq("h4"), Piece::new(Queen, Black)));
        state.kings = [sq("c1"), sq("f8")];
        // One of the white king's flight squares is covered by Black
        state.attacks.push((sq("c1"), attack_set(&["b2", "c2"])));
        state.attacked_by[Black.index()] = attack_set(&["c2"]);
        let pos = FakePosition::new(vec![state]);

        // KING_MAP[c1] = 20, KING_MAP[f8] = 50, safety -20
        assert_eq!(evaluate(&pos, &EvalCache::new(), 1), 20 + 50 - 20);
    }

    #[test]
    fn endgame_king_centralization() {
        let mut state = board(1, White);
        state.kings = [sq("d4"), sq("a8")];
        let pos = FakePosition::new(vec![state]);

        // -(3-4)^2 + 3*3 for White, +(0-4)^2 + 3*7 for Black
        assert_eq!(evaluate(&pos, &EvalCache::new(), 1), -1 + 9 + 16 + 21);
    }

    #[test]
    fn terminal_positions() {
        let mut mated = StateDef::new(1, White);
        mated.checkmate = true;
        let cache = EvalCache::new();
        assert_eq!(evaluate(&FakePosition::new(vec![mated]), &cache, 1), -MATE);

        let stalemate = StateDef::new(2, White);
        assert_eq!(evaluate(&FakePosition::new(vec![stalemate]), &cache, 1), 0);

        let mut repetition = board(3, White);
        repetition.threefold = true;
        repetition.board.push((sq("a1"), Piece::new(Rook, White)));
        assert_eq!(evaluate(&FakePosition::new(vec![repetition]), &cache, 1), 0);

        // None of the terminal scores are cached
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn cache_is_consulted_unconditionally() {
        let mut state = board(42, White);
        state.board.push((sq("a1"), Piece::new(Rook, White)));
        let pos = FakePosition::new(vec![state]);

        let cache = EvalCache::new();
        cache.store(42, EvalEntry { score: 777, age: 1 });
        assert_eq!(evaluate(&pos, &cache, 5), 777);
    }

    #[test]
    fn evaluation_is_cached_after_computing() {
        let mut state = board(7, White);
        state.board.push((sq("a1"), Piece::new(Rook, White)));
        let pos = FakePosition::new(vec![state]);

        let cache = EvalCache::new();
        let first = evaluate(&pos, &cache, 3);
        assert_eq!(cache.len(), 1);
        assert_eq!(evaluate(&pos, &cache, 3), first);
    }

    #[test]
    fn evaluation_is_antisymmetric_under_mirroring() {
        // Same side to move, colors swapped and ranks reflected. The
        // symmetric rook/queen scaffolding keeps the piece count in the
        // middlegame so the asymmetric endgame king term stays out, and
        // both kings sit on mirror-neutral KING_MAP squares.
        let scaffold = |state: &mut StateDef| {
            for (square, piece_type) in [("a1", Rook), ("h1", Rook), ("d1", Queen)] {
                state.board.push((sq(square), Piece::new(piece_type, White)));
            }
            for (square, piece_type) in [("a8", Rook), ("h8", Rook), ("d8", Queen)] {
                state.board.push((sq(square), Piece::new(piece_type, Black)));
            }
        };

        let mut state = board(1, White);
        scaffold(&mut state);
        state.board.push((sq("b1"), Piece::new(Knight, White)));
        state.attacks.push((sq("b1"), attack_set(&["a3", "c3", "d2"])));

        let mut mirrored = board(2, White);
        scaffold(&mut mirrored);
        mirrored.board.push((sq("b8"), Piece::new(Knight, Black)));
        mirrored.attacks.push((sq("b8"), attack_set(&["a6", "c6", "d7"])));

        let plain = evaluate(&FakePosition::new(vec![state]), &EvalCache::new(), 1);
        let flipped = evaluate(&FakePosition::new(vec![mirrored]), &EvalCache::new(), 1);
        assert_eq!(plain, -flipped);
        assert_ne!(plain, 0);
    }
}
