use std::sync::atomic::{AtomicBool, Ordering};

use galgo_core::{Move, Position};

use crate::engine::EngineShared;
use crate::evaluation::{self, Score, MATE};
use crate::move_ordering::{capture_order, order_moves};
use crate::transposition::{EvalCache, TableEntry, TranspositionTable};

// Evaluations this far below zero at the final depth make the engine
// offer resignation
const RESIGN_THRESHOLD: Score = -500;

// The Search struct ties one search run to the engine-wide caches and
// to the flag that cancels it: the foreground search polls `abort`,
// the background ponder search polls `abort_ponder`. Everything else
// about the two runs is identical.
pub struct Search<'a> {
    tt: &'a TranspositionTable,
    eval_cache: &'a EvalCache,
    abort: &'a AtomicBool,
    move_number: u32,
    max_depth: u16,
    pub nodes: u64,
    pub cutoffs: u64,
    pub best_move: Move,
    pub resigned: bool,
}

impl<'a> Search<'a> {
    pub fn new(shared: &'a EngineShared, move_number: u32, max_depth: u16) -> Self {
        Self::with_flag(shared, &shared.abort, move_number, max_depth)
    }

    pub fn ponder(shared: &'a EngineShared, move_number: u32, max_depth: u16) -> Self {
        Self::with_flag(shared, &shared.abort_ponder, move_number, max_depth)
    }

    fn with_flag(
        shared: &'a EngineShared,
        abort: &'a AtomicBool,
        move_number: u32,
        max_depth: u16,
    ) -> Self {
        Self {
            tt: &shared.tt,
            eval_cache: &shared.eval_cache,
            abort,
            move_number,
            max_depth,
            nodes: 0,
            cutoffs: 0,
            best_move: Move::NULL,
            resigned: false,
        }
    }

    // Iterative deepening: instead of diving directly into a search of
    // depth `max_depth`, increase the depth by 1 every time. The best
    // move of the previous iteration seeds the move ordering of the
    // next one, which makes alpha-beta prune far more branches, and an
    // abort always leaves a complete previous iteration to fall back
    // on. `best_move` stays null if the search is aborted before the
    // first iteration delivers anything.
    pub fn run<P: Position>(&mut self, pos: &mut P) {
        let legal_moves = pos.legal_moves();
        if legal_moves.len() == 1 {
            self.best_move = legal_moves[0];
            return;
        }

        let mut best_move = Move::NULL;
        let mut alpha = -MATE;
        let mut depth = 0;

        while depth <= self.max_depth {
            let ordered = order_moves(pos, best_move);
            alpha = -MATE;

            for mv in ordered {
                pos.push(mv);
                let score = -self.alphabeta(pos, depth, -MATE, -alpha);
                pos.pop();

                if self.aborted() {
                    self.best_move = best_move;
                    return;
                }

                if score > alpha {
                    alpha = score;
                    best_move = mv;
                }
            }

            depth += 1;

            if alpha.abs() >= MATE {
                // A forced mate either way ends the search: play the
                // move if we deliver it, resign if we receive it
                self.best_move = best_move;
                self.resigned = alpha <= -MATE;
                return;
            }
        }

        if alpha < RESIGN_THRESHOLD {
            self.resigned = true;
        }
        self.best_move = best_move;
    }

    // The deepening loop of the background ponder search: same shape
    // as `run`, but nothing is reported and resignation thresholds do
    // not apply, it only exists to warm up the caches
    pub fn run_ponder<P: Position>(&mut self, pos: &mut P) {
        let mut best_move = Move::NULL;
        let mut depth = 0;

        while depth <= self.max_depth {
            let ordered = order_moves(pos, best_move);
            let mut alpha = -MATE;

            for mv in ordered {
                pos.push(mv);
                let score = -self.alphabeta(pos, depth, -MATE, -alpha);
                pos.pop();

                if self.aborted() {
                    return;
                }

                if score > alpha {
                    alpha = score;
                    best_move = mv;
                }
            }

            depth += 1;

            if alpha.abs() >= MATE {
                return;
            }
        }
    }

    // Fail-hard negamax with alpha-beta pruning: the result stays
    // within [alpha, beta], from the perspective of the side to move.
    // A transposition hit that is deep enough answers immediately; a
    // shallower one seeds the move ordering. Beta cutoffs return
    // without storing, so the table only ever holds scores from fully
    // searched nodes and a probe may treat them as exact.
    fn alphabeta<P: Position>(
        &mut self,
        pos: &mut P,
        depth: u16,
        mut alpha: Score,
        beta: Score,
    ) -> Score {
        let hash = pos.zobrist_hash();
        let mut best_move;

        let ordered = match self.tt.probe(hash) {
            Some(entry) => {
                if depth <= entry.depth {
                    return entry.score;
                }
                best_move = entry.best_move;
                order_moves(pos, entry.best_move)
            }
            None => {
                if depth == 0 {
                    return self.quiescence(pos, alpha, beta);
                }

                let ordered = order_moves(pos, Move::NULL);
                if ordered.is_empty() {
                    return if pos.is_checkmate() { -MATE } else { 0 };
                }
                if pos.can_claim_threefold_repetition() {
                    return 0;
                }
                best_move = ordered[0];
                ordered
            }
        };

        for mv in ordered {
            pos.push(mv);
            let score = -self.alphabeta(pos, depth - 1, -beta, -alpha);
            pos.pop();

            if self.aborted() {
                // Unwind with a sentinel; the deepener discards the
                // whole iteration
                return 0;
            }

            if score >= beta {
                self.cutoffs += 1;
                return beta;
            }

            if score > alpha {
                alpha = score;
                best_move = mv;
            }
        }

        self.tt.store(hash, TableEntry {
            score: alpha,
            depth,
            best_move,
            age: self.move_number,
        });

        alpha
    }

    // Captures-only extension of the leaf nodes, so that the static
    // evaluation is not trusted in the middle of an exchange. The
    // static score acts as a stand-pat floor. Bounded by the captures
    // on the board, so the abort flag is not consulted here.
    fn quiescence<P: Position>(&mut self, pos: &mut P, mut alpha: Score, beta: Score) -> Score {
        let stand_pat = self.eval(pos);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        for mv in capture_order(pos) {
            pos.push(mv);
            let score = -self.quiescence(pos, -beta, -alpha);
            pos.pop();

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

    fn eval<P: Position>(&mut self, pos: &P) -> Score {
        self.nodes += 1;
        evaluation::evaluate(pos, self.eval_cache, self.move_number)
    }

    fn aborted(&self) -> bool {
        self.abort.load(Ordering::Relaxed)
    }
}

///////////////////////////////////////////////////////////////////////////////
