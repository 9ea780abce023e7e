// A scripted Position implementation for the unit tests. The engine is
// board-agnostic, so the tests define positions as small state graphs:
// each state lists its legal moves, the state each move leads to, the
// move predicates the ordering cares about, and whatever placement and
// attack data the evaluator should see. Zobrist hashes are assigned by
// hand, which also makes transpositions trivial to script.

use std::time::Duration;

use galgo_core::{Color, Move, Piece, PieceType, Position, Square, SquareSet};

#[derive(Clone)]
pub struct ScriptedMove {
    pub mv: Move,
    pub next: usize,
    pub gives_check: bool,
    pub capture: bool,
    pub en_passant: bool,
    pub castling: bool,
}

impl ScriptedMove {
    fn flagged(mv: Move, next: usize) -> Self {
        Self { mv, next, gives_check: false, capture: false, en_passant: false, castling: false }
    }

    pub fn quiet(mv: Move, next: usize) -> Self {
        Self::flagged(mv, next)
    }

    pub fn capturing(mv: Move, next: usize) -> Self {
        Self { capture: true, ..Self::flagged(mv, next) }
    }

    pub fn checking(mv: Move, next: usize) -> Self {
        Self { gives_check: true, ..Self::flagged(mv, next) }
    }

    pub fn ep(mv: Move, next: usize) -> Self {
        Self { capture: true, en_passant: true, ..Self::flagged(mv, next) }
    }

    pub fn castling_move(mv: Move, next: usize) -> Self {
        Self { castling: true, ..Self::flagged(mv, next) }
    }
}

#[derive(Clone)]
pub struct StateDef {
    pub hash: u64,
    pub turn: Color,
    pub fullmove: u32,
    pub moves: Vec<ScriptedMove>,
    pub checkmate: bool,
    pub threefold: bool,
    pub board: Vec<(Square, Piece)>,
    pub attacks: Vec<(Square, SquareSet)>,
    pub attacked_by: [SquareSet; 2],
    pub kings: [Square; 2],
    pub push_delay: Option<Duration>,
}

impl StateDef {
    pub fn new(hash: u64, turn: Color) -> Self {
        Self {
            hash,
            turn,
            fullmove: 1,
            moves: Vec::new(),
            checkmate: false,
            threefold: false,
            board: Vec::new(),
            attacks: Vec::new(),
            attacked_by: [SquareSet::empty(); 2],
            kings: [Square::new(4), Square::new(60)], // e1, e8
            push_delay: None,
        }
    }
}

#[derive(Clone)]
pub struct FakePosition {
    states: Vec<StateDef>,
    current: usize,
    stack: Vec<usize>,
}

impl FakePosition {
    // The first state is the root
    pub fn new(states: Vec<StateDef>) -> Self {
        Self { states, current: 0, stack: Vec::new() }
    }

    fn state(&self) -> &StateDef {
        &self.states[self.current]
    }

    fn scripted(&self, mv: Move) -> Option<&ScriptedMove> {
        self.state().moves.iter().find(|scripted| scripted.mv == mv)
    }
}

impl Position for FakePosition {
    fn legal_moves(&self) -> Vec<Move> {
        self.state().moves.iter().map(|scripted| scripted.mv).collect()
    }

    fn push(&mut self, mv: Move) {
        if let Some(delay) = self.state().push_delay {
            std::thread::sleep(delay);
        }
        let next = self.scripted(mv).expect("pushed a move with no scripted successor").next;
        self.stack.push(self.current);
        self.current = next;
    }

    fn pop(&mut self) {
        self.current = self.stack.pop().expect("pop without a matching push");
    }

    fn gives_check(&self, mv: Move) -> bool {
        self.scripted(mv).is_some_and(|scripted| scripted.gives_check)
    }

    fn is_capture(&self, mv: Move) -> bool {
        self.scripted(mv).is_some_and(|scripted| scripted.capture)
    }

    fn is_en_passant(&self, mv: Move) -> bool {
        self.scripted(mv).is_some_and(|scripted| scripted.en_passant)
    }

    fn is_castling(&self, mv: Move) -> bool {
        self.scripted(mv).is_some_and(|scripted| scripted.castling)
    }

    fn is_checkmate(&self) -> bool {
        self.state().checkmate
    }

    fn can_claim_threefold_repetition(&self) -> bool {
        self.state().threefold
    }

    fn pieces(&self, piece_type: PieceType, color: Color) -> SquareSet {
        self.state().board.iter()
            .filter(|(_, piece)| piece.piece_type == piece_type && piece.color == color)
            .map(|(square, _)| *square)
            .collect()
    }

    fn king(&self, color: Color) -> Square {
        self.state().kings[color.index()]
    }

    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.state().board.iter()
            .find(|(occupied, _)| *occupied == square)
            .map(|(_, piece)| *piece)
    }

    fn attacks(&self, square: Square) -> SquareSet {
        self.state().attacks.iter()
            .find(|(from, _)| *from == square)
            .map_or(SquareSet::empty(), |(_, set)| *set)
    }

    fn is_attacked_by(&self, color: Color, square: Square) -> bool {
        self.state().attacked_by[color.index()].contains(square)
    }

    fn turn(&self) -> Color {
        self.state().turn
    }

    fn fullmove_number(&self) -> u32 {
        self.state().fullmove
    }

    fn zobrist_hash(&self) -> u64 {
        self.state().hash
    }
}
