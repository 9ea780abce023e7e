use std::fmt::{Display, Formatter};
use serde::{Serialize, Serializer};

use super::{PieceType, Square, PieceType::*};

// Avoid clashes between the core Result and the formatter Result
type FmtResult = std::fmt::Result;

// A from/to square pair with an optional promotion piece. The engine
// never interprets a move beyond these three fields; legality and
// board mutation belong to the host's Position implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<PieceType>,
}

impl Move {
    // The null move, used as an "empty" placeholder to avoid Options.
    // Never legal: it shares its origin and destination square.
    pub const NULL: Self = Self {
        from: Square::new(0),
        to: Square::new(0),
        promotion: None,
    };

    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to, promotion: None }
    }

    pub const fn promoting(from: Square, to: Square, promote_to: PieceType) -> Self {
        Self { from, to, promotion: Some(promote_to) }
    }

    pub const fn from_square(&self) -> Square {
        self.from
    }

    pub const fn to_square(&self) -> Square {
        self.to
    }

    pub const fn promotion(&self) -> Option<PieceType> {
        self.promotion
    }

    pub fn is_null(&self) -> bool {
        self.from == self.to
    }

    pub fn from_notation(pos: &str) -> Result<Self, String> {
        if pos == "0000" {
            return Ok(Self::NULL);
        }

        if pos.len() < 4 || pos.len() > 5 {
            return Err(format!("Invalid move: {pos}"));
        }

        let from = Square::from_notation(&pos[0..2])?;
        let to = Square::from_notation(&pos[2..4])?;

        if pos.len() == 4 {
            return Ok(Self::new(from, to));
        }

        let promote_to = match &pos[4..] {
            "q" => Queen,
            "r" => Rook,
            "b" => Bishop,
            "n" => Knight,
            other => return Err(format!("Invalid promotion: {other}")),
        };

        Ok(Self::promoting(from, to, promote_to))
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.is_null() {
            return f.write_str("0000");
        }

        write!(f, "{}{}", self.from, self.to)?;
        match self.promotion {
            Some(piece) => write!(f, "{}", piece.as_char()),
            None => Ok(()),
        }
    }
}

// Moves travel to the host in coordinate notation
impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
