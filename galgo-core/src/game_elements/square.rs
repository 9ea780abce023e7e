use std::fmt::{Display, Formatter};
use serde::Serialize;

// Avoid clashes between the core Result and the formatter Result
type FmtResult = std::fmt::Result;

// A board square, indexed file + 8 * rank with 0 = a1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Square(u8);

impl Square {
    pub const fn new(index: u8) -> Self {
        debug_assert!(index < 64);
        Self(index)
    }

    pub const fn from_coords(file: u8, rank: u8) -> Self {
        Self::new(file + 8 * rank)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    // Number of king moves between two squares
    pub const fn chebyshev_distance(self, other: Square) -> u8 {
        let df = self.file().abs_diff(other.file());
        let dr = self.rank().abs_diff(other.rank());
        if df > dr { df } else { dr }
    }

    pub fn from_notation(pos: &str) -> Result<Self, String> {
        let mut chars = pos.chars();
        let (file_ch, rank_ch) = match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => (f, r),
            _ => return Err(format!("Invalid square: {pos}")),
        };

        let file = match file_ch {
            'a'..='h' => file_ch as u8 - b'a',
            _ => return Err(format!("Invalid file: {file_ch}")),
        };

        let rank = match rank_ch {
            '1'..='8' => rank_ch as u8 - b'1',
            _ => return Err(format!("Invalid rank: {rank_ch}")),
        };

        Ok(Self::from_coords(file, rank))
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank() + 1)
    }
}
