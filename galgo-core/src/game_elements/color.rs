use serde::Serialize;

// Which army a piece belongs to, and whose turn it is. Per-side data
// (king squares, attack coverage) lives in two-element arrays indexed
// through `index`: White first, Black second.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}
