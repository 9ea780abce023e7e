use super::Score;

// Piece-square tables, indexed file + 8 * rank with 0 = a1.

// Knights are pushed towards the center and away from the rim. The
// table is color-agnostic: both sides read it by raw square index.
pub const KNIGHT_MAP: [Score; 64] = [
    -10, -10, -10, -10, -10, -10, -10, -10,
    -10, -10,  -5,   0,   0,  -5,  -5, -10,
    -10,  -5,  10,   0,   0,  10,  -5, -10,
     -5,   0,  10,  20,  20,  10,   0,  -5,
     -5,   0,  10,  20,  20,  10,   0,  -5,
    -10,  -5,  10,   0,   0,  10,  -5, -10,
    -10, -10,  -5,   0,   0,  -5, -10, -10,
    -10, -10, -10, -10, -10, -10, -10, -10,
];

// Middlegame king placement for both sides in one table: the lower
// half scores White's king (castled corners good, center bad), the
// upper half carries the sign-flipped values for Black's king, so the
// evaluation simply adds the entries for both kings.
pub const KING_MAP: [Score; 64] = [
     10,  18,  20, -50,   0, -50,  30,  27,
      0,  -5,   0, -80, -100, -80,  5,   5,
    -10, -20, -50, -50, -50, -50, -20, -10,
     -5, -20,  -5, -10, -10,  -5, -20,  -5,
     -5,   0,   5,  10,  10,   5,   0,  -5,
     10,  20,  50,  50,  50,  50,  20,  10,
      0,   5,  10,  80, 100,  80,   0, -10,
    -10, -18, -20,  50,   0,  50, -30, -27,
];
