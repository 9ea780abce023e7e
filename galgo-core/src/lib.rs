mod clock;
mod events;
mod game_elements;
mod play;
mod position;

// Exports
pub use clock::Clock;
pub use events::{HostEvent, HostNotify};
pub use game_elements::{Color, Move, Piece, PieceType, Square, SquareSet};
pub use play::PlayResult;
pub use position::Position;
