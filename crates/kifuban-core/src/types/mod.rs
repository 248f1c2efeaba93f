//! 基本型（升・駒・手番・指し手）

mod moves;
mod piece;
mod side;
mod square;

pub use moves::{ActionType, AppliedMove, MoveAction, SpecialMoveType};
pub use piece::{BoardPiece, Piece, PieceKind};
pub use side::Side;
pub use square::{KANJI_NUMBERS, Square, ZENKAKU_NUMBERS};
