//! # kifuban-notation
//!
//! 将棋の指し手の日本語表記を扱う。
//!
//! - `parser`: 自由入力の文字列を局面に依存しない `LiteralMove` にする
//! - `convert`: 局面を使って `LiteralMove` と `AppliedMove` を相互に変換する
//! - `format`: `LiteralMove` を棋譜の書式で文字列にする
//!
//! ```
//! use kifuban_core::Board;
//! use kifuban_notation::{BoardNotationExt, parse_move};
//!
//! let mut board = Board::startpos();
//! let literal = parse_move("７六歩").unwrap();
//! let mv = board.convert_move(&literal, true).unwrap();
//! assert_eq!(board.to_literal(&mv).to_string(), "▲７六歩");
//! board.do_move(mv).unwrap();
//! ```

pub mod convert;
pub mod error;
pub mod format;
pub mod literal;
pub mod parser;

pub use convert::{BoardNotationExt, LiteralOptions, rank_move_of, rel_file_of};
pub use error::NotationError;
pub use format::MoveTextStyle;
pub use literal::{LiteralMove, RankMoveType, RelFileType};
pub use parser::{parse_move, parse_move_after, parse_move_prefix, parse_moves};
