//! # kifuban-core
//!
//! 将棋の局面と指し手の規則を扱うライブラリ。
//!
//! ## モジュール構成
//!
//! - `types`: 基本型（Side, Square, Piece, AppliedMove）
//! - `hand`: 持ち駒
//! - `board`: 局面（盤面・持ち駒・手番・履歴）と整合性検査、Zobrist ハッシュ
//! - `rules`: 指し手の合法性（移動・駒打ち・成り）と合法手生成
//! - `mate`: 王手・詰みの判定
//! - `apply`: 指し手の適用・取り消し・やり直し
//! - `shared`: スレッド間で共有する局面
//! - `json`: 局面の JSON 表現

pub mod apply;
pub mod board;
pub mod error;
pub mod hand;
pub mod json;
pub mod mate;
pub mod rules;
pub mod shared;
pub mod types;

pub use apply::MoveFlags;
pub use board::Board;
pub use error::{Error, InvariantViolation, MoveError};
pub use hand::Hand;
pub use rules::{MoveList, SquareList, can_move_range, can_promote, is_promote_force};
pub use shared::SharedBoard;
pub use types::{
    ActionType, AppliedMove, BoardPiece, MoveAction, Piece, PieceKind, Side, SpecialMoveType,
    Square,
};
