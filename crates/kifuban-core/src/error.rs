//! エラー型
//!
//! - `Error`: 不正な値（升・駒・指し手・持ち駒の構造的な誤り）。盤面に到達させない
//! - `MoveError`: 値としては正しいが規則上指せない手。頻繁に起きる想定の回復可能なエラー
//! - `InvariantViolation`: `Board::validate` が見つけた局面の不整合

use thiserror::Error;

use crate::types::{AppliedMove, Piece, PieceKind, Side, SpecialMoveType, Square};

/// 不正な値
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid square: file={file}, rank={rank}")]
    InvalidSquare { file: u8, rank: u8 },
    #[error("{kind:?} cannot be promoted")]
    InvalidPiece { kind: PieceKind },
    #[error("invalid square name: {0:?}")]
    InvalidSquareName(String),
    #[error("invalid side name: {0:?}")]
    InvalidSideName(String),
    #[error("invalid piece name: {0:?}")]
    InvalidPieceName(String),
    #[error("invalid piece code: {0:#04x}")]
    InvalidPieceCode(u8),
    #[error("invalid board piece code: {0:#04x}")]
    InvalidBoardPieceCode(u8),
    #[error("invalid move: {0}")]
    InvalidMove(AppliedMove),
    #[error("invalid move code: {0:#010x}")]
    InvalidMoveCode(u32),
    #[error("{0:?} cannot be held in hand")]
    NotHandPiece(PieceKind),
    #[error("hand overflow: {count} {kind:?} exceeds supply {supply}")]
    HandOverflow { kind: PieceKind, count: u8, supply: u8 },
    #[error("hand underflow: no {0:?} in hand")]
    HandUnderflow(PieceKind),
}

/// 指せない手の理由
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error(transparent)]
    Malformed(#[from] Error),
    #[error("not {0}'s turn")]
    WrongTurn(Side),
    #[error("game already ended by {}", .0.name())]
    GameAlreadyEnded(SpecialMoveType),
    #[error("no piece on {0}")]
    NoPieceAtSource(Square),
    #[error("piece on {0} does not belong to the mover")]
    NotOwnPiece(Square),
    #[error("declared {declared} but {actual} is on the source square")]
    PieceMismatch { declared: Piece, actual: Piece },
    #[error("own piece on destination {0}")]
    OwnPieceAtDestination(Square),
    #[error("{piece} cannot move from {from} to {to}")]
    Unreachable { piece: Piece, from: Square, to: Square },
    #[error("cannot capture the king on {0}")]
    KingCapture(Square),
    #[error("promotion is not allowed here")]
    CannotPromote,
    #[error("promotion is mandatory here")]
    PromotionRequired,
    #[error("no {0:?} in hand")]
    NotInHand(PieceKind),
    #[error("destination {0} is occupied")]
    Occupied(Square),
    #[error("double pawn on file {0}")]
    DoublePawn(u8),
    #[error("{kind:?} dropped on {to} could never move")]
    DeadDrop { kind: PieceKind, to: Square },
    #[error("pawn drop on {0} gives checkmate")]
    DropPawnMate(Square),
    #[error("move leaves the king in check")]
    LeavesKingInCheck,
    #[error("nothing to redo")]
    NothingToRedo,
}

/// 局面の不整合
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("malformed piece on {square}: {source}")]
    MalformedCell { square: Square, source: Error },
    #[error("{0} has more than one king")]
    TooManyKings(Side),
    #[error("{count} {kind:?} exceeds supply {supply}")]
    SupplyExceeded { kind: PieceKind, count: u32, supply: u8 },
    #[error("{side} has two pawns on file {file}")]
    DoublePawn { side: Side, file: u8 },
}
