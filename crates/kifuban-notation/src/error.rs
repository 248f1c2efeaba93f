//! 棋譜表記と局面の変換エラー
//!
//! 文字列が解釈できない場合は parser が `None` を返し、ここには来ない。

use thiserror::Error;

use kifuban_core::MoveError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    /// 表記に合う合法手がない
    #[error("no legal move matches {text}")]
    Illegal {
        text: String,
        /// 候補を1つに絞った後で指せなかった場合の理由
        #[source]
        reason: Option<MoveError>,
    },
    /// 候補が複数残った
    #[error("{text} is ambiguous: {candidates} candidates")]
    Ambiguous { text: String, candidates: usize },
    #[error("piece is missing in {0}")]
    MissingPiece(String),
    #[error("destination is missing in {0}")]
    MissingDestination(String),
    /// 「同」だが直前の手がない
    #[error("{0} refers to the previous move but there is none")]
    NoPreviousMove(String),
    /// 書式名が不明
    #[error("unknown move text style: {0}")]
    UnknownStyle(String),
}
