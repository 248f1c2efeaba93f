//! 盤面に適用する指し手（AppliedMove）

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Piece, PieceKind, Side, Square};
use crate::error::Error;

/// 指し手の動作種別
///
/// `AppliedMove` からは `None` / `Promote` / `Drop` のいずれかが導出される。
/// `Unpromote`（不成）は棋譜表記の側でのみ使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActionType {
    #[default]
    None,
    Promote,
    Unpromote,
    Drop,
}

/// 駒の移動を伴わない特殊な指し手（終局・中断）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SpecialMoveType {
    /// 中断
    Interrupt = 1,
    /// 投了
    Resign = 2,
    /// 千日手
    Sennichite = 3,
    /// 時間切れ
    TimeUp = 4,
    /// 反則負け
    IllegalMove = 5,
    /// 持将棋
    Jishogi = 6,
    /// 詰み
    CheckMate = 7,
    /// 入玉勝ち
    EnteringKing = 8,
}

impl SpecialMoveType {
    pub const ALL: [SpecialMoveType; 8] = [
        SpecialMoveType::Interrupt,
        SpecialMoveType::Resign,
        SpecialMoveType::Sennichite,
        SpecialMoveType::TimeUp,
        SpecialMoveType::IllegalMove,
        SpecialMoveType::Jishogi,
        SpecialMoveType::CheckMate,
        SpecialMoveType::EnteringKing,
    ];

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<SpecialMoveType> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// 棋譜での表記
    pub const fn name(self) -> &'static str {
        match self {
            SpecialMoveType::Interrupt => "中断",
            SpecialMoveType::Resign => "投了",
            SpecialMoveType::Sennichite => "千日手",
            SpecialMoveType::TimeUp => "切れ負け",
            SpecialMoveType::IllegalMove => "反則負け",
            SpecialMoveType::Jishogi => "持将棋",
            SpecialMoveType::CheckMate => "詰み",
            SpecialMoveType::EnteringKing => "入玉勝ち",
        }
    }
}

/// 指し手の中身
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveAction {
    /// 盤上の駒の移動。`captured` は適用時に盤面から埋められる
    Normal {
        from: Square,
        to: Square,
        piece: Piece,
        promote: bool,
        captured: Option<Piece>,
    },
    /// 駒打ち
    Drop { to: Square, kind: PieceKind },
    /// 投了などの特殊な指し手
    Special(SpecialMoveType),
}

/// 盤面に束縛された、曖昧さのない指し手
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppliedMove {
    pub side: Side,
    pub action: MoveAction,
}

const DROP_BASE: u32 = Square::NUM as u32;

impl AppliedMove {
    /// 盤上の駒を動かす指し手
    pub fn normal(side: Side, from: Square, to: Square, piece: Piece, promote: bool) -> Self {
        AppliedMove {
            side,
            action: MoveAction::Normal {
                from,
                to,
                piece,
                promote,
                captured: None,
            },
        }
    }

    /// 駒打ち
    pub fn drop(side: Side, to: Square, kind: PieceKind) -> Self {
        AppliedMove {
            side,
            action: MoveAction::Drop { to, kind },
        }
    }

    /// 特殊な指し手
    pub fn special(side: Side, special: SpecialMoveType) -> Self {
        AppliedMove {
            side,
            action: MoveAction::Special(special),
        }
    }

    /// 動作種別（格納せず毎回導出する）
    #[inline]
    pub fn action_type(&self) -> ActionType {
        match self.action {
            MoveAction::Normal { promote: true, .. } => ActionType::Promote,
            MoveAction::Drop { .. } => ActionType::Drop,
            _ => ActionType::None,
        }
    }

    /// 移動先（特殊な指し手は `None`）
    #[inline]
    pub fn to(&self) -> Option<Square> {
        match self.action {
            MoveAction::Normal { to, .. } | MoveAction::Drop { to, .. } => Some(to),
            MoveAction::Special(_) => None,
        }
    }

    /// 移動元（駒打ち・特殊な指し手は `None`）
    #[inline]
    pub fn from(&self) -> Option<Square> {
        match self.action {
            MoveAction::Normal { from, .. } => Some(from),
            _ => None,
        }
    }

    /// 動かした駒（移動前の形）。駒打ちは打った駒
    #[inline]
    pub fn moved_piece(&self) -> Option<Piece> {
        match self.action {
            MoveAction::Normal { piece, .. } => Some(piece),
            MoveAction::Drop { kind, .. } => Some(Piece::new(kind)),
            MoveAction::Special(_) => None,
        }
    }

    /// 取った駒
    #[inline]
    pub fn captured(&self) -> Option<Piece> {
        match self.action {
            MoveAction::Normal { captured, .. } => captured,
            _ => None,
        }
    }

    #[inline]
    pub fn is_promote(&self) -> bool {
        matches!(self.action, MoveAction::Normal { promote: true, .. })
    }

    #[inline]
    pub fn is_drop(&self) -> bool {
        matches!(self.action, MoveAction::Drop { .. })
    }

    #[inline]
    pub fn special_move(&self) -> Option<SpecialMoveType> {
        match self.action {
            MoveAction::Special(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn is_special(&self) -> bool {
        self.special_move().is_some()
    }

    /// 取った駒を差し替えた指し手
    pub fn with_captured(mut self, captured_piece: Option<Piece>) -> Self {
        if let MoveAction::Normal { captured, .. } = &mut self.action {
            *captured = captured_piece;
        }
        self
    }

    /// 構造的な妥当性を検査する（盤面とは無関係）
    pub fn validate(&self) -> Result<(), Error> {
        match self.action {
            MoveAction::Normal {
                from,
                to,
                piece,
                promote,
                captured,
            } => {
                from.validate()?;
                to.validate()?;
                piece.validate()?;
                if let Some(captured) = captured {
                    captured.validate()?;
                }
                if from == to || (promote && !piece.can_promote()) {
                    return Err(Error::InvalidMove(*self));
                }
                Ok(())
            }
            MoveAction::Drop { to, kind } => {
                to.validate()?;
                if kind == PieceKind::King {
                    return Err(Error::NotHandPiece(kind));
                }
                Ok(())
            }
            MoveAction::Special(_) => Ok(()),
        }
    }

    /// 32bit パック表現
    ///
    /// - bit0-1:   手番
    /// - bit2:     成り
    /// - bit3-9:   移動先
    /// - bit10-16: 移動元（駒打ちなら 81 + 駒種）
    /// - bit17-21: 動かした駒
    /// - bit22-26: 取った駒
    /// - bit27-30: 特殊な指し手
    pub fn to_code(&self) -> u32 {
        let side = self.side.code() as u32;
        match self.action {
            MoveAction::Normal {
                from,
                to,
                piece,
                promote,
                captured,
            } => {
                side | ((promote as u32) << 2)
                    | ((to.index() as u32) << 3)
                    | ((from.index() as u32) << 10)
                    | ((piece.to_code() as u32) << 17)
                    | ((Piece::code_of(captured) as u32) << 22)
            }
            MoveAction::Drop { to, kind } => {
                side | ((to.index() as u32) << 3)
                    | ((DROP_BASE + kind.code() as u32) << 10)
                    | ((Piece::new(kind).to_code() as u32) << 17)
            }
            MoveAction::Special(special) => side | ((special.code() as u32) << 27),
        }
    }

    /// 32bit パック表現から復元する
    pub fn from_code(code: u32) -> Result<AppliedMove, Error> {
        let invalid = || Error::InvalidMoveCode(code);
        if code >> 31 != 0 {
            return Err(invalid());
        }
        let side = match Side::from_code((code & 0x03) as u8) {
            Some(Some(side)) => side,
            _ => return Err(invalid()),
        };
        let promote = code & (1 << 2) != 0;
        let to_index = ((code >> 3) & 0x7F) as usize;
        let src = (code >> 10) & 0x7F;
        let moved = Piece::from_code(((code >> 17) & 0x1F) as u8).map_err(|_| invalid())?;
        let captured = Piece::from_code(((code >> 22) & 0x1F) as u8).map_err(|_| invalid())?;
        let special = ((code >> 27) & 0x0F) as u8;

        if special != 0 {
            let special = SpecialMoveType::from_code(special).ok_or_else(invalid)?;
            if code & 0x07FF_FFFC != 0 {
                return Err(invalid());
            }
            return Ok(AppliedMove::special(side, special));
        }

        let to = Square::from_index(to_index).ok_or_else(invalid)?;
        let mv = if src >= DROP_BASE {
            let kind = PieceKind::from_code((src - DROP_BASE) as u8).ok_or_else(invalid)?;
            if promote || captured.is_some() || moved != Some(Piece::new(kind)) {
                return Err(invalid());
            }
            AppliedMove::drop(side, to, kind)
        } else {
            let from = Square::from_index(src as usize).ok_or_else(invalid)?;
            let piece = moved.ok_or_else(invalid)?;
            AppliedMove::normal(side, from, to, piece, promote).with_captured(captured)
        };
        mv.validate().map_err(|_| invalid())?;
        Ok(mv)
    }
}

/// デバッグ・ログ用の簡易表記（例: "▲76歩(77)"）。棋譜表記は notation クレートで行う
impl fmt::Display for AppliedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.side.mark())?;
        match self.action {
            MoveAction::Normal {
                from,
                to,
                piece,
                promote,
                ..
            } => {
                write!(f, "{to}{piece}")?;
                if promote {
                    f.write_str("成")?;
                }
                write!(f, "({from})")
            }
            MoveAction::Drop { to, kind } => write!(f, "{to}{}打", kind.name()),
            MoveAction::Special(special) => f.write_str(special.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(file, rank).unwrap()
    }

    #[test]
    fn test_action_type_is_derived() {
        let mv = AppliedMove::normal(Side::Black, sq(7, 7), sq(7, 6), Piece::PAWN, false);
        assert_eq!(mv.action_type(), ActionType::None);
        let mv = AppliedMove::normal(Side::Black, sq(2, 4), sq(2, 3), Piece::PAWN, true);
        assert_eq!(mv.action_type(), ActionType::Promote);
        let mv = AppliedMove::drop(Side::White, sq(5, 5), PieceKind::Bishop);
        assert_eq!(mv.action_type(), ActionType::Drop);
        let mv = AppliedMove::special(Side::White, SpecialMoveType::Resign);
        assert_eq!(mv.action_type(), ActionType::None);
    }

    #[test]
    fn test_move_code_layout() {
        let mv = AppliedMove::normal(Side::White, sq(8, 8), sq(2, 2), Piece::BISHOP, true)
            .with_captured(Some(Piece::BISHOP));
        let code = mv.to_code();
        assert_eq!(code & 0x03, 2);
        assert_eq!((code >> 2) & 1, 1);
        assert_eq!(((code >> 3) & 0x7F) as usize, sq(2, 2).index());
        assert_eq!(((code >> 10) & 0x7F) as usize, sq(8, 8).index());
        assert_eq!(((code >> 17) & 0x1F) as u8, Piece::BISHOP.to_code());
        assert_eq!(((code >> 22) & 0x1F) as u8, Piece::BISHOP.to_code());
        assert_eq!(AppliedMove::from_code(code), Ok(mv));
    }

    #[test]
    fn test_drop_and_special_code() {
        let drop = AppliedMove::drop(Side::Black, sq(5, 5), PieceKind::Knight);
        assert_eq!(AppliedMove::from_code(drop.to_code()), Ok(drop));
        let resign = AppliedMove::special(Side::Black, SpecialMoveType::Resign);
        assert_eq!(AppliedMove::from_code(resign.to_code()), Ok(resign));
    }

    #[test]
    fn test_invalid_move_codes() {
        // 手番なし
        assert!(AppliedMove::from_code(0).is_err());
        // 玉打ち
        let king_drop = 1 | ((DROP_BASE + PieceKind::King.code() as u32) << 10);
        assert!(AppliedMove::from_code(king_drop).is_err());
        // 移動元と移動先が同じ
        let same = AppliedMove::normal(Side::Black, sq(5, 5), sq(5, 5), Piece::GOLD, false);
        assert!(AppliedMove::from_code(same.to_code()).is_err());
    }

    #[test]
    fn test_validate_rejects_promoting_gold() {
        let mv = AppliedMove::normal(Side::Black, sq(5, 4), sq(5, 3), Piece::GOLD, true);
        assert!(mv.validate().is_err());
    }
}
