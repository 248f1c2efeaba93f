//! 棋譜表記上の指し手（LiteralMove）
//!
//! 「５二金右」「同歩」「投了」のように、局面がなければ一意に決まらない指し手。

use serde::{Deserialize, Serialize};

use kifuban_core::{ActionType, Piece, Side, SpecialMoveType, Square};

/// 横方向の区別（左・右・直）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RelFileType {
    #[default]
    None,
    /// 左（指し手から見て左の駒）
    Left,
    /// 右
    Right,
    /// 直（真っ直ぐ上がる）
    Straight,
}

impl RelFileType {
    pub const fn text(self) -> &'static str {
        match self {
            RelFileType::None => "",
            RelFileType::Left => "左",
            RelFileType::Right => "右",
            RelFileType::Straight => "直",
        }
    }
}

/// 縦方向の区別（上・引・寄）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RankMoveType {
    #[default]
    None,
    /// 上（前に進む）
    Up,
    /// 引（後ろに下がる）
    Back,
    /// 寄（横に動く）
    Sideways,
}

impl RankMoveType {
    pub const fn text(self) -> &'static str {
        match self {
            RankMoveType::None => "",
            RankMoveType::Up => "上",
            RankMoveType::Back => "引",
            RankMoveType::Sideways => "寄",
        }
    }
}

/// 棋譜表記上の指し手
///
/// `same_as_old` が真なら移動先は直前の手の移動先で、`dst` は解決済みの場合だけ入る。
/// `piece` は動かす前の駒（成る手なら未成の駒）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LiteralMove {
    pub side: Option<Side>,
    pub dst: Option<Square>,
    pub same_as_old: bool,
    pub piece: Option<Piece>,
    pub rel_file: RelFileType,
    pub rank_move: RankMoveType,
    pub action: ActionType,
    /// KIF の「(77)」のような明示的な移動元
    pub src: Option<Square>,
    pub special: Option<SpecialMoveType>,
}

impl LiteralMove {
    /// 特殊な指し手
    pub fn special(side: Option<Side>, special: SpecialMoveType) -> LiteralMove {
        LiteralMove {
            side,
            special: Some(special),
            ..LiteralMove::default()
        }
    }

    #[inline]
    pub fn is_special(&self) -> bool {
        self.special.is_some()
    }

    /// 移動先を解決する。「同」なら `prev` を使う
    pub fn destination(&self, prev: Option<Square>) -> Option<Square> {
        if self.same_as_old {
            prev.or(self.dst)
        } else {
            self.dst
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_of_same_move() {
        let prev = Square::new(3, 3).ok();
        let same = LiteralMove {
            same_as_old: true,
            piece: Some(Piece::BISHOP),
            ..LiteralMove::default()
        };
        assert_eq!(same.destination(prev), prev);
        assert_eq!(same.destination(None), None);

        let plain = LiteralMove {
            dst: Square::new(7, 6).ok(),
            ..LiteralMove::default()
        };
        assert_eq!(plain.destination(prev), Square::new(7, 6).ok());
    }

    #[test]
    fn test_special_literal() {
        let resign = LiteralMove::special(Some(Side::White), SpecialMoveType::Resign);
        assert!(resign.is_special());
        assert_eq!(resign.piece, None);
    }
}
