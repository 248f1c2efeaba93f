//! 手番（Side）

use serde::{Deserialize, Serialize};

/// 手番（先手/後手）
///
/// 盤外に置かれた「持ち主のいない駒」は `Option<Side>` の `None` で表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    Black = 0,
    White = 1,
}

impl Side {
    /// 手番の数
    pub const NUM: usize = 2;

    /// 全ての手番
    pub const ALL: [Side; 2] = [Side::Black, Side::White];

    /// 相手番を返す
    #[inline]
    pub const fn flip(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// インデックスとして使用（配列アクセス用）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 前進方向の段の増分（先手は段が減る方向が前）
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Side::Black => -1,
            Side::White => 1,
        }
    }

    /// パック表現での手番コード（0 は持ち主なし）
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8 + 1
    }

    /// 手番コードから復元する。0 は `Ok(None)`
    pub fn from_code(code: u8) -> Option<Option<Side>> {
        match code {
            0 => Some(None),
            1 => Some(Some(Side::Black)),
            2 => Some(Some(Side::White)),
            _ => None,
        }
    }

    /// 棋譜で使う手番記号
    pub const fn mark(self) -> &'static str {
        match self {
            Side::Black => "▲",
            Side::White => "△",
        }
    }
}

impl std::ops::Not for Side {
    type Output = Side;

    #[inline]
    fn not(self) -> Side {
        self.flip()
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Side::Black => "先手",
            Side::White => "後手",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_flip() {
        assert_eq!(Side::Black.flip(), Side::White);
        assert_eq!(Side::White.flip(), Side::Black);
        assert_eq!(!Side::Black, Side::White);
    }

    #[test]
    fn test_unowned_flip_is_identity() {
        let unowned: Option<Side> = None;
        assert_eq!(unowned.map(Side::flip), None);
        assert_eq!(Some(Side::Black).map(Side::flip), Some(Side::White));
    }

    #[test]
    fn test_side_code_roundtrip() {
        assert_eq!(Side::from_code(0), Some(None));
        assert_eq!(Side::from_code(Side::Black.code()), Some(Some(Side::Black)));
        assert_eq!(Side::from_code(Side::White.code()), Some(Some(Side::White)));
        assert_eq!(Side::from_code(3), None);
    }
}
