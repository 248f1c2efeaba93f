//! 升（Square）

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Side;
use crate::error::Error;

/// 筋・段の漢数字（段の表記用）
pub const KANJI_NUMBERS: [&str; 9] = ["一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// 全角数字（筋の表記用）
pub const ZENKAKU_NUMBERS: [&str; 9] = ["１", "２", "３", "４", "５", "６", "７", "８", "９"];

/// 盤上の升
///
/// 筋（file）・段（rank）ともに 1〜9。筋は先手から見て左ほど大きい。
/// 駒打ちの移動元のような「升なし」は `Option<Square>` の `None` で表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// 升の数
    pub const NUM: usize = 81;

    /// 筋・段から升を作る。範囲外なら `Error::InvalidSquare`
    pub fn new(file: u8, rank: u8) -> Result<Square, Error> {
        if Self::in_range(file as i8, rank as i8) {
            Ok(Square { file, rank })
        } else {
            Err(Error::InvalidSquare { file, rank })
        }
    }

    /// 符号付き座標から升を作る。盤外なら `None`（光線の走査用）
    #[inline]
    pub fn from_signed(file: i8, rank: i8) -> Option<Square> {
        Self::in_range(file, rank).then(|| Square {
            file: file as u8,
            rank: rank as u8,
        })
    }

    #[inline]
    const fn in_range(file: i8, rank: i8) -> bool {
        file >= 1 && file <= 9 && rank >= 1 && rank <= 9
    }

    /// インデックス（0..81）から升を作る
    #[inline]
    pub fn from_index(index: usize) -> Option<Square> {
        (index < Self::NUM).then(|| Square {
            file: (index / 9) as u8 + 1,
            rank: (index % 9) as u8 + 1,
        })
    }

    /// 全ての升（1一, 1二, ..., 9九 の順）
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::NUM).filter_map(Square::from_index)
    }

    /// 筋（1〜9）
    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    /// 段（1〜9）
    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// インデックス（(筋-1)*9 + (段-1)）
    #[inline]
    pub const fn index(self) -> usize {
        (self.file as usize - 1) * 9 + (self.rank as usize - 1)
    }

    /// 盤を180度回転させた升
    #[inline]
    pub const fn flip(self) -> Square {
        Square {
            file: 10 - self.file,
            rank: 10 - self.rank,
        }
    }

    /// 値の範囲を検査する（デシリアライズされた値用）
    pub fn validate(self) -> Result<(), Error> {
        Square::new(self.file, self.rank).map(|_| ())
    }

    /// 指定手番から見た段（1 が最も敵陣側）
    #[inline]
    pub const fn relative_rank(self, side: Side) -> u8 {
        match side {
            Side::Black => self.rank,
            Side::White => 10 - self.rank,
        }
    }

    /// 成れる段（敵陣3段）かどうか
    #[inline]
    pub const fn in_promotion_zone(self, side: Side) -> bool {
        self.relative_rank(side) <= 3
    }

    /// 升を相対座標でずらす。盤外なら `None`
    #[inline]
    pub fn offset(self, dfile: i8, drank: i8) -> Option<Square> {
        Square::from_signed(self.file as i8 + dfile, self.rank as i8 + drank)
    }

    /// 棋譜表記（例: "７六"）
    pub fn to_kanji(self) -> String {
        format!(
            "{}{}",
            ZENKAKU_NUMBERS[self.file as usize - 1],
            KANJI_NUMBERS[self.rank as usize - 1]
        )
    }
}

/// 数字2桁の表記（例: "76"）。KIF の移動元表記と同じ
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file, self.rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_range() {
        assert!(Square::new(1, 1).is_ok());
        assert!(Square::new(9, 9).is_ok());
        assert_eq!(Square::new(0, 5), Err(Error::InvalidSquare { file: 0, rank: 5 }));
        assert!(Square::new(5, 10).is_err());
    }

    #[test]
    fn test_square_index_roundtrip() {
        for (i, sq) in Square::all().enumerate() {
            assert_eq!(sq.index(), i);
            assert_eq!(Square::from_index(i), Some(sq));
        }
        assert_eq!(Square::from_index(81), None);
        assert_eq!(Square::all().count(), 81);
    }

    #[test]
    fn test_square_flip() {
        let sq = Square::new(7, 7).unwrap();
        assert_eq!(sq.flip(), Square::new(3, 3).unwrap());
        // 中央は不動
        let center = Square::new(5, 5).unwrap();
        assert_eq!(center.flip(), center);
        assert_eq!(sq.flip().flip(), sq);
    }

    #[test]
    fn test_promotion_zone() {
        let sq3 = Square::new(2, 3).unwrap();
        let sq7 = Square::new(2, 7).unwrap();
        assert!(sq3.in_promotion_zone(Side::Black));
        assert!(!sq3.in_promotion_zone(Side::White));
        assert!(sq7.in_promotion_zone(Side::White));
        assert!(!Square::new(5, 4).unwrap().in_promotion_zone(Side::Black));
    }

    #[test]
    fn test_square_text() {
        let sq = Square::new(7, 6).unwrap();
        assert_eq!(sq.to_string(), "76");
        assert_eq!(sq.to_kanji(), "７六");
    }

    #[test]
    fn test_deserialized_square_is_validated() {
        let sq: Square = serde_json::from_str(r#"{"file":0,"rank":3}"#).unwrap();
        assert!(sq.validate().is_err());
    }
}
